//! # Vertex data
//!
//! Typed binary buffers for vertex attributes, indices and images.
//!
//! An [`Array`](core::Array) owns a contiguous run of elements. A
//! [`ProxyArray`](core::ProxyArray) is a typed strided window into another
//! buffer, typically one field of an interleaved vertex array. Both implement
//! the [`Data`](core::Data) interface, so renderers and I/O code can treat
//! any buffer uniformly through its size, stride and layout.
//!
//! ## Modules
//!
//! - [`util`] - Element types, data types, errors
//! - [`core`] - Layout, the `Data` interface, arrays, proxies, mappings
//! - [`io`] - Keyed serialization streams and stream files
//!
//! ## Example
//!
//! ```ignore
//! use vertex_data::prelude::*;
//!
//! #[repr(C)]
//! #[derive(Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
//! struct Vertex { position: Vec3, uv: Vec2 }
//!
//! let storage = UbyteArray::from_vec(bytemuck::cast_vec(vertices)).share();
//! let uvs = Vec2ProxyArray::with_storage(storage, count, 12, 20, Layout::default())?;
//! if let Some(view) = uvs.view() {
//!     for uv in view.iter() {
//!         println!("{uv}");
//!     }
//! }
//! ```

pub mod util;
pub mod core;
pub mod io;

// Re-export commonly used types
pub use util::{DataType, Element, Error, PlainOldDataType, Result};
pub use core::{Array, Data, Layout, Object, ProxyArray, SharedData};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::*;
    pub use crate::core::*;
    pub use crate::io::{read_file, write_file, BinaryInput, BinaryOutput, Input, ObjectFactory, Output};
}
