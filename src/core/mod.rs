//! Core layer - buffers, views and the interface they share.
//!
//! This module provides:
//! - [`Data`] / [`Object`] - Polymorphic buffer and serialization interface
//! - [`Array`] - Owning contiguous buffer of elements
//! - [`ProxyArray`] - Strided typed view into another buffer
//! - [`Layout`] - Format, stride and mip metadata
//! - [`ArrayMapping`] - Semantic names of attribute slots

/// Bounds assertion for the unchecked access tier.
///
/// Active in debug builds, or in every build with the `strict-bounds` feature.
macro_rules! check_index {
    ($index:expr, $len:expr) => {{
        let (index, len): (usize, usize) = ($index, $len);
        if cfg!(any(debug_assertions, feature = "strict-bounds")) {
            assert!(index < len, "index {} out of range (len: {})", index, len);
        }
    }};
}

mod layout;
mod data;
mod array;
mod stride_iter;
mod proxy_array;
mod array_mapping;

pub use layout::{Layout, Origin, mip_value_count};
pub use data::{Data, Object, SharedData, share, downcast_ref, downcast_mut};
pub use array::*;
pub use stride_iter::{StrideIter, StridedSlice, StridedSliceMut};
pub use proxy_array::*;
pub use array_mapping::ArrayMapping;
