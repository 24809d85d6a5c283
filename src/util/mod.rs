//! Utility types and functions.
//!
//! This module contains fundamental types used throughout the library:
//! - [`PlainOldDataType`] - Enum of scalar component types
//! - [`DataType`] - POD + extent (component count)
//! - [`Element`] - Trait for storable element types
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and half

mod pod;
mod data_type;
mod element;
mod error;
mod math;

pub use pod::*;
pub use data_type::*;
pub use element::*;
pub use error::*;
pub use math::*;
