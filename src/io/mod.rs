//! Serialization of data objects.
//!
//! Objects write themselves field by field through [`Output`] and read
//! themselves back through [`Input`]. [`BinaryOutput`] and [`BinaryInput`]
//! keep identity tables so shared storage is written once and relinked on
//! read; [`ObjectFactory`] maps class names back to constructors.

pub mod binary;
pub mod factory;
pub mod file;
pub mod format;
pub mod stream;

pub use binary::{BinaryInput, BinaryOutput};
pub use factory::{Constructor, ObjectFactory};
pub use file::{decode, encode, read_file, write_file};
pub use format::{CURRENT_VERSION, DATA_MAGIC, HEADER_SIZE};
pub use stream::{Input, Output};
