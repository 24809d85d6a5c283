//! Keyed read/write contract between objects and serialization streams.
//!
//! Objects describe their state as an ordered list of named fields. A stream
//! implementation decides whether the keys appear on the wire; the binary
//! stream only logs them.

use crate::core::{Layout, Origin, SharedData};
use crate::util::{DataType, Error, PlainOldDataType, Result};

/// Sink for an object's fields.
pub trait Output {
    fn write_u8(&mut self, key: &str, value: u8) -> Result<()>;

    fn write_u32(&mut self, key: &str, value: u32) -> Result<()>;

    fn write_u64(&mut self, key: &str, value: u64) -> Result<()>;

    fn write_string(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write a flat block of raw bytes with no length prefix.
    fn write_bytes(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Write a reference to a shared object.
    ///
    /// An object reachable through several references is persisted once;
    /// later references only record its identity.
    fn write_object(&mut self, key: &str, object: Option<&SharedData>) -> Result<()>;

    /// Write a count followed by each string.
    fn write_strings(&mut self, key: &str, values: &[String]) -> Result<()> {
        let count = u32::try_from(values.len())
            .map_err(|_| Error::invalid(format!("{key}: too many strings ({})", values.len())))?;
        self.write_u32(key, count)?;
        for value in values {
            self.write_string(key, value)?;
        }
        Ok(())
    }

    fn write_layout(&mut self, key: &str, layout: &Layout) -> Result<()> {
        self.write_u8(key, layout.format.pod as u8)?;
        self.write_u8(key, layout.format.extent)?;
        self.write_u32(key, layout.stride)?;
        self.write_u8(key, layout.max_num_mipmaps)?;
        self.write_u8(key, layout.origin as u8)?;
        self.write_u8(key, layout.block_width)?;
        self.write_u8(key, layout.block_height)?;
        self.write_u8(key, layout.block_depth)
    }
}

/// Source of an object's fields, read back in the order they were written.
pub trait Input {
    fn read_u8(&mut self, key: &str) -> Result<u8>;

    fn read_u32(&mut self, key: &str) -> Result<u32>;

    fn read_u64(&mut self, key: &str) -> Result<u64>;

    fn read_string(&mut self, key: &str) -> Result<String>;

    /// Read a flat block of exactly `len` raw bytes.
    fn read_bytes(&mut self, key: &str, len: usize) -> Result<Vec<u8>>;

    /// Read a reference to a shared object.
    ///
    /// Returns `Ok(None)` for null references and for objects the stream
    /// could not reconstruct.
    fn read_object(&mut self, key: &str) -> Result<Option<SharedData>>;

    fn read_strings(&mut self, key: &str) -> Result<Vec<String>> {
        let count = self.read_u32(key)? as usize;
        let mut values = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            values.push(self.read_string(key)?);
        }
        Ok(values)
    }

    fn read_layout(&mut self, key: &str) -> Result<Layout> {
        let pod = PlainOldDataType::from_u8(self.read_u8(key)?);
        let extent = self.read_u8(key)?;
        Ok(Layout {
            format: DataType::new(pod, extent),
            stride: self.read_u32(key)?,
            max_num_mipmaps: self.read_u8(key)?,
            origin: Origin::from_u8(self.read_u8(key)?),
            block_width: self.read_u8(key)?,
            block_height: self.read_u8(key)?,
            block_depth: self.read_u8(key)?,
        })
    }
}
