//! Binary stream format constants.
//!
//! ```text
//! +------------------+
//! | Magic: "VDATA"   |  5 bytes
//! +------------------+
//! | Version          |  2 bytes (u16 LE)
//! +------------------+
//! | Reserved         |  1 byte
//! +------------------+
//! | Root count       |  4 bytes (u32 LE)
//! +------------------+
//! | Root objects...  |
//! +------------------+
//! ```
//!
//! An object reference is a `u32` id, 0 meaning null. The first reference to
//! an id is followed by the class name, a `u64` payload length and the
//! payload; later references are the id alone.

/// Magic bytes at the start of a stream file.
pub const DATA_MAGIC: &[u8; 5] = b"VDATA";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Offset of the version in the header.
pub const VERSION_OFFSET: usize = 5;

/// Current stream format version.
pub const CURRENT_VERSION: u16 = 1;

/// Object id written for a null reference.
pub const NULL_OBJECT_ID: u32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(DATA_MAGIC.len(), VERSION_OFFSET);
        assert!(VERSION_OFFSET + 2 <= HEADER_SIZE);
    }
}
