//! Stream files: header followed by a list of root objects.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::{BinaryInput, BinaryOutput, Input, ObjectFactory, Output};
use crate::core::SharedData;
use crate::util::{Error, Result};

/// Encode `roots` into a complete stream with header.
///
/// Objects shared between roots are written once.
pub fn encode(roots: &[SharedData]) -> Result<Vec<u8>> {
    let count = u32::try_from(roots.len())
        .map_err(|_| Error::invalid(format!("too many root objects ({})", roots.len())))?;

    let mut output = BinaryOutput::with_header();
    output.write_u32("Roots", count)?;
    for root in roots {
        output.write_object("Root", Some(root))?;
    }
    debug!(roots = roots.len(), objects = output.num_objects(), bytes = output.len(), "encoded stream");
    Ok(output.into_bytes())
}

/// Decode a complete stream into its root objects.
///
/// Roots the factory cannot reconstruct come back as `None`.
pub fn decode(bytes: &[u8], factory: &ObjectFactory) -> Result<Vec<Option<SharedData>>> {
    let mut input = BinaryInput::with_header(bytes, factory)?;
    let count = input.read_u32("Roots")? as usize;
    let mut roots = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        roots.push(input.read_object("Root")?);
    }
    if input.remaining() > 0 {
        return Err(Error::invalid(format!(
            "{} trailing bytes after root objects",
            input.remaining()
        )));
    }
    debug!(version = input.version(), roots = count, objects = input.num_objects(), "decoded stream");
    Ok(roots)
}

/// Write `roots` to a stream file at `path`.
pub fn write_file(path: impl AsRef<Path>, roots: &[SharedData]) -> Result<()> {
    let bytes = encode(roots)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(&bytes)?;
    file.flush()?;
    Ok(())
}

/// Read the root objects of the stream file at `path`.
pub fn read_file(path: impl AsRef<Path>, factory: &ObjectFactory) -> Result<Vec<Option<SharedData>>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    decode(&bytes, factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{downcast_ref, Array, Vec3Array};
    use crate::util::Vec3;

    #[test]
    fn test_encode_decode() {
        let positions = Vec3Array::from([Vec3::X, Vec3::Y]).share();
        let indices = Array::<u16>::from([0, 1]).share();
        let bytes = encode(&[positions, indices]).unwrap();

        let mut factory = ObjectFactory::empty();
        factory.register_element::<Vec3>();
        let roots = decode(&bytes, &factory).unwrap();
        assert_eq!(roots.len(), 2);
        let restored = roots[0].as_ref().unwrap();
        assert_eq!(&downcast_ref::<Vec3Array>(restored).unwrap()[..], &[Vec3::X, Vec3::Y]);
        // ushortArray is not registered
        assert!(roots[1].is_none());
    }

    #[test]
    fn test_empty_stream() {
        let bytes = encode(&[]).unwrap();
        assert!(decode(&bytes, &ObjectFactory::new()).unwrap().is_empty());
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = encode(&[]).unwrap();
        bytes.push(0);
        assert!(matches!(decode(&bytes, &ObjectFactory::new()), Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = read_file("/nonexistent/path/data.vdata", &ObjectFactory::new());
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
