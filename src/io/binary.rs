//! Binary stream implementation of [`Output`] and [`Input`].
//!
//! Integers are little-endian, strings are a `u32` byte length followed by
//! UTF-8, raw blocks carry no prefix. Field keys are not stored; they only
//! appear in trace logs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use tracing::{trace, warn};

use super::format::*;
use super::{Input, ObjectFactory, Output};
use crate::core::{Object, SharedData};
use crate::util::{Error, Result};

/// Address identifying a shared object for the lifetime of a write.
#[inline]
fn identity(object: &SharedData) -> usize {
    Arc::as_ptr(object) as *const () as usize
}

/// Output stream writing into an in-memory buffer.
///
/// Each shared object is written once; the stream keeps a handle to every
/// written object so identities stay unique until the stream is dropped.
pub struct BinaryOutput {
    current: Vec<u8>,
    /// Buffers of the enclosing objects while a nested payload is written.
    parents: Vec<Vec<u8>>,
    objects: HashMap<usize, (u32, SharedData)>,
    next_id: u32,
}

impl BinaryOutput {
    /// Create a stream with no header.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
            parents: Vec::new(),
            objects: HashMap::new(),
            next_id: NULL_OBJECT_ID + 1,
        }
    }

    /// Create a stream starting with the file header.
    pub fn with_header() -> Self {
        let mut output = Self::new();
        output.current.extend_from_slice(DATA_MAGIC);
        output.current.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
        output.current.push(0);
        output
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Number of distinct objects written.
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.current
    }
}

impl Default for BinaryOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for BinaryOutput {
    fn write_u8(&mut self, key: &str, value: u8) -> Result<()> {
        trace!(key, value, "write u8");
        self.current.push(value);
        Ok(())
    }

    fn write_u32(&mut self, key: &str, value: u32) -> Result<()> {
        trace!(key, value, "write u32");
        self.current.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_u64(&mut self, key: &str, value: u64) -> Result<()> {
        trace!(key, value, "write u64");
        self.current.write_u64::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_string(&mut self, key: &str, value: &str) -> Result<()> {
        trace!(key, value, "write string");
        let len = u32::try_from(value.len())
            .map_err(|_| Error::invalid(format!("{key}: string of {} bytes too long", value.len())))?;
        self.current.write_u32::<LittleEndian>(len)?;
        self.current.extend_from_slice(value.as_bytes());
        Ok(())
    }

    fn write_bytes(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        trace!(key, len = bytes.len(), "write bytes");
        self.current.extend_from_slice(bytes);
        Ok(())
    }

    fn write_object(&mut self, key: &str, object: Option<&SharedData>) -> Result<()> {
        let Some(object) = object else {
            return self.write_u32(key, NULL_OBJECT_ID);
        };

        if let Some((id, _)) = self.objects.get(&identity(object)) {
            let id = *id;
            trace!(key, id, "write object reference");
            return self.write_u32(key, id);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(identity(object), (id, Arc::clone(object)));
        self.write_u32(key, id)?;

        let guard = object.read();
        self.write_string("Class", guard.class_name())?;

        // Payload goes to its own buffer so its length can precede it.
        self.parents.push(std::mem::take(&mut self.current));
        let result = guard.write(self);
        let parent = self.parents.pop().unwrap_or_default();
        let payload = std::mem::replace(&mut self.current, parent);
        result?;

        self.write_u64("Length", payload.len() as u64)?;
        self.current.extend_from_slice(&payload);
        Ok(())
    }
}

/// Input stream reading from an in-memory buffer.
pub struct BinaryInput<'a> {
    data: &'a [u8],
    pos: usize,
    factory: &'a ObjectFactory,
    objects: HashMap<u32, SharedData>,
    /// Ids whose first occurrence was skipped; later references resolve to `None`.
    unresolved: HashSet<u32>,
    /// Ids whose payload is being decoded.
    pending: HashSet<u32>,
    version: u16,
}

impl<'a> BinaryInput<'a> {
    /// Read a headerless stream.
    pub fn new(data: &'a [u8], factory: &'a ObjectFactory) -> Self {
        Self {
            data,
            pos: 0,
            factory,
            objects: HashMap::new(),
            unresolved: HashSet::new(),
            pending: HashSet::new(),
            version: CURRENT_VERSION,
        }
    }

    /// Read a stream starting with the file header.
    pub fn with_header(data: &'a [u8], factory: &'a ObjectFactory) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::UnexpectedEof(data.len() as u64));
        }
        if &data[..DATA_MAGIC.len()] != DATA_MAGIC {
            return Err(Error::InvalidMagic);
        }
        let version = LittleEndian::read_u16(&data[VERSION_OFFSET..VERSION_OFFSET + 2]);
        if version > CURRENT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let mut input = Self::new(data, factory);
        input.pos = HEADER_SIZE;
        input.version = version;
        Ok(input)
    }

    /// Format version of the stream.
    #[inline]
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Current read position in bytes.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Number of distinct objects read.
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::UnexpectedEof((self.pos + len) as u64));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

impl Input for BinaryInput<'_> {
    fn read_u8(&mut self, key: &str) -> Result<u8> {
        let value = self.take(1)?[0];
        trace!(key, value, "read u8");
        Ok(value)
    }

    fn read_u32(&mut self, key: &str) -> Result<u32> {
        let value = LittleEndian::read_u32(self.take(4)?);
        trace!(key, value, "read u32");
        Ok(value)
    }

    fn read_u64(&mut self, key: &str) -> Result<u64> {
        let value = LittleEndian::read_u64(self.take(8)?);
        trace!(key, value, "read u64");
        Ok(value)
    }

    fn read_string(&mut self, key: &str) -> Result<String> {
        let len = LittleEndian::read_u32(self.take(4)?) as usize;
        let value = String::from_utf8(self.take(len)?.to_vec())?;
        trace!(key, value = value.as_str(), "read string");
        Ok(value)
    }

    fn read_bytes(&mut self, key: &str, len: usize) -> Result<Vec<u8>> {
        trace!(key, len, "read bytes");
        Ok(self.take(len)?.to_vec())
    }

    fn read_object(&mut self, key: &str) -> Result<Option<SharedData>> {
        let id = self.read_u32(key)?;
        if id == NULL_OBJECT_ID {
            return Ok(None);
        }
        if self.pending.contains(&id) {
            warn!(key, id, "reference to an object still being decoded");
            return Ok(None);
        }
        if self.unresolved.contains(&id) {
            trace!(key, id, "reference to a skipped object");
            return Ok(None);
        }
        if let Some(object) = self.objects.get(&id) {
            trace!(key, id, "relink object reference");
            return Ok(Some(Arc::clone(object)));
        }

        let class = self.read_string("Class")?;
        let len = usize::try_from(self.read_u64("Length")?)
            .map_err(|_| Error::invalid(format!("{class}: payload length overflows")))?;
        if len > self.remaining() {
            return Err(Error::UnexpectedEof((self.pos + len) as u64));
        }
        let end = self.pos + len;

        let Some(object) = self.factory.create(&class) else {
            warn!(key, class = class.as_str(), "unknown class, skipping object");
            self.unresolved.insert(id);
            self.pos = end;
            return Ok(None);
        };

        self.pending.insert(id);
        let result = object.write().read(self);
        self.pending.remove(&id);

        if let Err(err) = result {
            warn!(key, class = class.as_str(), %err, "failed to decode object, skipping");
            self.unresolved.insert(id);
            self.pos = end;
            return Ok(None);
        }
        if self.pos != end {
            warn!(key, class = class.as_str(), read = self.pos, end, "object payload length mismatch");
            self.pos = end;
        }
        self.objects.insert(id, Arc::clone(&object));
        Ok(Some(object))
    }
}
