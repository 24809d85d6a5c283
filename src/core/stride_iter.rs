//! Strided access over a byte range.
//!
//! Elements sit `stride` bytes apart and are read and written with unaligned
//! copies, so a view can start at any byte offset of its storage.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard};

use crate::util::{Element, Error, Result};

#[inline]
fn read_at<T: Element>(bytes: &[u8], start: usize) -> T {
    bytemuck::pod_read_unaligned(&bytes[start..start + T::SIZE])
}

#[inline]
fn write_at<T: Element>(bytes: &mut [u8], start: usize, value: T) {
    bytes[start..start + T::SIZE].copy_from_slice(bytemuck::bytes_of(&value));
}

/// Iterator stepping `stride` bytes per element.
///
/// Two iterators compare equal when they point at the same byte position.
/// Comparing iterators built with different strides is meaningless and
/// asserts in debug builds.
#[derive(Clone)]
pub struct StrideIter<'a, T: Element> {
    bytes: &'a [u8],
    pos: usize,
    remaining: usize,
    stride: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Element> StrideIter<'a, T> {
    /// Iterate `len` elements of `bytes`, the first at byte 0.
    pub fn new(bytes: &'a [u8], len: usize, stride: usize) -> Self {
        Self { bytes, pos: 0, remaining: len, stride, _marker: PhantomData }
    }

    /// Byte position of the next element.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl<T: Element> Iterator for StrideIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let value = read_at(self.bytes, self.pos);
        self.pos += self.stride;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Element> ExactSizeIterator for StrideIter<'_, T> {}

impl<T: Element> FusedIterator for StrideIter<'_, T> {}

impl<T: Element> PartialEq for StrideIter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        debug_assert_eq!(self.stride, other.stride, "comparing iterators with different strides");
        self.pos == other.pos
    }
}

/// Read-locked typed view of strided bytes.
///
/// Holds the storage read lock until dropped.
pub struct StridedSlice<'a, T: Element> {
    bytes: MappedRwLockReadGuard<'a, [u8]>,
    len: usize,
    stride: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Element> StridedSlice<'a, T> {
    pub(crate) fn new(bytes: MappedRwLockReadGuard<'a, [u8]>, len: usize, stride: usize) -> Self {
        Self { bytes, len, stride, _marker: PhantomData }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The locked bytes, from the first element to the end of the last.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Element `index`. Bounds are asserted in debug builds only.
    #[inline]
    pub fn value(&self, index: usize) -> T {
        check_index!(index, self.len);
        read_at(&self.bytes, index * self.stride)
    }

    /// Checked read of element `index`.
    pub fn at(&self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(Error::out_of_range(index, self.len));
        }
        Ok(read_at(&self.bytes, index * self.stride))
    }

    pub fn iter(&self) -> StrideIter<'_, T> {
        StrideIter::new(&self.bytes, self.len, self.stride)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

/// Write-locked typed view of strided bytes.
///
/// Writes touch exactly `size_of::<T>()` bytes per element; the gap bytes
/// between elements are left as they are.
pub struct StridedSliceMut<'a, T: Element> {
    bytes: MappedRwLockWriteGuard<'a, [u8]>,
    len: usize,
    stride: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Element> StridedSliceMut<'a, T> {
    pub(crate) fn new(bytes: MappedRwLockWriteGuard<'a, [u8]>, len: usize, stride: usize) -> Self {
        Self { bytes, len, stride, _marker: PhantomData }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn value(&self, index: usize) -> T {
        check_index!(index, self.len);
        read_at(&self.bytes, index * self.stride)
    }

    /// Overwrite element `index`. Bounds are asserted in debug builds only.
    #[inline]
    pub fn put(&mut self, index: usize, value: T) {
        check_index!(index, self.len);
        write_at(&mut self.bytes, index * self.stride, value);
    }

    pub fn at(&self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(Error::out_of_range(index, self.len));
        }
        Ok(read_at(&self.bytes, index * self.stride))
    }

    /// Checked overwrite of element `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        if index >= self.len {
            return Err(Error::out_of_range(index, self.len));
        }
        write_at(&mut self.bytes, index * self.stride, value);
        Ok(())
    }

    /// Apply `f` to a copy of element `index` and store the result.
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut T)) -> Result<()> {
        let mut value = self.at(index)?;
        f(&mut value);
        self.set(index, value)
    }

    /// Store `value` in every element.
    pub fn fill(&mut self, value: T) {
        for i in 0..self.len {
            write_at(&mut self.bytes, i * self.stride, value);
        }
    }

    /// Store the values produced by `values`, stopping at the shorter side.
    pub fn copy_from_iter(&mut self, values: impl IntoIterator<Item = T>) -> usize {
        let mut written = 0;
        for (i, value) in (0..self.len).zip(values) {
            write_at(&mut self.bytes, i * self.stride, value);
            written += 1;
        }
        written
    }

    pub fn iter(&self) -> StrideIter<'_, T> {
        StrideIter::new(&self.bytes, self.len, self.stride)
    }
}
