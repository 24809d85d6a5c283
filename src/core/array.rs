//! Owning contiguous buffer of elements.

use std::any::Any;
use std::fmt;
use std::ops::{Deref, DerefMut};

use super::{share, Data, Layout, Object, SharedData};
use crate::io::{Input, Output};
use crate::util::*;

/// Exclusive owner of a contiguous run of `T`.
///
/// Moving an `Array` moves its buffer; `clone` makes a deep copy, so two
/// arrays never share one allocation. Share a buffer between views by
/// wrapping it with [`Array::share`].
///
/// Element access comes in two tiers: indexing (through `Deref<Target = [T]>`)
/// and [`value`](Self::value)/[`put`](Self::put) assert bounds only in debug
/// builds, while [`at`](Self::at)/[`set`](Self::set) return
/// [`Error::IndexOutOfRange`].
#[derive(Clone, PartialEq)]
pub struct Array<T: Element> {
    data: Vec<T>,
    layout: Layout,
}

impl<T: Element> Array<T> {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create an array of `count` default-valued elements.
    pub fn with_len(count: usize) -> Self {
        Self::from_vec(vec![T::default(); count])
    }

    /// Take ownership of `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            data,
            layout: Layout::new(T::DATA_TYPE, T::SIZE as u32),
        }
    }

    /// Replace the layout attached to this array.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Move into a shared handle that proxy views can bind to.
    pub fn share(self) -> SharedData {
        share(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Free the buffer and reset to empty.
    pub fn clear(&mut self) {
        self.data = Vec::new();
    }

    /// Drop the current buffer and take ownership of `data`.
    pub fn assign(&mut self, data: Vec<T>) {
        self.data = data;
    }

    /// Change the element count.
    ///
    /// The first `min(len, count)` elements are kept; new elements are
    /// default-valued. Spare capacity is released when shrinking.
    pub fn resize(&mut self, count: usize) {
        self.data.resize(count, T::default());
        self.data.shrink_to_fit();
    }

    /// Hand the buffer to the caller, leaving this array empty.
    pub fn data_release(&mut self) -> Vec<T> {
        std::mem::take(&mut self.data)
    }

    /// Element `index`. Bounds are asserted in debug builds only.
    #[inline]
    pub fn value(&self, index: usize) -> T {
        check_index!(index, self.data.len());
        self.data[index]
    }

    /// Overwrite element `index`. Bounds are asserted in debug builds only.
    #[inline]
    pub fn put(&mut self, index: usize, value: T) {
        check_index!(index, self.data.len());
        self.data[index] = value;
    }

    /// Checked access to element `index`.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.data.len();
        self.data.get(index).ok_or(Error::out_of_range(index, len))
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.data.len();
        self.data.get_mut(index).ok_or(Error::out_of_range(index, len))
    }

    /// Checked overwrite of element `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.at_mut(index)? = value;
        Ok(())
    }

    /// Element bytes in native layout.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.data)
    }
}

impl<T: Element> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Deref for Array<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Element> DerefMut for Array<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Element> From<Vec<T>> for Array<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Element, const N: usize> From<[T; N]> for Array<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_vec(values.to_vec())
    }
}

impl<T: Element> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T: Element> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T: Element> IntoIterator for &'a mut Array<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

impl<T: Element> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(T::ARRAY_CLASS)
            .field("len", &self.data.len())
            .field("layout", &self.layout)
            .finish()
    }
}

impl<T: Element> Object for Array<T> {
    fn class_name(&self) -> &'static str {
        T::ARRAY_CLASS
    }

    fn read(&mut self, input: &mut dyn Input) -> Result<()> {
        self.layout = input.read_layout("Layout")?;
        let count = input.read_u32("Size")? as usize;
        let len = count
            .checked_mul(T::SIZE)
            .ok_or_else(|| Error::invalid(format!("{}: size {} overflows", T::ARRAY_CLASS, count)))?;
        let bytes = input.read_bytes("Data", len)?;
        self.data = bytemuck::pod_collect_to_vec(&bytes);
        Ok(())
    }

    fn write(&self, output: &mut dyn Output) -> Result<()> {
        let count = u32::try_from(self.data.len())
            .map_err(|_| Error::invalid(format!("{}: {} elements exceed u32", T::ARRAY_CLASS, self.data.len())))?;
        output.write_layout("Layout", &self.layout)?;
        output.write_u32("Size", count)?;
        output.write_bytes("Data", self.as_bytes())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Element> Data for Array<T> {
    fn value_size(&self) -> usize {
        T::SIZE
    }

    fn value_count(&self) -> usize {
        self.data.len()
    }

    fn data_size(&self) -> usize {
        self.data.len() * T::SIZE
    }

    fn layout(&self) -> Layout {
        self.layout
    }

    fn owned_bytes(&self) -> Option<&[u8]> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.as_bytes())
        }
    }

    fn owned_bytes_mut(&mut self) -> Option<&mut [u8]> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.as_bytes_mut())
        }
    }

    fn data_pointer(&self) -> *const u8 {
        if self.data.is_empty() {
            std::ptr::null()
        } else {
            self.data.as_ptr().cast()
        }
    }

    fn data_pointer_mut(&mut self) -> *mut u8 {
        if self.data.is_empty() {
            std::ptr::null_mut()
        } else {
            self.data.as_mut_ptr().cast()
        }
    }
}

pub type BoolArray = Array<Bool>;
pub type UbyteArray = Array<u8>;
pub type ByteArray = Array<i8>;
pub type UshortArray = Array<u16>;
pub type ShortArray = Array<i16>;
pub type UintArray = Array<u32>;
pub type IntArray = Array<i32>;
pub type HalfArray = Array<f16>;
pub type FloatArray = Array<f32>;
pub type DoubleArray = Array<f64>;

pub type Vec2Array = Array<Vec2>;
pub type Vec3Array = Array<Vec3>;
pub type Vec4Array = Array<Vec4>;
pub type DVec2Array = Array<DVec2>;
pub type DVec3Array = Array<DVec3>;
pub type DVec4Array = Array<DVec4>;
pub type UbVec4Array = Array<U8Vec4>;
pub type UsVec2Array = Array<U16Vec2>;
pub type IVec2Array = Array<IVec2>;
pub type IVec3Array = Array<IVec3>;
pub type UVec3Array = Array<UVec3>;
pub type Mat4Array = Array<Mat4>;
pub type DMat4Array = Array<DMat4>;
