//! Strided typed view into another buffer.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};
use tracing::{trace, warn};

use super::{mip_value_count, Data, Layout, Object, SharedData, StridedSlice, StridedSliceMut};
use crate::io::{Input, Output};
use crate::util::*;

/// Typed strided view over bytes owned by a shared storage buffer.
///
/// A proxy never owns bytes. It keeps its storage alive through a
/// [`SharedData`] handle and records where its elements live as an explicit
/// byte offset and stride; the data pointer is derived from the storage on
/// every access, so a view always sees the storage's current buffer.
///
/// A view with no storage, or whose storage holds no bytes, is empty.
/// Storage must own its bytes: a proxy bound to another proxy is empty.
///
/// Locking: [`view`](Self::view) and [`view_mut`](Self::view_mut) hold the
/// storage lock until the returned slice is dropped. Calling
/// [`at`](Self::at)/[`set`](Self::set) on a view of the same storage while a
/// slice is alive deadlocks. A proxy must not be its own storage.
pub struct ProxyArray<T: Element> {
    size: u32,
    stride: u32,
    offset: u32,
    storage: Option<SharedData>,
    layout: Layout,
    _marker: PhantomData<T>,
}

/// Bytes covered by `count` elements of `value_size` bytes, `stride` apart.
///
/// The gap after the last element is not part of the span.
fn span(count: usize, stride: usize, value_size: usize) -> usize {
    if count == 0 {
        0
    } else {
        (count - 1).saturating_mul(stride).saturating_add(value_size)
    }
}

impl<T: Element> ProxyArray<T> {
    /// Create an unbound, empty view.
    pub fn new() -> Self {
        Self {
            size: 0,
            stride: 0,
            offset: 0,
            storage: None,
            layout: Layout::default(),
            _marker: PhantomData,
        }
    }

    /// Create a view bound to `storage`; see [`assign`](Self::assign).
    pub fn with_storage(
        storage: SharedData,
        count: u32,
        offset: u32,
        stride: u32,
        layout: Layout,
    ) -> Result<Self> {
        let mut proxy = Self::new();
        proxy.assign(Some(storage), count, offset, stride, layout)?;
        Ok(proxy)
    }

    /// Bind this view to `count` elements of `storage`, starting `offset`
    /// bytes in and stepping `stride` bytes.
    ///
    /// Missing storage, or storage without bytes yet, leaves the view empty
    /// but still holding the storage reference. A span past the end of the
    /// storage is rejected with [`Error::ViewOutOfRange`] and the view is
    /// reset to the unbound empty state.
    pub fn assign(
        &mut self,
        storage: Option<SharedData>,
        count: u32,
        offset: u32,
        stride: u32,
        layout: Layout,
    ) -> Result<()> {
        self.stride = stride;
        self.layout = layout;
        self.storage = storage;

        let available = self
            .storage
            .as_ref()
            .and_then(|s| s.read().owned_bytes().map(<[u8]>::len));
        let Some(available) = available else {
            trace!(class = T::PROXY_CLASS, "storage has no data, view is empty");
            self.size = 0;
            self.offset = 0;
            return Ok(());
        };

        let span = span(self.count_for(count), stride as usize, T::SIZE);
        if (offset as usize).saturating_add(span) > available {
            self.data_release();
            return Err(Error::ViewOutOfRange {
                offset: offset as usize,
                span,
                available,
            });
        }

        self.size = count;
        self.offset = offset;
        trace!(class = T::PROXY_CLASS, count, offset, stride, "bound view");
        Ok(())
    }

    /// Element count including mip levels.
    pub fn size(&self) -> usize {
        self.count_for(self.size)
    }

    fn count_for(&self, count: u32) -> usize {
        if self.layout.max_num_mipmaps <= 1 {
            count as usize
        } else {
            mip_value_count(count as usize, 1, 1, self.layout.max_num_mipmaps as u32)
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Byte offset of the first element within the storage.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn storage(&self) -> Option<&SharedData> {
        self.storage.as_ref()
    }

    /// True if the storage currently holds bytes this view can address.
    pub fn is_bound(&self) -> bool {
        self.storage
            .as_ref()
            .is_some_and(|s| s.read().owned_bytes().is_some())
    }

    /// Drop the storage reference and reset to empty. Frees no bytes.
    pub fn data_release(&mut self) {
        self.storage = None;
        self.size = 0;
        self.offset = 0;
    }

    fn byte_range(&self) -> (usize, usize) {
        let start = self.offset as usize;
        let end = start.saturating_add(span(self.size(), self.stride as usize, T::SIZE));
        (start, end)
    }

    /// Read-lock the storage and view the elements.
    ///
    /// `None` when unbound, or when the storage shrank below the view's span
    /// since it was assigned.
    pub fn view(&self) -> Option<StridedSlice<'_, T>> {
        let storage = self.storage.as_ref()?;
        let (start, end) = self.byte_range();
        let bytes = RwLockReadGuard::try_map(storage.read(), |d| {
            d.owned_bytes().and_then(|b| b.get(start..end))
        })
        .ok()?;
        Some(StridedSlice::new(bytes, self.size(), self.stride as usize))
    }

    /// Write-lock the storage and view the elements mutably.
    pub fn view_mut(&self) -> Option<StridedSliceMut<'_, T>> {
        let storage = self.storage.as_ref()?;
        let (start, end) = self.byte_range();
        let bytes = RwLockWriteGuard::try_map(storage.write(), |d| {
            d.owned_bytes_mut().and_then(|b| b.get_mut(start..end))
        })
        .ok()?;
        Some(StridedSliceMut::new(bytes, self.size(), self.stride as usize))
    }

    /// Checked read of element `index`.
    pub fn at(&self, index: usize) -> Result<T> {
        match self.view() {
            Some(view) => view.at(index),
            None => Err(Error::out_of_range(index, 0)),
        }
    }

    /// Checked write of element `index`.
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        match self.view_mut() {
            Some(mut view) => view.set(index, value),
            None => Err(Error::out_of_range(index, 0)),
        }
    }

    /// Copy the viewed elements out. Empty when unbound.
    pub fn to_vec(&self) -> Vec<T> {
        self.view().map(|v| v.to_vec()).unwrap_or_default()
    }
}

impl<T: Element> Default for ProxyArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Clone for ProxyArray<T> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            stride: self.stride,
            offset: self.offset,
            storage: self.storage.clone(),
            layout: self.layout,
            _marker: PhantomData,
        }
    }
}

impl<T: Element> fmt::Debug for ProxyArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(T::PROXY_CLASS)
            .field("size", &self.size)
            .field("stride", &self.stride)
            .field("offset", &self.offset)
            .field("storage", &self.storage.as_ref().map(|s| s.read().class_name()))
            .field("layout", &self.layout)
            .finish()
    }
}

impl<T: Element> Object for ProxyArray<T> {
    fn class_name(&self) -> &'static str {
        T::PROXY_CLASS
    }

    fn read(&mut self, input: &mut dyn Input) -> Result<()> {
        let layout = input.read_layout("Layout")?;
        let size = input.read_u32("Size")?;
        let stride = input.read_u32("Stride")?;
        let offset = input.read_u32("Offset")?;
        let storage = input.read_object("Storage")?;

        // Inconsistent storage degrades to an empty view rather than failing the load.
        if let Err(err) = self.assign(storage, size, offset, stride, layout) {
            warn!(class = T::PROXY_CLASS, %err, "discarding out-of-range view");
        } else if size > 0 && self.size == 0 {
            warn!(class = T::PROXY_CLASS, size, "storage unavailable, view is empty");
        }
        Ok(())
    }

    fn write(&self, output: &mut dyn Output) -> Result<()> {
        let offset = if self.is_bound() { self.offset } else { 0 };
        output.write_layout("Layout", &self.layout)?;
        output.write_u32("Size", self.size)?;
        output.write_u32("Stride", self.stride)?;
        output.write_u32("Offset", offset)?;
        output.write_object("Storage", self.storage.as_ref())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Element> Data for ProxyArray<T> {
    fn value_size(&self) -> usize {
        T::SIZE
    }

    fn value_count(&self) -> usize {
        self.size()
    }

    fn data_size(&self) -> usize {
        self.size() * self.stride as usize
    }

    fn layout(&self) -> Layout {
        self.layout
    }

    fn data_pointer(&self) -> *const u8 {
        self.storage
            .as_ref()
            .and_then(|s| s.read().owned_bytes().map(|b| b.as_ptr()))
            .map_or(std::ptr::null(), |base| base.wrapping_add(self.offset as usize))
    }

    fn data_pointer_mut(&mut self) -> *mut u8 {
        let offset = self.offset as usize;
        self.storage
            .as_ref()
            .and_then(|s| s.write().owned_bytes_mut().map(|b| b.as_mut_ptr()))
            .map_or(std::ptr::null_mut(), |base| base.wrapping_add(offset))
    }

    fn data_pointer_at(&self, index: usize) -> *const u8 {
        let base = self.data_pointer();
        if base.is_null() {
            base
        } else {
            base.wrapping_add(index.wrapping_mul(self.stride as usize))
        }
    }

    fn data_pointer_at_mut(&mut self, index: usize) -> *mut u8 {
        let step = self.stride as usize;
        let base = self.data_pointer_mut();
        if base.is_null() {
            base
        } else {
            base.wrapping_add(index.wrapping_mul(step))
        }
    }

    fn width(&self) -> u32 {
        self.size
    }
}

/// True if `a` and `b` share the same storage buffer.
pub fn same_storage<A: Element, B: Element>(a: &ProxyArray<A>, b: &ProxyArray<B>) -> bool {
    match (a.storage(), b.storage()) {
        (Some(x), Some(y)) => Arc::ptr_eq(x, y),
        _ => false,
    }
}

pub type UbyteProxyArray = ProxyArray<u8>;
pub type UshortProxyArray = ProxyArray<u16>;
pub type UintProxyArray = ProxyArray<u32>;
pub type FloatProxyArray = ProxyArray<f32>;
pub type DoubleProxyArray = ProxyArray<f64>;

pub type Vec2ProxyArray = ProxyArray<Vec2>;
pub type Vec3ProxyArray = ProxyArray<Vec3>;
pub type Vec4ProxyArray = ProxyArray<Vec4>;
pub type DVec2ProxyArray = ProxyArray<DVec2>;
pub type DVec3ProxyArray = ProxyArray<DVec3>;
pub type DVec4ProxyArray = ProxyArray<DVec4>;
pub type UbVec4ProxyArray = ProxyArray<U8Vec4>;
pub type SVec2ProxyArray = ProxyArray<I16Vec2>;
pub type UsVec2ProxyArray = ProxyArray<U16Vec2>;
pub type IVec3ProxyArray = ProxyArray<IVec3>;
pub type UVec3ProxyArray = ProxyArray<UVec3>;
pub type Mat4ProxyArray = ProxyArray<Mat4>;
pub type DMat4ProxyArray = ProxyArray<DMat4>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Array, FloatArray, UbyteArray};

    #[repr(C)]
    #[derive(Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
    }

    const VERTEX_STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

    fn interleaved(count: usize) -> SharedData {
        let vertices: Vec<Vertex> = (0..count)
            .map(|i| {
                let f = i as f32;
                Vertex { position: [f, f + 0.5, -f], normal: [0.0, 1.0, 0.0], uv: [f * 0.1, 1.0] }
            })
            .collect();
        UbyteArray::from_vec(bytemuck::cast_slice(&vertices).to_vec()).share()
    }

    #[test]
    fn test_view_extracts_field() {
        let storage = interleaved(4);
        let positions =
            Vec3ProxyArray::with_storage(storage.clone(), 4, 0, VERTEX_STRIDE, Layout::default()).unwrap();
        let uvs = Vec2ProxyArray::with_storage(storage.clone(), 4, 24, VERTEX_STRIDE, Layout::default()).unwrap();

        assert_eq!(positions.size(), 4);
        assert_eq!(positions.at(2).unwrap(), Vec3::new(2.0, 2.5, -2.0));
        assert_eq!(uvs.at(3).unwrap(), Vec2::new(3.0 * 0.1, 1.0));
        assert_eq!(positions.data_size(), 4 * VERTEX_STRIDE as usize);
        assert!(same_storage(&positions, &uvs));
        assert_eq!(Arc::strong_count(&storage), 3);
    }

    #[test]
    fn test_data_pointer_tracks_offset() {
        let storage = interleaved(3);
        let normals =
            Vec3ProxyArray::with_storage(storage.clone(), 3, 12, VERTEX_STRIDE, Layout::default()).unwrap();
        let base = storage.read().data_pointer();
        assert_eq!(normals.data_pointer(), base.wrapping_add(12));
        assert_eq!(normals.data_pointer_at(2), base.wrapping_add(12 + 2 * VERTEX_STRIDE as usize));

        let far = base.wrapping_add(12).wrapping_add(usize::MAX.wrapping_mul(VERTEX_STRIDE as usize));
        assert_eq!(normals.data_pointer_at(usize::MAX), far);
    }

    #[test]
    fn test_set_leaves_gaps_untouched() {
        // 4 u16 elements at stride 6, gaps filled with a sentinel
        let storage = UbyteArray::from_vec(vec![0xAB; 24]).share();
        let view = UshortProxyArray::with_storage(storage.clone(), 4, 0, 6, Layout::default()).unwrap();
        for i in 0..4 {
            view.set(i, 0x0102 * (i as u16 + 1)).unwrap();
        }

        let guard = storage.read();
        let bytes = guard.owned_bytes().unwrap();
        for i in 0..4 {
            let gap = &bytes[i * 6 + 2..i * 6 + 6];
            assert!(gap.iter().all(|b| *b == 0xAB), "gap {i} modified");
        }
        drop(guard);
        assert_eq!(view.to_vec(), vec![0x0102, 0x0204, 0x0306, 0x0408]);
    }

    #[test]
    fn test_unbound_storage_is_empty() {
        let mut view = FloatProxyArray::new();
        view.assign(None, 10, 4, 4, Layout::default()).unwrap();
        assert_eq!(view.size(), 0);
        assert!(view.data_pointer().is_null());
        assert!(view.view().is_none());

        let empty = Array::<f32>::new().share();
        view.assign(Some(empty), 10, 4, 4, Layout::default()).unwrap();
        assert!(view.is_empty());
        assert!(view.storage().is_some());
        assert!(view.data_pointer().is_null());
        assert!(view.at(0).is_err());
    }

    #[test]
    fn test_out_of_range_view_rejected() {
        let storage = UbyteArray::with_len(16).share();
        let mut view = UintProxyArray::new();

        // last element ends exactly at byte 16
        view.assign(Some(storage.clone()), 3, 4, 4, Layout::default()).unwrap();
        assert_eq!(view.size(), 3);

        let err = view.assign(Some(storage), 4, 4, 4, Layout::default()).unwrap_err();
        assert!(matches!(err, Error::ViewOutOfRange { offset: 4, span: 16, available: 16 }));
        assert!(view.is_empty());
        assert!(view.storage().is_none());
    }

    #[test]
    fn test_view_revalidates_after_storage_shrinks() {
        let storage = FloatArray::from([1.0, 2.0, 3.0, 4.0]).share();
        let view = FloatProxyArray::with_storage(storage.clone(), 2, 8, 4, Layout::default()).unwrap();
        assert_eq!(view.to_vec(), vec![3.0, 4.0]);

        crate::core::downcast_mut::<FloatArray>(&storage).unwrap().resize(2);
        assert!(view.view().is_none());
        assert!(view.at(0).is_err());
    }

    #[test]
    fn test_mip_aware_size() {
        let storage = UbyteArray::with_len(64).share();
        let layout = Layout::new(DataType::UINT8, 1).with_mipmaps(3);
        let view = UbyteProxyArray::with_storage(storage, 8, 0, 1, layout).unwrap();
        assert_eq!(view.size(), 14);
        assert_eq!(view.value_count(), 14);
        assert_eq!(view.width(), 8);
        assert_eq!(view.to_vec().len(), 14);
    }

    #[test]
    fn test_data_release_keeps_storage_alive_elsewhere() {
        let storage = interleaved(2);
        let mut view =
            Vec3ProxyArray::with_storage(storage.clone(), 2, 0, VERTEX_STRIDE, Layout::default()).unwrap();
        view.data_release();
        assert!(view.is_empty());
        assert!(view.data_pointer().is_null());
        assert_eq!(Arc::strong_count(&storage), 1);
        assert!(storage.read().owned_bytes().is_some());
    }

    #[test]
    fn test_proxy_as_storage_is_unbound() {
        let bytes = UbyteArray::with_len(8).share();
        let inner = UbyteProxyArray::with_storage(bytes, 8, 0, 1, Layout::default()).unwrap();
        let outer = UbyteProxyArray::with_storage(crate::core::share(inner), 4, 0, 1, Layout::default()).unwrap();
        assert!(outer.is_empty());
        assert!(!outer.is_bound());
    }
}
