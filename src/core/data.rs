//! Object and Data traits - the polymorphic interface of every buffer.

use std::any::Any;
use std::sync::Arc;

use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Layout;
use crate::io::{Input, Output};
use crate::util::Result;

/// Shared-ownership handle to a buffer.
///
/// Proxy views hold one of these to keep their storage alive. The lock
/// serializes mutation of the bytes against reads through any view.
pub type SharedData = Arc<RwLock<dyn Data>>;

/// Wrap a buffer in a [`SharedData`] handle.
pub fn share<D: Data>(data: D) -> SharedData {
    Arc::new(RwLock::new(data))
}

/// Lock `data` for reading as the concrete type `D`.
pub fn downcast_ref<D: Data>(data: &SharedData) -> Option<MappedRwLockReadGuard<'_, D>> {
    RwLockReadGuard::try_map(data.read(), |d| d.as_any().downcast_ref::<D>()).ok()
}

/// Lock `data` for writing as the concrete type `D`.
pub fn downcast_mut<D: Data>(data: &SharedData) -> Option<MappedRwLockWriteGuard<'_, D>> {
    RwLockWriteGuard::try_map(data.write(), |d| d.as_any_mut().downcast_mut::<D>()).ok()
}

/// A serializable object.
///
/// `write` must emit exactly the fields `read` restores, in the same order.
pub trait Object: Any + Send + Sync {
    /// Name identifying the concrete type in serialized streams.
    fn class_name(&self) -> &'static str;

    /// Restore state from `input`.
    fn read(&mut self, input: &mut dyn Input) -> Result<()>;

    /// Persist state to `output`.
    fn write(&self, output: &mut dyn Output) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Common interface of buffer-like objects.
///
/// For contiguous buffers `data_size() == value_count() * value_size()`.
/// Strided views span `value_count() * stride` bytes instead, because the
/// underlying storage has gaps between elements.
pub trait Data: Object {
    /// Size in bytes of one logical element.
    fn value_size(&self) -> usize;

    /// Number of logical elements, including any mip levels.
    fn value_count(&self) -> usize;

    /// Total bytes spanned by the elements.
    fn data_size(&self) -> usize;

    fn layout(&self) -> Layout;

    /// Contiguous bytes owned by this object.
    ///
    /// `None` when the buffer is empty or when the bytes belong to another
    /// object. Only objects returning `Some` can back a proxy view.
    fn owned_bytes(&self) -> Option<&[u8]> {
        None
    }

    fn owned_bytes_mut(&mut self) -> Option<&mut [u8]> {
        None
    }

    /// Pointer to the first element, null when empty.
    ///
    /// Valid until the next structural change (resize, assign, clear) of the
    /// object that owns the bytes; re-query instead of caching it.
    fn data_pointer(&self) -> *const u8;

    fn data_pointer_mut(&mut self) -> *mut u8;

    /// Pointer to element `index`, null when empty. Not bounds checked.
    fn data_pointer_at(&self, index: usize) -> *const u8 {
        let base = self.data_pointer();
        if base.is_null() {
            base
        } else {
            base.wrapping_add(index.wrapping_mul(self.value_size()))
        }
    }

    fn data_pointer_at_mut(&mut self, index: usize) -> *mut u8 {
        let step = self.value_size();
        let base = self.data_pointer_mut();
        if base.is_null() {
            base
        } else {
            base.wrapping_add(index.wrapping_mul(step))
        }
    }

    fn dimensions(&self) -> u32 {
        1
    }

    fn width(&self) -> u32 {
        u32::try_from(self.value_count()).unwrap_or(u32::MAX)
    }

    fn height(&self) -> u32 {
        1
    }

    fn depth(&self) -> u32 {
        1
    }
}
