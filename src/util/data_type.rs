//! DataType - combines POD type with extent (component count).

use super::PlainOldDataType;
use std::fmt;

/// DataType describes how one element is laid out in memory.
///
/// It combines a [`PlainOldDataType`] with an extent. A `Vec3` is Float32
/// with extent 3, a `Mat4` is Float32 with extent 16.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
    /// The scalar component type
    pub pod: PlainOldDataType,
    /// Number of components per element
    pub extent: u8,
}

impl DataType {
    #[inline]
    pub const fn new(pod: PlainOldDataType, extent: u8) -> Self {
        Self { pod, extent }
    }

    /// Create a scalar DataType (extent = 1).
    #[inline]
    pub const fn scalar(pod: PlainOldDataType) -> Self {
        Self { pod, extent: 1 }
    }

    /// Returns the total size in bytes for one element.
    #[inline]
    pub const fn num_bytes(&self) -> usize {
        self.pod.num_bytes() * self.extent as usize
    }

    pub const UNKNOWN: Self = Self::new(PlainOldDataType::Unknown, 0);

    // Scalars
    pub const BOOL: Self = Self::scalar(PlainOldDataType::Boolean);
    pub const UINT8: Self = Self::scalar(PlainOldDataType::Uint8);
    pub const INT8: Self = Self::scalar(PlainOldDataType::Int8);
    pub const UINT16: Self = Self::scalar(PlainOldDataType::Uint16);
    pub const INT16: Self = Self::scalar(PlainOldDataType::Int16);
    pub const UINT32: Self = Self::scalar(PlainOldDataType::Uint32);
    pub const INT32: Self = Self::scalar(PlainOldDataType::Int32);
    pub const UINT64: Self = Self::scalar(PlainOldDataType::Uint64);
    pub const INT64: Self = Self::scalar(PlainOldDataType::Int64);
    pub const FLOAT16: Self = Self::scalar(PlainOldDataType::Float16);
    pub const FLOAT32: Self = Self::scalar(PlainOldDataType::Float32);
    pub const FLOAT64: Self = Self::scalar(PlainOldDataType::Float64);

    // Float vectors
    pub const VEC2F: Self = Self::new(PlainOldDataType::Float32, 2);
    pub const VEC3F: Self = Self::new(PlainOldDataType::Float32, 3);
    pub const VEC4F: Self = Self::new(PlainOldDataType::Float32, 4);
    pub const VEC2D: Self = Self::new(PlainOldDataType::Float64, 2);
    pub const VEC3D: Self = Self::new(PlainOldDataType::Float64, 3);
    pub const VEC4D: Self = Self::new(PlainOldDataType::Float64, 4);

    // Integer vectors
    pub const VEC2UB: Self = Self::new(PlainOldDataType::Uint8, 2);
    pub const VEC3UB: Self = Self::new(PlainOldDataType::Uint8, 3);
    pub const VEC4UB: Self = Self::new(PlainOldDataType::Uint8, 4);
    pub const VEC2S: Self = Self::new(PlainOldDataType::Int16, 2);
    pub const VEC3S: Self = Self::new(PlainOldDataType::Int16, 3);
    pub const VEC4S: Self = Self::new(PlainOldDataType::Int16, 4);
    pub const VEC2US: Self = Self::new(PlainOldDataType::Uint16, 2);
    pub const VEC3US: Self = Self::new(PlainOldDataType::Uint16, 3);
    pub const VEC4US: Self = Self::new(PlainOldDataType::Uint16, 4);
    pub const VEC2I: Self = Self::new(PlainOldDataType::Int32, 2);
    pub const VEC3I: Self = Self::new(PlainOldDataType::Int32, 3);
    pub const VEC4I: Self = Self::new(PlainOldDataType::Int32, 4);
    pub const VEC2UI: Self = Self::new(PlainOldDataType::Uint32, 2);
    pub const VEC3UI: Self = Self::new(PlainOldDataType::Uint32, 3);
    pub const VEC4UI: Self = Self::new(PlainOldDataType::Uint32, 4);

    // Matrices - extent = rows * cols
    pub const MAT44F: Self = Self::new(PlainOldDataType::Float32, 16);
    pub const MAT44D: Self = Self::new(PlainOldDataType::Float64, 16);
}

impl Default for DataType {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.extent == 1 {
            write!(f, "{}", self.pod.name())
        } else {
            write!(f, "{}[{}]", self.pod.name(), self.extent)
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_sizes() {
        assert_eq!(DataType::BOOL.num_bytes(), 1);
        assert_eq!(DataType::FLOAT16.num_bytes(), 2);
        assert_eq!(DataType::VEC3F.num_bytes(), 12);
        assert_eq!(DataType::VEC4UB.num_bytes(), 4);
        assert_eq!(DataType::MAT44D.num_bytes(), 128);
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(format!("{}", DataType::FLOAT32), "float32_t");
        assert_eq!(format!("{}", DataType::VEC3F), "float32_t[3]");
        assert_eq!(format!("{}", DataType::UNKNOWN), "UNKNOWN[0]");
    }
}
