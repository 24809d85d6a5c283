//! Layout descriptor attached to buffers.

use crate::util::DataType;

/// Row order of image data stored in a buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Origin {
    #[default]
    TopLeft = 0,
    BottomLeft = 1,
}

impl Origin {
    /// Convert from the u8 tag used on the wire. Unknown tags map to `TopLeft`.
    pub const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::BottomLeft,
            _ => Self::TopLeft,
        }
    }
}

/// Format and stride metadata for a buffer, with an optional mip level count.
///
/// Copied by value; a buffer's layout does not change after it is attached.
/// Block dimensions and origin are carried but not interpreted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    pub format: DataType,
    pub stride: u32,
    /// Number of mip levels the buffer holds. 0 and 1 both mean a single level.
    pub max_num_mipmaps: u8,
    pub origin: Origin,
    pub block_width: u8,
    pub block_height: u8,
    pub block_depth: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            format: DataType::UNKNOWN,
            stride: 0,
            max_num_mipmaps: 0,
            origin: Origin::TopLeft,
            block_width: 1,
            block_height: 1,
            block_depth: 1,
        }
    }
}

impl Layout {
    /// Layout for elements of `format` packed `stride` bytes apart.
    pub fn new(format: DataType, stride: u32) -> Self {
        Self { format, stride, ..Self::default() }
    }

    /// Same layout with a mip level count.
    pub fn with_mipmaps(mut self, max_num_mipmaps: u8) -> Self {
        self.max_num_mipmaps = max_num_mipmaps;
        self
    }

    /// True if more than one mip level is stored.
    #[inline]
    pub fn has_mipmaps(&self) -> bool {
        self.max_num_mipmaps > 1
    }
}

/// Number of values in a `width x height x depth` image plus its mip chain.
///
/// Each level halves every extent greater than one, flooring at 1. The chain
/// stops after `num_mipmaps` levels or once all extents reach 1.
pub fn mip_value_count(width: usize, height: usize, depth: usize, num_mipmaps: u32) -> usize {
    let (mut w, mut h, mut d) = (width, height, depth);
    let mut count = w * h * d;
    let mut remaining = num_mipmaps;
    while remaining > 1 && (w > 1 || h > 1 || d > 1) {
        remaining -= 1;
        if w > 1 {
            w /= 2;
        }
        if h > 1 {
            h /= 2;
        }
        if d > 1 {
            d /= 2;
        }
        count += w * h * d;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_level() {
        assert_eq!(mip_value_count(8, 1, 1, 0), 8);
        assert_eq!(mip_value_count(8, 1, 1, 1), 8);
        assert_eq!(mip_value_count(4, 4, 1, 1), 16);
    }

    #[test]
    fn test_mip_chain() {
        // 8 + 4 + 2
        assert_eq!(mip_value_count(8, 1, 1, 3), 14);
        // 4x4 + 2x2 + 1x1, capped by extents
        assert_eq!(mip_value_count(4, 4, 1, 10), 21);
        // 4x2 + 2x1 + 1x1
        assert_eq!(mip_value_count(4, 2, 1, 3), 11);
    }

    #[test]
    fn test_layout_defaults() {
        let layout = Layout::default();
        assert!(!layout.has_mipmaps());
        assert_eq!(layout.block_width, 1);
        assert!(Layout::new(DataType::VEC3F, 12).with_mipmaps(3).has_mipmaps());
        assert_eq!(Origin::from_u8(1), Origin::BottomLeft);
        assert_eq!(Origin::from_u8(9), Origin::TopLeft);
    }
}
