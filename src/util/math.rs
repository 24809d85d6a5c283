//! Math type re-exports.
//!
//! Vector and matrix element types come from `glam`, half floats from `half`.
//! The library treats all of them as opaque fixed-size POD values.

pub use glam::{
    // Single precision vectors
    Vec2, Vec3, Vec4,
    // Double precision vectors
    DVec2, DVec3, DVec4,
    // Small integer vectors
    U8Vec2, U8Vec3, U8Vec4,
    I16Vec2, I16Vec3, I16Vec4,
    U16Vec2, U16Vec3, U16Vec4,
    // 32-bit integer vectors
    IVec2, IVec3, IVec4,
    UVec2, UVec3, UVec4,
    // Matrices
    Mat4, DMat4,
};

pub use half::f16;
