//! Element trait - types that can be stored in arrays and viewed through proxies.

use bytemuck::Pod;

use super::math::*;
use super::{Bool, DataType};

/// Trait for POD types stored in [`Array`](crate::core::Array) and
/// [`ProxyArray`](crate::core::ProxyArray).
///
/// The class names identify the concrete array types in serialized streams,
/// so each implementation must use names unique across the crate.
pub trait Element: Pod + Default + Send + Sync + 'static {
    /// Component layout of one element.
    const DATA_TYPE: DataType;

    /// Class name of `Array<Self>` in serialized streams.
    const ARRAY_CLASS: &'static str;

    /// Class name of `ProxyArray<Self>` in serialized streams.
    const PROXY_CLASS: &'static str;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();
}

macro_rules! impl_element {
    ($ty:ty, $data_type:expr, $array:literal, $proxy:literal) => {
        impl Element for $ty {
            const DATA_TYPE: DataType = $data_type;
            const ARRAY_CLASS: &'static str = $array;
            const PROXY_CLASS: &'static str = $proxy;
        }
    };
}

impl_element!(Bool, DataType::BOOL, "boolArray", "boolProxyArray");
impl_element!(u8, DataType::UINT8, "ubyteArray", "ubyteProxyArray");
impl_element!(i8, DataType::INT8, "byteArray", "byteProxyArray");
impl_element!(u16, DataType::UINT16, "ushortArray", "ushortProxyArray");
impl_element!(i16, DataType::INT16, "shortArray", "shortProxyArray");
impl_element!(u32, DataType::UINT32, "uintArray", "uintProxyArray");
impl_element!(i32, DataType::INT32, "intArray", "intProxyArray");
impl_element!(u64, DataType::UINT64, "ulongArray", "ulongProxyArray");
impl_element!(i64, DataType::INT64, "longArray", "longProxyArray");
impl_element!(f16, DataType::FLOAT16, "halfArray", "halfProxyArray");
impl_element!(f32, DataType::FLOAT32, "floatArray", "floatProxyArray");
impl_element!(f64, DataType::FLOAT64, "doubleArray", "doubleProxyArray");

impl_element!(Vec2, DataType::VEC2F, "vec2Array", "vec2ProxyArray");
impl_element!(Vec3, DataType::VEC3F, "vec3Array", "vec3ProxyArray");
impl_element!(Vec4, DataType::VEC4F, "vec4Array", "vec4ProxyArray");
impl_element!(DVec2, DataType::VEC2D, "dvec2Array", "dvec2ProxyArray");
impl_element!(DVec3, DataType::VEC3D, "dvec3Array", "dvec3ProxyArray");
impl_element!(DVec4, DataType::VEC4D, "dvec4Array", "dvec4ProxyArray");

impl_element!(U8Vec2, DataType::VEC2UB, "ubvec2Array", "ubvec2ProxyArray");
impl_element!(U8Vec3, DataType::VEC3UB, "ubvec3Array", "ubvec3ProxyArray");
impl_element!(U8Vec4, DataType::VEC4UB, "ubvec4Array", "ubvec4ProxyArray");
impl_element!(I16Vec2, DataType::VEC2S, "svec2Array", "svec2ProxyArray");
impl_element!(I16Vec3, DataType::VEC3S, "svec3Array", "svec3ProxyArray");
impl_element!(I16Vec4, DataType::VEC4S, "svec4Array", "svec4ProxyArray");
impl_element!(U16Vec2, DataType::VEC2US, "usvec2Array", "usvec2ProxyArray");
impl_element!(U16Vec3, DataType::VEC3US, "usvec3Array", "usvec3ProxyArray");
impl_element!(U16Vec4, DataType::VEC4US, "usvec4Array", "usvec4ProxyArray");
impl_element!(IVec2, DataType::VEC2I, "ivec2Array", "ivec2ProxyArray");
impl_element!(IVec3, DataType::VEC3I, "ivec3Array", "ivec3ProxyArray");
impl_element!(IVec4, DataType::VEC4I, "ivec4Array", "ivec4ProxyArray");
impl_element!(UVec2, DataType::VEC2UI, "uivec2Array", "uivec2ProxyArray");
impl_element!(UVec3, DataType::VEC3UI, "uivec3Array", "uivec3ProxyArray");
impl_element!(UVec4, DataType::VEC4UI, "uivec4Array", "uivec4ProxyArray");

impl_element!(Mat4, DataType::MAT44F, "mat4Array", "mat4ProxyArray");
impl_element!(DMat4, DataType::MAT44D, "dmat4Array", "dmat4ProxyArray");

#[cfg(test)]
mod tests {
    use super::*;

    fn check<T: Element>() {
        assert_eq!(T::SIZE, T::DATA_TYPE.num_bytes(), "{}", T::ARRAY_CLASS);
    }

    #[test]
    fn test_element_sizes_match_data_type() {
        check::<Bool>();
        check::<u16>();
        check::<f16>();
        check::<f64>();
        check::<Vec3>();
        check::<DVec4>();
        check::<U8Vec4>();
        check::<I16Vec3>();
        check::<UVec2>();
        check::<Mat4>();
        check::<DMat4>();
    }

    #[test]
    fn test_class_names() {
        assert_eq!(<Vec3 as Element>::ARRAY_CLASS, "vec3Array");
        assert_eq!(<Vec3 as Element>::PROXY_CLASS, "vec3ProxyArray");
        assert_ne!(<u8 as Element>::ARRAY_CLASS, <i8 as Element>::ARRAY_CLASS);
    }
}
