//! Class-name registry used to reconstruct objects from streams.

use std::collections::HashMap;

use tracing::debug;

use crate::core::{share, Array, Data, Object, ProxyArray, SharedData};
use crate::util::*;

/// Constructor of a default-valued object.
pub type Constructor = fn() -> SharedData;

fn construct<D: Data + Default>() -> SharedData {
    share(D::default())
}

/// Maps class names found in streams to constructors.
///
/// [`ObjectFactory::new`] knows every array and proxy type of the crate;
/// applications register their own [`Data`] types on top.
#[derive(Clone)]
pub struct ObjectFactory {
    constructors: HashMap<&'static str, Constructor>,
}

impl ObjectFactory {
    /// Factory with no registered classes.
    pub fn empty() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// Factory with all built-in array and proxy classes.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory
            .register_element::<Bool>()
            .register_element::<u8>()
            .register_element::<i8>()
            .register_element::<u16>()
            .register_element::<i16>()
            .register_element::<u32>()
            .register_element::<i32>()
            .register_element::<u64>()
            .register_element::<i64>()
            .register_element::<f16>()
            .register_element::<f32>()
            .register_element::<f64>()
            .register_element::<Vec2>()
            .register_element::<Vec3>()
            .register_element::<Vec4>()
            .register_element::<DVec2>()
            .register_element::<DVec3>()
            .register_element::<DVec4>()
            .register_element::<U8Vec2>()
            .register_element::<U8Vec3>()
            .register_element::<U8Vec4>()
            .register_element::<I16Vec2>()
            .register_element::<I16Vec3>()
            .register_element::<I16Vec4>()
            .register_element::<U16Vec2>()
            .register_element::<U16Vec3>()
            .register_element::<U16Vec4>()
            .register_element::<IVec2>()
            .register_element::<IVec3>()
            .register_element::<IVec4>()
            .register_element::<UVec2>()
            .register_element::<UVec3>()
            .register_element::<UVec4>()
            .register_element::<Mat4>()
            .register_element::<DMat4>();
        factory
    }

    /// Register `D` under its class name, replacing any previous entry.
    pub fn register<D: Data + Default>(&mut self) -> &mut Self {
        let name = D::default().class_name();
        debug!(class = name, "registering class");
        self.constructors.insert(name, construct::<D>);
        self
    }

    /// Register `Array<T>` and `ProxyArray<T>`.
    pub fn register_element<T: Element>(&mut self) -> &mut Self {
        self.register::<Array<T>>().register::<ProxyArray<T>>()
    }

    /// Construct a default object of class `class_name`.
    pub fn create(&self, class_name: &str) -> Option<SharedData> {
        self.constructors.get(class_name).map(|ctor| ctor())
    }

    /// Like [`create`](Self::create), failing with [`Error::UnknownClass`].
    pub fn try_create(&self, class_name: &str) -> Result<SharedData> {
        self.create(class_name)
            .ok_or_else(|| Error::UnknownClass(class_name.to_string()))
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.constructors.contains_key(class_name)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for ObjectFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classes() {
        let factory = ObjectFactory::new();
        assert_eq!(factory.len(), 35 * 2);
        assert!(factory.contains("vec3Array"));
        assert!(factory.contains("vec3ProxyArray"));

        let obj = factory.create("floatArray").unwrap();
        assert_eq!(obj.read().class_name(), "floatArray");
        assert_eq!(obj.read().value_count(), 0);
    }

    #[test]
    fn test_unknown_class() {
        let factory = ObjectFactory::empty();
        assert!(factory.is_empty());
        assert!(factory.create("vec3Array").is_none());
        assert!(matches!(factory.try_create("vec3Array"), Err(Error::UnknownClass(_))));
    }

    #[test]
    fn test_register() {
        let mut factory = ObjectFactory::empty();
        factory.register::<Array<f32>>();
        assert!(factory.contains("floatArray"));
        assert!(!factory.contains("floatProxyArray"));
    }
}
