//! Integration tests for stream round-trips of arrays and proxy views.

use std::sync::Arc;

use vertex_data::core::{
    downcast_ref, same_storage, share, Data, FloatArray, FloatProxyArray, Layout, SharedData, UbyteArray,
    Vec2ProxyArray, Vec3ProxyArray,
};
use vertex_data::io::{self, ObjectFactory};
use vertex_data::util::{DataType, Vec2, Vec3};

use tempfile::NamedTempFile;

#[repr(C)]
#[derive(Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
    pad: [f32; 3],
}

const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;
const UV_OFFSET: u32 = 12;

fn vertex_storage(count: usize) -> SharedData {
    let vertices: Vec<Vertex> = (0..count)
        .map(|i| {
            let f = i as f32;
            Vertex { position: [f, 2.0 * f, 3.0 * f], uv: [f, -f], pad: [9.0; 3] }
        })
        .collect();
    UbyteArray::from_vec(bytemuck::cast_slice(&vertices).to_vec()).share()
}

fn mesh_roots(count: u32) -> Vec<SharedData> {
    let storage = vertex_storage(count as usize);
    let positions = Vec3ProxyArray::with_storage(
        storage.clone(),
        count,
        0,
        STRIDE,
        Layout::new(DataType::VEC3F, STRIDE),
    )
    .expect("Failed to bind positions");
    let uvs = Vec2ProxyArray::with_storage(storage, count, UV_OFFSET, STRIDE, Layout::new(DataType::VEC2F, STRIDE))
        .expect("Failed to bind uvs");
    vec![share(positions), share(uvs)]
}

#[test]
fn test_shared_storage_relinked() {
    let bytes = io::encode(&mesh_roots(5)).expect("Failed to encode");
    let roots = io::decode(&bytes, &ObjectFactory::new()).expect("Failed to decode");
    assert_eq!(roots.len(), 2);

    let positions = roots[0].as_ref().expect("positions missing");
    let uvs = roots[1].as_ref().expect("uvs missing");
    let positions = downcast_ref::<Vec3ProxyArray>(positions).expect("wrong positions class");
    let uvs = downcast_ref::<Vec2ProxyArray>(uvs).expect("wrong uvs class");

    assert!(same_storage(&*positions, &*uvs));
    assert_eq!(positions.size(), 5);
    assert_eq!(uvs.offset(), UV_OFFSET);
    assert_eq!(positions.layout().format, DataType::VEC3F);
    assert_eq!(positions.to_vec()[4], Vec3::new(4.0, 8.0, 12.0));
    assert_eq!(uvs.to_vec()[2], Vec2::new(2.0, -2.0));
}

#[test]
fn test_pointers_follow_storage() {
    let bytes = io::encode(&mesh_roots(4)).expect("Failed to encode");
    let roots = io::decode(&bytes, &ObjectFactory::new()).expect("Failed to decode");
    let uvs = downcast_ref::<Vec2ProxyArray>(roots[1].as_ref().unwrap()).unwrap();

    let storage = uvs.storage().expect("storage missing");
    let base = storage.read().data_pointer();
    assert!(!base.is_null());
    assert_eq!(uvs.data_pointer(), base.wrapping_add(UV_OFFSET as usize));
    for i in 0..uvs.size() {
        let expected = base.wrapping_add(UV_OFFSET as usize + i * STRIDE as usize);
        assert_eq!(uvs.data_pointer_at(i), expected);
    }
}

#[test]
fn test_unreadable_storage_gives_empty_view() {
    let bytes = io::encode(&mesh_roots(3)).expect("Failed to encode");

    // Proxies are known, their byte storage is not.
    let mut factory = ObjectFactory::empty();
    factory.register_element::<Vec3>().register_element::<Vec2>();
    let roots = io::decode(&bytes, &factory).expect("Failed to decode");

    for root in &roots {
        let data = root.as_ref().expect("proxy missing").read();
        assert_eq!(data.value_count(), 0);
        assert!(data.data_pointer().is_null());
    }
}

#[test]
fn test_file_roundtrip() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp.path();

    let weights = FloatArray::from([0.25, 0.5, 0.75]).share();
    io::write_file(path, &[weights.clone(), weights]).expect("Failed to write file");

    let roots = io::read_file(path, &ObjectFactory::new()).expect("Failed to read file");
    let first = roots[0].as_ref().unwrap();
    let second = roots[1].as_ref().unwrap();
    assert!(Arc::ptr_eq(first, second), "shared root should be written once");
    assert_eq!(&downcast_ref::<FloatArray>(first).unwrap()[..], &[0.25, 0.5, 0.75]);
}

#[test]
fn test_mip_chain_roundtrip() {
    let storage = FloatArray::from_vec((0..14).map(|i| i as f32).collect()).share();
    let layout = Layout::new(DataType::FLOAT32, 4).with_mipmaps(3);
    let levels = FloatProxyArray::with_storage(storage, 8, 0, 4, layout).expect("Failed to bind mip chain");
    assert_eq!(levels.size(), 14);

    let bytes = io::encode(&[share(levels)]).expect("Failed to encode");
    let roots = io::decode(&bytes, &ObjectFactory::new()).expect("Failed to decode");
    let restored = downcast_ref::<FloatProxyArray>(roots[0].as_ref().unwrap()).unwrap();
    assert_eq!(restored.size(), 14);
    assert_eq!(restored.width(), 8);
    assert_eq!(restored.to_vec()[13], 13.0);
}
