//! 引用计数测试
//!
//! 计数 = 构造的 1 + 各容器持有的引用 + 查找返回的引用 - 释放次数

mod common;
use common::runtime;
use wyrt_core::{ErrorKind, TypeTag};

#[test]
fn test_containers_retain_elements() {
    let rt = runtime();
    let v = rt.box_string("shared");
    let list = rt.list_new(0).unwrap();
    let set = rt.set_new(TypeTag::String);
    let map = rt.map_new(TypeTag::String);

    rt.list_append(&list, &v).unwrap();
    rt.list_append(&list, &v).unwrap();
    rt.set_add(&set, &v).unwrap();
    rt.map_add(&map, &v, &v).unwrap();

    // 1 + 2 (list) + 1 (set) + 2 (map key + value)
    assert_eq!(v.refcount(), 6);
}

#[test]
fn test_duplicate_set_add_does_not_retain() {
    let rt = runtime();
    let set = rt.set_new(TypeTag::Int);
    let v = rt.box_int(1);
    rt.set_add(&set, &v).unwrap();
    rt.set_add(&set, &v).unwrap();
    assert_eq!(v.refcount(), 2);
}

#[test]
fn test_lookup_returns_retained_reference() {
    let rt = runtime();
    let list = rt.list_new(0).unwrap();
    let v = rt.box_int(9);
    rt.list_append(&list, &v).unwrap();

    let got = rt.index_of(&list, &rt.box_int(0)).unwrap();
    assert_eq!(v.refcount(), 3);
    assert_eq!(rt.release(got, false).unwrap(), 2);
}

#[test]
fn test_box_freed_only_at_zero() {
    let rt = runtime();
    let v = rt.box_string("tmp");
    let weak = v.downgrade();
    let a = v.retain();
    let b = v.retain();

    assert_eq!(rt.release(a, false).unwrap(), 2);
    assert_eq!(rt.release(b, false).unwrap(), 1);
    assert!(weak.is_live());
    assert_eq!(rt.release(v, true).unwrap(), 0);
    assert!(!weak.is_live());
}

#[test]
fn test_shallow_release_of_container_releases_elements() {
    let rt = runtime();
    let map = rt.map_new(TypeTag::Int);
    let value = rt.box_string("payload");
    let weak = value.downgrade();
    for n in 0..40 {
        rt.map_add(&map, &rt.box_int(n), &value).unwrap();
    }
    assert_eq!(value.refcount(), 41);

    rt.release(value, true).unwrap();
    assert!(weak.is_live());
    assert_eq!(rt.release(map, false).unwrap(), 0);
    assert!(!weak.is_live());
}

#[test]
fn test_deep_release_of_last_container_reference_fails() {
    let rt = runtime();
    for container in [
        rt.list_new(0).unwrap(),
        rt.set_new(TypeTag::Int),
        rt.map_new(TypeTag::None),
    ] {
        let tag = container.tag();
        let err = rt.release(container, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported, "{}", tag);
        assert_eq!(err.exit_code(), -3);
    }
}

#[test]
fn test_map_replace_releases_previous_value() {
    let rt = runtime();
    let map = rt.map_new(TypeTag::Int);
    let key = rt.box_int(1);
    let old = rt.box_string("old");
    let weak_old = old.downgrade();

    rt.map_add(&map, &key, &old).unwrap();
    rt.release(old, true).unwrap();
    assert!(weak_old.is_live());

    rt.map_add(&map, &key, &rt.box_string("new")).unwrap();
    assert!(!weak_old.is_live());
}
