//! 搜索树性质测试
//!
//! 随机顺序与有序输入下，Set/Map 的遍历、查找和统计都与标准库模型一致

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use wyrt_core::{Runtime, TypeTag};

fn ints_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-500i64..500, 0..300)
}

/// 升序或降序、无重复的输入：每次插入都落在同一条边上，深度随之线性增长
fn ordered_ints_strategy() -> impl Strategy<Value = Vec<i64>> {
    (prop::collection::btree_set(-5_000i64..5_000, 0..600), any::<bool>()).prop_map(
        |(values, descending)| {
            let mut values: Vec<i64> = values.into_iter().collect();
            if descending {
                values.reverse();
            }
            values
        },
    )
}

proptest! {
    #[test]
    fn set_traversal_is_sorted_and_unique(values in ints_strategy()) {
        let rt = Runtime::default();
        let set = rt.set_new(TypeTag::Int);
        for &n in &values {
            rt.set_add(&set, &rt.box_long(n)).unwrap();
        }

        let expected: Vec<i64> = values.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let got: Vec<i64> = rt
            .set_elements(&set)
            .unwrap()
            .iter()
            .filter_map(|v| v.as_int())
            .collect();
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(rt.length_of(&set).unwrap().as_int(), Some(expected.len() as i64));

        let stats = rt.tree_stats(&set).unwrap();
        prop_assert_eq!(stats.entries, expected.len());
        prop_assert_eq!(stats.chunks, stats.splits + 1);
    }
}

proptest! {
    #[test]
    fn set_membership_matches_inserted(values in ints_strategy(), candidate in -600i64..600) {
        let rt = Runtime::default();
        let set = rt.set_new(TypeTag::Int);
        for &n in &values {
            rt.set_add(&set, &rt.box_long(n)).unwrap();
        }
        let contains = rt.set_contains(&set, &rt.box_long(candidate)).unwrap();
        prop_assert_eq!(contains, values.contains(&candidate));
    }
}

proptest! {
    #[test]
    fn map_lookup_returns_latest_value(pairs in prop::collection::vec((0i64..64, any::<i32>()), 1..200)) {
        let rt = Runtime::default();
        let map = rt.map_new(TypeTag::Int);
        let mut model = BTreeMap::new();
        for &(k, v) in &pairs {
            rt.map_add(&map, &rt.box_long(k), &rt.box_int(v)).unwrap();
            model.insert(k, v);
        }

        prop_assert_eq!(rt.length_of(&map).unwrap().as_int(), Some(model.len() as i64));
        for (&k, &v) in &model {
            let got = rt.index_of(&map, &rt.box_long(k)).unwrap();
            prop_assert_eq!(got.as_int(), Some(i64::from(v)));
        }
        let keys: Vec<i64> = rt
            .map_entries(&map)
            .unwrap()
            .iter()
            .filter_map(|(k, _)| k.as_int())
            .collect();
        prop_assert_eq!(keys, model.keys().copied().collect::<Vec<_>>());
    }
}

proptest! {
    #[test]
    fn string_set_sorted_bytewise(words in prop::collection::vec("[a-zA-Z]{0,6}", 0..120)) {
        let rt = Runtime::default();
        let set = rt.set_new(TypeTag::String);
        for w in &words {
            rt.set_add(&set, &rt.box_string(w.as_str())).unwrap();
        }
        let expected: Vec<String> = words.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let got: Vec<String> = rt
            .set_elements(&set)
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        prop_assert_eq!(got, expected);
    }
}

proptest! {
    #[test]
    fn list_get_follows_append_order(values in prop::collection::vec(any::<i32>(), 0..200), hint in 0usize..64) {
        let rt = Runtime::default();
        let list = rt.list_new(hint).unwrap();
        for &n in &values {
            rt.list_append(&list, &rt.box_int(n)).unwrap();
        }
        prop_assert_eq!(rt.length_of(&list).unwrap().as_int(), Some(values.len() as i64));
        for (i, &n) in values.iter().enumerate() {
            let got = rt.list_get(&list, i).unwrap();
            prop_assert_eq!(got.and_then(|v| v.as_int()), Some(i64::from(n)));
        }
        prop_assert!(rt.list_get(&list, values.len()).unwrap().is_none());
    }
}

proptest! {
    #[test]
    fn ordered_input_keeps_set_sorted(values in ordered_ints_strategy()) {
        let rt = Runtime::default();
        let set = rt.set_new(TypeTag::Int);
        for &n in &values {
            rt.set_add(&set, &rt.box_long(n)).unwrap();
        }

        let mut expected = values.clone();
        expected.sort_unstable();
        let got: Vec<i64> = rt
            .set_elements(&set)
            .unwrap()
            .iter()
            .filter_map(|v| v.as_int())
            .collect();
        prop_assert_eq!(&got, &expected);

        let stats = rt.tree_stats(&set).unwrap();
        prop_assert_eq!(stats.entries, values.len());
        prop_assert_eq!(stats.chunks, stats.splits + 1);
        prop_assert!(stats.depth <= stats.chunks);
        for &n in &values {
            prop_assert!(rt.set_contains(&set, &rt.box_long(n)).unwrap());
        }
        prop_assert_eq!(rt.release(set, false).unwrap(), 0);
    }
}

proptest! {
    #[test]
    fn ordered_input_keeps_map_keys_sorted(keys in ordered_ints_strategy()) {
        let rt = Runtime::default();
        let map = rt.map_new(TypeTag::Int);
        for &k in &keys {
            rt.map_add(&map, &rt.box_long(k), &rt.box_long(-k)).unwrap();
        }

        let mut expected = keys.clone();
        expected.sort_unstable();
        let got: Vec<(i64, i64)> = rt
            .map_entries(&map)
            .unwrap()
            .iter()
            .filter_map(|(k, v)| Some((k.as_int()?, v.as_int()?)))
            .collect();
        prop_assert_eq!(got, expected.iter().map(|&k| (k, -k)).collect::<Vec<_>>());
        for &k in &keys {
            let got = rt.index_of(&map, &rt.box_long(k)).unwrap();
            prop_assert_eq!(got.as_int(), Some(-k));
        }
    }
}
