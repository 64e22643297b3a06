//! 映射：条目是 (键, 值)，按键排序

use super::tree::{EntryShape, SearchTree};
use super::Runtime;
use crate::object::{Payload, RuntimeError, TypeTag, Value};
use std::cell::RefCell;

/// Map 条目：分支 = 子块 + 值 + 键，叶子 = 值 + 键
pub struct MapEntry {
    pub key: Value,
    pub value: Value,
}

impl EntryShape for MapEntry {
    const CHUNK_SLOTS: usize = 24;
    const BRANCH_SLOTS: usize = 3;
    const LEAF_SLOTS: usize = 2;

    fn key(&self) -> &Value {
        &self.key
    }

    // 保留原有的键，替换值；旧值的引用随之释放
    fn absorb(&mut self, incoming: Self) {
        self.value = incoming.value;
    }
}

pub type Map = SearchTree<MapEntry>;

impl Runtime {
    /// 新建空映射，`TypeTag::None` 表示键类型待首次插入时确定
    pub fn map_new(&self, key_type: TypeTag) -> Value {
        Value::new(Payload::Map(RefCell::new(Map::new(key_type))))
    }

    /// 插入或替换
    pub fn map_add(&self, map: &Value, key: &Value, value: &Value) -> Result<(), RuntimeError> {
        let cell = map
            .as_map()
            .ok_or_else(|| RuntimeError::wrong_type("map_add", TypeTag::Map, map.tag()))?;
        let mut tree = cell.borrow_mut();
        let before = tree.element_type();
        let entry = MapEntry {
            key: key.retain(),
            value: value.retain(),
        };
        let outcome = tree.insert(entry)?;
        self.note_insert(map, before, tree.element_type(), &outcome);
        Ok(())
    }

    /// 按键查找，返回的值已增加引用计数
    ///
    /// 空映射、键类型不符、键不存在都是错误。
    pub fn map_get(&self, map: &Value, key: &Value) -> Result<Value, RuntimeError> {
        let cell = map
            .as_map()
            .ok_or_else(|| RuntimeError::wrong_type("map_get", TypeTag::Map, map.tag()))?;
        let tree = cell.borrow();
        match tree.element_type() {
            None => return Err(RuntimeError::EmptyMap),
            Some(expected) if expected != key.tag() => {
                return Err(RuntimeError::ElementTypeMismatch {
                    expected,
                    found: key.tag(),
                })
            }
            Some(_) => {}
        }
        if tree.is_empty() {
            return Err(RuntimeError::EmptyMap);
        }
        match tree.find(key)? {
            Some(entry) => Ok(entry.value.retain()),
            None => Err(RuntimeError::KeyNotFound),
        }
    }

    /// 按键顺序列出所有 (键, 值)
    pub fn map_entries(&self, map: &Value) -> Result<Vec<(Value, Value)>, RuntimeError> {
        let cell = map
            .as_map()
            .ok_or_else(|| RuntimeError::wrong_type("map_entries", TypeTag::Map, map.tag()))?;
        let tree = cell.borrow();
        let mut out = Vec::with_capacity(tree.len());
        tree.for_each(|entry| out.push((entry.key.retain(), entry.value.retain())));
        Ok(out)
    }
}
