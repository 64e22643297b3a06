//! 集合：条目就是值本身

use super::tree::{EntryShape, SearchTree};
use super::Runtime;
use crate::object::{Payload, RuntimeError, TypeTag, Value};
use std::cell::RefCell;

/// Set 条目：分支 = 子块 + 值，叶子 = 值
pub struct SetEntry(pub Value);

impl EntryShape for SetEntry {
    const CHUNK_SLOTS: usize = 8;
    const BRANCH_SLOTS: usize = 2;
    const LEAF_SLOTS: usize = 1;

    fn key(&self) -> &Value {
        &self.0
    }

    // 值已存在：新句柄随 `incoming` 一起丢弃
    fn absorb(&mut self, incoming: Self) {
        drop(incoming);
    }
}

pub type Set = SearchTree<SetEntry>;

impl Runtime {
    /// 新建空集合，`TypeTag::None` 表示元素类型待首次插入时确定
    pub fn set_new(&self, element_type: TypeTag) -> Value {
        Value::new(Payload::Set(RefCell::new(Set::new(element_type))))
    }

    /// 加入一个值，已存在时什么也不做
    pub fn set_add(&self, set: &Value, value: &Value) -> Result<(), RuntimeError> {
        let cell = set
            .as_set()
            .ok_or_else(|| RuntimeError::wrong_type("set_add", TypeTag::Set, set.tag()))?;
        let mut tree = cell.borrow_mut();
        let before = tree.element_type();
        let outcome = tree.insert(SetEntry(value.retain()))?;
        self.note_insert(set, before, tree.element_type(), &outcome);
        Ok(())
    }

    /// 成员查询
    pub fn set_contains(&self, set: &Value, value: &Value) -> Result<bool, RuntimeError> {
        let cell = set
            .as_set()
            .ok_or_else(|| RuntimeError::wrong_type("set_contains", TypeTag::Set, set.tag()))?;
        let tree = cell.borrow();
        Ok(tree.find(value)?.is_some())
    }

    /// 按比较器顺序列出所有元素
    pub fn set_elements(&self, set: &Value) -> Result<Vec<Value>, RuntimeError> {
        let cell = set
            .as_set()
            .ok_or_else(|| RuntimeError::wrong_type("set_elements", TypeTag::Set, set.tag()))?;
        let tree = cell.borrow();
        let mut out = Vec::with_capacity(tree.len());
        tree.for_each(|entry| out.push(entry.0.retain()));
        Ok(out)
    }
}
