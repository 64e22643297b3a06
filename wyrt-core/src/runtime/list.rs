//! 可增长列表
//!
//! 容量按 `2 × high_bit(size_hint + 2)` 初始化，满了就翻倍。
//! 列表持有每个元素的一份引用。

use super::Runtime;
use crate::object::{Payload, RuntimeError, TypeTag, Value};
use std::cell::RefCell;
use wyrt_config::Component;
use wyrt_log::trace;

/// 列表载荷
pub struct List {
    slots: Vec<Value>,
    /// 逻辑容量，独立于 `Vec` 的实际分配
    capacity: usize,
}

/// `n` 的最高有效位所代表的值（`n = 0` 时为 0）
pub fn high_bit(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

impl List {
    pub fn with_size_hint(size_hint: usize) -> Result<Self, RuntimeError> {
        let capacity = size_hint
            .checked_add(2)
            .and_then(|n| high_bit(n).checked_mul(2))
            .ok_or(RuntimeError::AllocationFailed {
                requested: size_hint,
            })?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| RuntimeError::AllocationFailed {
                requested: capacity,
            })?;
        Ok(List { slots, capacity })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 追加一个元素，满了先翻倍。返回是否发生了扩容
    pub fn push(&mut self, value: Value) -> Result<bool, RuntimeError> {
        let grew = self.slots.len() == self.capacity;
        if grew {
            let doubled = self
                .capacity
                .checked_mul(2)
                .ok_or(RuntimeError::AllocationFailed {
                    requested: usize::MAX,
                })?;
            self.slots
                .try_reserve_exact(doubled - self.slots.len())
                .map_err(|_| RuntimeError::AllocationFailed { requested: doubled })?;
            self.capacity = doubled;
        }
        self.slots.push(value);
        Ok(grew)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index)
    }
}

impl Runtime {
    /// 新建空列表
    pub fn list_new(&self, size_hint: usize) -> Result<Value, RuntimeError> {
        let list = List::with_size_hint(size_hint)?;
        Ok(Value::new(Payload::List(RefCell::new(list))))
    }

    /// 追加元素，列表持有一份新的引用
    pub fn list_append(&self, list: &Value, value: &Value) -> Result<(), RuntimeError> {
        let cell = list
            .as_list()
            .ok_or_else(|| RuntimeError::wrong_type("list_append", TypeTag::List, list.tag()))?;
        let mut list_ref = cell.borrow_mut();
        if list_ref.push(value.retain())? {
            trace!(
                self.logger,
                target: Component::List.target(),
                "list {} grew to {} slots",
                list.id(),
                list_ref.capacity()
            );
        }
        Ok(())
    }

    /// 读取元素，越界返回 `None`（不是错误）。返回的句柄已增加引用计数
    pub fn list_get(&self, list: &Value, index: usize) -> Result<Option<Value>, RuntimeError> {
        let cell = list
            .as_list()
            .ok_or_else(|| RuntimeError::wrong_type("list_get", TypeTag::List, list.tag()))?;
        let list_ref = cell.borrow();
        Ok(list_ref.get(index).map(Value::retain))
    }
}
