//! 运行时层
//!
//! `Runtime` 是编译产物调用的入口：构造装箱值、操作列表与集合、查询长度与下标、释放引用。
//! 它持有配置和日志器，所有诊断输出都从这里发出。

use crate::object::{RuntimeError, TypeTag, Value};
use std::sync::Arc;
use wyrt_config::{Component, RuntimeConfig};
use wyrt_log::{debug, trace, Logger};

pub mod compare;
pub mod list;
pub mod map;
pub mod set;
pub mod tree;

pub use compare::{comparator, Comparator};
pub use list::List;
pub use map::{Map, MapEntry};
pub use set::{Set, SetEntry};
pub use tree::{InsertOutcome, SplitKind, TreeStats};

/// 运行时实例
pub struct Runtime {
    config: RuntimeConfig,
    logger: Arc<Logger>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default(), Logger::noop())
    }
}

impl Runtime {
    pub fn new(config: RuntimeConfig, logger: Arc<Logger>) -> Self {
        Runtime { config, logger }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    // ==================== 装箱 ====================

    pub fn box_string(&self, text: impl Into<String>) -> Value {
        Value::string(text)
    }

    /// 装箱 32 位整数
    pub fn box_int(&self, n: i32) -> Value {
        Value::int(i64::from(n))
    }

    /// 装箱 64 位整数，与 `box_int` 一样是 Int 类型，计数同样从 1 开始
    pub fn box_long(&self, n: i64) -> Value {
        Value::int(n)
    }

    // ==================== 生命周期 ====================

    /// 释放一份引用，返回剩余的引用计数
    ///
    /// 计数归零时回收盒子。`deep` 额外要求按类型回收载荷：String 释放文本，
    /// Int 无事可做；容器载荷的深释放尚未支持，返回 `Unsupported`。
    /// 出错时计数保持原样，这份引用不再回收，调用方随后走致命路径。
    pub fn release(&self, value: Value, deep: bool) -> Result<usize, RuntimeError> {
        let remaining = value.refcount() - 1;
        if remaining == 0 && deep && value.tag().is_container() {
            let err = RuntimeError::unsupported("release", value.tag());
            std::mem::forget(value);
            return Err(err);
        }
        if remaining == 0 && self.config.debug.trace_boxes {
            trace!(
                self.logger,
                target: Component::Box.target(),
                "deallocating box {} ({}, deep = {})",
                value.id(),
                value.tag(),
                deep
            );
        }
        drop(value);
        Ok(remaining)
    }

    // ==================== 通用访问 ====================

    /// 集合长度，装箱为 Int
    ///
    /// - List：元素个数
    /// - Set：条目数，未定类型时为 0
    /// - Map：条目数
    pub fn length_of(&self, value: &Value) -> Result<Value, RuntimeError> {
        let length = match value.tag() {
            TypeTag::List => self.list_len(value)?,
            TypeTag::Set => self.set_len(value)?,
            TypeTag::Map => self.map_len(value)?,
            other => return Err(RuntimeError::unsupported("length_of", other)),
        };
        Ok(self.box_long(length as i64))
    }

    fn list_len(&self, value: &Value) -> Result<usize, RuntimeError> {
        let cell = value
            .as_list()
            .ok_or_else(|| RuntimeError::wrong_type("length_of", TypeTag::List, value.tag()))?;
        let len = cell.borrow().len();
        Ok(len)
    }

    fn set_len(&self, value: &Value) -> Result<usize, RuntimeError> {
        let cell = value
            .as_set()
            .ok_or_else(|| RuntimeError::wrong_type("length_of", TypeTag::Set, value.tag()))?;
        let tree = cell.borrow();
        match tree.element_type() {
            None => Ok(0),
            // 异构集合尚未实现
            Some(TypeTag::Any) => Err(RuntimeError::unsupported("length_of", TypeTag::Any)),
            Some(_) => Ok(tree.len()),
        }
    }

    fn map_len(&self, value: &Value) -> Result<usize, RuntimeError> {
        let cell = value
            .as_map()
            .ok_or_else(|| RuntimeError::wrong_type("length_of", TypeTag::Map, value.tag()))?;
        let len = cell.borrow().len();
        Ok(len)
    }

    /// 下标访问：List 用 Int 下标，Map 用键查找。返回的值已增加引用计数
    pub fn index_of(&self, collection: &Value, key: &Value) -> Result<Value, RuntimeError> {
        match collection.tag() {
            TypeTag::List => self.list_index(collection, key),
            TypeTag::Map => self.map_get(collection, key),
            other => Err(RuntimeError::NotIndexable(other)),
        }
    }

    fn list_index(&self, list: &Value, index: &Value) -> Result<Value, RuntimeError> {
        let raw = index
            .as_int()
            .ok_or_else(|| RuntimeError::IndexType(index.tag()))?;
        if raw < 0 {
            return Err(RuntimeError::IndexUnderRange(raw));
        }
        let len = self.list_len(list)?;
        let position = usize::try_from(raw)
            .ok()
            .filter(|&position| position < len)
            .ok_or(RuntimeError::IndexOverRange { index: raw, len })?;
        self.list_get(list, position)?
            .ok_or(RuntimeError::IndexOverRange { index: raw, len })
    }

    // ==================== 诊断 ====================

    /// Set 或 Map 的树统计
    pub fn tree_stats(&self, collection: &Value) -> Result<TreeStats, RuntimeError> {
        if let Some(set) = collection.as_set() {
            return Ok(set.borrow().stats());
        }
        if let Some(map) = collection.as_map() {
            return Ok(map.borrow().stats());
        }
        Err(RuntimeError::unsupported("tree_stats", collection.tag()))
    }

    /// 插入之后的日志：类型固定与块分裂
    fn note_insert(
        &self,
        collection: &Value,
        before: Option<TypeTag>,
        after: Option<TypeTag>,
        outcome: &InsertOutcome,
    ) {
        if before.is_none() {
            if let Some(tag) = after {
                debug!(
                    self.logger,
                    target: Component::Tree.target(),
                    "{} {} element type fixed to {}",
                    collection.tag(),
                    collection.id(),
                    tag
                );
            }
        }
        if let InsertOutcome::Added {
            depth,
            index,
            split: Some(kind),
        } = *outcome
        {
            if self.config.debug.trace_splits {
                debug!(
                    self.logger,
                    target: Component::Tree.target(),
                    "{} {} split a chunk at depth {} (index {}, {:?} moved down)",
                    collection.tag(),
                    collection.id(),
                    depth,
                    index,
                    kind
                );
            }
        }
    }
}
