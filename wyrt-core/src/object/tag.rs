//! 类型标签
//!
//! 标签的整数编号是编译产物与运行时之间的 ABI，不能改动。

use super::error::RuntimeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 装箱值的类型标签
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum TypeTag {
    /// 未设置（空集合的元素类型）
    None = -1,
    Any = 0,
    String = 1,
    Int = 2,
    /// 保留：宽整数尚未实现
    WideInt = 3,
    List = 4,
    Set = 5,
    Map = 6,
    Record = 7,
    Fields = 8,
}

impl TypeTag {
    pub const ALL: [TypeTag; 10] = [
        TypeTag::None,
        TypeTag::Any,
        TypeTag::String,
        TypeTag::Int,
        TypeTag::WideInt,
        TypeTag::List,
        TypeTag::Set,
        TypeTag::Map,
        TypeTag::Record,
        TypeTag::Fields,
    ];

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// 从 ABI 整数还原标签，超出范围是用法错误
    pub fn from_raw(raw: i32) -> Result<Self, RuntimeError> {
        let tag = match raw {
            -1 => TypeTag::None,
            0 => TypeTag::Any,
            1 => TypeTag::String,
            2 => TypeTag::Int,
            3 => TypeTag::WideInt,
            4 => TypeTag::List,
            5 => TypeTag::Set,
            6 => TypeTag::Map,
            7 => TypeTag::Record,
            8 => TypeTag::Fields,
            _ => return Err(RuntimeError::InvalidTypeTag(raw)),
        };
        Ok(tag)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TypeTag::None => "none",
            TypeTag::Any => "any",
            TypeTag::String => "string",
            TypeTag::Int => "int",
            TypeTag::WideInt => "wideint",
            TypeTag::List => "list",
            TypeTag::Set => "set",
            TypeTag::Map => "map",
            TypeTag::Record => "record",
            TypeTag::Fields => "fields",
        }
    }

    /// 容器类型（持有其它装箱值的引用）
    pub const fn is_container(self) -> bool {
        matches!(self, TypeTag::List | TypeTag::Set | TypeTag::Map)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
