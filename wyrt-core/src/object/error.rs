//! 错误类型 (Object 层)
//!
//! 运行时的所有失败都是致命的：核心只负责在修改任何状态之前发现错误并返回，
//! 由 wyrt-api 决定如何终止进程。

use super::tag::TypeTag;
use std::fmt;

/// 错误类别，决定进程退出码
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 用法错误：类型不符、元素类型混用、键不存在等
    Usage,
    /// 资源耗尽或越界：分配失败、列表下标越界
    ResourceExhausted,
    /// 尚未实现的操作
    Unsupported,
}

impl ErrorKind {
    pub const fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Usage => -3,
            ErrorKind::ResourceExhausted => -4,
            ErrorKind::Unsupported => -3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Usage => "usage",
            ErrorKind::ResourceExhausted => "resource_exhausted",
            ErrorKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 统一的运行时错误类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// 对错误类型的装箱值调用了类型专用操作
    #[error("{operation} expects a {expected} box, found {found}")]
    WrongType {
        operation: &'static str,
        expected: TypeTag,
        found: TypeTag,
    },

    /// 集合的元素类型已经固定
    #[error("collection holds {expected} elements, cannot accept {found}")]
    ElementTypeMismatch { expected: TypeTag, found: TypeTag },

    #[error("no comparator registered for {0}")]
    UnregisteredComparator(TypeTag),

    /// 比较器收到了不属于它的类型
    #[error("{comparator} comparator called on a {found} operand")]
    ComparatorOperand { comparator: TypeTag, found: TypeTag },

    #[error("invalid type tag {0}")]
    InvalidTypeTag(i32),

    #[error("a {0} box cannot be created without a payload")]
    MissingPayload(TypeTag),

    #[error("index_of is not defined for {0}")]
    NotIndexable(TypeTag),

    #[error("list index must be an int, found {0}")]
    IndexType(TypeTag),

    #[error("index_of on an empty map")]
    EmptyMap,

    #[error("key not found in map")]
    KeyNotFound,

    #[error("index {0} under range for list")]
    IndexUnderRange(i64),

    #[error("index {index} over range for list of length {len}")]
    IndexOverRange { index: i64, len: usize },

    #[error("failed to allocate {requested} slots")]
    AllocationFailed { requested: usize },

    #[error("{operation} is not supported for {tag}")]
    Unsupported {
        operation: &'static str,
        tag: TypeTag,
    },
}

impl RuntimeError {
    pub fn wrong_type(operation: &'static str, expected: TypeTag, found: TypeTag) -> Self {
        RuntimeError::WrongType {
            operation,
            expected,
            found,
        }
    }

    pub fn unsupported(operation: &'static str, tag: TypeTag) -> Self {
        RuntimeError::Unsupported { operation, tag }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::IndexUnderRange(_)
            | RuntimeError::IndexOverRange { .. }
            | RuntimeError::AllocationFailed { .. } => ErrorKind::ResourceExhausted,
            RuntimeError::Unsupported { .. } => ErrorKind::Unsupported,
            _ => ErrorKind::Usage,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
