//! Object 模块 - Wyrt 运行时核心类型定义
//!
//! 本模块只包含类型定义：
//! - Object 层：类型标签、装箱值、错误（本模块）
//! - Runtime 层：比较器、列表、分块搜索树（runtime/ 目录）
//! - API 层：程序入口与致命错误处理（wyrt-api）

// ==================== 类型标签 ====================

pub mod tag;
pub use tag::TypeTag;

// ==================== 装箱值 ====================

pub mod value;
pub use value::{BoxId, Payload, Value, WeakValue};

// ==================== 错误 ====================

pub mod error;
pub use error::{ErrorKind, RuntimeError};
