//! Wyrt Core - 运行时核心（纯逻辑，不做 IO）
//!
//! 包含装箱值与引用计数、比较器注册表、可增长列表，以及 Set/Map 共用的分块搜索树。
//! 只操作内存中的数据结构；唯一的输出是通过显式传入的日志器记录的诊断信息。
//!
//! 配置通过参数显式传入，没有全局状态。
//!
//! ```
//! use wyrt_core::{Runtime, TypeTag};
//!
//! let rt = Runtime::default();
//! let set = rt.set_new(TypeTag::Int);
//! for n in [3, 1, 2, 1] {
//!     rt.set_add(&set, &rt.box_int(n)).unwrap();
//! }
//! assert_eq!(rt.length_of(&set).unwrap().as_int(), Some(3));
//! ```

pub mod object;
pub mod runtime;

// Re-export common types
pub use object::{BoxId, ErrorKind, Payload, RuntimeError, TypeTag, Value, WeakValue};
pub use runtime::{InsertOutcome, Runtime, SplitKind, TreeStats};

// Re-export config types from wyrt-config
pub use wyrt_config::{Component, DebugConfig, ListConfig, RuntimeConfig};
