//! wyrt-log - 结构化日志系统
//!
//! 为 Wyrt 运行时设计的结构化日志系统，特点：
//! - **显式传递**：无全局 logger，`Arc<Logger>` 通过配置传入运行时
//! - **按组件分目标**：`wyrt::box`、`wyrt::list`、`wyrt::tree` 等
//! - **崩溃恢复**：环形缓冲区保留最后 N 条日志，致命错误退出前转储
//!
//! # 快速开始
//!
//! ```
//! use wyrt_log::{LogConfig, debug};
//!
//! let (logger, ring) = LogConfig::dev().init();
//! debug!(logger, target: "wyrt::tree", "chunk split at depth {}", 0);
//! assert_eq!(ring.unwrap().len(), 1);
//! ```
//!
//! 宏在级别未启用时不会格式化参数，热路径上的 trace 日志几乎没有开销。

// 宏要先于其它模块声明
mod macros;

mod config;
mod logger;
mod record;
mod ring_buffer;

pub use config::{LogConfig, OutputConfig};
pub use logger::{FileSink, LogSink, Logger, Span, SpanGuard, SpanId, StderrSink, StdoutSink};
pub use record::{Level, Record};
pub use ring_buffer::{LogRingBuffer, RingBufferStats};

// 宏通过 #[macro_export] 自动导出到 crate 根：
// trace!, debug!, info!, warn!, error!, log!

/// 日志结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// 日志系统错误类型
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 无法打开日志文件
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 无法识别的日志级别字符串
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),
}

/// 解析日志级别，失败时返回错误而不是 `None`
pub fn parse_level(s: &str) -> Result<Level> {
    Level::parse(s).ok_or_else(|| Error::UnknownLevel(s.to_string()))
}
