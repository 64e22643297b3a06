//! 日志配置
//!
//! 提供便捷的日志初始化配置。

use crate::logger::{FileSink, StderrSink, StdoutSink};
use crate::{Level, LogRingBuffer, Logger};
use std::sync::Arc;

/// 日志输出目标配置
#[derive(Clone, Debug, PartialEq)]
pub enum OutputConfig {
    /// 输出到标准输出
    Stdout,
    /// 输出到标准错误
    Stderr,
    /// 输出到文件（路径）
    File(String),
    /// 输出到环形缓冲区（容量）
    RingBuffer(usize),
}

/// 日志配置
///
/// 用于一键初始化日志系统
///
/// # 示例
///
/// ```
/// use wyrt_log::{LogConfig, Level};
///
/// let config = LogConfig::new(Level::Debug)
///     .with_ring_buffer(1000);
///
/// let (logger, ring) = config.init();
/// assert!(ring.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: Level,
    pub outputs: Vec<OutputConfig>,
}

impl LogConfig {
    /// 创建空配置（无输出）
    pub fn new(level: Level) -> Self {
        LogConfig {
            level,
            outputs: Vec::new(),
        }
    }

    /// 开发配置
    ///
    /// - Trace 级别
    /// - 输出到 stderr（stdout 留给程序本身）
    /// - 环形缓冲区 10000 条
    pub fn dev() -> Self {
        LogConfig {
            level: Level::Trace,
            outputs: vec![OutputConfig::Stderr, OutputConfig::RingBuffer(10000)],
        }
    }

    /// 静默配置：只在环形缓冲区保留最近的错误，致命退出时转储
    pub fn quiet() -> Self {
        LogConfig {
            level: Level::Error,
            outputs: vec![OutputConfig::RingBuffer(256)],
        }
    }

    /// 添加 stdout 输出
    pub fn with_stdout(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stdout) {
            self.outputs.push(OutputConfig::Stdout);
        }
        self
    }

    /// 添加 stderr 输出
    pub fn with_stderr(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stderr) {
            self.outputs.push(OutputConfig::Stderr);
        }
        self
    }

    /// 添加文件输出
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.outputs.push(OutputConfig::File(path.into()));
        self
    }

    /// 添加环形缓冲区输出
    pub fn with_ring_buffer(mut self, capacity: usize) -> Self {
        self.outputs.push(OutputConfig::RingBuffer(capacity));
        self
    }

    /// 初始化日志系统
    ///
    /// 返回 (logger, Option<ring_buffer>)，配置了多个环形缓冲区时返回最后一个。
    /// 文件打不开时跳过该输出。
    pub fn init(self) -> (Arc<Logger>, Option<Arc<LogRingBuffer>>) {
        let logger = Logger::new(self.level);
        let mut ring_buffer: Option<Arc<LogRingBuffer>> = None;

        for output in self.outputs {
            match output {
                OutputConfig::Stdout => logger.add_sink(StdoutSink),
                OutputConfig::Stderr => logger.add_sink(StderrSink),
                OutputConfig::File(path) => {
                    if let Ok(sink) = FileSink::new(&path) {
                        logger.add_sink(sink);
                    }
                }
                OutputConfig::RingBuffer(capacity) => {
                    let ring = LogRingBuffer::new(capacity);
                    ring_buffer = Some(Arc::clone(&ring));
                    logger.add_sink(ring);
                }
            }
        }

        (logger, ring_buffer)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::quiet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = LogConfig::new(Level::Debug);
        assert_eq!(config.level, Level::Debug);
        assert!(config.outputs.is_empty());
    }

    #[test]
    fn test_config_dev() {
        let config = LogConfig::dev();
        assert_eq!(config.level, Level::Trace);
        assert!(config.outputs.contains(&OutputConfig::Stderr));
        assert!(!config.outputs.contains(&OutputConfig::Stdout));
    }

    #[test]
    fn test_config_quiet_is_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::Error);
        assert_eq!(config.outputs, vec![OutputConfig::RingBuffer(256)]);
    }

    #[test]
    fn test_with_stderr_deduplicates() {
        let config = LogConfig::new(Level::Warn).with_stderr().with_stderr();
        let count = config
            .outputs
            .iter()
            .filter(|o| matches!(o, OutputConfig::Stderr))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_config_init() {
        let (logger, ring) = LogConfig::new(Level::Debug).with_ring_buffer(100).init();

        assert_eq!(logger.level(), Level::Debug);
        crate::debug!(logger, "test message");
        crate::trace!(logger, "filtered");

        let records = ring.unwrap().dump_records();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_config_init_no_ring() {
        let (logger, ring) = LogConfig::new(Level::Debug).init();
        assert!(ring.is_none());
        crate::debug!(logger, "no sink");
    }

    #[test]
    fn test_unopenable_file_is_skipped() {
        let (logger, ring) = LogConfig::new(Level::Info)
            .with_file("/nonexistent-dir/wyrt.log")
            .with_ring_buffer(4)
            .init();
        crate::info!(logger, "still logged");
        assert_eq!(ring.unwrap().len(), 1);
    }
}
