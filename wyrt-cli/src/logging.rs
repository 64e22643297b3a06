//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现按组件的日志控制。运行时的 `wyrt-log` 记录
//! 经由 [`TracingSink`] 转发到 tracing，与 CLI 自身的日志走同一套过滤器。

use crate::config::{LogConfig, CLI_TARGET};
use std::io;
use std::path::Path;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};
use wyrt_config::Component;
use wyrt_log::{Level, LogSink, Record};

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 按配置构建过滤器
pub fn targets(log_config: &LogConfig) -> Targets {
    Component::ALL
        .into_iter()
        .fold(Targets::new().with_default(log_config.global), |targets, component| {
            targets.with_target(component.target(), log_config.level_for(component))
        })
        .with_target(CLI_TARGET, log_config.global)
}

/// 使用指定格式和日志配置初始化日志系统
///
/// 日志写到 stderr，stdout 留给脚本输出；指定文件时同时追加到文件。
pub fn init_with_file(log_config: &LogConfig, format: LogFormat, file: Option<&Path>) -> io::Result<()> {
    let filter = targets(log_config);
    let console = create_format_layer(format, io::stderr).with_filter(filter.clone());

    match file {
        Some(path) => {
            let handle = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(handle))
                .with_filter(filter);
            tracing_subscriber::registry()
                .with(console)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry().with(console).init();
        }
    }
    Ok(())
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(format: LogFormat, make_writer: F) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .without_time()
            .with_ansi(false)
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

// tracing 的目标和级别必须是常量，这里把每种组合展开
macro_rules! forward {
    ($target:literal, $record:expr) => {
        match $record.level {
            Level::Trace => {
                tracing::trace!(target: $target, span = ?$record.span_id, "{}", $record.message)
            }
            Level::Debug => {
                tracing::debug!(target: $target, span = ?$record.span_id, "{}", $record.message)
            }
            Level::Info => {
                tracing::info!(target: $target, span = ?$record.span_id, "{}", $record.message)
            }
            Level::Warn => {
                tracing::warn!(target: $target, span = ?$record.span_id, "{}", $record.message)
            }
            Level::Error => {
                tracing::error!(target: $target, span = ?$record.span_id, "{}", $record.message)
            }
        }
    };
}

/// 把运行时日志记录转发给 tracing
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &Record) {
        match record.target {
            "wyrt::box" => forward!("wyrt::box", record),
            "wyrt::list" => forward!("wyrt::list", record),
            "wyrt::tree" => forward!("wyrt::tree", record),
            "wyrt::init" => forward!("wyrt::init", record),
            _ => forward!("wyrt::runtime", record),
        }
    }
}
