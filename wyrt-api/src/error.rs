//! API 错误类型
//!
//! 提供统一的错误类型、结构化错误报告和致命错误出口。

use crate::config::RunConfig;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;
use wyrt_config::Component;
use wyrt_core::{ErrorKind, RuntimeError};
use wyrt_log::error;

/// Wyrt 错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WyrtError {
    /// 程序主体中的运行时错误
    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    /// 初始化回调失败
    #[error("initializer '{name}' failed: {source}")]
    Init {
        name: String,
        #[source]
        source: RuntimeError,
    },
}

impl WyrtError {
    /// 底层的运行时错误
    pub fn runtime_error(&self) -> &RuntimeError {
        match self {
            WyrtError::Runtime(e) => e,
            WyrtError::Init { source, .. } => source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.runtime_error().kind()
    }

    /// 进程退出码：用法错误 -3，资源耗尽 -4
    pub fn exit_code(&self) -> i32 {
        self.runtime_error().exit_code()
    }

    /// 错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            WyrtError::Runtime(_) => "runtime",
            WyrtError::Init { .. } => "init",
        }
    }

    /// 该错误对应的日志目标
    pub fn target(&self) -> &'static str {
        match self {
            WyrtError::Runtime(_) => Component::Runtime.target(),
            WyrtError::Init { .. } => Component::Init.target(),
        }
    }

    /// 转换为结构化错误报告
    ///
    /// CLI 直接打印，工具集成可以序列化为 JSON。
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            phase: self.phase(),
            kind: self.kind().as_str(),
            exit_code: self.exit_code(),
            message: self.to_string(),
            target: self.target(),
        }
    }
}

/// 结构化错误报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// 错误阶段: init, runtime
    pub phase: &'static str,
    /// 错误类别: usage, resource_exhausted, unsupported
    pub kind: &'static str,
    /// 进程退出码
    pub exit_code: i32,
    /// 人类可读的错误消息
    pub message: String,
    /// 日志目标
    pub target: &'static str,
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} error: {}", self.phase, self.kind, self.message)
    }
}

impl ErrorReport {
    /// 转换为 JSON 格式
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// 记录错误、转储环形缓冲区并把报告写到 `out`
///
/// `fatal` 的可测试部分，不退出进程。
pub fn report_failure<W: Write>(config: &RunConfig, err: &WyrtError, out: &mut W) -> io::Result<()> {
    let report = err.to_report();
    error!(
        config.logger,
        target: err.target(),
        "fatal {} error (exit {}): {}",
        report.kind,
        report.exit_code,
        report.message
    );
    if let Some(ring) = &config.ring {
        if !ring.is_empty() {
            writeln!(out, "--- last {} log records ---", ring.len())?;
            writeln!(out, "{}", ring.dump())?;
            writeln!(out, "---")?;
        }
    }
    writeln!(out, "{}", report)?;
    out.flush()
}

/// 致命错误：记录、转储、打印诊断后以错误对应的退出码终止进程
pub fn fatal(config: &RunConfig, err: &WyrtError) -> ! {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    // stderr 不可写时仍然要退出
    let _ = report_failure(config, err, &mut handle);
    std::process::exit(err.exit_code())
}
