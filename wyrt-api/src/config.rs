//! API 层配置
//!
//! 包含执行配置 RunConfig 和全局单例（供 CLI 使用）

use once_cell::sync::OnceCell;
use std::sync::Arc;
use wyrt_config::RuntimeConfig;
use wyrt_log::{LogConfig, LogRingBuffer, Logger};

/// Execution configuration
#[derive(Clone)]
pub struct RunConfig {
    /// Runtime switches (diagnostics, list defaults)
    pub runtime: RuntimeConfig,
    /// Logger shared by the runtime and the embedding program
    pub logger: Arc<Logger>,
    /// Ring buffer dumped on fatal errors (optional)
    pub ring: Option<Arc<LogRingBuffer>>,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("runtime", &self.runtime)
            .field("log_level", &self.logger.level())
            .field("ring", &self.ring.as_ref().map(|ring| ring.capacity()))
            .finish()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            logger: Logger::noop(),
            ring: None,
        }
    }
}

impl RunConfig {
    /// Build a config whose logger comes from a `LogConfig`
    pub fn with_logging(runtime: RuntimeConfig, log: LogConfig) -> Self {
        let (logger, ring) = log.init();
        Self {
            runtime,
            logger,
            ring,
        }
    }
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<RunConfig> = OnceCell::new();

/// Initialize global configuration
///
/// Returns the rejected config when one is already installed.
pub fn init(config: RunConfig) -> Result<(), RunConfig> {
    GLOBAL_CONFIG.set(config)
}

/// Get global config reference, if initialized
pub fn config() -> Option<&'static RunConfig> {
    GLOBAL_CONFIG.get()
}

/// Check if config is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
