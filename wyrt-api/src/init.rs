//! 初始化链
//!
//! 嵌入程序按顺序注册具名的初始化回调，`run_program` 在调用入口函数之前依次执行。
//! 没有隐藏的全局注册表：链是一个显式的值。

use crate::error::WyrtError;
use std::sync::Arc;
use wyrt_config::Component;
use wyrt_core::{Runtime, RuntimeError};
use wyrt_log::{debug, error, Logger};

/// 单个初始化回调
pub type Initializer = Box<dyn FnOnce(&mut Runtime) -> Result<(), RuntimeError>>;

/// 有序的初始化回调列表
#[derive(Default)]
pub struct InitChain {
    steps: Vec<(String, Initializer)>,
}

impl std::fmt::Debug for InitChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl InitChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个回调（构建器风格）
    pub fn with<F>(mut self, name: impl Into<String>, init: F) -> Self
    where
        F: FnOnce(&mut Runtime) -> Result<(), RuntimeError> + 'static,
    {
        self.register(name, init);
        self
    }

    /// 追加一个回调
    pub fn register<F>(&mut self, name: impl Into<String>, init: F)
    where
        F: FnOnce(&mut Runtime) -> Result<(), RuntimeError> + 'static,
    {
        self.steps.push((name.into(), Box::new(init)));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 按注册顺序列出回调名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|(name, _)| name.as_str())
    }

    /// 按注册顺序执行，第一个失败的回调终止整条链
    pub fn run(self, runtime: &mut Runtime) -> Result<(), WyrtError> {
        let logger: Arc<Logger> = Arc::clone(runtime.logger());
        let target = Component::Init.target();
        let span = logger.enter_span("init");

        for (position, (name, init)) in self.steps.into_iter().enumerate() {
            debug!(logger, target: target, "running initializer #{} '{}'", position, name);
            if let Err(source) = init(runtime) {
                error!(logger, target: target, "initializer '{}' failed: {}", name, source);
                return Err(WyrtError::Init { name, source });
            }
        }

        drop(span);
        Ok(())
    }
}
