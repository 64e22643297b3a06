//! CLI 配置
//!
//! 包含 CLI 特有的配置：按组件的日志级别

use std::collections::HashMap;
use tracing::Level;
use wyrt_config::Component;

/// CLI 自身日志的目标
pub const CLI_TARGET: &str = "wyrt::cli";

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub components: HashMap<Component, Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            components: HashMap::new(),
        }
    }
}

impl LogConfig {
    pub fn new(global: Level) -> Self {
        Self {
            global,
            components: HashMap::new(),
        }
    }

    /// `-D`：box 跟踪到 trace，tree 到 debug（已显式设置的组件不变）
    pub fn with_debug_defaults(mut self) -> Self {
        self.components.entry(Component::Box).or_insert(Level::TRACE);
        self.components.entry(Component::Tree).or_insert(Level::DEBUG);
        self
    }

    pub fn set(&mut self, component: Component, level: Level) {
        self.components.insert(component, level);
    }

    /// Get log level for a specific component
    pub fn level_for(&self, component: Component) -> Level {
        self.components.get(&component).copied().unwrap_or(self.global)
    }

    /// 所有目标中最详细的级别
    pub fn most_verbose(&self) -> Level {
        // tracing 中越详细的级别越大
        self.components
            .values()
            .copied()
            .fold(self.global, Level::max)
    }
}

/// 解析日志级别，`silent` 等同于 error
pub fn parse_level(s: &str) -> Result<Level, String> {
    match s.to_lowercase().as_str() {
        "silent" => Ok(Level::ERROR),
        other => other
            .parse::<Level>()
            .map_err(|_| format!("unknown log level '{s}'")),
    }
}

/// 解析 `component=level`
pub fn parse_override(s: &str) -> Result<(Component, Level), String> {
    let (name, level) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COMPONENT=LEVEL, got '{s}'"))?;
    let component = Component::ALL
        .into_iter()
        .find(|c| c.as_str() == name.trim())
        .ok_or_else(|| format!("unknown component '{name}'"))?;
    Ok((component, parse_level(level.trim())?))
}

/// 转换为运行时日志器的级别
pub fn to_runtime_level(level: Level) -> wyrt_log::Level {
    if level == Level::TRACE {
        wyrt_log::Level::Trace
    } else if level == Level::DEBUG {
        wyrt_log::Level::Debug
    } else if level == Level::INFO {
        wyrt_log::Level::Info
    } else if level == Level::WARN {
        wyrt_log::Level::Warn
    } else {
        wyrt_log::Level::Error
    }
}
