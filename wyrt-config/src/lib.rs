//! Wyrt Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Wyrt crates.

use serde::{Deserialize, Serialize};

/// Diagnostic switches (the `-D` flag turns both on)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log every box deallocation
    pub trace_boxes: bool,
    /// Log every chunk split in sets and maps
    pub trace_splits: bool,
}

impl DebugConfig {
    /// Everything on
    pub fn all() -> Self {
        Self {
            trace_boxes: true,
            trace_splits: true,
        }
    }

    /// Whether any diagnostic is enabled
    pub fn any(&self) -> bool {
        self.trace_boxes || self.trace_splits
    }
}

/// Configuration for growable lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Size hint used when a caller does not provide one
    pub default_size_hint: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_size_hint: 0,
        }
    }
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub debug: DebugConfig,
    pub list: ListConfig,
}

/// Runtime component, used to derive log targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Box,
    List,
    Tree,
    Init,
    Runtime,
}

impl Component {
    /// All components, in log-filter order
    pub const ALL: [Component; 5] = [
        Component::Box,
        Component::List,
        Component::Tree,
        Component::Init,
        Component::Runtime,
    ];

    /// Get the string name of the component
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Box => "box",
            Component::List => "list",
            Component::Tree => "tree",
            Component::Init => "init",
            Component::Runtime => "runtime",
        }
    }

    /// Get the log target name for this component
    pub fn target(&self) -> &'static str {
        match self {
            Component::Box => "wyrt::box",
            Component::List => "wyrt::list",
            Component::Tree => "wyrt::tree",
            Component::Init => "wyrt::init",
            Component::Runtime => "wyrt::runtime",
        }
    }
}
