//! 日志宏
//!
//! 两种写法：
//! - `debug!(logger, "x = {}", x)`：目标为调用处的 `module_path!()`
//! - `debug!(logger, target: "wyrt::tree", "x = {}", x)`：显式目标

#[macro_export]
macro_rules! trace {
    ($logger:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, target: $target, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, target: $target, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, target: $target, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, target: $target, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, target: $target, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// 通用日志宏：先检查级别，启用时才格式化消息
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, target: $target:expr, $($arg:tt)+) => {{
        let level = $level;
        if $logger.is_enabled(level) {
            $logger.log(level, $target, ::std::format!($($arg)+));
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $logger.is_enabled(level) {
            $logger.log(level, ::std::module_path!(), ::std::format!($($arg)+));
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Level, LogRingBuffer, Logger};

    #[test]
    fn test_default_target_is_module_path() {
        let ring = LogRingBuffer::new(8);
        let logger = Logger::new(Level::Trace).with_sink(ring.clone());

        trace!(logger, "value = {}", 42);

        let records = ring.dump_records();
        assert_eq!(records[0].target, module_path!());
        assert_eq!(records[0].message, "value = 42");
    }

    #[test]
    fn test_explicit_target() {
        let ring = LogRingBuffer::new(8);
        let logger = Logger::new(Level::Debug).with_sink(ring.clone());

        debug!(logger, target: "wyrt::tree", "split at depth {}", 3);
        info!(logger, target: "wyrt::init", "ran {} callbacks", 2);

        let records = ring.dump_records();
        assert_eq!(records[0].target, "wyrt::tree");
        assert_eq!(records[0].message, "split at depth 3");
        assert_eq!(records[1].target, "wyrt::init");
    }

    #[test]
    fn test_disabled_level_skips_formatting() {
        let ring = LogRingBuffer::new(8);
        let logger = Logger::new(Level::Warn).with_sink(ring.clone());

        let mut formatted = false;
        let mut render = || {
            formatted = true;
            "expensive"
        };
        debug!(logger, "{}", render());
        warn!(logger, "kept");
        error!(logger, target: "wyrt::runtime", "fatal");

        assert!(!formatted);
        assert_eq!(ring.len(), 2);
    }
}
