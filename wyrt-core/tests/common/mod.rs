//! 测试辅助工具
//!
//! 提供集成测试共用的运行时构造和结果提取函数

#![allow(dead_code)]

use std::sync::Arc;
use wyrt_core::{DebugConfig, Runtime, RuntimeConfig, Value};
use wyrt_log::{Level, LogRingBuffer, Logger};

/// 静默运行时
pub fn runtime() -> Runtime {
    Runtime::default()
}

/// 开启全部诊断、日志写入环形缓冲区的运行时
pub fn traced_runtime() -> (Runtime, Arc<LogRingBuffer>) {
    let ring = LogRingBuffer::new(1024);
    let logger = Logger::new(Level::Trace).with_sink(ring.clone());
    let config = RuntimeConfig {
        debug: DebugConfig::all(),
        ..RuntimeConfig::default()
    };
    (Runtime::new(config, logger), ring)
}

/// 集合的 Int 元素（按遍历顺序）
pub fn set_ints(rt: &Runtime, set: &Value) -> Vec<i64> {
    rt.set_elements(set)
        .unwrap()
        .iter()
        .map(|v| v.as_int().expect("int element"))
        .collect()
}

/// `length_of` 的结果拆箱
pub fn length(rt: &Runtime, collection: &Value) -> i64 {
    rt.length_of(collection)
        .unwrap()
        .as_int()
        .expect("length_of returns an int")
}

/// 统计某个日志目标下的记录
pub fn count_logs(ring: &LogRingBuffer, target: &str, needle: &str) -> usize {
    ring.dump_records()
        .iter()
        .filter(|r| r.target == target && r.message.contains(needle))
        .count()
}
