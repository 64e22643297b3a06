//! 日志专用环形缓冲区
//!
//! 致命错误退出前把最近的记录转储出来。

use crate::logger::LogSink;
use crate::record::Record;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 环形缓冲区统计信息
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RingBufferStats {
    pub record_count: usize,
    /// 因缓冲区满而丢弃的记录数
    pub dropped_count: usize,
    pub capacity: usize,
}

/// 日志环形缓冲区
///
/// 满了以后新记录覆盖最旧的记录（FIFO）
pub struct LogRingBuffer {
    inner: Mutex<VecDeque<Record>>,
    capacity: usize,
    dropped: AtomicUsize,
}

impl LogRingBuffer {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(LogRingBuffer {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            dropped: AtomicUsize::new(0),
        })
    }

    fn push(&self, record: Record) {
        if self.capacity == 0 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let mut inner = self.lock();
        if inner.len() >= self.capacity {
            inner.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        inner.push_back(record);
    }

    // 毒化的锁仍然可读：日志不应该因为别的线程 panic 而丢失
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Record>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 按时间顺序获取当前所有记录
    pub fn dump_records(&self) -> Vec<Record> {
        self.lock().iter().cloned().collect()
    }

    /// 转储为多行文本
    pub fn dump(&self) -> String {
        self.lock()
            .iter()
            .map(Record::format)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&self) {
        self.lock().clear();
        self.dropped.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> RingBufferStats {
        RingBufferStats {
            record_count: self.len(),
            dropped_count: self.dropped_count(),
            capacity: self.capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl LogSink for LogRingBuffer {
    fn write(&self, record: &Record) {
        self.push(record.clone());
    }
}

impl LogSink for Arc<LogRingBuffer> {
    fn write(&self, record: &Record) {
        self.push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    #[test]
    fn test_overflow_drops_oldest() {
        let buffer = LogRingBuffer::new(3);
        for id in 0..5 {
            buffer.push(Record::new(Level::Trace, "wyrt::box", format!("deallocating box #{id}")));
        }

        let ids: Vec<String> = buffer.dump_records().into_iter().map(|r| r.message).collect();
        assert_eq!(
            ids,
            ["deallocating box #2", "deallocating box #3", "deallocating box #4"]
        );
        assert_eq!(buffer.dropped_count(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let buffer = LogRingBuffer::new(0);
        buffer.push(Record::new(Level::Error, "wyrt::runtime", "lost"));
        assert!(buffer.is_empty());
        assert_eq!(buffer.dropped_count(), 1);
    }

    #[test]
    fn test_dump_and_clear() {
        let buffer = LogRingBuffer::new(10);
        buffer.write(&Record::new(Level::Info, "wyrt::list", "first line"));
        buffer.write(&Record::new(Level::Warn, "wyrt::tree", "second line"));

        let dump = buffer.dump();
        assert!(dump.contains("INFO wyrt::list: first line"));
        assert!(dump.contains("WARN wyrt::tree: second line"));

        buffer.clear();
        assert_eq!(
            buffer.stats(),
            RingBufferStats {
                record_count: 0,
                dropped_count: 0,
                capacity: 10
            }
        );
    }

    #[test]
    fn test_arc_sink_shares_storage() {
        let buffer = LogRingBuffer::new(4);
        let shared = Arc::clone(&buffer);
        shared.write(&Record::new(Level::Debug, "wyrt::init", "running initializer #0"));
        assert_eq!(buffer.len(), 1);
    }
}
