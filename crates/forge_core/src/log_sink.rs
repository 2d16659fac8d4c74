use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Entries kept before the oldest ones are evicted.
pub const LOG_CAPACITY: usize = 1000;

const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

/// User-facing batch log, ordered by emission and bounded to a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSink {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl LogSink {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity,
        }
    }

    pub fn append(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level,
            message: message.into(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_emission_order() {
        let mut sink = LogSink::default();
        sink.append(LogLevel::Info, "first");
        sink.append(LogLevel::Error, "second");

        let messages: Vec<_> = sink.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(sink.last().map(|e| e.level), Some(LogLevel::Error));
    }

    #[test]
    fn oldest_entries_are_evicted_at_capacity() {
        let mut sink = LogSink::with_capacity(3);
        for i in 0..5 {
            sink.append(LogLevel::Info, format!("entry {i}"));
        }

        assert_eq!(sink.len(), 3);
        let messages: Vec<_> = sink.iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);
    }

    #[test]
    fn timestamp_uses_clock_format() {
        let mut sink = LogSink::default();
        sink.append(LogLevel::Success, "done");
        let stamp = &sink.last().unwrap().timestamp;
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp.matches(':').count(), 2);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut sink = LogSink::default();
        sink.append(LogLevel::Warning, "w");
        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(sink.capacity(), LOG_CAPACITY);
    }
}
