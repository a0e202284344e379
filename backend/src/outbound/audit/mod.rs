//! File-backed audit trail adapter.

mod file_sink;

pub use file_sink::FileAuditSink;
