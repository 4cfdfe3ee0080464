//! Destinations for exchange log records.

use crate::ExchangeError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{error, info};

/// Severity of an exchange record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The downstream stage completed without an error.
    Info,
    /// The downstream stage raised or attached an error.
    Error,
}

/// One record per logged exchange.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub severity: Severity,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub elapsed_ms: u64,
    /// Empty when correlation is not tracked for the exchange.
    pub correlation_id: String,
    pub request: String,
    pub response: String,
    pub error: Option<ExchangeError>,
    pub started_at: DateTime<Utc>,
}

/// Receives exchange records.
///
/// Shared by all concurrent exchanges, so implementations must be `Sync`.
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, record: &LogRecord);
}

/// Emits records as `tracing` events with target `http`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, record: &LogRecord) {
        match (&record.severity, &record.error) {
            (Severity::Error, Some(err)) => error!(
                target: "http",
                method = %record.method,
                path = %record.path,
                status = record.status,
                elapsed_ms = record.elapsed_ms,
                correlation_id = %record.correlation_id,
                request = %record.request,
                response = %record.response,
                error = %err,
                "{} {} responded {} in {}ms",
                record.method,
                record.path,
                record.status,
                record.elapsed_ms
            ),
            (Severity::Error, None) => error!(
                target: "http",
                method = %record.method,
                path = %record.path,
                status = record.status,
                elapsed_ms = record.elapsed_ms,
                correlation_id = %record.correlation_id,
                request = %record.request,
                response = %record.response,
                "{} {} responded {} in {}ms",
                record.method,
                record.path,
                record.status,
                record.elapsed_ms
            ),
            (Severity::Info, _) => info!(
                target: "http",
                method = %record.method,
                path = %record.path,
                status = record.status,
                elapsed_ms = record.elapsed_ms,
                correlation_id = %record.correlation_id,
                request = %record.request,
                response = %record.response,
                "{} {} responded {} in {}ms",
                record.method,
                record.path,
                record.status,
                record.elapsed_ms
            ),
        }
    }
}

/// Keeps records in memory. Mostly useful in tests.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record logged so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Returns the number of records logged so far.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true when nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drops all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, record: &LogRecord) {
        self.records.lock().push(record.clone());
    }
}
