//! Order persistence.
//!
//! - `MemoryOrderSink` - keeps records in memory; can be told to fail.
//! - `JsonLinesSink` - appends one JSON object per line to a file.

use super::OrderRecord;
use crate::error::SinkError;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Where completed orders go. No retries happen on the caller's side.
pub trait OrderSink: Send + Sync {
    fn persist(&self, record: &OrderRecord) -> Result<(), SinkError>;
}

#[derive(Debug, Default)]
pub struct MemoryOrderSink {
    orders: Mutex<Vec<OrderRecord>>,
    failing: AtomicBool,
}

impl MemoryOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `persist` fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.orders.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.orders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderSink for MemoryOrderSink {
    fn persist(&self, record: &OrderRecord) -> Result<(), SinkError> {
        if self.failing.load(Ordering::Acquire) {
            return Err(SinkError::Unavailable("memory sink set to fail".to_string()));
        }
        self.orders.lock().push(record.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonLinesSink { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderSink for JsonLinesSink {
    fn persist(&self, record: &OrderRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.lock.lock();
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&line)?;
        Ok(())
    }
}
