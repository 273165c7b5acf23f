//! In-memory store implementations for tests and local runs.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use plop_core::{EventRecord, RegistryEntry, RegistryKind};

use crate::{ContextRegistry, EventLogStore};

/// Vec-backed event log preserving insertion order.
#[derive(Default)]
pub struct MemoryEventLog {
    records: Mutex<Vec<EventRecord>>,
    fail_appends: Mutex<bool>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<EventRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_appends: Mutex::new(false),
        }
    }

    /// Makes subsequent appends fail, for store-error paths.
    pub fn fail_appends(&self) {
        *self.fail_appends.lock().unwrap() = true;
    }

    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventLogStore for MemoryEventLog {
    async fn append(&self, record: &EventRecord) -> Result<()> {
        if *self.fail_appends.lock().unwrap() {
            return Err(anyhow!("simulated append failure"));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<EventRecord>> {
        Ok(self.snapshot())
    }
}

/// Vec-backed registry holding data rows only (no header row to skip).
#[derive(Default)]
pub struct MemoryContextRegistry {
    rows: Mutex<Vec<RegistryEntry>>,
    fail_reads: Mutex<bool>,
}

impl MemoryContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<RegistryEntry>) -> Self {
        Self {
            rows: Mutex::new(entries),
            fail_reads: Mutex::new(false),
        }
    }

    /// Makes subsequent entry reads fail, for sweep-error paths.
    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }

    pub fn snapshot(&self) -> Vec<RegistryEntry> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextRegistry for MemoryContextRegistry {
    async fn list_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.context_id.clone())
            .collect())
    }

    async fn append_if_absent(&self, context_id: &str, kind: RegistryKind) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|entry| entry.context_id == context_id) {
            return Ok(());
        }
        rows.push(RegistryEntry {
            context_id: context_id.to_string(),
            kind,
        });
        Ok(())
    }

    async fn read_entries(&self) -> Result<Vec<RegistryEntry>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(anyhow!("simulated registry read failure"));
        }
        Ok(self.snapshot())
    }
}
