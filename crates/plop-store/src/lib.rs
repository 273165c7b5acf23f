//! Storage contracts for the event log and the push-broadcast registry.
//!
//! Both stores live in one spreadsheet: an append-only records sheet and a
//! small two-column registry sheet. The traits here are the seams the
//! dispatcher and reminder job depend on; `sheets_client` implements them
//! against the Google Sheets REST API and `memory_store` backs tests.

use anyhow::Result;
use async_trait::async_trait;
use plop_core::{EventRecord, RegistryEntry, RegistryKind};

pub mod memory_store;
pub mod sheets_client;

pub use memory_store::{MemoryContextRegistry, MemoryEventLog};
pub use sheets_client::{SheetsClient, SheetsClientConfig, SheetsContextRegistry, SheetsEventLog};

#[async_trait]
/// Append-only ordered event log. Full-scan reads return records in
/// insertion order; nothing is ever mutated or deleted.
pub trait EventLogStore: Send + Sync {
    async fn append(&self, record: &EventRecord) -> Result<()>;
    async fn read_all(&self) -> Result<Vec<EventRecord>>;
}

#[async_trait]
/// First-wins registry of conversation contexts for broadcast pushes.
pub trait ContextRegistry: Send + Sync {
    /// Every value in the id column, header cell included.
    async fn list_ids(&self) -> Result<Vec<String>>;
    /// Appends the entry unless the id is already present.
    async fn append_if_absent(&self, context_id: &str, kind: RegistryKind) -> Result<()>;
    /// All data rows, first row excluded.
    async fn read_entries(&self) -> Result<Vec<RegistryEntry>>;
}
