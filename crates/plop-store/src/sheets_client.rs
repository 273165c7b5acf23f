//! Google Sheets REST client backing both store traits.
//!
//! Values are read and appended through the `values` endpoints with a
//! ready bearer token; minting that token is the deployment's problem.
//! Reads validate the records header row and fail closed on any schema
//! drift rather than misreading a shifted column.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use plop_core::{ContextKind, EventRecord, RegistryEntry, RegistryKind};
use serde::Deserialize;
use serde_json::json;

use crate::{ContextRegistry, EventLogStore};

/// Expected header row of the records sheet, in column order.
pub const RECORDS_HEADER: [&str; 5] = ["使用者名稱", "時間", "內容", "來源", "來源ID"];

/// Header row seeded into an empty registry sheet before the first entry.
pub const REGISTRY_HEADER: [&str; 2] = ["ID", "類型"];

const REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
/// Connection settings for one spreadsheet.
pub struct SheetsClientConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub access_token: String,
    /// Sheet title holding event records.
    pub records_sheet: String,
    /// Sheet title holding the broadcast registry.
    pub registry_sheet: String,
}

/// Shared REST plumbing for the two sheet-backed stores. Constructed once
/// at process start and held for the process lifetime.
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsClientConfig,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    pub fn new(config: SheetsClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .build()
            .context("failed to build sheets http client")?;
        Ok(Self { http, config })
    }

    fn values_url(&self, sheet: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.spreadsheet_id,
            sheet
        )
    }

    async fn read_values(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let response = self
            .http
            .get(self.values_url(sheet))
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .with_context(|| format!("failed to read sheet '{sheet}'"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%sheet, %status, "sheet read rejected");
            bail!("sheet '{sheet}' read returned {status}: {body}");
        }
        let range: ValueRange = response
            .json()
            .await
            .with_context(|| format!("failed to decode sheet '{sheet}' response"))?;
        Ok(range.values)
    }

    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()> {
        let url = format!("{}:append", self.values_url(sheet));
        let response = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .with_context(|| format!("failed to append to sheet '{sheet}'"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%sheet, %status, "sheet append rejected");
            bail!("sheet '{sheet}' append returned {status}: {body}");
        }
        Ok(())
    }
}

/// Event log view over the records sheet.
#[derive(Clone)]
pub struct SheetsEventLog {
    client: Arc<SheetsClient>,
}

impl SheetsEventLog {
    pub fn new(client: Arc<SheetsClient>) -> Self {
        Self { client }
    }
}

fn parse_record_row(row: &[String], row_index: usize) -> Result<EventRecord> {
    if row.len() != RECORDS_HEADER.len() {
        bail!(
            "records row {} has {} columns, expected {}",
            row_index,
            row.len(),
            RECORDS_HEADER.len()
        );
    }
    Ok(EventRecord {
        actor_name: row[0].clone(),
        timestamp: row[1].clone(),
        label: row[2].clone(),
        context_kind: ContextKind::parse(&row[3])
            .with_context(|| format!("records row {row_index}"))?,
        context_id: row[4].clone(),
    })
}

#[async_trait]
impl EventLogStore for SheetsEventLog {
    async fn append(&self, record: &EventRecord) -> Result<()> {
        let row = vec![
            record.actor_name.clone(),
            record.timestamp.clone(),
            record.label.clone(),
            record.context_kind.as_str().to_string(),
            record.context_id.clone(),
        ];
        self.client
            .append_row(&self.client.config.records_sheet, row)
            .await
    }

    async fn read_all(&self) -> Result<Vec<EventRecord>> {
        let values = self
            .client
            .read_values(&self.client.config.records_sheet)
            .await?;
        let Some((header, rows)) = values.split_first() else {
            return Ok(Vec::new());
        };
        if header.iter().map(String::as_str).ne(RECORDS_HEADER) {
            return Err(anyhow!(
                "records sheet header mismatch: got {header:?}, expected {RECORDS_HEADER:?}"
            ));
        }
        rows.iter()
            .enumerate()
            .map(|(index, row)| parse_record_row(row, index + 2))
            .collect()
    }
}

/// Registry view over the broadcast sheet. The header row is seeded on the
/// first append so entry reads can always skip row one.
#[derive(Clone)]
pub struct SheetsContextRegistry {
    client: Arc<SheetsClient>,
}

impl SheetsContextRegistry {
    pub fn new(client: Arc<SheetsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContextRegistry for SheetsContextRegistry {
    async fn list_ids(&self) -> Result<Vec<String>> {
        let values = self
            .client
            .read_values(&self.client.config.registry_sheet)
            .await?;
        Ok(values
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .collect())
    }

    async fn append_if_absent(&self, context_id: &str, kind: RegistryKind) -> Result<()> {
        let ids = self.list_ids().await?;
        if ids.iter().any(|id| id == context_id) {
            return Ok(());
        }
        let sheet = self.client.config.registry_sheet.clone();
        if ids.is_empty() {
            self.client
                .append_row(&sheet, REGISTRY_HEADER.map(str::to_string).to_vec())
                .await?;
        }
        self.client
            .append_row(
                &sheet,
                vec![context_id.to_string(), kind.as_str().to_string()],
            )
            .await
    }

    async fn read_entries(&self) -> Result<Vec<RegistryEntry>> {
        let values = self
            .client
            .read_values(&self.client.config.registry_sheet)
            .await?;
        values
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| {
                if row.len() < 2 {
                    bail!("registry row {} is missing the kind column", index + 1);
                }
                Ok(RegistryEntry {
                    context_id: row[0].clone(),
                    kind: RegistryKind::parse(&row[1])
                        .with_context(|| format!("registry row {}", index + 1))?,
                })
            })
            .collect()
    }
}
