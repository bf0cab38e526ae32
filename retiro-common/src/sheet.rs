//! Tabular store (sheet) client
//!
//! The external spreadsheet service is treated purely as a record sink and
//! source behind an append / bulk-read contract: records go out as JSON,
//! rows come back as JSON in the same shape. Nothing here parses a
//! spreadsheet-native format.

use crate::model::RegistrationRecord;
use crate::{Error, Result};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Client for the append-only tabular store endpoint
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: reqwest::Client,
    url: String,
}

impl SheetClient {
    /// Create a client for the given endpoint. An empty URL produces a
    /// disabled client: appends become no-ops and bulk reads fail with a
    /// configuration error.
    pub fn new(url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            url: url.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Append one record to the store.
    ///
    /// Skipped silently when no endpoint is configured, mirroring the
    /// form's behavior of treating the sheet as an optional mirror.
    pub async fn append(&self, record: &RegistrationRecord) -> Result<()> {
        if !self.is_configured() {
            debug!("Sheet URL not configured, skipping append");
            return Ok(());
        }

        self.http
            .post(&self.url)
            .json(record)
            .send()
            .await?
            .error_for_status()?;

        debug!("Appended registration for {} to sheet", record.civil_name);
        Ok(())
    }

    /// Bulk-read all stored records.
    ///
    /// The store returns either a JSON array of rows or an error object;
    /// anything that is not an array of records is reported as an error.
    pub async fn fetch_all(&self) -> Result<Vec<RegistrationRecord>> {
        if !self.is_configured() {
            return Err(Error::Config("Sheet URL not configured".to_string()));
        }

        let response = self.http.get(&self.url).send().await?.error_for_status()?;
        let value: serde_json::Value = response.json().await?;

        let rows = value
            .as_array()
            .ok_or_else(|| Error::Internal("Sheet returned a non-array payload".to_string()))?;

        let records = rows
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<RegistrationRecord>, _>>()
            .map_err(|e| Error::Internal(format!("Malformed sheet row: {}", e)))?;

        debug!("Fetched {} records from sheet", records.len());
        Ok(records)
    }
}
