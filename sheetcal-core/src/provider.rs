//! Provider subprocess protocol.
//!
//! This module handles communication with external provider binaries
//! (e.g., `sheetcal-provider-google`) using JSON over stdin/stdout.
//! Any executable that speaks the protocol can be a provider.
//!
//! Providers manage their own credentials and tokens. Core just passes
//! provider-specific parameters from the `[provider]` config table.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::calendar::{CalendarEvent, CalendarService, NewEvent};
use crate::cell::CellValue;
use crate::config::SyncConfig;
use crate::error::{SheetCalError, SheetCalResult};
use crate::protocol::{
    Command, CreateEvent, ErrorKind, ProviderCommand, QueryEvents, ReadColumn, Request, Response,
};
use crate::source::{ColumnRange, TabularSource};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn binary_name(&self) -> String {
        format!("sheetcal-provider-{}", self.0)
    }

    pub fn is_installed(&self) -> bool {
        which::which(self.binary_name()).is_ok()
    }

    fn binary_path(&self) -> SheetCalResult<std::path::PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| SheetCalError::ProviderNotInstalled {
            name: self.0.clone(),
            binary: binary_name.clone(),
        })
    }

    /// Call a typed provider command and return the result.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> SheetCalResult<C::Response> {
        timeout(PROVIDER_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| SheetCalError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> SheetCalResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| SheetCalError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| SheetCalError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SheetCalError::Provider(format!(
                    "Failed to spawn {}: {}",
                    binary_path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SheetCalError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(SheetCalError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        parse_response(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Turn a provider's stdout into the command's result.
pub fn parse_response<R: serde::de::DeserializeOwned>(raw: &str) -> SheetCalResult<R> {
    if raw.trim().is_empty() {
        return Err(SheetCalError::Provider(
            "Provider returned no response".into(),
        ));
    }

    let response: Response<R> = serde_json::from_str(raw)
        .map_err(|e| SheetCalError::Provider(format!("Failed to parse response: {}", e)))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error {
            error,
            kind: ErrorKind::QuotaExceeded,
        } => Err(SheetCalError::QuotaExceeded(error)),
        Response::Error { error, .. } => Err(SheetCalError::Provider(error)),
    }
}

/// A provider bound to one spreadsheet and one calendar.
#[derive(Clone, Debug)]
pub struct ProviderBackend {
    provider: Provider,
    remote_config: serde_json::Map<String, serde_json::Value>,
    spreadsheet_id: String,
    calendar_id: String,
}

impl ProviderBackend {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            provider: Provider::from_name(&config.provider.name),
            remote_config: config.provider.params.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[async_trait]
impl TabularSource for ProviderBackend {
    async fn read_column(&self, range: &ColumnRange) -> SheetCalResult<Vec<CellValue>> {
        self.provider
            .call(ReadColumn {
                remote_config: self.remote_config.clone(),
                spreadsheet_id: self.spreadsheet_id.clone(),
                range: range.clone(),
            })
            .await
            .map_err(|e| match e {
                SheetCalError::Provider(message) => SheetCalError::Read {
                    range: range.to_string(),
                    message,
                },
                other => other,
            })
    }
}

#[async_trait]
impl CalendarService for ProviderBackend {
    async fn query_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        query: &str,
    ) -> SheetCalResult<Vec<CalendarEvent>> {
        self.provider
            .call(QueryEvents {
                remote_config: self.remote_config.clone(),
                calendar_id: self.calendar_id.clone(),
                from: start,
                to: end,
                query: query.to_string(),
            })
            .await
    }

    async fn create_event(&self, event: &NewEvent) -> SheetCalResult<CalendarEvent> {
        self.provider
            .call(CreateEvent {
                remote_config: self.remote_config.clone(),
                calendar_id: self.calendar_id.clone(),
                event: event.clone(),
            })
            .await
    }
}
