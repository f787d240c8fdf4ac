//! sheetcal-provider-google - Google Sheets and Google Calendar provider for sheetcal
//!
//! This binary implements the sheetcal provider protocol, communicating
//! with sheetcal via JSON over stdin/stdout.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/sheetcal/providers/google/app_config.toml
//!   ~/.config/sheetcal/providers/google/session/{account}.toml

mod app_config;
mod commands;
mod convert;
mod remote_config;
mod session;
mod sheets;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use serde::Serialize;
use sheetcal_core::protocol::{Command, ErrorKind, Request, Response};

use crate::commands::QuotaExceeded;

#[tokio::main]
async fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => error_response(&format!("Failed to parse request: {}", e), ErrorKind::Other),
        };

        if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
            eprintln!("Failed to write response: {}", e);
            break;
        }
    }
}

async fn handle_request(request: Request) -> String {
    let params = request.params;
    match request.command {
        Command::ReadColumn => respond(commands::read_column::handle(params).await),
        Command::QueryEvents => respond(commands::query_events::handle(params).await),
        Command::CreateEvent => respond(commands::create_event::handle(params).await),
    }
}

fn respond<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(data) => Response::success(data).unwrap_or_else(|e| {
            error_response(&format!("Failed to serialize response: {}", e), ErrorKind::Other)
        }),
        Err(e) => error_response(&format!("{:#}", e), classify(&e)),
    }
}

/// Quota exhaustion is the one failure the caller treats differently.
/// It is decided where the API error is seen, never from the final text.
fn classify(err: &anyhow::Error) -> ErrorKind {
    if err.downcast_ref::<QuotaExceeded>().is_some() {
        ErrorKind::QuotaExceeded
    } else {
        ErrorKind::Other
    }
}

fn error_response(message: &str, kind: ErrorKind) -> String {
    Response::error(message, kind).unwrap_or_else(|_| {
        r#"{"status":"error","error":"Failed to serialize error"}"#.to_string()
    })
}
