// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/messages.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file parses the messages a miner sends to the mock pool, located in the
// pool subdirectory. Each line is decoded into a ClientMessage so the session
// can match on it exhaustively; unknown methods become ClientMessage::Unhandled.
//
// Tree Location:
// - src/pool/messages.rs (inbound message parsing)
// - Depends on: serde, serde_json, crate::pool::error

use crate::pool::error::MessageError;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

const LOG_TARGET: &str = "sv1_mock_pool::pool::messages";

/// Default port assumed when a client.reconnect request omits it
pub const DEFAULT_RECONNECT_PORT: u16 = 3333;

/// Raw JSON-RPC request as it arrives on the wire
#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Value,
}

/// Parsed mining.submit request
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub id: Value,
    pub worker: Option<String>,
    /// Second positional parameter, absent when fewer than two were sent
    pub job_id: Option<String>,
    pub params: Vec<Value>,
}

/// Target a client asked to reconnect to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectTarget {
    pub host: String,
    pub port: u16,
    pub wait_seconds: u64,
}

/// Messages a miner can send, one variant per supported method
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Configure { id: Value, extensions: Value },
    Subscribe { id: Value, user_agent: Option<String> },
    Authorize { id: Value, worker: Option<String> },
    ExtranonceSubscribe { id: Value },
    SuggestDifficulty { difficulty: Option<f64> },
    Submit(SubmitRequest),
    Reconnect { id: Value, target: Option<ReconnectTarget> },
    Unhandled { id: Value, method: Option<String> },
}

impl ClientMessage {
    /// Method name for logging
    pub fn method(&self) -> &str {
        match self {
            ClientMessage::Configure { .. } => "mining.configure",
            ClientMessage::Subscribe { .. } => "mining.subscribe",
            ClientMessage::Authorize { .. } => "mining.authorize",
            ClientMessage::ExtranonceSubscribe { .. } => "mining.extranonce.subscribe",
            ClientMessage::SuggestDifficulty { .. } => "mining.suggest_difficulty",
            ClientMessage::Submit(_) => "mining.submit",
            ClientMessage::Reconnect { .. } => "client.reconnect",
            ClientMessage::Unhandled { method, .. } => method.as_deref().unwrap_or("<none>"),
        }
    }
}

/// Parse one inbound line (without its line terminator)
pub fn parse_client_message(line: &str) -> Result<ClientMessage, MessageError> {
    let value: Value = serde_json::from_str(line)?;
    if !value.is_object() {
        return Err(MessageError::NotAnObject);
    }
    let raw: RawRequest = serde_json::from_value(value)?;

    let params = match raw.params {
        Value::Null => Vec::new(),
        Value::Array(params) => params,
        _ => return Err(MessageError::ParamsNotArray),
    };
    let id = raw.id;

    let message = match raw.method.as_deref() {
        Some("mining.configure") => ClientMessage::Configure {
            id,
            extensions: params.first().cloned().unwrap_or_else(|| Value::Array(Vec::new())),
        },
        Some("mining.subscribe") => ClientMessage::Subscribe {
            id,
            user_agent: string_param(&params, 0),
        },
        Some("mining.authorize") => ClientMessage::Authorize {
            id,
            worker: string_param(&params, 0),
        },
        Some("mining.extranonce.subscribe") => ClientMessage::ExtranonceSubscribe { id },
        Some("mining.suggest_difficulty") => ClientMessage::SuggestDifficulty {
            difficulty: params.first().and_then(Value::as_f64),
        },
        Some("mining.submit") => ClientMessage::Submit(SubmitRequest {
            id,
            worker: string_param(&params, 0),
            job_id: params.get(1).map(value_as_text),
            params,
        }),
        Some("client.reconnect") => ClientMessage::Reconnect {
            id,
            target: reconnect_target(&params),
        },
        _ => ClientMessage::Unhandled {
            id,
            method: raw.method,
        },
    };

    debug!(target: LOG_TARGET, "Parsed {} request", message.method());
    Ok(message)
}

fn string_param(params: &[Value], index: usize) -> Option<String> {
    params.get(index).and_then(Value::as_str).map(str::to_string)
}

/// Text form of a parameter: strings verbatim, anything else as JSON
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn reconnect_target(params: &[Value]) -> Option<ReconnectTarget> {
    let host = params.first().map(value_as_text)?;
    let port = params
        .get(1)
        .and_then(|p| match p {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .and_then(|p| u16::try_from(p).ok())
        .unwrap_or(DEFAULT_RECONNECT_PORT);
    let wait_seconds = params.get(2).and_then(Value::as_u64).unwrap_or(0);
    Some(ReconnectTarget {
        host,
        port,
        wait_seconds,
    })
}
