// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/protocol.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the server side of the Stratum V1 protocol for the mock
// pool, located in the pool subdirectory. It constructs responses and
// notifications and serialises them as CRLF-terminated lines.
//
// Tree Location:
// - src/pool/protocol.rs (Stratum protocol logic)
// - Depends on: serde_json, crate::core::job, crate::pool::error

use crate::core::job::Job;
use crate::pool::error::StratumErrorCode;
use log::{debug, error};
use serde_json::{Value, json};

const LOG_TARGET: &str = "sv1_mock_pool::pool::protocol";

/// Line terminator for every outbound frame
pub const LINE_TERMINATOR: &str = "\r\n";

/// Constructs messages for the Stratum protocol
pub struct StratumProtocol;

impl StratumProtocol {
    /// Successful response echoing the request id
    pub fn create_result_response(id: &Value, result: Value) -> Value {
        json!({
            "id": id,
            "result": result,
            "error": null
        })
    }

    /// Error response with a `[code, message, null]` triple
    pub fn create_error_response(id: &Value, code: StratumErrorCode) -> Value {
        json!({
            "id": id,
            "result": null,
            "error": [code.code(), code.message(), null]
        })
    }

    /// mining.configure result: requested extensions plus the version mask
    pub fn create_configure_response(id: &Value, extensions: &Value, version_mask: &str) -> Value {
        Self::create_result_response(
            id,
            json!([extensions, { "version-rolling.mask": version_mask }]),
        )
    }

    /// mining.subscribe result
    pub fn create_subscribe_response(
        id: &Value,
        difficulty_handle: &str,
        notify_handle: &str,
        extranonce1: &str,
        extranonce2_size: usize,
    ) -> Value {
        Self::create_result_response(
            id,
            json!([
                [
                    ["mining.set_difficulty", difficulty_handle],
                    ["mining.notify", notify_handle]
                ],
                extranonce1,
                extranonce2_size
            ]),
        )
    }

    /// Server notification (`id` is always null)
    pub fn create_notification(method: &str, params: Value) -> Value {
        json!({
            "id": null,
            "method": method,
            "params": params
        })
    }

    pub fn create_set_difficulty(difficulty: u64) -> Value {
        Self::create_notification("mining.set_difficulty", json!([difficulty]))
    }

    pub fn create_notify(job: &Job) -> Value {
        Self::create_notification("mining.notify", job.to_params())
    }

    pub fn create_set_extranonce(extranonce1: &str, extranonce2_size: usize) -> Value {
        Self::create_notification("mining.set_extranonce", json!([extranonce1, extranonce2_size]))
    }

    pub fn create_reconnect(host: &str, port: u16, wait_seconds: u64) -> Value {
        Self::create_notification("client.reconnect", json!([host, port, wait_seconds]))
    }

    /// Convert a JSON message to a CRLF-terminated line
    pub fn to_message(json: Value) -> String {
        if json.is_null() {
            error!(target: LOG_TARGET, "Attempted to serialize empty JSON message");
            return String::new();
        }
        debug!(target: LOG_TARGET, "Serialized Stratum message: {}", json);
        format!("{}{}", json, LINE_TERMINATOR)
    }
}


// Changelog:
// - v2.0.0 (2026-10-16): Switched to the pool side of Stratum V1.
//   - Replaced login/authorize/submit request builders with response and
//     notification builders (subscribe, configure, set_difficulty, notify,
//     set_extranonce, client.reconnect).
//   - Messages are now CRLF-terminated.
// - v1.0.2 (2025-06-23): Fixed algo field format for pool compatibility.
