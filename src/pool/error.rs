// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/error.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the error types of the pool side of the mock pool, located
// in the pool subdirectory. Inbound parse failures are recoverable; I/O and
// channel failures end the session.
//
// Tree Location:
// - src/pool/error.rs (pool error types)
// - Depends on: thiserror, serde_json

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to bind {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No addresses found for {address}")]
    AddressNotFound { address: String },

    #[error("Outbound channel closed")]
    ChannelClosed,

    #[error("Session is closing")]
    SessionClosing,
}

/// Reasons an inbound line is not a usable frame
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame is not a JSON object")]
    NotAnObject,

    #[error("params is not an array")]
    ParamsNotArray,
}

/// Error codes returned to the client as `[code, message, null]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StratumErrorCode {
    /// mining.submit without a job id
    InvalidSubmitFormat,
    /// mining.submit for a job id never issued in this session
    UnknownJob,
    /// Second mining.subscribe on the same connection
    AlreadySubscribed,
    /// mining.extranonce.subscribe before authorize
    UnauthorizedWorker,
    /// mining.authorize before subscribe
    NotSubscribed,
}

impl StratumErrorCode {
    pub const fn code(&self) -> i32 {
        match self {
            StratumErrorCode::InvalidSubmitFormat => 20,
            StratumErrorCode::UnknownJob => 21,
            StratumErrorCode::AlreadySubscribed => 20,
            StratumErrorCode::UnauthorizedWorker => 24,
            StratumErrorCode::NotSubscribed => 25,
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            StratumErrorCode::InvalidSubmitFormat => "Invalid submit format",
            StratumErrorCode::UnknownJob => "Unknown job ID",
            StratumErrorCode::AlreadySubscribed => "Already subscribed",
            StratumErrorCode::UnauthorizedWorker => "Unauthorized worker",
            StratumErrorCode::NotSubscribed => "Not subscribed",
        }
    }
}
