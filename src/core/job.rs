// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/job.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file fabricates the synthetic mining jobs handed out by the mock pool,
// located in the core subdirectory. Job content is fixed test data; only the
// job id and the timestamp change between notifications.
//
// Tree Location:
// - src/core/job.rs (synthetic job fabrication)
// - Depends on: serde_json, crate::utils::format

use crate::utils::format::FormatUtils;
use serde_json::{Value, json};

/// Previous block hash: all zeroes
pub const PREV_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// First coinbase fragment (before extranonce1 + extranonce2)
pub const COINBASE1: &str = "0200000001000000000000000000000000000000000000000000000000000000";

/// Second coinbase fragment (after the extranonces)
pub const COINBASE2: &str = "0000000000000000";

/// Single merkle branch entry
pub const MERKLE_BRANCH: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Block version (hex, big-endian)
pub const BLOCK_VERSION: &str = "20000202";

/// Difficulty bits (hex)
pub const NBITS: &str = "1d00ffff";

/// A mining.notify payload. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub job_id: String,
    pub prev_hash: String,
    pub coinbase1: String,
    pub coinbase2: String,
    pub merkle_branch: Vec<String>,
    pub version: String,
    pub nbits: String,
    pub ntime: u32,
    pub clean_jobs: bool,
}

impl Job {
    /// Build a synthetic job stamped with the current wall-clock time
    pub fn synthetic(job_id: String) -> Self {
        Self::with_ntime(job_id, FormatUtils::unix_time())
    }

    /// Build a synthetic job with an explicit timestamp
    pub fn with_ntime(job_id: String, ntime: u32) -> Self {
        Self {
            job_id,
            prev_hash: PREV_HASH.to_string(),
            coinbase1: COINBASE1.to_string(),
            coinbase2: COINBASE2.to_string(),
            merkle_branch: vec![MERKLE_BRANCH.to_string()],
            version: BLOCK_VERSION.to_string(),
            nbits: NBITS.to_string(),
            ntime,
            clean_jobs: true,
        }
    }

    /// Positional mining.notify params
    pub fn to_params(&self) -> Value {
        json!([
            self.job_id,
            self.prev_hash,
            self.coinbase1,
            self.coinbase2,
            self.merkle_branch,
            self.version,
            self.nbits,
            format!("{:08x}", self.ntime),
            self.clean_jobs
        ])
    }
}

/// Format a job counter as the wire job id (at least 4 lowercase hex digits)
pub fn format_job_id(counter: u64) -> String {
    format!("{:04x}", counter)
}
