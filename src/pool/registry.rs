// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/registry.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Per-session record of the job ids handed out, consulted when a share is
// submitted. The scheduler appends, the read loop only looks up.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// Append-only set of issued job ids, matched case-insensitively
#[derive(Debug, Default)]
pub struct JobRegistry {
    ids: RwLock<HashSet<String>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issued job id. Returns false if it was already present.
    pub fn register(&self, job_id: &str) -> bool {
        self.ids
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.to_ascii_lowercase())
    }

    /// Whether `job_id` was issued in this session
    pub fn contains(&self, job_id: &str) -> bool {
        self.ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&job_id.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.ids.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
