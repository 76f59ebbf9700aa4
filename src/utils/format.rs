// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides formatting helpers for the mock pool, located in the
// utils subdirectory. It produces the hex strings, timestamps and difficulty
// labels that end up on the wire and in the session log.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: hex, rand, std

use rand::RngCore;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Utility functions for wire values and log output
pub struct FormatUtils;

impl FormatUtils {
    /// Random lowercase hex string encoding `bytes` random bytes
    pub fn random_hex(bytes: usize) -> String {
        let mut buf = vec![0u8; bytes];
        rand::thread_rng().fill_bytes(&mut buf);
        hex::encode(buf)
    }

    /// Current wall-clock time as a 32-bit Unix timestamp
    pub fn unix_time() -> u32 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default()
    }

    /// Difficulty label used as the set_difficulty subscription id ("300.000")
    pub fn format_difficulty(difficulty: u64) -> String {
        format!("{}.000", difficulty)
    }

    /// Format duration for human-readable output (ms below one second)
    pub fn format_duration(duration: Duration) -> String {
        if duration < Duration::from_secs(1) {
            format!("{}ms", duration.as_millis())
        } else {
            format!("{}s", duration.as_secs())
        }
    }
}


// Changelog:
// - v1.1.0 (2026-10-16): Reworked for the mock pool.
//   - Replaced hashrate/number formatting with hex, timestamp and difficulty helpers.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
