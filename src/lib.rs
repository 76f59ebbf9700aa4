// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file serves as the main library entry point for the SV1 mock pool,
// located at the root of the source tree. It exports all public modules
// and types that other crates or binaries can use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: core, help, pool, utils

pub mod core;
pub mod help;
pub mod pool;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use crate::core::{Args, Personality, PersonalitySelector, PoolConfig, ReconnectDirective};
pub use crate::help::log_startup_banner;
pub use crate::pool::{PoolListener, Session};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Changelog:
// - v2.0.0 (2026-10-16): Reworked into a Stratum V1 mock pool.
//   - Removed miner, benchmark and tui modules.
//   - Exports the listener, session and configuration types.
// - v1.0.2 (2025-06-15): Added help module support.
// - v1.0.0 (2025-06-14): Initial modular breakout from monolithic main.rs.
