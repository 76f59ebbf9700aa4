// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the core functionality of the mock
// pool, located in the core subdirectory. It declares submodules and re-exports
// key types for use throughout the project.

pub mod config;
pub mod job;
pub mod personality;
pub mod types;

// Re-export the most commonly used items
pub use config::{PoolConfig, ReconnectDirective};
pub use job::{Job, format_job_id};
pub use personality::{FixedSelector, ParitySelector, Personality, PersonalitySelector, selector_for};
pub use types::{Args, PersonalityKind};

// Changelog:
// - v2.0.0 (2026-10-16): Hashing and difficulty modules replaced by pool
//   personalities, synthetic jobs and runtime configuration.
// - v1.0.1 (2025-06-16): Added simple SHA-256 support.
