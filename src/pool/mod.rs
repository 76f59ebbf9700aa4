// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/mod.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the pool side of the Stratum
// protocol, located in the pool subdirectory. It declares submodules and
// re-exports key types for use throughout the project.
//
// Tree Location:
// - src/pool/mod.rs (pool module entry point)
// - Submodules: connection, error, listener, messages, protocol, registry,
//   scheduler, session

pub mod connection;
pub mod error;
pub mod listener;
pub mod messages;
pub mod protocol;
pub mod registry;
pub mod scheduler;
pub mod session;

// Re-export key types for convenience
pub use error::{MessageError, PoolError, StratumErrorCode};
pub use listener::PoolListener;
pub use messages::{ClientMessage, parse_client_message};
pub use protocol::StratumProtocol;
pub use registry::JobRegistry;
pub use session::{CloseReason, MAX_FRAME_LENGTH, Session, SessionState};

// Changelog:
// - v2.0.0 (2026-10-16): Pool module now serves miners instead of connecting
//   to a pool. Added listener, session, scheduler, registry and writer.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
