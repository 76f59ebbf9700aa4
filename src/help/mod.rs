// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/help/mod.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file holds the startup banner of the mock pool, located in the help
// subdirectory. The banner and the handshake diagram go through the logger so
// they end up in the session log as well as on the console.
//
// Tree Location:
// - src/help/mod.rs (startup banner and handshake diagram)

use crate::core::types::PersonalityKind;
use log::info;

const LOG_TARGET: &str = "sv1_mock_pool::help";

/// Handshake as seen from both ends of the connection
pub fn handshake_diagram() -> &'static [&'static str] {
    &[
        "        Miner Side                              Pool Side",
        "        ----------                              ----------",
        "            |                                        |",
        "            |    --- TCP connection established -->  |",
        "            |                                        |",
        "            |    --- mining.subscribe ----------->   |",
        "            |                                        |",
        "            |   <--- subscription response ------    |",
        "            |     [includes extranonce1, etc.]       |",
        "            |                                        |",
        "            |    --- mining.authorize ----------->   |",
        "            |                                        |",
        "            |   <--- authorize result (true) ----    |",
        "            |                                        |",
        "            |    <--- mining.set_difficulty -----   |",
        "            |                                        |",
        "            |    --- mining.extranonce.subscribe ->  |",
        "            |   <--- mining.notify --------------    |",
        "            |     [initial job assignment]           |",
        "            |                                        |",
        "        ...miner now starts hashing...               |",
        "",
    ]
}

/// One-line description of the personality strategy
pub fn personality_summary(kind: PersonalityKind) -> &'static str {
    match kind {
        PersonalityKind::Alternate => "Simulating a minimalist pool that alternates between MRR and NiceHash.",
        PersonalityKind::Mrr => "Simulating a minimalist pool with the MRR personality.",
        PersonalityKind::Nicehash => "Simulating a minimalist pool with the NiceHash personality.",
    }
}

/// Log the startup banner followed by the handshake diagram
pub fn log_startup_banner(kind: PersonalityKind) {
    info!(target: LOG_TARGET, "🚀 SV1 Mock Pool v{}", env!("CARGO_PKG_VERSION"));
    info!(target: LOG_TARGET, "{}", personality_summary(kind));
    info!(target: LOG_TARGET, "");
    for line in handshake_diagram() {
        info!(target: LOG_TARGET, "{}", line);
    }
}


// Changelog:
// - v2.0.0 (2026-10-16): Replaced miner help pages with the pool banner.
// - v1.0.0 (2025-06-15): Initial help module.
