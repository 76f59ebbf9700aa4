// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the command-line arguments of the mock pool, located in
// the core subdirectory.
//
// Tree Location:
// - src/core/types.rs (command-line arguments)
// - Depends on: clap

use clap::{Parser, ValueEnum};

/// Which personality each connection gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PersonalityKind {
    /// Even connections get MRR, odd connections get NiceHash
    Alternate,
    /// Every connection gets the MiningRigRentals profile
    Mrr,
    /// Every connection gets the NiceHash profile
    Nicehash,
}

/// Command-line arguments for the SV1 mock pool
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sv1-mock-pool",
    author = "SV1 Mock Pool Team",
    version = "1.0.0",
    about = "Stratum V1 mock pool for testing miner firmware",
    long_about = "SV1 Mock Pool simulates a minimalist Stratum V1 pool for firmware testing.\n\
                  It performs the subscribe/authorize handshake, hands out synthetic jobs,\n\
                  rotates extranonce mid-session and sends client.reconnect after a fixed\n\
                  number of jobs to exercise reconnect handling.\n\n\
                  PERSONALITIES:\n\
                    mrr       extranonce1 8000845a, extranonce2_size 4, jobs every 10s\n\
                    nicehash  extranonce1 deadbeefcafebabe, extranonce2_size 8, jobs every 3s,\n\
                              extranonce rotation every 4th job\n\n\
                  Examples:\n\
                    Alternate personalities: sv1-mock-pool\n\
                    NiceHash only on port 4444: sv1-mock-pool --personality nicehash --port 4444\n\
                    Keep the previous log: sv1-mock-pool --keep-log --log-file pool.log"
)]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0", value_name = "ADDRESS")]
    pub bind: String,

    /// TCP port to listen on
    #[arg(short, long, default_value = "3333", value_name = "PORT")]
    pub port: u16,

    /// Personality assignment strategy
    #[arg(long, value_enum, default_value = "alternate")]
    pub personality: PersonalityKind,

    /// Append-only session log
    #[arg(long, default_value = "stratum_log.txt", value_name = "PATH")]
    pub log_file: String,

    /// Keep an existing log file instead of starting a fresh one
    #[arg(long, default_value = "false")]
    pub keep_log: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Host sent in the client.reconnect directive
    #[arg(long, default_value = "stratum.example.com", value_name = "HOST")]
    pub reconnect_host: String,

    /// Port sent in the client.reconnect directive
    #[arg(long, default_value = "3333", value_name = "PORT")]
    pub reconnect_port: u16,

    /// Wait seconds sent in the client.reconnect directive
    #[arg(long, default_value = "5", value_name = "SECONDS")]
    pub reconnect_wait: u64,

    /// Job notifications per session before client.reconnect is sent
    #[arg(long, default_value = "5", value_name = "COUNT")]
    pub jobs_before_reconnect: u64,

    /// Skip the startup banner and handshake diagram
    #[arg(long, default_value = "false")]
    pub quiet_banner: bool,
}

impl Args {
    /// Validate arguments and return helpful errors
    pub fn validate(&self) -> Result<(), String> {
        if self.bind.trim().is_empty() {
            return Err("Bind address cannot be empty. Use --bind 0.0.0.0".to_string());
        }
        if self.reconnect_host.trim().is_empty() {
            return Err("Reconnect host cannot be empty".to_string());
        }
        if self.jobs_before_reconnect == 0 {
            return Err("--jobs-before-reconnect must be at least 1".to_string());
        }
        if self.log_file.trim().is_empty() {
            return Err("Log file path cannot be empty".to_string());
        }
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(format!("Unknown log level '{}'", self.log_level));
        }
        Ok(())
    }
}


// Changelog:
// - v2.0.0 (2026-10-16): Replaced miner arguments with mock pool arguments.
//   - Added bind/port, personality, log file and reconnect directive options.
//   - Removed pool job, share and benchmark types.
// - v1.1.1-web (2025-06-22): Added web dashboard support.
