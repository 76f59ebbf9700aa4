// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/config.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Runtime configuration resolved from the command line.

use crate::core::types::{Args, PersonalityKind};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Delay between the client.reconnect directive and closing the session
pub const RECONNECT_GRACE: Duration = Duration::from_secs(1);

/// The reconnect storm trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectDirective {
    pub host: String,
    pub port: u16,
    pub wait_seconds: u64,
    /// Number of job notifications after which the directive is sent
    pub after_jobs: u64,
    pub grace: Duration,
}

impl Default for ReconnectDirective {
    fn default() -> Self {
        Self {
            host: "stratum.example.com".to_string(),
            port: 3333,
            wait_seconds: 5,
            after_jobs: 5,
            grace: RECONNECT_GRACE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub bind: String,
    pub port: u16,
    pub personality: PersonalityKind,
    pub log_file: PathBuf,
    pub keep_log: bool,
    pub log_level: LevelFilter,
    pub directive: ReconnectDirective,
    pub show_banner: bool,
}

impl PoolConfig {
    /// host:port string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3333,
            personality: PersonalityKind::Alternate,
            log_file: PathBuf::from("stratum_log.txt"),
            keep_log: false,
            log_level: LevelFilter::Info,
            directive: ReconnectDirective::default(),
            show_banner: true,
        }
    }
}

impl From<&Args> for PoolConfig {
    fn from(args: &Args) -> Self {
        Self {
            bind: args.bind.clone(),
            port: args.port,
            personality: args.personality,
            log_file: PathBuf::from(&args.log_file),
            keep_log: args.keep_log,
            log_level: args.log_level.parse().unwrap_or(LevelFilter::Info),
            directive: ReconnectDirective {
                host: args.reconnect_host.clone(),
                port: args.reconnect_port,
                wait_seconds: args.reconnect_wait,
                after_jobs: args.jobs_before_reconnect,
                grace: RECONNECT_GRACE,
            },
            show_banner: !args.quiet_banner,
        }
    }
}
