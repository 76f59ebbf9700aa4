// SV1 Mock Pool - Free and Open Source Software Statement
//
// File: src/main.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Entry point: parse arguments, start logging, accept miners forever.

use clap::Parser;
use log::info;
use sv1_mock_pool::{
    Result,
    core::{Args, PoolConfig, selector_for},
    help::log_startup_banner,
    pool::PoolListener,
    utils::logging::init_logging,
};

const LOG_TARGET: &str = "sv1_mock_pool::main";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(err) = args.validate() {
        eprintln!("❌ Error: {}", err);
        std::process::exit(1);
    }

    let config = PoolConfig::from(&args);
    init_logging(&config.log_file, config.keep_log, config.log_level)?;

    if config.show_banner {
        log_startup_banner(config.personality);
    }

    let selector = selector_for(config.personality);
    let listener = PoolListener::bind(&config, selector).await?;
    info!(target: LOG_TARGET, "Stratum mock pool listening on {}", listener.local_addr()?);
    info!(target: LOG_TARGET,
        "Reconnect directive: {}:{} (wait {}s) after {} jobs",
        config.directive.host, config.directive.port, config.directive.wait_seconds, config.directive.after_jobs
    );

    listener.run().await;
    Ok(())
}
