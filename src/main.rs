//! ROTOR — Autonomous yield-rotation controller.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! decrypts the keystore account, wires the chain-backed probe and
//! executor, and runs the probe→select→decide→reallocate loop with
//! graceful shutdown.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use secrecy::SecretString;
use tokio::time::MissedTickBehavior;

use rotor::config::AppConfig;
use rotor::engine::executor::{Reallocator, StrategistExecutor};
use rotor::engine::{Controller, ControllerSettings};
use rotor::probe::lens::LensProbe;
use rotor::probe::YieldProbe;
use rotor::registry::PoolRegistry;
use rotor::types::CycleReport;
use rotor::wallet;

const BANNER: &str = r#"
 ____   ___ _____ ___  ____
|  _ \ / _ \_   _/ _ \|  _ \
| |_) | | | || || | | | |_) |
|  _ <| |_| || || |_| |  _ <
|_| \_\\___/ |_| \___/|_| \_\

  Autonomous Yield-Rotation Controller
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        pools = cfg.pools.len(),
        cycle_interval_secs = cfg.controller.cycle_interval_secs,
        hysteresis_margin = cfg.controller.hysteresis_margin,
        "ROTOR starting up"
    );

    // -- Credentials ------------------------------------------------------
    //
    // Fatal on failure: the controller must not reach scheduling without
    // a signing account.

    let password = SecretString::new(AppConfig::resolve_env(&cfg.chain.keystore_password_env)?);
    let signer = wallet::load_keystore(Path::new(&cfg.chain.keystore_path), &password)?;
    let account = signer.address();

    // -- Chain components -------------------------------------------------

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(cfg.chain.rpc_url.parse().context("Invalid RPC URL")?)
        .erased();

    let registry = Arc::new(PoolRegistry::from_config(&cfg.pools)?);

    let probe: Arc<dyn YieldProbe> =
        Arc::new(LensProbe::new(provider.clone(), cfg.chain.lens_address));

    let reallocator: Arc<dyn Reallocator> = Arc::new(StrategistExecutor::new(
        provider,
        cfg.chain.strategist_address,
        account,
        cfg.chain.gas_limit,
    ));

    let mut controller = Controller::new(
        registry,
        probe,
        reallocator,
        ControllerSettings::from_config(&cfg.controller),
    );

    // -- Main loop --------------------------------------------------------
    //
    // Cycles are single-flight: run_cycle is awaited inside the loop, so
    // a slow cycle delays the next tick instead of overlapping with it.

    let mut interval = tokio::time::interval(Duration::from_secs(
        cfg.controller.cycle_interval_secs,
    ));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.controller.cycle_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match controller.run_cycle().await {
                    Ok(report) => log_cycle_report(&report),
                    Err(e) => error!(error = %e, "Cycle failed, continuing to next"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(
        cycles = controller.cycles_run(),
        current_pool = ?controller.state().current_pool,
        current_apy = controller.state().current_apy,
        "ROTOR shut down cleanly."
    );

    Ok(())
}

/// Log a human-readable cycle summary with the wall-clock time.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        observed = report.observed,
        failed = report.failed,
        decision = ?report.decision,
        tx_hash = ?report.tx_hash,
        time = %chrono::Local::now().format("%H:%M:%S"),
        "Cycle complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rotor=info"));

    let json_logging = std::env::var("ROTOR_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
