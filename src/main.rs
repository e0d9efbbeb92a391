//! CLI entry point for the SDG emulator.
//!
//! ```bash
//! sdg-emulator serve --model sdg1062x --port 21111
//! sdg-emulator console 127.0.0.1:21111
//! sdg-emulator verify 127.0.0.1:21111 192.168.1.50:5025 --sweeps
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sdg_emulator::client::{self, ScpiClient};
use sdg_emulator::config::{EmulatorConfig, DEFAULT_CONFIG_PATH};
use sdg_emulator::logging::{self, LoggingConfig};
use sdg_emulator::network::EmulatorServer;
use sdg_emulator::verify::Verifier;
use sdg_emulator::{Engine, SharedEngine};
use std::path::PathBuf;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "sdg-emulator")]
#[command(about = "Siglent SDG function generator protocol emulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the emulated instrument over TCP
    Serve {
        /// Instrument model (sdg1032x, sdg1062x)
        #[arg(long)]
        model: Option<String>,

        /// TCP port
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Interactive console against an emulator or instrument
    Console {
        /// Address as host:port
        addr: String,
    },

    /// Compare the emulator's responses with real hardware
    Verify {
        /// Emulator address as host:port
        emulator: String,

        /// Hardware address as host:port
        hardware: String,

        /// Also run the amplitude and frequency rounding sweeps
        #[arg(long)]
        sweeps: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            model,
            port,
            bind,
            config,
            log_level,
        } => serve(config, model, port, bind, log_level).await,
        Commands::Console { addr } => console(&addr).await,
        Commands::Verify {
            emulator,
            hardware,
            sweeps,
        } => verify(&emulator, &hardware, sweeps).await,
    }
}

async fn serve(
    path: PathBuf,
    model: Option<String>,
    port: Option<u16>,
    bind: Option<String>,
    log_level: Option<String>,
) -> Result<()> {
    let mut config: EmulatorConfig = EmulatorConfig::figment(&path)
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if let Some(model) = model {
        config.instrument.model = model;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }
    if let Some(level) = log_level {
        config.application.log_level = level;
    }
    config.validate()?;

    logging::init_from_config(&config)?;

    let engine = Engine::with_model(config.instrument_model()?);
    let server = EmulatorServer::bind(&config.server, SharedEngine::from(engine)).await?;
    info!(addr = %server.local_addr()?, "Press Ctrl+C to stop");

    tokio::select! {
        result = server.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            info!("Shutting down");
        }
    }
    Ok(())
}

async fn console(addr: &str) -> Result<()> {
    logging::init(LoggingConfig::new(Level::WARN))?;

    println!("Waiting for connection...");
    let client = ScpiClient::connect(addr).await?;
    println!("Connected!");
    client::interactive(&client).await
}

async fn verify(emulator: &str, hardware: &str, sweeps: bool) -> Result<()> {
    logging::init(LoggingConfig::new(Level::INFO))?;

    let emulator = ScpiClient::connect(emulator).await?;
    let hardware = ScpiClient::connect(hardware).await?;

    let report = Verifier::new(emulator, hardware).run_all(sweeps).await;
    if report.passed() {
        info!("{}", report);
        Ok(())
    } else {
        error!("{}", report);
        anyhow::bail!("{}", report)
    }
}
