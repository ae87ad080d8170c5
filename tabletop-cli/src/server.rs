//! Server command - start the game server
//!
//! - run(): orchestration
//! - configure_server(), start_server(): phases
//! - validation of the static directory

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use tabletop_core::{DiceConfig, RegistryConfig};
use tabletop_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "3001")]
    pub port: u16,

    /// Directory containing static files for the browser client
    #[arg(long, default_value = "public")]
    pub static_dir: PathBuf,

    /// Seed Ludo dice for reproducible sessions
    #[arg(long)]
    pub dice_seed: Option<u64>,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

/// Run server command
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting tabletop server on port {}", config.port);
    if let DiceConfig::Seeded(seed) = config.registry.dice {
        tracing::info!("Ludo dice seeded with {}", seed);
    }

    start_server(config)
}

// ============================================================================
// PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    let registry = match args.dice_seed {
        Some(seed) => RegistryConfig::seeded(seed),
        None => RegistryConfig::default(),
    };

    Ok(ServerConfig::default()
        .with_port(args.port)
        .with_static_dir(args.static_dir.to_string_lossy())
        .with_registry(registry))
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but only the API is served.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
