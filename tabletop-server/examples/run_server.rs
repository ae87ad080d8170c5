//! Example to run the tabletop server standalone
//!
//! Run with: cargo run -p tabletop-server --example run_server

use tabletop_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig::default();

    println!("Starting tabletop server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);
    println!("Lobby at http://localhost:{}/api/games", config.port);

    run_server(config).await
}
