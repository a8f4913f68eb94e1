//! Forge - build orchestrator for game projects
//!
//! # Commands
//!
//! - `forge init` - create a starter forge.toml manifest
//! - `forge batch` - CI entry point; parses launcher-style arguments
//! - `forge build` - developer entry point with explicit flags
//!
//! # Usage
//!
//! In a game project directory with forge.toml:
//! ```bash
//! # CI build, launcher-style argument stream
//! forge batch -- -buildTarget Android -buildVersion=1.4.0 -commitHash=abc123 \
//!     -generateAddressables=true -buildOutputPath /ci/builds
//!
//! # Local developer build
//! forge build --target android --preset debug --reveal
//! ```
//!
//! # Manifest (forge.toml)
//!
//! ```toml
//! [game]
//! product_name = "Sample Game"
//! version = "1.0.0"
//!
//! [scenes]
//! enabled = ["Scenes/Boot.scene", "Scenes/Main.scene"]
//!
//! [pipeline]
//! player_command = "game-editor -batchmode -quit"
//! bundle_command = "game-editor -batchmode -buildBundles"
//! ```

mod batch;
mod build;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Forge - build orchestrator for game projects
#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Build orchestrator for game projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter forge.toml manifest
    Init(init::InitArgs),

    /// Run a build from launcher-style command-line arguments (CI)
    Batch(batch::BatchArgs),

    /// Run a build with explicit flags (developer workflow)
    Build(build::BuildArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => init::execute(args),
        Commands::Batch(args) => batch::execute(args),
        Commands::Build(args) => build::execute(args),
    }
}
