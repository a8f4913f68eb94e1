//! Init command - create a starter forge.toml manifest.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use forge_core::ManifestStore;

/// Arguments for the init command
#[derive(Args)]
pub struct InitArgs {
    /// Product name recorded in the manifest
    #[arg(short, long)]
    pub name: String,

    /// Initial marketing version
    #[arg(long, default_value = "0.1.0")]
    pub version: String,

    /// Directory to create the manifest in (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Overwrite an existing manifest
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    let project_dir = match args.project {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let manifest_path = project_dir.join(ManifestStore::FILE_NAME);

    if manifest_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            manifest_path.display()
        );
    }

    let content = starter_manifest(&args.name, &args.version);
    std::fs::write(&manifest_path, content)?;
    println!("Created: {}", manifest_path.display());
    Ok(())
}

fn starter_manifest(name: &str, version: &str) -> String {
    format!(
        r#"[game]
product_name = "{name}"
version = "{version}"

[scenes]
enabled = []

# External commands run by the build sequence.
[pipeline]
# player_command = "game-editor -batchmode -quit"
# bundle_command = "game-editor -batchmode -buildBundles"

[bundles]
# remote_catalog_path = "ServerData"
"#
    )
}
