//! Build command - developer entry point with explicit flags.
//!
//! The interactive counterpart of `forge batch`: same configuration, same
//! sequence, but flags come from clap, the identifier is a local timestamp
//! token, and a successful build can be revealed in the file manager.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use forge_core::config::local_identifier;
use forge_core::error::BuildError;
use forge_core::platform::PlatformSettings;
use forge_core::ports::ProjectStore;
use forge_core::preset::Preset;
use forge_core::{BuildConfig, BuildTarget, ManifestStore};

/// Arguments for the build command
#[derive(Args)]
pub struct BuildArgs {
    /// Target platform (android, ios)
    #[arg(short, long)]
    pub target: String,

    /// Marketing version; defaults to the manifest's version
    #[arg(long)]
    pub version: Option<String>,

    /// Differentiator appended to the artifact name
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Output root; defaults to Desktop/Builds
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Development build (takes naming precedence over debug mode)
    #[arg(long)]
    pub development: bool,

    /// Toggle the DEBUG_MODE compile define
    #[arg(long)]
    pub debug_mode: bool,

    /// Generate and relocate content bundles
    #[arg(long)]
    pub bundles: bool,

    /// Persist the pipeline report next to the artifact
    #[arg(long)]
    pub save_report: bool,

    /// Build an Android app bundle instead of a package
    #[arg(long)]
    pub app_bundle: bool,

    /// Apply a preset (debug, release, development) on top of the flags
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Path to the forge.toml project manifest
    #[arg(short, long, default_value = "forge.toml")]
    pub manifest: PathBuf,

    /// Open the build directory in the file manager on success
    #[arg(long)]
    pub reveal: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let mut store = ManifestStore::load(&args.manifest)?;
    let project_root = store.project_root().to_path_buf();

    let target: BuildTarget = args.target.parse()?;
    store
        .switch_active_target(target)
        .map_err(|e| BuildError::PlatformSwitch(format!("{e:#}")))?;

    let mut platform = PlatformSettings::for_target(target);
    if let Some(PlatformSettings::Android(android)) = &mut platform {
        android.build_app_bundle = args.app_bundle;
    }

    let mut config = BuildConfig {
        target,
        product: store.product_name(),
        version: args
            .version
            .clone()
            .unwrap_or_else(|| store.marketing_version()),
        suffix: args.suffix.clone(),
        identifier: local_identifier(),
        output_root: args.output.clone().unwrap_or_else(default_output_root),
        development: args.development,
        debug_mode: args.debug_mode,
        generate_bundles: args.bundles,
        save_report: args.save_report,
        platform,
    };
    if let Some(preset) = args.preset {
        preset.apply(&mut config);
    }

    println!("{config}");

    let outcome = crate::batch::run_build(&mut store, &project_root, &config)?;
    if !outcome.succeeded {
        anyhow::bail!("player build failed (see pipeline output above)");
    }

    println!("Build succeeded: {}", outcome.artifact_path.display());
    if args.reveal {
        if let Err(err) = open::that(&outcome.build_dir) {
            tracing::warn!("could not open {}: {err}", outcome.build_dir.display());
        }
    }
    Ok(())
}

/// Desktop "Builds" folder, falling back to the home directory.
fn default_output_root() -> PathBuf {
    match directories::UserDirs::new() {
        Some(dirs) => dirs
            .desktop_dir()
            .unwrap_or_else(|| dirs.home_dir())
            .join("Builds"),
        None => PathBuf::from("Builds"),
    }
}
