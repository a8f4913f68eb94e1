//! Batch command - unattended CI entry point.
//!
//! Accepts the launcher's raw argument stream (both `-key=value` and
//! `-key value` forms, interleaved with the launcher's own flags), resolves
//! a build configuration and runs the full sequence. Outcome is communicated
//! through logs and the process exit status only.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use forge_core::args::{self, LauncherArgs};
use forge_core::error::BuildError;
use forge_core::pipeline::{CommandBundler, CommandPipeline};
use forge_core::platform::PlatformSettings;
use forge_core::ports::ProjectStore;
use forge_core::{BuildConfig, BuildOutcome, BuildTarget, ManifestStore, Orchestrator};

/// Arguments for the batch command
#[derive(Args)]
pub struct BatchArgs {
    /// Path to the forge.toml project manifest
    #[arg(short, long, default_value = "forge.toml")]
    pub manifest: PathBuf,

    /// Raw launcher tokens; defaults to this process's own command line
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

/// Execute the batch command
pub fn execute(cli: BatchArgs) -> Result<()> {
    let launcher = if cli.tokens.is_empty() {
        LauncherArgs::from_env()
    } else {
        LauncherArgs::parse(&cli.tokens.join(" "))
    };
    tracing::info!("parsed launcher arguments: {launcher}");

    let mut store = ManifestStore::load(&cli.manifest)?;
    let project_root = store.project_root().to_path_buf();

    let config = resolve_config(&launcher, &store, &project_root)?;
    store
        .switch_active_target(config.target)
        .map_err(|e| BuildError::PlatformSwitch(format!("{e:#}")))?;

    println!("{config}");

    let outcome = run_build(&mut store, &project_root, &config)?;
    if !outcome.succeeded {
        anyhow::bail!("player build failed (see pipeline output above)");
    }
    println!("Build finished: {}", outcome.artifact_path.display());
    Ok(())
}

/// Resolve a build configuration from the parsed launcher arguments.
///
/// The target platform is read from the custom `-buildTarget` flag; missing
/// or unknown values abort before any side effect. Version falls back to the
/// manifest's marketing version, the identifier prefers the commit hash over
/// the CI job id, and the output root defaults to `<project>/Builds`.
fn resolve_config(
    launcher: &LauncherArgs,
    store: &ManifestStore,
    project_root: &Path,
) -> Result<BuildConfig, BuildError> {
    let target_value = launcher.get(args::BUILD_TARGET);
    if target_value.is_empty() {
        return Err(forge_core::ConfigError::MissingArgument(args::BUILD_TARGET).into());
    }
    let target: BuildTarget = target_value.parse()?;

    let output_root = match launcher.get(args::BUILD_OUTPUT_PATH) {
        "" => project_root.join("Builds"),
        path => PathBuf::from(path),
    };
    let version = match launcher.get(args::BUILD_VERSION) {
        "" => store.marketing_version(),
        version => version.to_string(),
    };
    // Commit hash wins; the CI job id is the fallback differentiator.
    let identifier = match launcher.get(args::COMMIT_HASH) {
        "" => launcher.get(args::BUILD_ID).to_string(),
        hash => hash.to_string(),
    };

    Ok(BuildConfig {
        target,
        product: store.product_name(),
        version,
        suffix: launcher.get(args::BUILD_SUFFIX).to_string(),
        identifier,
        output_root,
        development: launcher.get_bool(args::DEVELOPMENT_BUILD),
        debug_mode: false,
        generate_bundles: launcher.get_bool(args::GENERATE_BUNDLES),
        save_report: false,
        platform: PlatformSettings::for_target(target),
    })
}

/// Wire the real adapters to the orchestrator and run one build.
pub(crate) fn run_build(
    store: &mut ManifestStore,
    project_root: &Path,
    config: &BuildConfig,
) -> Result<BuildOutcome> {
    let pipeline = CommandPipeline::from_manifest(project_root, store.manifest())?;
    let bundler = CommandBundler::from_manifest(project_root, store.manifest());
    let scenes = store.scene_list();

    let mut orchestrator = Orchestrator {
        store,
        scenes: &scenes,
        pipeline: &pipeline,
        bundler: &bundler,
    };
    Ok(orchestrator.run(config)?)
}
