//! Collaborator seams for the orchestration engine.
//!
//! The external toolchain owns the player compilation, the content-bundle
//! pipeline, and the process-wide project settings; the engine only sees
//! these traits so tests can substitute in-memory fakes instead of mutating
//! real project state.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{BuildTarget, PlayerBuildRequest};
use crate::platform::{AndroidArch, SigningConfig};

/// Android toggles written by the platform-modifier step.
#[derive(Debug, Clone)]
pub struct AndroidPlayerOptions {
    pub target_arch: AndroidArch,
    pub build_app_bundle: bool,
    pub version_code: u32,
    /// Present only when an app bundle is being built.
    pub signing: Option<SigningConfig>,
}

/// Process-wide player configuration store (marketing version, compile
/// defines, platform toggles). Mutated in place by the build sequence; only
/// one build may safely run against a given project checkout at a time.
pub trait ProjectStore {
    fn product_name(&self) -> String;
    fn marketing_version(&self) -> String;
    fn set_marketing_version(&mut self, version: &str) -> Result<()>;
    /// Current compile defines for a target. Callers must read-modify-write:
    /// symbols they do not manage have to survive a round trip.
    fn define_symbols(&self, target: BuildTarget) -> Result<Vec<String>>;
    fn set_define_symbols(&mut self, target: BuildTarget, symbols: &[String]) -> Result<()>;
    fn switch_active_target(&mut self, target: BuildTarget) -> Result<()>;
    fn set_android_options(&mut self, options: AndroidPlayerOptions) -> Result<()>;
}

/// Ordered list of enabled scene paths.
pub trait SceneProvider {
    fn scene_paths(&self) -> Vec<String>;
}

/// A fixed scene list, detached from the store it was read from.
pub struct SceneList(pub Vec<String>);

impl SceneProvider for SceneList {
    fn scene_paths(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Result reported by the external player-build pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub output_path: PathBuf,
    pub duration_secs: f64,
    pub finished_at: String,
}

/// External player-build pipeline. A long-running blocking call with no
/// cancellation support.
pub trait PlayerPipeline {
    /// `Err` means the pipeline could not run at all; a report with
    /// `succeeded == false` means it ran and failed.
    fn build(&self, request: &PlayerBuildRequest) -> Result<PipelineReport>;
}

/// External content-bundle pipeline.
pub trait ContentBundler {
    fn clean_and_build(&self) -> Result<()>;
    /// Configured remote-catalog output path, when one is set.
    fn remote_catalog_path(&self) -> Option<PathBuf>;
    /// Named profile variable, when defined.
    fn profile_variable(&self, name: &str) -> Option<String>;
    /// Project root, anchor for the fixed default output directory.
    fn project_root(&self) -> &Path;
}
