//! External toolchain adapters.
//!
//! The player build and the content-bundle build are opaque external
//! commands configured in `forge.toml`. Both run as blocking child processes
//! inheriting stdout/stderr so toolchain output stays visible.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::PlayerBuildRequest;
use crate::ports::{ContentBundler, PipelineReport, PlayerPipeline};
use crate::settings::ProjectManifest;

/// Player pipeline adapter: runs the configured build command with the
/// request appended as arguments.
pub struct CommandPipeline {
    project_root: PathBuf,
    command: String,
}

impl CommandPipeline {
    pub fn new(project_root: &Path, command: &str) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            command: command.to_string(),
        }
    }

    pub fn from_manifest(project_root: &Path, manifest: &ProjectManifest) -> Result<Self> {
        let command = manifest
            .pipeline
            .player_command
            .as_deref()
            .context("no [pipeline] player_command configured in forge.toml")?;
        Ok(Self::new(project_root, command))
    }

    fn assemble(&self, request: &PlayerBuildRequest) -> Result<Command> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().context("empty player build command")?;
        let mut command = Command::new(program);
        command
            .args(parts)
            .arg("--target")
            .arg(request.target.key())
            .arg("--output")
            .arg(&request.output_path)
            .current_dir(&self.project_root);
        if request.development {
            command.arg("--development");
        }
        for scene in &request.scenes {
            command.arg("--scene").arg(scene);
        }
        Ok(command)
    }
}

impl PlayerPipeline for CommandPipeline {
    fn build(&self, request: &PlayerBuildRequest) -> Result<PipelineReport> {
        let started = Instant::now();
        let mut command = self.assemble(request)?;
        // status() inherits stdio so compiler output stays visible.
        let status = command
            .status()
            .with_context(|| format!("Failed to execute player build command: {}", self.command))?;
        Ok(PipelineReport {
            succeeded: status.success(),
            exit_code: status.code(),
            output_path: request.output_path.clone(),
            duration_secs: started.elapsed().as_secs_f64(),
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Bundler adapter: clean+build is one configured command; path candidates
/// come from the manifest's `[bundles]` section.
pub struct CommandBundler {
    project_root: PathBuf,
    command: Option<String>,
    remote_catalog: Option<PathBuf>,
    profile: std::collections::BTreeMap<String, String>,
}

impl CommandBundler {
    pub fn from_manifest(project_root: &Path, manifest: &ProjectManifest) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            command: manifest.pipeline.bundle_command.clone(),
            remote_catalog: manifest
                .bundles
                .remote_catalog_path
                .as_ref()
                .map(PathBuf::from),
            profile: manifest.bundles.profile.clone(),
        }
    }
}

impl ContentBundler for CommandBundler {
    fn clean_and_build(&self) -> Result<()> {
        let command_line = self
            .command
            .as_deref()
            .context("no [pipeline] bundle_command configured in forge.toml")?;
        let mut parts = command_line.split_whitespace();
        let program = parts.next().context("empty bundle command")?;
        let status = Command::new(program)
            .args(parts)
            .current_dir(&self.project_root)
            .status()
            .with_context(|| format!("Failed to execute bundle command: {command_line}"))?;
        if !status.success() {
            anyhow::bail!("bundle command exited with {status}");
        }
        Ok(())
    }

    fn remote_catalog_path(&self) -> Option<PathBuf> {
        self.remote_catalog.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                self.project_root.join(path)
            }
        })
    }

    fn profile_variable(&self, name: &str) -> Option<String> {
        self.profile.get(name).cloned()
    }

    fn project_root(&self) -> &Path {
        &self.project_root
    }
}
