//! File-backed project settings.
//!
//! `forge.toml` plays the role the external toolchain's persisted project
//! settings play for an editor: product name, marketing version, enabled
//! scenes, compile defines and platform toggles, plus the commands the
//! pipeline adapters shell out to. [`ManifestStore`] writes every mutation
//! back to disk so the file always reflects the last build's state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::BuildTarget;
use crate::platform::AndroidArch;
use crate::ports::{AndroidPlayerOptions, ProjectStore, SceneList, SceneProvider};

/// On-disk manifest structure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub game: GameSection,
    #[serde(default)]
    pub scenes: ScenesSection,
    /// Compile defines per target key (`android`, `ios`).
    #[serde(default)]
    pub defines: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub android: AndroidSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub bundles: BundlesSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_target: Option<BuildTarget>,
}

/// Game identity section.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GameSection {
    pub product_name: String,
    pub version: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScenesSection {
    /// Ordered list of enabled scene paths.
    #[serde(default)]
    pub enabled: Vec<String>,
}

/// Android player toggles persisted by the platform-modifier step.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AndroidSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_arch: Option<AndroidArch>,
    #[serde(default)]
    pub build_app_bundle: bool,
    #[serde(default)]
    pub version_code: u32,
    #[serde(default)]
    pub use_custom_keystore: bool,
    // Credential material stays in the environment; only the keystore
    // location and alias are recorded here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystore_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
}

/// External commands the pipeline adapters run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Player build command, e.g. `game-editor -batchmode -quit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_command: Option<String>,
    /// Content-bundle clean+build command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_command: Option<String>,
}

/// Content-bundle output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BundlesSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_catalog_path: Option<String>,
    /// Named profile variables, consulted by bundle path resolution.
    #[serde(default)]
    pub profile: BTreeMap<String, String>,
}

impl ProjectManifest {
    /// Parse a manifest from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse forge.toml")
    }
}

/// Read-write handle over a `forge.toml` file.
#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    manifest: ProjectManifest,
}

impl ManifestStore {
    pub const FILE_NAME: &'static str = "forge.toml";

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest = ProjectManifest::parse(&content)?;
        Ok(Self {
            path: path.to_path_buf(),
            manifest,
        })
    }

    /// Directory the manifest lives in.
    pub fn project_root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    /// Detached copy of the enabled scene list, so a build can borrow the
    /// store mutably while the scene provider stays alive.
    pub fn scene_list(&self) -> SceneList {
        SceneList(self.scene_paths())
    }

    fn save(&self) -> Result<()> {
        let data =
            toml::to_string_pretty(&self.manifest).context("Failed to serialize forge.toml")?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("Failed to write manifest: {}", self.path.display()))
    }
}

impl ProjectStore for ManifestStore {
    fn product_name(&self) -> String {
        self.manifest.game.product_name.clone()
    }

    fn marketing_version(&self) -> String {
        self.manifest.game.version.clone()
    }

    fn set_marketing_version(&mut self, version: &str) -> Result<()> {
        self.manifest.game.version = version.to_string();
        self.save()
    }

    fn define_symbols(&self, target: BuildTarget) -> Result<Vec<String>> {
        Ok(self
            .manifest
            .defines
            .get(target.key())
            .cloned()
            .unwrap_or_default())
    }

    fn set_define_symbols(&mut self, target: BuildTarget, symbols: &[String]) -> Result<()> {
        self.manifest
            .defines
            .insert(target.key().to_string(), symbols.to_vec());
        self.save()
    }

    fn switch_active_target(&mut self, target: BuildTarget) -> Result<()> {
        self.manifest.active_target = Some(target);
        self.save()
    }

    fn set_android_options(&mut self, options: AndroidPlayerOptions) -> Result<()> {
        let android = &mut self.manifest.android;
        android.target_arch = Some(options.target_arch);
        android.build_app_bundle = options.build_app_bundle;
        android.version_code = options.version_code;
        android.use_custom_keystore = options.signing.is_some();
        if let Some(signing) = options.signing {
            android.keystore_path = Some(signing.keystore_path);
            android.key_alias = Some(signing.key_alias);
        }
        self.save()
    }
}

impl SceneProvider for ManifestStore {
    fn scene_paths(&self) -> Vec<String> {
        self.manifest.scenes.enabled.clone()
    }
}
