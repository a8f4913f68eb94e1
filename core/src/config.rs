//! Build configuration and the artifact layout derived from it.
//!
//! A [`BuildConfig`] is constructed once per invocation and treated as
//! immutable from then on. The derived directory and artifact name are pure
//! functions of its fields, so identical configurations always land in
//! identical places.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::PlatformSettings;

/// Fixed name of the relocated content-bundle subdirectory.
pub const BUNDLE_DIR: &str = "ServerData";
/// Pipeline report snapshot written into the build directory.
pub const REPORT_FILE: &str = "BuildReport.json";
/// Configuration snapshot written into the build directory.
pub const PARAMETERS_FILE: &str = "BuildParameters.json";

/// Supported target platforms. Unknown values are a hard parse error; no
/// default ever silently substitutes a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildTarget {
    Android,
    Ios,
}

impl BuildTarget {
    /// Lowercase identifier used in manifests and pipeline arguments.
    pub fn key(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl FromStr for BuildTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            _ => Err(ConfigError::UnknownTarget(s.to_string())),
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => write!(f, "Android"),
            Self::Ios => write!(f, "iOS"),
        }
    }
}

/// Output tier, chosen from the development/debug flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Development,
    Qa,
    Release,
}

impl Tier {
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Qa => "QA",
            Self::Release => "Release",
        }
    }
}

/// Immutable description of one build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub target: BuildTarget,
    /// Product name resolved from the project settings at construction time,
    /// so every derivation below stays a pure function of this struct.
    pub product: String,
    pub version: String,
    #[serde(default)]
    pub suffix: String,
    /// Free-form differentiator (commit hash, CI job id, or a local
    /// timestamp token from [`local_identifier`]).
    #[serde(default)]
    pub identifier: String,
    pub output_root: PathBuf,
    pub development: bool,
    pub debug_mode: bool,
    pub generate_bundles: bool,
    pub save_report: bool,
    /// `None` for platforms without custom handling; derivations treat
    /// absence as "contribute nothing".
    pub platform: Option<PlatformSettings>,
}

impl BuildConfig {
    /// Development takes naming precedence over debug/release.
    pub fn tier(&self) -> Tier {
        if self.development {
            Tier::Development
        } else if self.debug_mode {
            Tier::Qa
        } else {
            Tier::Release
        }
    }

    /// Artifact name:
    /// `{product}_v{version}[_suffix][_DEVELOPMENT][_identifier][ext]`.
    ///
    /// The extension is appended only when requested and the platform
    /// provides one.
    pub fn build_name(&self, include_extension: bool) -> String {
        let mut name = format!("{}_v{}", self.product.replace(' ', ""), self.version);
        if !self.suffix.is_empty() {
            name.push('_');
            name.push_str(&self.suffix);
        }
        if self.development {
            name.push_str("_DEVELOPMENT");
        }
        if !self.identifier.is_empty() {
            name.push('_');
            name.push_str(&self.identifier);
        }
        if include_extension {
            if let Some(platform) = &self.platform {
                name.push_str(platform.extension());
            }
        }
        name
    }

    /// `{output_root}/{tier}/{build_name}`, without touching the filesystem.
    pub fn build_dir_path(&self) -> PathBuf {
        self.output_root
            .join(self.tier().dir_name())
            .join(self.build_name(false))
    }

    /// Create the build directory tree if absent and return it. Idempotent.
    pub fn ensure_build_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self.build_dir_path();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Assemble the request handed to the external player-build pipeline.
    pub fn player_request(&self, scenes: Vec<String>) -> PlayerBuildRequest {
        let mut request = PlayerBuildRequest {
            target: self.target,
            scenes,
            development: self.development,
            output_path: self.build_dir_path().join(self.build_name(true)),
        };
        if let Some(platform) = &self.platform {
            platform.apply_invocation_modifiers(&mut request);
        }
        request
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build parameters:")?;
        writeln!(f, "  Product: {}", self.product)?;
        writeln!(f, "  Version: {}", self.version)?;
        writeln!(f, "  Target: {}", self.target)?;
        writeln!(f, "  Suffix: {}", self.suffix)?;
        writeln!(f, "  Output root: {}", self.output_root.display())?;
        writeln!(f, "  Development: {}", self.development)?;
        writeln!(f, "  Debug mode: {}", self.debug_mode)?;
        write!(f, "  Content bundles: {}", self.generate_bundles)
    }
}

/// Concrete request handed to the external player-build pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerBuildRequest {
    pub target: BuildTarget,
    /// Ordered list of enabled scene paths.
    pub scenes: Vec<String>,
    pub development: bool,
    pub output_path: PathBuf,
}

/// Timestamp-derived identifier for locally triggered builds.
///
/// The only non-deterministic input to a configuration; callers that need
/// reproducible names simply do not use it.
pub fn local_identifier() -> String {
    format!("local{}", chrono::Utc::now().timestamp().max(0))
}
