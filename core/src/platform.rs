//! Per-platform build settings.
//!
//! The supported platform set is small and closed, so settings are a tagged
//! enum selected once at configuration time rather than open dynamic
//! dispatch. A platform without custom handling simply has no settings
//! attached.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{BuildTarget, PlayerBuildRequest};
use crate::error::{BuildError, ConfigError};
use crate::ports::{AndroidPlayerOptions, ProjectStore};

/// Environment variables holding the Android keystore credentials. The
/// credential material itself is deployment configuration and never lives in
/// this repository.
pub const KEYSTORE_PATH_VAR: &str = "FORGE_KEYSTORE_PATH";
pub const KEYSTORE_PASS_VAR: &str = "FORGE_KEYSTORE_PASS";
pub const KEY_ALIAS_VAR: &str = "FORGE_KEY_ALIAS";
pub const KEY_ALIAS_PASS_VAR: &str = "FORGE_KEY_ALIAS_PASS";

/// Android target CPU architecture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AndroidArch {
    #[default]
    Arm64,
    Armv7,
    All,
}

/// Android build settings: architecture selector plus the archive-format
/// toggle (store-upload app bundle vs. sideloadable package).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidSettings {
    #[serde(default)]
    pub target_arch: AndroidArch,
    #[serde(default)]
    pub build_app_bundle: bool,
}

/// iOS build settings. Signing and export belong to the external toolchain,
/// so nothing is configurable here yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IosSettings {}

/// Platform-specific build settings, one variant per supported platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformSettings {
    Android(AndroidSettings),
    Ios(IosSettings),
}

impl PlatformSettings {
    /// Default settings for a target, `None` for platforms without custom
    /// handling.
    pub fn for_target(target: BuildTarget) -> Option<Self> {
        match target {
            BuildTarget::Android => Some(Self::Android(AndroidSettings::default())),
            BuildTarget::Ios => Some(Self::Ios(IosSettings::default())),
        }
    }

    /// Artifact file extension, archive-format dependent on Android.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Android(android) => {
                if android.build_app_bundle {
                    ".aab"
                } else {
                    ".apk"
                }
            }
            Self::Ios(_) => ".ipa",
        }
    }

    /// Provider-specific fields on the pipeline request. Neither platform
    /// currently contributes anything beyond the common fields; the hook
    /// stays so new platforms can.
    pub fn apply_invocation_modifiers(&self, _request: &mut PlayerBuildRequest) {}

    /// Write platform toggles into the project settings store. Failures here
    /// abort the run: a misconfigured platform must not produce an artifact.
    pub fn apply_player_modifiers(
        &self,
        version: &str,
        store: &mut dyn ProjectStore,
    ) -> Result<(), BuildError> {
        match self {
            Self::Android(android) => {
                let signing = if android.build_app_bundle {
                    Some(SigningConfig::from_env()?)
                } else {
                    None
                };
                let options = AndroidPlayerOptions {
                    target_arch: android.target_arch,
                    build_app_bundle: android.build_app_bundle,
                    version_code: android_version_code(version)?,
                    signing,
                };
                store
                    .set_android_options(options)
                    .map_err(|e| BuildError::Settings(format!("{e:#}")))
            }
            Self::Ios(_) => Ok(()),
        }
    }
}

/// Numeric version code derived from the marketing version: all characters
/// except digits and dots are stripped, dots removed, and the result is
/// right-padded with zeros to four places. `"1.2.3"` → 1230, `"10.0"` → 1000.
pub fn android_version_code(version: &str) -> Result<u32, ConfigError> {
    let mut code: String = version.chars().filter(char::is_ascii_digit).collect();
    while code.len() < 4 {
        code.push('0');
    }
    code.parse()
        .map_err(|_| ConfigError::BadVersionCode {
            version: version.to_string(),
        })
}

/// Keystore credential material, resolved from the environment at the moment
/// the platform modifiers run.
#[derive(Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    pub keystore_path: String,
    pub keystore_pass: String,
    pub key_alias: String,
    pub key_alias_pass: String,
}

impl SigningConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            keystore_path: require_env(KEYSTORE_PATH_VAR)?,
            keystore_pass: require_env(KEYSTORE_PASS_VAR)?,
            key_alias: require_env(KEY_ALIAS_VAR)?,
            key_alias_pass: require_env(KEY_ALIAS_PASS_VAR)?,
        })
    }
}

// Passwords stay out of logs.
impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("keystore_path", &self.keystore_path)
            .field("key_alias", &self.key_alias)
            .finish_non_exhaustive()
    }
}

fn require_env(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingSigningCredential(var))
}
