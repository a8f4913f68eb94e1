//! Build presets, mirroring the configurations developers actually ship.
//!
//! Presets are the only code that rewrites the marketing version: debug
//! builds are marked with a `99.` prefix and development builds with `00.`
//! so installed versions sort away from store releases.

use std::str::FromStr;

use crate::config::BuildConfig;
use crate::platform::{AndroidArch, PlatformSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Debug,
    Release,
    Development,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            "development" => Ok(Self::Development),
            other => Err(format!(
                "unknown preset '{other}' (expected debug, release or development)"
            )),
        }
    }
}

impl Preset {
    /// Adjust a configuration in place, before the run starts.
    pub fn apply(self, config: &mut BuildConfig) {
        match self {
            Self::Development => {
                config.version = format!("00.{}", strip_markers(&sanitize(&config.version)));
                config.development = true;
                config.debug_mode = true;
                config.generate_bundles = true;
                config.save_report = false;
                reset_android(config, false);
            }
            Self::Debug => {
                config.version = format!("99.{}", sanitize(&config.version));
                config.debug_mode = true;
                config.generate_bundles = true;
                config.save_report = false;
                reset_android(config, false);
            }
            Self::Release => {
                config.version = strip_markers(&config.version);
                config.debug_mode = false;
                config.generate_bundles = true;
                config.save_report = true;
                reset_android(config, true);
            }
        }
    }
}

/// Keep only digits and dots.
fn sanitize(version: &str) -> String {
    version
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

fn strip_markers(version: &str) -> String {
    version.replace("99.", "").replace("00.", "")
}

fn reset_android(config: &mut BuildConfig, app_bundle: bool) {
    if let Some(PlatformSettings::Android(android)) = &mut config.platform {
        android.target_arch = AndroidArch::Arm64;
        android.build_app_bundle = app_bundle;
    }
}
