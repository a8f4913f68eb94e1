//! Error taxonomy for build runs.
//!
//! Everything here is fatal: a failed run is recovered by re-running the
//! tool, not by retrying individual steps. Degraded optional steps and
//! persistence problems are not errors; they surface as
//! [`StepStatus::Degraded`](crate::orchestrator::StepStatus) on the outcome.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or missing required input, detected before any side effect.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown build target: '{0}'")]
    UnknownTarget(String),

    #[error("missing required argument: -{0}")]
    MissingArgument(&'static str),

    #[error("signing credentials not configured: {0} is unset (app bundles require a keystore)")]
    MissingSigningCredential(&'static str),

    #[error("version '{version}' does not reduce to a numeric version code")]
    BadVersionCode { version: String },
}

/// Fatal errors that abort a build run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to switch active build target: {0}")]
    PlatformSwitch(String),

    #[error("project settings update failed: {0}")]
    Settings(String),

    #[error("failed to prepare build directory {path}: {source}")]
    BuildDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("player build pipeline failed to run: {0}")]
    Pipeline(String),
}
