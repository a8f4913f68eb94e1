//! Forge Core - Build parameter resolution & orchestration
//!
//! This crate turns heterogeneous launcher input into a typed build
//! configuration, derives the versioned output layout from it, and sequences
//! the end-to-end build against injected collaborators.
//!
//! # Architecture
//!
//! - [`LauncherArgs`] - case-insensitive map over the launcher command line
//! - [`BuildConfig`] - immutable description of one build run
//! - [`PlatformSettings`] - closed per-platform settings variants
//! - [`Orchestrator`] - linear build sequence against the [`ports`] traits
//! - [`ManifestStore`] - `forge.toml`-backed project settings store

pub mod args;
pub mod config;
pub mod error;
pub mod fsops;
pub mod orchestrator;
pub mod pipeline;
pub mod platform;
pub mod ports;
pub mod preset;
pub mod settings;
#[cfg(test)]
pub mod test_utils;

// Re-export the types most callers need
pub use args::LauncherArgs;
pub use config::{BuildConfig, BuildTarget, PlayerBuildRequest, Tier};
pub use error::{BuildError, ConfigError};
pub use orchestrator::{BuildOutcome, Orchestrator, StepStatus};
pub use platform::PlatformSettings;
pub use ports::{ContentBundler, PipelineReport, PlayerPipeline, ProjectStore, SceneProvider};
pub use settings::ManifestStore;
