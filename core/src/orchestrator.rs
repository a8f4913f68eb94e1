//! The build sequence: a linear, blocking state machine with no
//! backtracking.
//!
//! Version write, define-symbol mutation, platform modifiers and the player
//! build are fatal on error. Content-bundle generation and relocation
//! degrade gracefully, and snapshot persistence never changes the reported
//! build outcome; those stages report an explicit [`StepStatus`] instead of
//! an error so callers can assert on them without scraping logs.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{BuildConfig, BUNDLE_DIR, PARAMETERS_FILE, REPORT_FILE};
use crate::error::BuildError;
use crate::fsops;
use crate::ports::{ContentBundler, PipelineReport, PlayerPipeline, ProjectStore, SceneProvider};

/// Compile define toggled by debug builds; all other defines are preserved.
const DEBUG_SYMBOL: &str = "DEBUG_MODE";
/// Profile variable consulted when resolving the bundle output directory.
const BUILD_PATH_VARIABLE: &str = "BuildPath";

/// Outcome of an optional pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Stage was not requested or its preconditions did not hold.
    Skipped,
    Completed,
    /// Stage failed but the run continued; carries the logged reason.
    Degraded(String),
}

impl StepStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// What one run produced.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Whether the external pipeline reported a successful player build.
    pub succeeded: bool,
    pub build_dir: PathBuf,
    pub artifact_path: PathBuf,
    pub report: PipelineReport,
    pub bundles: StepStatus,
    pub relocation: StepStatus,
    pub report_file: StepStatus,
    pub snapshot: StepStatus,
}

/// Sequences one end-to-end build against injected collaborators.
pub struct Orchestrator<'a> {
    pub store: &'a mut dyn ProjectStore,
    pub scenes: &'a dyn SceneProvider,
    pub pipeline: &'a dyn PlayerPipeline,
    pub bundler: &'a dyn ContentBundler,
}

impl Orchestrator<'_> {
    /// Run the full build sequence for `config`.
    ///
    /// The configuration snapshot is persisted into the build directory even
    /// when the pipeline fails, so failed runs stay diagnosable.
    pub fn run(&mut self, config: &BuildConfig) -> Result<BuildOutcome, BuildError> {
        // 1. Marketing version
        self.store
            .set_marketing_version(&config.version)
            .map_err(|e| BuildError::Settings(format!("set marketing version: {e:#}")))?;

        // 2. Build directory + pipeline request
        let build_dir = config.ensure_build_dir().map_err(|source| BuildError::BuildDir {
            path: config.build_dir_path(),
            source,
        })?;
        let request = config.player_request(self.scenes.scene_paths());
        info!(
            "resolved invocation for {}: {}",
            config.target,
            request.output_path.display()
        );

        // 3. Read-modify-write compile defines
        self.toggle_debug_symbol(config)?;

        // 4. Platform modifiers
        if let Some(platform) = &config.platform {
            platform.apply_player_modifiers(&config.version, self.store)?;
        }

        // 5. Optional content bundles
        let (bundle_path, bundles) = if config.generate_bundles {
            self.generate_bundles()
        } else {
            (None, StepStatus::Skipped)
        };

        // 6. Player build
        info!("building player");
        let report = match self.pipeline.build(&request) {
            Ok(report) => report,
            Err(err) => {
                // Snapshot still gets persisted for the failed run.
                self.write_snapshot(config, &build_dir);
                return Err(BuildError::Pipeline(format!("{err:#}")));
            }
        };
        let succeeded = report.succeeded;
        info!("player build finished, succeeded: {succeeded}");

        // 7. Relocate bundles next to the artifact
        let relocation = match &bundle_path {
            Some(source) if succeeded => self.relocate_bundles(source, &build_dir),
            _ => StepStatus::Skipped,
        };

        // 8. Optional pipeline report
        let report_file = if config.save_report {
            write_json(&build_dir.join(REPORT_FILE), &report)
        } else {
            StepStatus::Skipped
        };

        // 9. Configuration snapshot, regardless of outcome
        let snapshot = self.write_snapshot(config, &build_dir);

        Ok(BuildOutcome {
            succeeded,
            build_dir,
            artifact_path: request.output_path,
            report,
            bundles,
            relocation,
            report_file,
            snapshot,
        })
    }

    fn toggle_debug_symbol(&mut self, config: &BuildConfig) -> Result<(), BuildError> {
        let mut symbols = self
            .store
            .define_symbols(config.target)
            .map_err(|e| BuildError::Settings(format!("read define symbols: {e:#}")))?;
        if config.debug_mode {
            if !symbols.iter().any(|s| s == DEBUG_SYMBOL) {
                symbols.push(DEBUG_SYMBOL.to_string());
            }
        } else {
            symbols.retain(|s| s != DEBUG_SYMBOL);
        }
        info!("compile defines: {}", symbols.join(","));
        self.store
            .set_define_symbols(config.target, &symbols)
            .map_err(|e| BuildError::Settings(format!("write define symbols: {e:#}")))
    }

    fn generate_bundles(&self) -> (Option<PathBuf>, StepStatus) {
        info!("generating content bundles");
        if let Err(err) = self.bundler.clean_and_build() {
            let reason = format!("content bundle build failed: {err:#}");
            warn!("{reason}");
            return (None, StepStatus::Degraded(reason));
        }
        match self.resolve_bundle_output() {
            Some(path) => {
                info!("content bundles generated at {}", path.display());
                (Some(path), StepStatus::Completed)
            }
            None => {
                let reason = "no content bundle output directory found".to_string();
                warn!("{reason}");
                (None, StepStatus::Degraded(reason))
            }
        }
    }

    /// Candidates are tried in order; the first that resolves to an existing
    /// directory wins.
    fn resolve_bundle_output(&self) -> Option<PathBuf> {
        let candidates = [
            self.bundler.remote_catalog_path(),
            self.bundler
                .profile_variable(BUILD_PATH_VARIABLE)
                .map(PathBuf::from),
            Some(self.bundler.project_root().join(BUNDLE_DIR)),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|path| !path.as_os_str().is_empty() && path.is_dir())
    }

    fn relocate_bundles(&self, source: &Path, build_dir: &Path) -> StepStatus {
        let destination = build_dir.join(BUNDLE_DIR);
        // Stale destination is removed first so repeated runs converge.
        if destination.exists() {
            if let Err(err) = std::fs::remove_dir_all(&destination) {
                let reason = format!("could not clear {}: {err}", destination.display());
                warn!("{reason}");
                return StepStatus::Degraded(reason);
            }
        }
        match fsops::copy_tree(source, &destination) {
            Ok(stats) => {
                info!(
                    "relocated {} bundle files to {}",
                    stats.files_copied,
                    destination.display()
                );
                StepStatus::Completed
            }
            Err(err) => {
                let reason = format!("bundle relocation failed: {err}");
                warn!("{reason}");
                StepStatus::Degraded(reason)
            }
        }
    }

    fn write_snapshot(&self, config: &BuildConfig, build_dir: &Path) -> StepStatus {
        write_json(&build_dir.join(PARAMETERS_FILE), config)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> StepStatus {
    let result = serde_json::to_string_pretty(value)
        .map_err(std::io::Error::other)
        .and_then(|data| std::fs::write(path, data));
    match result {
        Ok(()) => StepStatus::Completed,
        Err(err) => {
            let reason = format!("could not persist {}: {err}", path.display());
            warn!("{reason}");
            StepStatus::Degraded(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildTarget;
    use crate::platform::{AndroidSettings, PlatformSettings};
    use crate::ports::SceneList;
    use crate::test_utils::{FakeBundler, FakePipeline, MemoryStore};

    fn config_for(root: &Path) -> BuildConfig {
        BuildConfig {
            target: BuildTarget::Android,
            product: "Sample Game".to_string(),
            version: "1.0.0".to_string(),
            suffix: String::new(),
            identifier: String::new(),
            output_root: root.to_path_buf(),
            development: false,
            debug_mode: true,
            generate_bundles: false,
            save_report: false,
            platform: Some(PlatformSettings::Android(AndroidSettings::default())),
        }
    }

    fn scenes() -> SceneList {
        SceneList(vec!["Scenes/Main.scene".to_string()])
    }

    #[test]
    fn test_qa_build_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(tmp.path());
        let mut store = MemoryStore::new("Sample Game", "0.9.0");
        let pipeline = FakePipeline::succeeding();
        let bundler = FakeBundler::new(tmp.path());
        let scenes = scenes();

        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        let outcome = orchestrator.run(&config).unwrap();

        assert!(outcome.succeeded);
        assert!(outcome.build_dir.ends_with("QA/SampleGame_v1.0.0"));
        assert!(outcome
            .artifact_path
            .to_string_lossy()
            .ends_with("SampleGame_v1.0.0.apk"));
        assert_eq!(outcome.bundles, StepStatus::Skipped);
        assert_eq!(outcome.relocation, StepStatus::Skipped);
        assert!(!outcome.build_dir.join(BUNDLE_DIR).exists());
        assert!(outcome.build_dir.join(PARAMETERS_FILE).exists());
        assert!(!outcome.build_dir.join(REPORT_FILE).exists());

        // Step 1 wrote the marketing version through the store.
        assert_eq!(store.version, "1.0.0");
        // The fake pipeline saw exactly one invocation with our scene list.
        let requests = pipeline.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].scenes, vec!["Scenes/Main.scene".to_string()]);
    }

    #[test]
    fn test_debug_symbol_read_modify_write() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_for(tmp.path());
        let mut store = MemoryStore::new("Sample Game", "1.0.0");
        store.defines.insert(
            BuildTarget::Android,
            vec!["CHEATS_ENABLED".to_string(), "DEBUG_MODE".to_string()],
        );
        let pipeline = FakePipeline::succeeding();
        let bundler = FakeBundler::new(tmp.path());
        let scenes = scenes();

        config.debug_mode = false;
        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        orchestrator.run(&config).unwrap();

        // Other symbols survive; only DEBUG_MODE is removed.
        assert_eq!(
            store.defines[&BuildTarget::Android],
            vec!["CHEATS_ENABLED".to_string()]
        );
    }

    #[test]
    fn test_failed_pipeline_skips_relocation_but_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle_src = tmp.path().join("ServerData");
        std::fs::create_dir_all(&bundle_src).unwrap();
        std::fs::write(bundle_src.join("catalog.json"), "{}").unwrap();

        let mut config = config_for(tmp.path());
        config.generate_bundles = true;
        let mut store = MemoryStore::new("Sample Game", "1.0.0");
        let pipeline = FakePipeline::failing();
        let bundler = FakeBundler::new(tmp.path());
        let scenes = scenes();

        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        let outcome = orchestrator.run(&config).unwrap();

        assert!(!outcome.succeeded);
        assert_eq!(outcome.bundles, StepStatus::Completed);
        // Relocation requires a successful player build.
        assert_eq!(outcome.relocation, StepStatus::Skipped);
        assert!(!outcome.build_dir.join(BUNDLE_DIR).exists());
        // Snapshot is written regardless of outcome.
        assert!(outcome.build_dir.join(PARAMETERS_FILE).exists());
    }

    #[test]
    fn test_pipeline_invocation_error_is_fatal_but_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(tmp.path());
        let mut store = MemoryStore::new("Sample Game", "1.0.0");
        let pipeline = FakePipeline::unavailable();
        let bundler = FakeBundler::new(tmp.path());
        let scenes = scenes();

        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        let err = orchestrator.run(&config).unwrap_err();
        assert!(matches!(err, BuildError::Pipeline(_)));
        assert!(config
            .build_dir_path()
            .join(PARAMETERS_FILE)
            .exists());
    }

    #[test]
    fn test_bundle_resolution_order() {
        let tmp = tempfile::tempdir().unwrap();
        let profile_dir = tmp.path().join("profile-output");
        std::fs::create_dir_all(&profile_dir).unwrap();

        let mut config = config_for(tmp.path());
        config.generate_bundles = true;
        let mut store = MemoryStore::new("Sample Game", "1.0.0");
        let pipeline = FakePipeline::succeeding();
        // Remote catalog points nowhere; the profile variable is next in line.
        let mut bundler = FakeBundler::new(tmp.path());
        bundler.remote_catalog = Some(tmp.path().join("missing"));
        bundler
            .profile
            .insert("BuildPath".to_string(), profile_dir.display().to_string());
        std::fs::write(profile_dir.join("catalog.json"), "{}").unwrap();
        let scenes = scenes();

        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        let outcome = orchestrator.run(&config).unwrap();

        assert_eq!(outcome.bundles, StepStatus::Completed);
        assert_eq!(outcome.relocation, StepStatus::Completed);
        assert!(outcome
            .build_dir
            .join(BUNDLE_DIR)
            .join("catalog.json")
            .exists());
    }

    #[test]
    fn test_bundle_failure_degrades_but_build_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_for(tmp.path());
        config.generate_bundles = true;
        let mut store = MemoryStore::new("Sample Game", "1.0.0");
        let pipeline = FakePipeline::succeeding();
        let mut bundler = FakeBundler::new(tmp.path());
        bundler.fail_build = true;
        let scenes = scenes();

        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        let outcome = orchestrator.run(&config).unwrap();

        assert!(outcome.bundles.is_degraded());
        // The player build still ran.
        assert!(outcome.succeeded);
        assert_eq!(pipeline.requests.borrow().len(), 1);
    }

    #[test]
    fn test_relocation_removes_stale_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle_src = tmp.path().join("ServerData");
        std::fs::create_dir_all(&bundle_src).unwrap();
        std::fs::write(bundle_src.join("fresh.bundle"), "new").unwrap();

        let mut config = config_for(tmp.path());
        config.generate_bundles = true;
        let mut store = MemoryStore::new("Sample Game", "1.0.0");
        let pipeline = FakePipeline::succeeding();
        let bundler = FakeBundler::new(tmp.path());
        let scenes = scenes();

        // Pre-populate a stale destination from an earlier run.
        let destination = config.build_dir_path().join(BUNDLE_DIR);
        std::fs::create_dir_all(&destination).unwrap();
        std::fs::write(destination.join("stale.bundle"), "old").unwrap();

        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        let outcome = orchestrator.run(&config).unwrap();

        assert_eq!(outcome.relocation, StepStatus::Completed);
        assert!(destination.join("fresh.bundle").exists());
        assert!(!destination.join("stale.bundle").exists());
    }

    #[test]
    fn test_report_saved_when_requested() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_for(tmp.path());
        config.save_report = true;
        let mut store = MemoryStore::new("Sample Game", "1.0.0");
        let pipeline = FakePipeline::succeeding();
        let bundler = FakeBundler::new(tmp.path());
        let scenes = scenes();

        let mut orchestrator = Orchestrator {
            store: &mut store,
            scenes: &scenes,
            pipeline: &pipeline,
            bundler: &bundler,
        };
        let outcome = orchestrator.run(&config).unwrap();

        assert_eq!(outcome.report_file, StepStatus::Completed);
        let data = std::fs::read_to_string(outcome.build_dir.join(REPORT_FILE)).unwrap();
        assert!(data.contains("\"succeeded\": true"));
    }
}
