//! In-memory fakes for the orchestration ports, shared across unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{BuildTarget, PlayerBuildRequest};
use crate::ports::{
    AndroidPlayerOptions, ContentBundler, PipelineReport, PlayerPipeline, ProjectStore,
};

/// Project settings store backed by plain fields.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub product: String,
    pub version: String,
    pub defines: HashMap<BuildTarget, Vec<String>>,
    pub active_target: Option<BuildTarget>,
    pub android: Option<AndroidPlayerOptions>,
}

impl MemoryStore {
    pub fn new(product: &str, version: &str) -> Self {
        Self {
            product: product.to_string(),
            version: version.to_string(),
            ..Self::default()
        }
    }
}

impl ProjectStore for MemoryStore {
    fn product_name(&self) -> String {
        self.product.clone()
    }

    fn marketing_version(&self) -> String {
        self.version.clone()
    }

    fn set_marketing_version(&mut self, version: &str) -> Result<()> {
        self.version = version.to_string();
        Ok(())
    }

    fn define_symbols(&self, target: BuildTarget) -> Result<Vec<String>> {
        Ok(self.defines.get(&target).cloned().unwrap_or_default())
    }

    fn set_define_symbols(&mut self, target: BuildTarget, symbols: &[String]) -> Result<()> {
        self.defines.insert(target, symbols.to_vec());
        Ok(())
    }

    fn switch_active_target(&mut self, target: BuildTarget) -> Result<()> {
        self.active_target = Some(target);
        Ok(())
    }

    fn set_android_options(&mut self, options: AndroidPlayerOptions) -> Result<()> {
        self.android = Some(options);
        Ok(())
    }
}

/// Pipeline fake that records every request it receives.
pub struct FakePipeline {
    pub succeed: bool,
    pub fail_invocation: bool,
    pub requests: RefCell<Vec<PlayerBuildRequest>>,
}

impl FakePipeline {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            fail_invocation: false,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            ..Self::succeeding()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_invocation: true,
            ..Self::succeeding()
        }
    }
}

impl PlayerPipeline for FakePipeline {
    fn build(&self, request: &PlayerBuildRequest) -> Result<PipelineReport> {
        if self.fail_invocation {
            anyhow::bail!("pipeline unavailable");
        }
        self.requests.borrow_mut().push(request.clone());
        Ok(PipelineReport {
            succeeded: self.succeed,
            exit_code: Some(if self.succeed { 0 } else { 1 }),
            output_path: request.output_path.clone(),
            duration_secs: 0.0,
            finished_at: "1970-01-01T00:00:00Z".to_string(),
        })
    }
}

/// Bundler fake with configurable path sources.
pub struct FakeBundler {
    pub root: PathBuf,
    pub remote_catalog: Option<PathBuf>,
    pub profile: HashMap<String, String>,
    pub fail_build: bool,
    pub builds: RefCell<usize>,
}

impl FakeBundler {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            remote_catalog: None,
            profile: HashMap::new(),
            fail_build: false,
            builds: RefCell::new(0),
        }
    }
}

impl ContentBundler for FakeBundler {
    fn clean_and_build(&self) -> Result<()> {
        if self.fail_build {
            anyhow::bail!("bundle pipeline exploded");
        }
        *self.builds.borrow_mut() += 1;
        Ok(())
    }

    fn remote_catalog_path(&self) -> Option<PathBuf> {
        self.remote_catalog.clone()
    }

    fn profile_variable(&self, name: &str) -> Option<String> {
        self.profile.get(name).cloned()
    }

    fn project_root(&self) -> &Path {
        &self.root
    }
}
