//! Run inputs and the per-run context shared by all workers.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::alias::AliasTable;
use crate::cache::ResolutionCache;
use crate::paths::absolutize;
use crate::resolver::ModuleResolver;
use crate::rewriter::Rewriter;
use crate::runtime::Runtime;
use crate::scheduler::DEFAULT_CONCURRENCY;
use crate::Result;

/// Inputs of a run, as produced by configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    /// Directory relative paths are anchored at (the tsconfig's directory)
    pub project_dir: PathBuf,
    /// Compiled output tree
    pub out_dir: PathBuf,
    /// Path-mapping base, joined onto `out_dir`; defaults to `.`
    pub base_url: Option<PathBuf>,
    /// Source tree root; informational only
    pub root_dir: Option<PathBuf>,
    /// Alias pattern to ordered target patterns
    pub paths: IndexMap<String, Vec<String>>,
    /// Maximum number of files in flight
    pub concurrency: usize,
    /// Compute rewrites without writing them back
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(project_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            out_dir: out_dir.into(),
            base_url: None,
            root_dir: None,
            paths: IndexMap::new(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }

    /// Add an alias with its targets.
    pub fn alias<I, S>(mut self, pattern: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths
            .insert(pattern.into(), targets.into_iter().map(Into::into).collect());
        self
    }
}

/// Immutable configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub out_dir: PathBuf,
    pub base_url: PathBuf,
    pub root_dir: Option<PathBuf>,
    pub aliases: AliasTable,
    pub concurrency: usize,
    pub dry_run: bool,
}

impl RunConfig {
    /// Anchor the paths and compile the alias table.
    pub fn from_options(options: RunOptions) -> Result<Self> {
        let out_dir = absolutize(&options.out_dir, &options.project_dir);
        let base_url = options.base_url.unwrap_or_else(|| PathBuf::from("."));
        let root_dir = options
            .root_dir
            .map(|root| absolutize(&root, &options.project_dir));
        let aliases = AliasTable::build(&options.paths, &out_dir, &base_url)?;

        Ok(Self {
            out_dir,
            base_url,
            root_dir,
            aliases,
            concurrency: options.concurrency.max(1),
            dry_run: options.dry_run,
        })
    }
}

/// Everything a worker needs: config, cache and filesystem.
///
/// Created at the start of a run and dropped at its end, so the cache never
/// outlives the run it was filled in.
#[derive(Debug)]
pub struct RewriteContext {
    pub config: RunConfig,
    pub cache: ResolutionCache,
    pub runtime: Arc<dyn Runtime>,
}

impl RewriteContext {
    pub fn new(config: RunConfig, runtime: Arc<dyn Runtime>) -> Self {
        Self {
            config,
            cache: ResolutionCache::new(),
            runtime,
        }
    }

    pub fn resolver(&self) -> ModuleResolver<'_> {
        ModuleResolver::new(&self.config.aliases, &self.cache, self.runtime.as_ref())
    }

    pub fn rewriter(&self) -> Rewriter<'_> {
        Rewriter::new(self.resolver())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_run_config_anchors_paths_at_project_dir() {
        let options = RunOptions {
            root_dir: Some(PathBuf::from("src")),
            ..RunOptions::new("/project", "dist").alias("@app/*", ["app/*"])
        };

        let config = RunConfig::from_options(options).unwrap();
        assert_eq!(config.out_dir, Path::new("/project/dist"));
        assert_eq!(config.root_dir.as_deref(), Some(Path::new("/project/src")));
        assert_eq!(config.base_url, Path::new("."));
        assert_eq!(
            config.aliases.entries()[0].targets[0].candidate("utils"),
            Path::new("/project/dist/app/utils")
        );
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let options = RunOptions {
            concurrency: 0,
            ..RunOptions::new("/project", "/abs/out")
        };

        let config = RunConfig::from_options(options).unwrap();
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.out_dir, Path::new("/abs/out"));
    }

    #[test]
    fn test_invalid_alias_fails_config() {
        let options = RunOptions::new("/project", "dist").alias("@a/**", ["a/*"]);
        assert!(RunConfig::from_options(options).is_err());
    }
}
