//! Module resolution for aliased specifiers.
//!
//! Given a specifier and the emitted file that contains it:
//! 1. Match the specifier against the alias table (no match: leave it alone)
//! 2. Substitute the remainder into each alias target, in declared order
//! 3. Probe the candidate as-is, then with each of [`PROBE_EXTENSIONS`]
//! 4. Express the first hit relative to the consuming file's directory

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::alias::AliasTable;
use crate::cache::ResolutionCache;
use crate::paths::{append_extension, relative_import};
use crate::runtime::Runtime;

/// Extensions probed after the bare candidate, in precedence order.
pub const PROBE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "d.ts", "json"];

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The specifier does not start with any alias
    NotAliased,
    /// Relative replacement for the specifier, always `./` or `../` prefixed
    Resolved(String),
    /// Matched an alias but no candidate root holds the module
    Unresolved {
        /// Alias pattern that matched, e.g. `@app/*`
        alias: String,
    },
}

/// Resolver over a run's alias table and cache.
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    aliases: &'a AliasTable,
    cache: &'a ResolutionCache,
    runtime: &'a dyn Runtime,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(aliases: &'a AliasTable, cache: &'a ResolutionCache, runtime: &'a dyn Runtime) -> Self {
        Self {
            aliases,
            cache,
            runtime,
        }
    }

    /// Resolve `specifier` as imported from `consumer` (an absolute file path).
    pub async fn resolve(&self, specifier: &str, consumer: &Path) -> Resolution {
        let Some(matched) = self.aliases.matches(specifier) else {
            return Resolution::NotAliased;
        };

        let from_dir = consumer.parent().unwrap_or(Path::new("/"));

        for target in &matched.entry.targets {
            let candidate = target.candidate(matched.remainder);
            if self.locate(&candidate).await.is_none() {
                continue;
            }

            if let Some(relative) = self.relative_specifier(&candidate, from_dir) {
                debug!(
                    specifier,
                    resolved = %relative,
                    file = %consumer.display(),
                    "Resolved aliased import"
                );
                return Resolution::Resolved(relative);
            }
        }

        // A bare package import under `*` is left to the host resolver.
        if matched.entry.is_catch_all() {
            debug!(specifier, "No local module behind catch-all alias");
            return Resolution::NotAliased;
        }

        warn!(
            specifier,
            file = %consumer.display(),
            "Source file not found for module {}",
            specifier
        );
        Resolution::Unresolved {
            alias: matched.entry.pattern.clone(),
        }
    }

    /// Find the file backing `candidate`, consulting the probe cache first.
    async fn locate(&self, candidate: &Path) -> Option<PathBuf> {
        if let Some(cached) = self.cache.probe(candidate) {
            return cached;
        }

        let found = try_extensions(candidate, self.runtime).await;
        self.cache.store_probe(candidate.to_path_buf(), found.clone());
        found
    }

    fn relative_specifier(&self, target: &Path, from_dir: &Path) -> Option<String> {
        if let Some(cached) = self.cache.relative(target, from_dir) {
            return Some(cached);
        }

        let relative = relative_import(from_dir, target)?;
        self.cache
            .store_relative(target.to_path_buf(), from_dir.to_path_buf(), relative.clone());
        Some(relative)
    }
}

/// Try a candidate as-is, then with each probe extension appended.
///
/// Only regular files count; a directory named like the candidate is skipped.
async fn try_extensions(candidate: &Path, runtime: &dyn Runtime) -> Option<PathBuf> {
    if is_file(candidate, runtime).await {
        return Some(candidate.to_path_buf());
    }

    for ext in PROBE_EXTENSIONS {
        let with_ext = append_extension(candidate, ext);
        if is_file(&with_ext, runtime).await {
            return Some(with_ext);
        }
    }

    None
}

async fn is_file(path: &Path, runtime: &dyn Runtime) -> bool {
    matches!(runtime.metadata(path).await, Ok(metadata) if metadata.is_file)
}
