//! Alias table built from tsconfig `paths`.
//!
//! Each alias key becomes an [`AliasEntry`] whose targets are the configured
//! target patterns anchored at `outDir` + `baseUrl`, in declaration order.
//! All keys are compiled into one anchored regex so that testing a specifier
//! is a single match. Alternatives are ordered longest prefix first, which
//! makes `@app/core/*` win over `@app/*` for `@app/core/db`.
//!
//! Relative (`./x`, `../x`) and absolute specifiers never match, not even
//! the catch-all alias `*`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use indexmap::IndexMap;
use regex::Regex;

use crate::paths::absolutize;

/// Wildcard marker used in tsconfig path patterns.
pub const WILDCARD: char = '*';

/// Errors raised while building the alias table.
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    /// Pattern uses the wildcard somewhere other than the end, or more than once
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Alias declared without any target
    #[error("Path alias '{0}' has no targets")]
    NoTargets(String),

    /// Combined matcher failed to compile
    #[error("Failed to compile alias matcher: {0}")]
    Regex(#[from] regex::Error),
}

/// How an alias key matches specifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    /// `@app/*`: any specifier starting with `@app/`
    Prefix,
    /// `config`: only the specifier `config` itself
    Exact,
}

/// One anchored target pattern of an alias.
///
/// The matched remainder takes the place of the target's wildcard, so
/// `packages/*/src` with remainder `ui` is `<anchor>/packages/ui/src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTarget {
    /// Anchored text before the wildcard (the whole target if it has none)
    pub base: PathBuf,
    /// Text after the wildcard
    pub suffix: String,
}

impl AliasTarget {
    fn anchored(target: &str, anchor: &Path) -> Result<Self, AliasError> {
        let (before, suffix) = match target.matches(WILDCARD).count() {
            0 => (target, ""),
            1 => target.split_once(WILDCARD).unwrap_or((target, "")),
            _ => {
                return Err(AliasError::InvalidPattern {
                    pattern: target.to_string(),
                    reason: "only one wildcard is allowed".to_string(),
                });
            }
        };

        Ok(Self {
            base: anchor.join(before),
            suffix: suffix.to_string(),
        })
    }

    /// Absolute candidate path for a matched remainder.
    pub fn candidate(&self, remainder: &str) -> PathBuf {
        let mut path = OsString::from(self.base.as_os_str());
        path.push(remainder);
        path.push(&self.suffix);
        PathBuf::from(path).clean()
    }
}

/// One alias and its candidate targets.
#[derive(Debug, Clone)]
pub struct AliasEntry {
    /// The key as written in tsconfig, e.g. `@app/*`
    pub pattern: String,
    /// The key with the wildcard stripped, e.g. `@app/`
    pub prefix: String,
    pub kind: AliasKind,
    /// Targets, probed in this order
    pub targets: Vec<AliasTarget>,
}

impl AliasEntry {
    /// The `*` alias, which claims every bare specifier.
    pub fn is_catch_all(&self) -> bool {
        self.kind == AliasKind::Prefix && self.prefix.is_empty()
    }
}

/// Result of matching a specifier against the table.
#[derive(Debug, Clone, Copy)]
pub struct AliasMatch<'t, 's> {
    pub entry: &'t AliasEntry,
    /// Specifier with the matched prefix removed
    pub remainder: &'s str,
}

/// Immutable alias table for one run.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    matcher: Option<Regex>,
}

impl AliasTable {
    /// Build the table from tsconfig `paths`.
    ///
    /// Targets are resolved against `out_dir` joined with `base_url`
    /// (`base_url` may itself be absolute).
    pub fn build(
        paths: &IndexMap<String, Vec<String>>,
        out_dir: &Path,
        base_url: &Path,
    ) -> Result<Self, AliasError> {
        let anchor = absolutize(base_url, out_dir);
        let mut entries = Vec::with_capacity(paths.len());

        for (pattern, targets) in paths {
            let (prefix, kind) = split_pattern(pattern)?;
            if targets.is_empty() {
                return Err(AliasError::NoTargets(pattern.clone()));
            }

            let targets = targets
                .iter()
                .map(|target| AliasTarget::anchored(target, &anchor))
                .collect::<Result<Vec<_>, _>>()?;

            entries.push(AliasEntry {
                pattern: pattern.clone(),
                prefix: prefix.to_string(),
                kind,
                targets,
            });
        }

        // Longest prefix first; an exact alias beats a prefix alias of the same length.
        entries.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| (a.kind == AliasKind::Prefix).cmp(&(b.kind == AliasKind::Prefix)))
        });

        let matcher = if entries.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = entries
                .iter()
                .map(|entry| match entry.kind {
                    AliasKind::Prefix => format!("({})", regex::escape(&entry.prefix)),
                    AliasKind::Exact => format!("({}$)", regex::escape(&entry.prefix)),
                })
                .collect();
            Some(Regex::new(&format!("^(?:{})", alternatives.join("|")))?)
        };

        Ok(Self { entries, matcher })
    }

    /// Match a specifier, returning the alias and the remainder after its prefix.
    pub fn matches<'t, 's>(&'t self, specifier: &'s str) -> Option<AliasMatch<'t, 's>> {
        if is_path_specifier(specifier) {
            return None;
        }

        let captures = self.matcher.as_ref()?.captures(specifier)?;
        let index = (1..captures.len()).find(|&i| captures.get(i).is_some())?;
        let matched = captures.get(0)?;

        Some(AliasMatch {
            entry: &self.entries[index - 1],
            remainder: &specifier[matched.end()..],
        })
    }

    /// Entries in match-precedence order.
    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Relative or absolute specifiers address files directly, never through an alias.
fn is_path_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

/// Split an alias key into its literal part and kind, validating wildcard use.
fn split_pattern(pattern: &str) -> Result<(&str, AliasKind), AliasError> {
    match pattern.matches(WILDCARD).count() {
        0 => Ok((pattern, AliasKind::Exact)),
        1 => pattern
            .strip_suffix(WILDCARD)
            .map(|prefix| (prefix, AliasKind::Prefix))
            .ok_or_else(|| AliasError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "the wildcard must be the last character".to_string(),
            }),
        _ => Err(AliasError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "only one wildcard is allowed".to_string(),
        }),
    }
}
