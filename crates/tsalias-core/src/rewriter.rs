//! Rewriting of aliased specifiers inside one file's text.

use std::borrow::Cow;
use std::path::Path;

use crate::resolver::{ModuleResolver, Resolution};
use crate::scanner::scan_imports;

/// An aliased import that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedImport {
    pub specifier: String,
    pub alias: String,
}

/// Result of rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten<'a> {
    /// `Cow::Borrowed` when nothing changed, so no write is needed
    pub code: Cow<'a, str>,
    /// Number of specifiers replaced
    pub replaced: usize,
    pub unresolved: Vec<UnresolvedImport>,
}

impl Rewritten<'_> {
    pub fn is_changed(&self) -> bool {
        matches!(self.code, Cow::Owned(_))
    }
}

/// Rewrites every resolvable aliased specifier in a file.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'a> {
    resolver: ModuleResolver<'a>,
}

impl<'a> Rewriter<'a> {
    pub fn new(resolver: ModuleResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Rewrite `text`, the content of the emitted file at `file`.
    ///
    /// Only the specifier between the quotes is replaced; `require(`,
    /// `import`, `from` and the quotes stay as written.
    pub async fn rewrite<'t>(&self, text: &'t str, file: &Path) -> Rewritten<'t> {
        let occurrences: Vec<_> = scan_imports(text).collect();
        let mut replacements = Vec::new();
        let mut unresolved = Vec::new();

        for occurrence in occurrences {
            match self.resolver.resolve(occurrence.specifier, file).await {
                Resolution::Resolved(relative) if relative != occurrence.specifier => {
                    replacements.push((occurrence.specifier_span, relative));
                }
                Resolution::Unresolved { alias } => unresolved.push(UnresolvedImport {
                    specifier: occurrence.specifier.to_string(),
                    alias,
                }),
                _ => {}
            }
        }

        if replacements.is_empty() {
            return Rewritten {
                code: Cow::Borrowed(text),
                replaced: 0,
                unresolved,
            };
        }

        // Spans come from a left-to-right scan and never overlap.
        let mut code = String::with_capacity(text.len());
        let mut cursor = 0;
        for (span, relative) in &replacements {
            code.push_str(&text[cursor..span.start]);
            code.push_str(relative);
            cursor = span.end;
        }
        code.push_str(&text[cursor..]);

        Rewritten {
            code: Cow::Owned(code),
            replaced: replacements.len(),
            unresolved,
        }
    }
}
