//! Import occurrence scanning.
//!
//! Finds `require('x')`, `import('x')`, `import 'x'` and `from 'x'` shapes
//! in emitted code and yields the byte span of each quoted specifier. The
//! scan is textual; resolution never sees the regex, so the matching
//! strategy can change without touching the resolver.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:require\(|import\(?|from) ?['"]([^'"]*)['"]\)?"#)
        .expect("import pattern is a valid regex")
});

/// One import-like statement found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOccurrence<'a> {
    /// Byte range of the whole matched statement fragment
    pub span: Range<usize>,
    /// Byte range of the specifier between the quotes
    pub specifier_span: Range<usize>,
    pub specifier: &'a str,
}

/// Lazy, non-overlapping iterator over import occurrences, in text order.
pub struct ImportScanner<'a> {
    matches: CaptureMatches<'static, 'a>,
}

impl<'a> Iterator for ImportScanner<'a> {
    type Item = ImportOccurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.matches.next()?;
        let whole = captures.get(0)?;
        let specifier = captures.get(1)?;

        Some(ImportOccurrence {
            span: whole.range(),
            specifier_span: specifier.range(),
            specifier: specifier.as_str(),
        })
    }
}

/// Scan `text` for import occurrences.
pub fn scan_imports(text: &str) -> ImportScanner<'_> {
    ImportScanner {
        matches: IMPORT_PATTERN.captures_iter(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifiers(text: &str) -> Vec<&str> {
        scan_imports(text).map(|occurrence| occurrence.specifier).collect()
    }

    #[test]
    fn test_scans_all_import_shapes() {
        let code = r#"
const a = require('@app/a');
const b = require("@app/b");
import c from '@app/c';
import { d } from "@app/d";
import '@app/e';
const f = await import('@app/f');
export * from '@app/g';
"#;
        assert_eq!(
            specifiers(code),
            vec!["@app/a", "@app/b", "@app/c", "@app/d", "@app/e", "@app/f", "@app/g"]
        );
    }

    #[test]
    fn test_specifier_span_points_inside_quotes() {
        let code = "import x from './x';";
        let occurrence = scan_imports(code).next().unwrap();

        assert_eq!(&code[occurrence.specifier_span.clone()], "./x");
        assert_eq!(&code[occurrence.span.clone()], "from './x'");
    }

    #[test]
    fn test_repeated_statements_yield_separate_occurrences() {
        let code = "require('@a/x');\nrequire('@a/x');";
        let spans: Vec<_> = scan_imports(code).map(|o| o.specifier_span).collect();

        assert_eq!(spans.len(), 2);
        assert_ne!(spans[0], spans[1]);
    }

    #[test]
    fn test_plain_code_yields_nothing() {
        assert!(specifiers("const from = 1; importantThing('x');").is_empty());
    }
}
