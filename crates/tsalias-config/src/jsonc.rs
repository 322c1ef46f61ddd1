//! JSON-with-comments support.
//!
//! tsconfig files routinely carry `//` and `/* */` comments and trailing
//! commas, none of which `serde_json` accepts. String literals are copied
//! verbatim so `"@app/*"` and URLs like `"http://x"` survive.

/// Remove comments and trailing commas outside of string literals.
pub fn strip_jsonc(input: &str) -> String {
    let without_comments = strip_comments(input);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => copy_string(&mut chars, &mut out),
            '/' if chars.peek() == Some(&'/') => {
                // Line comment: keep the newline so line numbers in errors stay right
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => copy_string(&mut chars, &mut out),
            ',' => {
                let rest: String = chars.clone().take_while(|c| c.is_whitespace()).collect();
                let next = chars.clone().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    out.push_str(&rest);
                    for _ in 0..rest.chars().count() {
                        chars.next();
                    }
                } else {
                    out.push(',');
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Copy a string literal whose opening quote was just consumed.
fn copy_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    out.push('"');
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => break,
            _ => {}
        }
    }
}
