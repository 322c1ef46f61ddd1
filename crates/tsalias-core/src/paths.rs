//! Path utilities: separator normalization and relative import arithmetic.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Replace platform separators with `/`.
///
/// Import specifiers are URLs in spirit, so rewritten imports always use
/// POSIX separators regardless of the host platform.
pub fn to_posix(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Anchor `path` at `base` unless it is already absolute, then normalize
/// `.` and `..` components.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        base.join(path).clean()
    }
}

/// Append `.ext` to the full file name.
///
/// Unlike [`Path::with_extension`], this never replaces an existing dotted
/// suffix: `user.service` + `js` is `user.service.js`.
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Ensure a relative specifier cannot be mistaken for a package name.
pub fn ensure_dot_prefix(specifier: String) -> String {
    if specifier.starts_with("./") || specifier.starts_with("../") {
        specifier
    } else {
        format!("./{specifier}")
    }
}

/// Compute the import specifier that reaches `target` from a module living
/// in `from_dir`.
///
/// Both paths must be absolute. Returns `None` when no relative path exists
/// (e.g. different drive prefixes on Windows).
pub fn relative_import(from_dir: &Path, target: &Path) -> Option<String> {
    let relative = pathdiff::diff_paths(target, from_dir)?;
    let relative = to_posix(&relative.to_string_lossy());
    Some(ensure_dot_prefix(relative))
}
