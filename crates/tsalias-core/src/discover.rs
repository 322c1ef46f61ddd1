//! Enumeration of the emitted files to process.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::runtime::{Runtime, RuntimeResult};

/// Extensions of emitted files whose imports get rewritten (`.d.ts` included).
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Recursively list every emitted source file under `out_dir`, sorted.
///
/// Dot-directories are walked too. Symbolic links are not followed: a linked
/// file would be rewritten relative to the link's location, and a linked
/// directory can loop back into the tree. Only a failure to list `out_dir`
/// itself is an error; unreadable entries below it are skipped with a
/// warning.
pub async fn discover_files(runtime: &dyn Runtime, out_dir: &Path) -> RuntimeResult<Vec<PathBuf>> {
    let mut pending = vec![out_dir.to_path_buf()];
    let mut files = Vec::new();

    while let Some(dir) = pending.pop() {
        let names = match runtime.read_dir(&dir).await {
            Ok(names) => names,
            Err(e) if dir == out_dir => return Err(e),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        for name in names {
            let path = dir.join(&name);
            let metadata = match runtime.metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if metadata.is_symlink {
                debug!(path = %path.display(), "Skipping symbolic link");
            } else if metadata.is_dir {
                pending.push(path);
            } else if metadata.is_file && has_source_extension(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_utils::MemoryRuntime;

    #[tokio::test]
    async fn test_discovers_nested_sources_only() {
        let runtime = MemoryRuntime::new("/project")
            .with_file("/project/dist/index.js", "")
            .with_file("/project/dist/index.js.map", "")
            .with_file("/project/dist/types/index.d.ts", "")
            .with_file("/project/dist/ui/Button.jsx", "")
            .with_file("/project/dist/ui/Button.tsx", "")
            .with_file("/project/dist/.hidden/x.js", "")
            .with_file("/project/dist/data.json", "")
            .with_file("/project/src/index.ts", "");

        let files = discover_files(&runtime, Path::new("/project/dist")).await.unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("/project/dist/.hidden/x.js"),
                PathBuf::from("/project/dist/index.js"),
                PathBuf::from("/project/dist/types/index.d.ts"),
                PathBuf::from("/project/dist/ui/Button.jsx"),
                PathBuf::from("/project/dist/ui/Button.tsx"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_out_dir_is_an_error() {
        let runtime = MemoryRuntime::new("/project");
        assert!(discover_files(&runtime, Path::new("/project/dist")).await.is_err());
    }

    #[tokio::test]
    async fn test_symlinks_are_not_followed() {
        let runtime = MemoryRuntime::new("/p")
            .with_file("/p/dist/pages/home.js", "")
            .with_file("/p/dist/a/index.js", "");
        runtime.add_symlink("/p/dist/links/current", "/p/dist/pages");
        runtime.add_symlink("/p/dist/links/home.js", "/p/dist/pages/home.js");
        runtime.add_symlink("/p/dist/a/loop", "/p/dist/a");

        let files = discover_files(&runtime, Path::new("/p/dist")).await.unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("/p/dist/a/index.js"),
                PathBuf::from("/p/dist/pages/home.js"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreadable_subdirectory_is_skipped() {
        let runtime = MemoryRuntime::new("/p")
            .with_file("/p/dist/index.js", "")
            .with_file("/p/dist/locked/secret.js", "")
            .with_file("/p/dist/open/page.js", "");
        runtime.fail_read_dir_for("/p/dist/locked");

        let files = discover_files(&runtime, Path::new("/p/dist")).await.unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("/p/dist/index.js"),
                PathBuf::from("/p/dist/open/page.js"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreadable_out_dir_is_an_error() {
        let runtime = MemoryRuntime::new("/p").with_file("/p/dist/index.js", "");
        runtime.fail_read_dir_for("/p/dist");

        assert!(discover_files(&runtime, Path::new("/p/dist")).await.is_err());
    }
}
