//! Native Runtime Implementation
//!
//! Provides the `Runtime` trait over the operating system filesystem.
//!
//! ```text
//! ┌─────────────────┐
//! │ NativeRuntime   │
//! │  .read_file()   │────▶ std::fs::read()
//! │  .write_file()  │────▶ std::fs::write()
//! │  .metadata()    │────▶ std::fs::symlink_metadata(), then the target
//! │  .exists()      │────▶ std::path::Path::exists()
//! │  .read_dir()    │────▶ std::fs::read_dir()
//! └─────────────────┘
//! ```

// NativeRuntime is the one place allowed to touch std::fs
#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Native filesystem Runtime implementation using `std::fs`.
///
/// Blocking calls run on tokio's blocking pool via `spawn_blocking` so the
/// worker tasks of the batch scheduler never stall the executor.
#[derive(Debug, Clone, Copy)]
pub struct NativeRuntime;

impl NativeRuntime {
    /// Create a new NativeRuntime instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn join_error(e: task::JoinError) -> RuntimeError {
    RuntimeError::Other(format!("Task join error: {}", e))
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            std::fs::read(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(path.clone())
                } else {
                    RuntimeError::Io(format!("Failed to read {}: {}", path.display(), e))
                }
            })
        })
        .await
        .map_err(join_error)?
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        let path = path.to_path_buf();
        let content = content.to_vec();

        task::spawn_blocking(move || {
            std::fs::write(&path, content)
                .map_err(|e| RuntimeError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
        .await
        .map_err(join_error)?
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            let link = std::fs::symlink_metadata(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(path.clone())
                } else {
                    RuntimeError::Io(format!(
                        "Failed to get metadata for {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

            if !link.file_type().is_symlink() {
                return Ok(FileMetadata {
                    is_dir: link.is_dir(),
                    is_file: link.is_file(),
                    is_symlink: false,
                });
            }

            // Describe the target; a dangling link is neither file nor directory
            let target = std::fs::metadata(&path).ok();
            Ok(FileMetadata {
                is_dir: target.as_ref().is_some_and(|m| m.is_dir()),
                is_file: target.as_ref().is_some_and(|m| m.is_file()),
                is_symlink: true,
            })
        })
        .await
        .map_err(join_error)?
    }

    /// Quick metadata check; cheap enough to run inline.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            let entries = std::fs::read_dir(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(path.clone())
                } else {
                    RuntimeError::Io(format!(
                        "Failed to read directory {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

            let mut result = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    RuntimeError::Io(format!("Failed to read directory entry: {}", e))
                })?;

                if let Some(name) = entry.file_name().to_str() {
                    result.push(name.to_string());
                }
            }

            Ok(result)
        })
        .await
        .map_err(join_error)?
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir().map_err(|e| {
            RuntimeError::Io(format!("Failed to get current working directory: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_write_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("index.js");

        let runtime = NativeRuntime::new();

        let content = b"import { a } from './a';";
        runtime.write_file(&file_path, content).await.unwrap();

        let read_content = runtime.read_file(&file_path).await.unwrap();
        assert_eq!(read_content, content);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let runtime = NativeRuntime::new();

        let err = runtime
            .read_file(&temp_dir.path().join("missing.js"))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("utils.js");
        fs::write(&file_path, b"test content").unwrap();

        let runtime = NativeRuntime::new();
        let metadata = runtime.metadata(&file_path).await.unwrap();
        assert!(metadata.is_file);
        assert!(!metadata.is_dir);
        assert!(!metadata.is_symlink);

        let dir_meta = runtime.metadata(temp_dir.path()).await.unwrap();
        assert!(dir_meta.is_dir);
    }

    #[tokio::test]
    async fn test_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("utils.d.ts");

        let runtime = NativeRuntime::new();
        assert!(!runtime.exists(&file_path));

        fs::write(&file_path, b"export {};").unwrap();
        assert!(runtime.exists(&file_path));
    }

    #[tokio::test]
    async fn test_read_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.js"), b"").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();

        let runtime = NativeRuntime::new();
        let mut entries = runtime.read_dir(temp_dir.path()).await.unwrap();
        entries.sort();

        assert_eq!(entries, vec!["a.js", "nested"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_metadata_reports_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("pages")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("pages"), temp_dir.path().join("current"))
            .unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone"), temp_dir.path().join("dangling"))
            .unwrap();

        let runtime = NativeRuntime::new();
        let linked = runtime.metadata(&temp_dir.path().join("current")).await.unwrap();
        assert_eq!(
            linked,
            FileMetadata {
                is_dir: true,
                is_file: false,
                is_symlink: true
            }
        );

        let dangling = runtime.metadata(&temp_dir.path().join("dangling")).await.unwrap();
        assert!(dangling.is_symlink);
        assert!(!dangling.is_file && !dangling.is_dir);

        let plain = runtime.metadata(&temp_dir.path().join("pages")).await.unwrap();
        assert!(plain.is_dir && !plain.is_symlink);
    }
}
