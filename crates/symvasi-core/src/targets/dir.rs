//! Resolution of the targets root directory and per-target layout

use std::io;
use std::path::{Path, PathBuf};

use tokio::{fs, task};

/// Environment variable overriding the targets root
pub const TARGETS_DIR_ENV: &str = "SYMVASI_TARGETS_DIR";

/// Directory holding one sub-directory per target
#[derive(Debug, Clone)]
pub struct TargetsDir {
    root_dir: PathBuf,
}

impl TargetsDir {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Discover the targets root, preferring an explicit directory
    pub fn discover(custom_dir: Option<&Path>) -> io::Result<Self> {
        let root_dir = if let Some(dir) = custom_dir {
            if !dir.exists() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Targets directory not found: {}", dir.display()),
                ));
            }
            dir.to_path_buf()
        } else {
            Self::find_targets_base_dir().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "Could not find targets directory in any standard location",
                )
            })?
        };

        Ok(Self::new(root_dir))
    }

    /// Find the targets root by checking standard locations
    fn find_targets_base_dir() -> Option<PathBuf> {
        // 1. Environment variable
        if let Ok(dir) = std::env::var(TARGETS_DIR_ENV) {
            let path = PathBuf::from(dir);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. ./targets
        let local = PathBuf::from("targets");
        if local.exists() {
            return Some(local);
        }

        // 3. ~/.symvasi/targets
        if let Some(home_dir) = dirs::home_dir() {
            let targets_dir = home_dir.join(".symvasi").join("targets");
            if targets_dir.exists() {
                return Some(targets_dir);
            }
        }

        None
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Layout of the named target
    pub fn target(&self, name: &str) -> TargetDir {
        TargetDir {
            name: name.to_string(),
            path: self.root_dir.join(name),
        }
    }
}

/// Directory of a single target: `params.*`, `partials/`, `outputs/`
#[derive(Debug, Clone)]
pub struct TargetDir {
    name: String,
    path: PathBuf,
}

impl TargetDir {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn partials_dir(&self) -> PathBuf {
        self.path.join("partials")
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.path.join("outputs")
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }
}

/// List the files under `dir`, descending into sub-directories when
/// `recursive` is set. Hidden entries (names starting with `.`) are skipped.
/// A missing directory yields no files.
///
/// Runs on the blocking pool to keep filesystem walks off the async runtime.
pub async fn list_files(dir: &Path, recursive: bool) -> crate::Result<Vec<PathBuf>> {
    let dir_buf = dir.to_path_buf();

    task::spawn_blocking(move || {
        let mut files = Vec::new();

        fn walk_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> io::Result<()> {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                let path = entry.path();
                if path.is_dir() {
                    if recursive {
                        walk_dir(&path, recursive, files)?;
                    }
                } else {
                    files.push(path);
                }
            }
            Ok(())
        }

        if dir_buf.is_dir() {
            walk_dir(&dir_buf, recursive, &mut files)?;
        }
        files.sort();
        Ok(files)
    })
    .await
    .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to join blocking task: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_targets_dir_discovery() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("typescript")).unwrap();

        let targets = TargetsDir::discover(Some(temp_dir.path())).unwrap();
        let target = targets.target("typescript");
        assert!(target.exists().await);
        assert_eq!(target.name(), "typescript");
        assert_eq!(target.outputs_dir(), temp_dir.path().join("typescript/outputs"));
        assert!(!targets.target("csharp").exists().await);
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        assert!(!targets.target("notes.txt").exists().await);

        let result = TargetsDir::discover(Some(Path::new("/nonexistent/targets")));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_files() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested/deeper"))?;
        fs::write(root.join("a.tpl"), "a")?;
        fs::write(root.join("nested/b.tpl"), "b")?;
        fs::write(root.join("nested/deeper/c.tpl"), "c")?;
        fs::write(root.join(".DS_Store"), [0xff, 0xfe, 0x00])?;
        fs::create_dir_all(root.join(".git"))?;
        fs::write(root.join(".git/HEAD"), "ref")?;

        let flat = list_files(root, false).await?;
        assert_eq!(flat, vec![root.join("a.tpl")]);

        let all = list_files(root, true).await?;
        assert_eq!(all.len(), 3);

        assert!(list_files(&root.join("missing"), true).await?.is_empty());
        Ok(())
    }
}
