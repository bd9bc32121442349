use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that hold build output or tooling state rather than sources.
const SKIPPED_DIRECTORIES: &[&str] = &["target", "build", "out", "node_modules"];

/// File scanner for collecting the Java sources of a repository.
///
/// The `FileScanner` recursively walks a repository and returns every `.java` file in a stable,
/// sorted order. Build output directories (`target`, `build`, `out`, `node_modules`) and hidden
/// directories are pruned from the walk.
///
/// # Example
///
/// ```no_run
/// use entrypoint_discovery::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./payments-service"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Java files", result.java_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Discovered `.java` files, sorted by path
    pub java_files: Vec<PathBuf>,
    /// Warning messages for entries that could not be read
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` rooted at `root_path`.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the tree and collects all `.java` files.
    ///
    /// Unreadable entries are logged and recorded as warnings; the walk continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or is not a directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!(
                "Repository root is not a directory: {}",
                self.root_path.display()
            );
        }

        let mut java_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_directory(e));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_java_source(entry.path()) {
                        java_files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        java_files.sort();
        debug!(
            "Scanned {}: {} Java files, {} warnings",
            self.root_path.display(),
            java_files.len(),
            warnings.len()
        );

        Ok(ScanResult {
            java_files,
            warnings,
        })
    }
}

fn is_skipped_directory(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&name.as_ref())
}

fn is_java_source(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("java")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .java_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_collects_java_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("App.java"), "class App {}").unwrap();
        fs::write(root.join("pom.xml"), "<project/>").unwrap();
        fs::write(root.join("README.md"), "# Service").unwrap();
        fs::write(root.join("Notes.java.bak"), "class Old {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["App.java"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.java_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_maven_layout_is_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let pkg = root.join("src/main/java/com/shop");
        fs::create_dir_all(pkg.join("web")).unwrap();
        fs::create_dir_all(pkg.join("model")).unwrap();

        fs::write(pkg.join("web/OrderController.java"), "class OrderController {}").unwrap();
        fs::write(pkg.join("model/Order.java"), "class Order {}").unwrap();
        fs::write(pkg.join("Application.java"), "class Application {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(
            file_names(&result),
            vec!["Application.java", "Order.java", "OrderController.java"]
        );
    }

    #[test]
    fn test_scan_skips_build_output_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        for dir in ["target", "build", "out", "node_modules"] {
            fs::create_dir(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("Generated.java"), "class Generated {}").unwrap();
        }
        fs::write(root.join("Main.java"), "class Main {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["Main.java"]);
    }

    #[test]
    fn test_scan_skips_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join(".idea")).unwrap();
        fs::write(root.join(".idea/Scratch.java"), "class Scratch {}").unwrap();
        fs::write(root.join("Main.java"), "class Main {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["Main.java"]);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        assert!(FileScanner::new(missing).scan().is_err());
    }
}
