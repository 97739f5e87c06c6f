use anyhow::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions of controller sources the parser understands
pub const SOURCE_EXTENSIONS: &[&str] = &["groovy", "java"];

/// Directory names holding build output rather than sources
const SKIPPED_DIRECTORIES: &[&str] = &["target", "build", "out"];

/// Expands command-line inputs into the controller files to translate.
///
/// Files are taken as given, whatever their extension. Directories are walked
/// recursively and contribute every `.groovy` and `.java` file, skipping hidden
/// directories and build output.
///
/// # Example
///
/// ```no_run
/// use client_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(vec![PathBuf::from("./src/main/groovy")]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} controller sources", result.files.len());
/// ```
pub struct FileScanner {
    inputs: Vec<PathBuf>,
}

/// Files found by a [`FileScanner`].
pub struct ScanResult {
    /// Files to translate, in input order; directory contents sorted by name
    pub files: Vec<PathBuf>,
    /// Entries that could not be read
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self { inputs }
    }

    /// Collect the files named by the inputs.
    ///
    /// A file reached twice (listed explicitly and inside a listed directory) is only
    /// kept at its first position.
    ///
    /// # Errors
    ///
    /// Returns an error if an input does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut files = Vec::new();
        let mut warnings = Vec::new();

        for input in &self.inputs {
            if !input.exists() {
                anyhow::bail!("Input path does not exist: {}", input.display());
            }

            if input.is_dir() {
                debug!("Walking directory: {}", input.display());
                self.walk(input, &mut files, &mut warnings);
            } else {
                files.push(input.clone());
            }
        }

        let mut seen = std::collections::HashSet::new();
        files.retain(|file| seen.insert(file.clone()));

        Ok(ScanResult { files, warnings })
    }

    fn walk(&self, root: &Path, files: &mut Vec<PathBuf>, warnings: &mut Vec<String>) {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                !name.starts_with('.') && !SKIPPED_DIRECTORIES.contains(&&*name)
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_controller_source(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }
    }
}

fn is_controller_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
