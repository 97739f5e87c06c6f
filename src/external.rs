//! The external controller parser.
//!
//! Controller sources are analysed by a Groovy script (`Parser.groovy`) that prints a
//! JSON array of class descriptors. This module locates the interpreter, checks its
//! version and runs the script once per file.

use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Interpreter name looked up on `PATH` when none is configured
pub const DEFAULT_INTERPRETER: &str = "groovy";

/// Oldest interpreter major version known to run the parser script
pub const MINIMUM_MAJOR_VERSION: u32 = 4;

/// Anything that can turn a controller file into descriptor JSON.
///
/// [`ParserTool`] is the production implementation; tests provide canned output.
pub trait DescriptorSource: Send + Sync {
    /// Produce the raw JSON describing the classes in `file`.
    fn descriptors_json(&self, file: &Path) -> Result<String>;
}

/// Interpreter plus parser script, run as `<interpreter> <script> <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserTool {
    interpreter: PathBuf,
    script: PathBuf,
}

impl ParserTool {
    pub fn new(interpreter: PathBuf, script: PathBuf) -> Self {
        Self {
            interpreter,
            script,
        }
    }

    /// Locate the interpreter and build a tool around it.
    ///
    /// A configured path is used when it exists; otherwise a warning is logged and the
    /// interpreter is searched on `PATH` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BinaryNotFound`] when neither location yields a file.
    pub fn locate(configured: Option<&Path>, name: &str, script: PathBuf) -> Result<Self> {
        if let Some(path) = configured {
            if path.is_file() {
                info!("{} configured at: {}", name, path.display());
                return Ok(Self::new(path.to_path_buf(), script));
            }
            warn!("{} not found at configured path: {}", name, path.display());
        }

        match find_in_path(name) {
            Some(found) => {
                info!("{} found in PATH: {}", name, found.display());
                Ok(Self::new(found, script))
            }
            None => Err(Error::BinaryNotFound {
                name: name.to_string(),
                configured: configured.map(Path::to_path_buf),
            }),
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Run `<interpreter> --version` and extract the first `x.y.z` version number.
    ///
    /// Logs a warning when the major version is older than [`MINIMUM_MAJOR_VERSION`].
    /// Returns `Ok(None)` when the output carries no recognizable version.
    pub fn probe_version(&self) -> Result<Option<String>> {
        let output = Command::new(&self.interpreter).arg("--version").output()?;
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        debug!("Version output: {}", text.trim());

        let version = extract_version(&text);
        match &version {
            Some(version) if !meets_minimum(version, MINIMUM_MAJOR_VERSION) => warn!(
                "{} may be too old. At least version {}.0.0 required, detected {}",
                self.interpreter.display(),
                MINIMUM_MAJOR_VERSION,
                version
            ),
            Some(version) => info!("Parser interpreter version: {}", version),
            None => warn!("Could not determine the version of {}", self.interpreter.display()),
        }
        Ok(version)
    }
}

impl DescriptorSource for ParserTool {
    fn descriptors_json(&self, file: &Path) -> Result<String> {
        debug!(
            "Running {} {} {}",
            self.interpreter.display(),
            self.script.display(),
            file.display()
        );

        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(file)
            .output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(Error::ToolFailed {
                status: output.status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            return Err(Error::ToolStderr { stderr });
        }

        String::from_utf8(output.stdout).map_err(|e| Error::MalformedInput {
            message: format!("parser output is not UTF-8: {}", e),
        })
    }
}

/// Search the directories of `PATH` for an executable called `name`
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        candidate_names(name)
            .into_iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.is_file())
    })
}

#[cfg(windows)]
fn candidate_names(name: &str) -> Vec<String> {
    ["", ".exe", ".bat", ".cmd"]
        .iter()
        .map(|ext| format!("{}{}", name, ext))
        .collect()
}

#[cfg(not(windows))]
fn candidate_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

/// First `major.minor.patch` token in a version banner
pub fn extract_version(text: &str) -> Option<String> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter_map(|token| {
            let token = token.trim_matches('.');
            let parts: Vec<&str> = token.split('.').collect();
            let well_formed = parts.len() == 3
                && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
            well_formed.then(|| token.to_string())
        })
        .next()
}

/// Whether `version`'s major component is at least `minimum`
pub fn meets_minimum(version: &str, minimum: u32) -> bool {
    version
        .split('.')
        .next()
        .and_then(|major| major.parse::<u32>().ok())
        .is_some_and(|major| major >= minimum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version() {
        assert_eq!(
            extract_version("Groovy Version: 4.0.15 JVM: 17.0.8 Vendor: Eclipse Adoptium OS: Linux"),
            Some("4.0.15".to_string())
        );
        assert_eq!(extract_version("Groovy Version: 2.5.23"), Some("2.5.23".to_string()));
        assert_eq!(extract_version("JVM 17 only"), None);
        assert_eq!(extract_version("1.2.3.4 then 5.6.7"), Some("5.6.7".to_string()));
    }

    #[test]
    fn test_meets_minimum() {
        assert!(meets_minimum("4.0.15", 4));
        assert!(meets_minimum("10.0.0", 4));
        assert!(!meets_minimum("3.0.9", 4));
        assert!(!meets_minimum("x.y.z", 4));
    }

    #[test]
    fn test_locate_missing_binary() {
        let err = ParserTool::locate(
            Some(Path::new("/nonexistent/groovy")),
            "surely-not-an-installed-binary-name",
            PathBuf::from("Parser.groovy"),
        )
        .unwrap_err();

        match err {
            Error::BinaryNotFound { name, configured } => {
                assert_eq!(name, "surely-not-an-installed-binary-name");
                assert_eq!(configured, Some(PathBuf::from("/nonexistent/groovy")));
            }
            other => panic!("Expected BinaryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_locate_configured_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let interpreter = temp_dir.path().join("groovy");
        std::fs::write(&interpreter, "").unwrap();

        let tool = ParserTool::locate(Some(&interpreter), "groovy", PathBuf::from("P.groovy")).unwrap();
        assert_eq!(tool.interpreter(), interpreter.as_path());
        assert_eq!(tool.script(), Path::new("P.groovy"));
    }
}
