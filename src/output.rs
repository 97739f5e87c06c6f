//! Assembly and writing of the generated TypeScript.
//!
//! Each translated file contributes one block. Blocks are separated by a blank line and
//! may be prefixed with a `// <file name>` comment naming the controller they came from.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Generated source of one controller file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBlock<'a> {
    pub file: &'a Path,
    pub source: &'a str,
}

/// Join the blocks of a batch into the final text.
///
/// Empty blocks are left out entirely, header included.
pub fn assemble(blocks: &[OutputBlock<'_>], file_header: bool) -> String {
    let mut parts = Vec::with_capacity(blocks.len());
    for block in blocks {
        let source = block.source.trim_end();
        if source.is_empty() {
            continue;
        }
        if file_header {
            let name = block
                .file
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_else(|| block.file.to_string_lossy());
            parts.push(format!("// {}\n{}", name, source));
        } else {
            parts.push(source.to_string());
        }
    }

    if parts.is_empty() {
        return String::new();
    }
    let mut text = parts.join("\n\n");
    text.push('\n');
    text
}

/// Writes string content to a file, creating missing parent directories.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
