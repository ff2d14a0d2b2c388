//! File I/O for the native CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use pyout_core::Document;

/// Load a Python file and create a Document
pub fn load_file(path: &str) -> Result<Document> {
    let path = Path::new(path);
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))?;

    let filepath = canonical.to_string_lossy().to_string();
    let filename = canonical
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = canonical
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string());

    Ok(Document::with_file_info(title, content, filepath, filename))
}

/// Get the ~/.pyout directory path, creating it if needed
pub fn pyout_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let pyout_dir = home.join(".pyout");

    if !pyout_dir.exists() {
        fs::create_dir_all(&pyout_dir)
            .with_context(|| format!("Failed to create {}", pyout_dir.display()))?;
    }

    Ok(pyout_dir)
}

/// Write a document's content back to the file it was loaded from
pub fn save_document(doc: &Document) -> Result<PathBuf> {
    let filepath = doc
        .filepath
        .as_deref()
        .context("Document has no file path")?;

    fs::write(filepath, &doc.content)
        .with_context(|| format!("Failed to write {}", filepath))?;

    Ok(PathBuf::from(filepath))
}
