//! On-disk layout for ground-truth records.
//!
//! One record per file, `<root>/<relative dir>/<document_id>.json`, where the
//! relative dir mirrors the source PDF's directory under the raw root (usually
//! a type subdirectory such as `invoices/`). Discovery is recursive and the
//! returned paths are sorted; the splitter depends on that order for
//! reproducible output.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Record;

pub const RECORD_EXTENSION: &str = "json";
pub const SOURCE_EXTENSION: &str = "pdf";
pub const MANIFEST_FILENAME: &str = "split_manifest.json";

/// All files under `root` with extension `ext` (case-insensitive), sorted.
pub fn list_files_with_extension(root: &Path, ext: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()).is_some_and(|s| s.eq_ignore_ascii_case(ext)) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

pub fn list_sources(source_root: &Path) -> Vec<PathBuf> { list_files_with_extension(source_root, SOURCE_EXTENSION) }

/// Stem of a path as an owned string; used as the document id.
pub fn file_stem(path: &Path) -> String { path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default() }

#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    /// Every record file under the root, excluding the split manifest.
    pub fn list_records(&self) -> Vec<PathBuf> {
        list_files_with_extension(&self.root, RECORD_EXTENSION)
            .into_iter()
            .filter(|p| p.file_name().and_then(|n| n.to_str()) != Some(MANIFEST_FILENAME))
            .collect()
    }

    /// Where the record for `source` (a file under `source_root`) lives.
    pub fn record_path_for(&self, source_root: &Path, source: &Path) -> PathBuf {
        let relative = source.strip_prefix(source_root).unwrap_or(source);
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        self.root.join(parent).join(format!("{}.{}", file_stem(source), RECORD_EXTENSION))
    }

    pub fn has_record_for(&self, source_root: &Path, source: &Path) -> bool { self.record_path_for(source_root, source).exists() }

    /// Sources under `source_root` that have no corresponding record yet.
    pub fn unannotated_sources(&self, source_root: &Path) -> Vec<PathBuf> {
        list_sources(source_root).into_iter().filter(|s| !self.has_record_for(source_root, s)).collect()
    }

    /// Path of `path` relative to the store root, or the path itself when outside it.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path { path.strip_prefix(&self.root).unwrap_or(path) }

    /// Write `record` as `<root>/<relative_dir>/<document_id>.json`, replacing any previous file.
    pub fn write(&self, relative_dir: &Path, record: &Record) -> Result<PathBuf> {
        if record.document_id.is_empty() {
            return Err(Error::Operation("record has an empty document_id".to_string()));
        }
        let dir = self.root.join(relative_dir);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.{}", record.document_id, RECORD_EXTENSION));
        let mut body = serde_json::to_string_pretty(record)?;
        body.push('\n');
        fs::write(&path, body)?;
        tracing::debug!(path = %path.display(), "wrote record");
        Ok(path)
    }

    pub fn read(&self, path: &Path) -> Result<Record> {
        let content = read_existing(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn read_value(&self, path: &Path) -> Result<Value> {
        let content = read_existing(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() { return Err(Error::NotFound(path.display().to_string())); }
    Ok(fs::read_to_string(path)?)
}
