//! Writing a [`SplitPlan`] to disk.
//!
//! Everything is first copied into a staging directory created under the
//! output root (same filesystem, so the final moves are renames). Only after
//! the whole split and its manifest are staged are the old `train/`,
//! `validation/` and `test/` directories removed and the staged ones renamed
//! into place. A failure while copying leaves the previous split untouched.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use tradedoc_core::error::{Error, Result};
use tradedoc_core::store::{file_stem, MANIFEST_FILENAME, SOURCE_EXTENSION};

use crate::manifest::SplitManifest;
use crate::splitter::{SplitLabel, SplitPlan};

/// PDFs copied with `--copy-pdfs` land in `<output_root>/raw_splits/<split>/`.
pub const PDF_SPLITS_DIR: &str = "raw_splits";

#[derive(Clone, Debug)]
pub struct MaterializeOptions {
    /// Directory the plan's record paths were discovered under.
    pub input_dir: PathBuf,
    /// Ground-truth root receiving `train/`, `validation/`, `test/` and the manifest.
    pub output_root: PathBuf,
    /// Source PDF root; when set, each record's PDF is copied alongside the split.
    pub pdf_dir: Option<PathBuf>,
    pub show_progress: bool,
}

impl MaterializeOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self { input_dir: input_dir.into(), output_root: output_root.into(), pdf_dir: None, show_progress: false }
    }

    pub fn with_pdf_dir(mut self, pdf_dir: impl Into<PathBuf>) -> Self {
        self.pdf_dir = Some(pdf_dir.into());
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn destination(&self, label: SplitLabel) -> PathBuf { self.output_root.join(label.as_str()) }

    pub fn pdf_destination(&self, label: SplitLabel) -> PathBuf { self.output_root.join(PDF_SPLITS_DIR).join(label.as_str()) }

    pub fn manifest_path(&self) -> PathBuf { self.output_root.join(MANIFEST_FILENAME) }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterializeOutcome {
    pub records_copied: usize,
    pub pdfs_copied: usize,
    pub pdfs_missing: usize,
    pub manifest_path: PathBuf,
}

/// Reject layouts where clearing a destination would touch the input.
///
/// Called before anything is written.
pub fn check_layout(options: &MaterializeOptions) -> Result<()> {
    let input = absolute(&options.input_dir);
    if !input.is_dir() {
        return Err(Error::NotFound(format!("input directory {}", options.input_dir.display())));
    }
    let root = absolute(&options.output_root);
    if root == input {
        return Err(Error::InvalidConfig(format!("input directory {} must not be the output root", options.input_dir.display())));
    }
    let mut guarded = vec![input.clone()];
    if let Some(pdf_dir) = &options.pdf_dir {
        guarded.push(absolute(pdf_dir));
    }
    for label in SplitLabel::ALL {
        for dest in [root.join(label.as_str()), root.join(PDF_SPLITS_DIR).join(label.as_str())] {
            if let Some(clash) = guarded.iter().find(|g| g.starts_with(&dest) || dest.starts_with(g.as_path())) {
                return Err(Error::InvalidConfig(format!(
                    "{} overlaps split destination {}; point the input at a separate directory",
                    clash.display(),
                    dest.display()
                )));
            }
        }
    }
    Ok(())
}

/// Copy the plan's records into place and persist `manifest`.
pub fn materialize(plan: &SplitPlan, manifest: &SplitManifest, options: &MaterializeOptions) -> Result<MaterializeOutcome> {
    check_layout(options)?;
    fs::create_dir_all(&options.output_root)?;
    let staging = tempfile::Builder::new().prefix(".split-staging-").tempdir_in(&options.output_root)?;

    let pb = if options.show_progress { ProgressBar::new(plan.total() as u64) } else { ProgressBar::hidden() };
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records ({percent}%) {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut outcome = MaterializeOutcome { records_copied: 0, pdfs_copied: 0, pdfs_missing: 0, manifest_path: options.manifest_path() };
    for label in SplitLabel::ALL {
        pb.set_message(label.as_str());
        let staged = staging.path().join(label.as_str());
        let staged_pdfs = staging.path().join(PDF_SPLITS_DIR).join(label.as_str());
        fs::create_dir_all(&staged)?;
        for candidate in plan.set(label) {
            let relative = candidate.path.strip_prefix(&options.input_dir).map_err(|_| {
                Error::Operation(format!("{} is not under input directory {}", candidate.path.display(), options.input_dir.display()))
            })?;
            let target = staged.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&candidate.path, &target)?;
            outcome.records_copied += 1;

            if let Some(pdf_dir) = &options.pdf_dir {
                let subdir = relative.parent().unwrap_or_else(|| Path::new(""));
                let pdf_name = format!("{}.{}", file_stem(&candidate.path), SOURCE_EXTENSION);
                let source_pdf = pdf_dir.join(subdir).join(&pdf_name);
                if source_pdf.is_file() {
                    let dest_dir = staged_pdfs.join(subdir);
                    fs::create_dir_all(&dest_dir)?;
                    fs::copy(&source_pdf, dest_dir.join(&pdf_name))?;
                    outcome.pdfs_copied += 1;
                } else {
                    tracing::warn!(pdf = %source_pdf.display(), "no source PDF for record, skipping");
                    outcome.pdfs_missing += 1;
                }
            }
            pb.inc(1);
        }
    }
    let staged_manifest = staging.path().join(MANIFEST_FILENAME);
    manifest.write(&staged_manifest)?;
    pb.finish_with_message("staged");

    for label in SplitLabel::ALL {
        replace_dir(&staging.path().join(label.as_str()), &options.destination(label))?;
        let pdf_dest = options.pdf_destination(label);
        if options.pdf_dir.is_some() {
            replace_dir(&staging.path().join(PDF_SPLITS_DIR).join(label.as_str()), &pdf_dest)?;
        } else if pdf_dest.exists() {
            // PDFs from an earlier split no longer match the new manifest.
            tracing::info!("removing stale PDF split {}", pdf_dest.display());
            fs::remove_dir_all(&pdf_dest)?;
        }
    }
    fs::rename(&staged_manifest, &outcome.manifest_path)?;
    tracing::info!(records = outcome.records_copied, pdfs = outcome.pdfs_copied, "split materialized under {}", options.output_root.display());
    Ok(outcome)
}

fn replace_dir(staged: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        tracing::info!("clearing existing directory {}", dest.display());
        fs::remove_dir_all(dest)?;
    }
    if !staged.exists() {
        fs::create_dir_all(staged)?;
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(staged, dest)?;
    Ok(())
}

/// Absolute, symlink-resolved form of `path`; falls back to joining the
/// current directory for paths that do not exist yet.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => absolute(parent).join(name),
        _ => std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf()),
    }
}
