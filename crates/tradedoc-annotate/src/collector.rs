use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};

use tradedoc_core::classify::classify_path;
use tradedoc_core::store::{file_stem, RecordStore};
use tradedoc_core::traits::FormFiller;
use tradedoc_core::types::{DocumentType, Entities, Metadata, Record};

use crate::form::{fill_form, form_for};

/// A source PDF without a record, with its type guessed from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDocument {
    pub path: PathBuf,
    pub document_type: Option<DocumentType>,
}

pub fn pending_documents(raw_dir: &Path, store: &RecordStore) -> Vec<PendingDocument> {
    store
        .unannotated_sources(raw_dir)
        .into_iter()
        .map(|path| PendingDocument { document_type: classify_path(path.strip_prefix(raw_dir).unwrap_or(&path)), path })
        .collect()
}

/// Ask for a document type until one of the known names is given.
pub fn ask_document_type(filler: &mut dyn FormFiller) -> anyhow::Result<DocumentType> {
    let choices: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
    let prompt = format!("Document type ({})", choices.join("/"));
    loop {
        if let Some(answer) = filler.ask(&prompt, None)? {
            match answer.trim().parse() {
                Ok(t) => return Ok(t),
                Err(e) => tracing::warn!("{}", e),
            }
        }
    }
}

/// Fill the form for one document and build its record.
pub fn annotate_document(raw_dir: &Path, source: &Path, doc_type: DocumentType, annotator: &str, filler: &mut dyn FormFiller) -> anyhow::Result<Record> {
    let mut fields = fill_form(form_for(doc_type), filler)?;
    fields.insert("document_type".into(), Value::String(doc_type.as_str().into()));
    let entities: Entities = serde_json::from_value(Value::Object(fields)).with_context(|| format!("answers for {} do not fit the {} schema", source.display(), doc_type))?;

    let relative = source.strip_prefix(raw_dir).unwrap_or(source);
    let mut metadata = Metadata::new();
    metadata.insert("annotated_date".into(), Value::String(chrono::Local::now().to_rfc3339()));
    metadata.insert("source_path".into(), Value::String(relative.display().to_string()));
    metadata.insert("annotator".into(), Value::String(annotator.to_string()));

    let filename = source.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    Ok(Record::new(file_stem(source), filename, entities, metadata))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub saved: Vec<PathBuf>,
    /// Pending documents left when the session stopped.
    pub remaining: usize,
}

/// Walk `pending` in order, saving each record next to its source's relative
/// directory, and offer to stop after every document.
pub fn run_session(raw_dir: &Path, store: &RecordStore, pending: &[PendingDocument], annotator: &str, filler: &mut dyn FormFiller) -> anyhow::Result<SessionOutcome> {
    let mut outcome = SessionOutcome { saved: Vec::new(), remaining: pending.len() };
    for (i, doc) in pending.iter().enumerate() {
        tracing::info!("progress {}/{}: {}", i + 1, pending.len(), doc.path.display());
        let doc_type = match doc.document_type {
            Some(t) => t,
            None => {
                tracing::warn!("unknown document type for {}, asking", doc.path.display());
                ask_document_type(filler)?
            }
        };
        let record = annotate_document(raw_dir, &doc.path, doc_type, annotator, filler)?;
        let relative_dir = doc.path.strip_prefix(raw_dir).ok().and_then(Path::parent).unwrap_or_else(|| Path::new(""));
        let saved = store.write(relative_dir, &record)?;
        tracing::info!("saved {}", saved.display());
        outcome.saved.push(saved);
        outcome.remaining -= 1;

        if outcome.remaining > 0 && !filler.confirm("▶️  Continue to next document?", true)? {
            tracing::info!("paused with {} documents remaining", outcome.remaining);
            break;
        }
    }
    Ok(outcome)
}
