//! Structural validation of ground-truth records.
//!
//! Checks shape and internal consistency of a record, not business
//! correctness. Works on raw JSON so hand-edited and half-written files can be
//! diagnosed; every violation is collected rather than stopping at the first.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::types::DocumentType;

pub const REQUIRED_FIELDS: [&str; 4] = ["document_id", "filename", "document_type", "entities"];
pub const COMPANY_FIELDS: [&str; 5] = ["seller", "buyer", "shipper", "consignee", "supplier"];
pub const AMOUNT_FIELDS: [&str; 4] = ["total", "subtotal", "tax", "total_weight"];
pub const ITEM_FIELDS: [&str; 2] = ["line_items", "cargo_items"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<String>) -> Self { Self { valid: issues.is_empty(), issues } }

    fn single(issue: String) -> Self { Self { valid: false, issues: vec![issue] } }
}

/// Validate a record file; unreadable or unparsable files yield one issue.
pub fn validate_file(path: &Path) -> ValidationReport {
    match fs::read_to_string(path) {
        Ok(content) => validate_str(&content),
        Err(e) => ValidationReport::single(format!("Error reading file: {}", e)),
    }
}

pub fn validate_str(content: &str) -> ValidationReport {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => validate_value(&value),
        Err(e) => ValidationReport::single(format!("Invalid JSON: {}", e)),
    }
}

pub fn validate_value(data: &Value) -> ValidationReport {
    let Some(record) = data.as_object() else {
        return ValidationReport::single("Record must be a JSON object".to_string());
    };
    let mut issues = Vec::new();

    for field in REQUIRED_FIELDS {
        if !record.contains_key(field) {
            issues.push(format!("Missing required field: '{}'", field));
        }
    }

    let top_type = record.get("document_type");
    let known_type = top_type.and_then(Value::as_str).and_then(|s| s.parse::<DocumentType>().ok());
    if let (Some(value), None) = (top_type, known_type) {
        let allowed: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
        issues.push(format!("Invalid document_type: '{}' (must be one of {})", display_value(value), allowed.join(", ")));
    }

    if let Some(entities) = record.get("entities") {
        match entities.as_object() {
            None => issues.push("'entities' must be a dictionary".to_string()),
            Some(entities) => check_entities(entities, top_type, known_type, &mut issues),
        }
    }

    if let Some(metadata) = record.get("annotation_metadata") {
        if !metadata.is_object() {
            issues.push("'annotation_metadata' must be a dictionary".to_string());
        }
    }

    ValidationReport::from_issues(issues)
}

fn check_entities(entities: &Map<String, Value>, top_type: Option<&Value>, known_type: Option<DocumentType>, issues: &mut Vec<String>) {
    if let (Some(nested), Some(top)) = (entities.get("document_type"), top_type) {
        if nested != top {
            issues.push(format!("Mismatched document_type: top='{}' vs entities='{}'", display_value(top), display_value(nested)));
        }
    }

    // A bare type tag is reported once, as an empty annotation, rather than
    // also as a missing identifier.
    let tag_only = entities.keys().all(|k| k == "document_type");
    if let (Some(doc_type), false) = (known_type, tag_only) {
        let field = doc_type.identifier_field();
        if !entities.contains_key(field) {
            issues.push(format!("{} missing '{}'", doc_type.label(), field));
        }
    }

    if entities.len() <= 1 {
        issues.push("'entities' has no actual data (only document_type)".to_string());
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Shape statistics used by the validator summary and the quality report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    pub document_type: String,
    pub field_count: usize,
    pub items_count: usize,
    pub has_company_info: bool,
    pub has_amounts: bool,
}

/// Extract [`RecordStats`]; `None` when the value is not a record-shaped object.
pub fn record_stats(data: &Value) -> Option<RecordStats> {
    let record = data.as_object()?;
    let empty = Map::new();
    let entities = match record.get("entities") {
        None => &empty,
        Some(v) => v.as_object()?,
    };
    let items_count = ITEM_FIELDS
        .iter()
        .find_map(|k| entities.get(*k))
        .map(|items| items.as_array().map_or(0, Vec::len))
        .unwrap_or(0);
    Some(RecordStats {
        document_type: record.get("document_type").and_then(Value::as_str).unwrap_or("unknown").to_string(),
        field_count: entities.len(),
        items_count,
        has_company_info: COMPANY_FIELDS.iter().any(|k| entities.contains_key(*k)),
        has_amounts: AMOUNT_FIELDS.iter().any(|k| entities.contains_key(*k)),
    })
}

pub fn record_stats_file(path: &Path) -> Option<RecordStats> {
    let content = fs::read_to_string(path).ok()?;
    let value: Value = serde_json::from_str(&content).ok()?;
    record_stats(&value)
}
