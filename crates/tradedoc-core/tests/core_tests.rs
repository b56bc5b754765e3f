use std::fs;
use std::path::Path;
use tempfile::TempDir;

use tradedoc_core::error::Error;
use tradedoc_core::store::RecordStore;
use tradedoc_core::types::{Company, Entities, InvoiceEntities, LineItem, Metadata, Record};
use tradedoc_core::validate::{validate_file, validate_value};

fn sample_invoice() -> Record {
    let entities = Entities::Invoice(InvoiceEntities {
        invoice_number: "INV-001".into(),
        seller: Some(Company { name: "Acme Export".into(), phone: Some("+1 555 0100".into()), ..Default::default() }),
        line_items: vec![LineItem { description: "Steel bolts".into(), quantity: Some(200.0), unit_price: Some(0.35), ..Default::default() }],
        total: Some(70.0),
        currency: Some("USD".into()),
        ..Default::default()
    });
    let mut metadata = Metadata::new();
    metadata.insert("annotator".into(), "manual".into());
    Record::new("inv1", "inv1.pdf", entities, metadata)
}

#[test]
fn write_then_read_round_trips() {
    let tmp = TempDir::new().unwrap();
    let store = RecordStore::new(tmp.path());
    let record = sample_invoice();

    let path = store.write(Path::new("invoices"), &record).expect("write");
    assert_eq!(path, tmp.path().join("invoices/inv1.json"));

    let back = store.read(&path).expect("read");
    assert_eq!(back, record);
    assert!(validate_value(&store.read_value(&path).unwrap()).valid, "written records pass validation");
}

#[test]
fn list_records_is_sorted_recursive_and_skips_manifest() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("shipping_orders")).unwrap();
    fs::create_dir_all(root.join("invoices")).unwrap();
    fs::write(root.join("shipping_orders/b.json"), "{}").unwrap();
    fs::write(root.join("invoices/z.json"), "{}").unwrap();
    fs::write(root.join("invoices/a.json"), "{}").unwrap();
    fs::write(root.join("invoices/notes.txt"), "ignored").unwrap();
    fs::write(root.join("split_manifest.json"), "{}").unwrap();

    let store = RecordStore::new(root);
    let names: Vec<String> = store.list_records().iter().map(|p| store.relative(p).display().to_string()).collect();
    assert_eq!(names, vec!["invoices/a.json", "invoices/z.json", "shipping_orders/b.json"]);
}

#[test]
fn unannotated_sources_mirror_relative_paths() {
    let tmp = TempDir::new().unwrap();
    let raw = tmp.path().join("raw");
    let gt = tmp.path().join("gt");
    fs::create_dir_all(raw.join("invoices")).unwrap();
    fs::write(raw.join("invoices/inv1.pdf"), b"%PDF-1.4").unwrap();
    fs::write(raw.join("invoices/inv2.PDF"), b"%PDF-1.4").unwrap();

    let store = RecordStore::new(&gt);
    assert_eq!(store.unannotated_sources(&raw).len(), 2);

    store.write(Path::new("invoices"), &sample_invoice()).unwrap();
    let remaining = store.unannotated_sources(&raw);
    assert_eq!(remaining, vec![raw.join("invoices/inv2.PDF")]);
    assert!(store.has_record_for(&raw, &raw.join("invoices/inv1.pdf")));
    assert_eq!(store.record_path_for(&raw, &raw.join("invoices/inv2.PDF")), gt.join("invoices/inv2.json"));
}

#[test]
fn reading_missing_record_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let store = RecordStore::new(tmp.path());
    assert!(matches!(store.read(&tmp.path().join("nope.json")), Err(Error::NotFound(_))));
}

#[test]
fn truncated_file_is_reported_as_invalid_json() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("torn.json");
    fs::write(&path, "{\"document_id\": \"torn\", \"entit").unwrap();
    let report = validate_file(&path);
    assert!(!report.valid);
    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].starts_with("Invalid JSON"));
}
