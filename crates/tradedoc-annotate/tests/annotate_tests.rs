use std::fs;
use tempfile::TempDir;

use tradedoc_annotate::{pending_documents, run_session, ScriptedFiller};
use tradedoc_core::store::RecordStore;
use tradedoc_core::types::{DocumentType, Entities};
use tradedoc_core::validate::validate_file;

fn raw_tree(tmp: &TempDir) -> std::path::PathBuf {
    let raw = tmp.path().join("raw");
    for rel in ["invoices/inv1.pdf", "misc/scan.pdf"] {
        let p = raw.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, b"%PDF-1.4").unwrap();
    }
    raw
}

#[test]
fn session_writes_valid_records_and_asks_for_unknown_types() {
    let tmp = TempDir::new().unwrap();
    let raw = raw_tree(&tmp);
    let store = RecordStore::new(tmp.path().join("annotated"));

    let pending = pending_documents(&raw, &store);
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].document_type, Some(DocumentType::Invoice));
    assert_eq!(pending[1].document_type, None);

    let answers = [
        // invoice
        "INV-1", "", "", "", "", "100", "", "", "",
        // unknown type, first answer rejected
        "receipt", "shipping_order",
        // shipping order with one cargo line
        "BOL-7", "", "Pallets", "4", "", "", "", "pallet", "", "", "Shanghai", "", "", "", "", "", "",
    ];
    let confirms = [false, false, false, true, false, false, true, false];
    let mut filler = ScriptedFiller::new(answers, confirms);
    let outcome = run_session(&raw, &store, &pending, "tester", &mut filler).unwrap();

    assert_eq!(outcome.remaining, 0);
    assert_eq!(outcome.saved, vec![store.root().join("invoices/inv1.json"), store.root().join("misc/scan.json")]);
    for path in &outcome.saved {
        let report = validate_file(path);
        assert!(report.valid, "{}: {:?}", path.display(), report.issues);
    }

    let invoice = store.read(&outcome.saved[0]).unwrap();
    assert_eq!(invoice.document_id, "inv1");
    assert_eq!(invoice.annotation_metadata["source_path"], "invoices/inv1.pdf");
    assert_eq!(invoice.annotation_metadata["annotator"], "tester");
    let Entities::Invoice(inv) = invoice.entities else { panic!("expected invoice entities") };
    assert_eq!(inv.currency.as_deref(), Some("USD"));
    assert_eq!(inv.total, Some(100.0));
    assert!(inv.line_items.is_empty());

    let shipping = store.read(&outcome.saved[1]).unwrap();
    let Entities::ShippingOrder(so) = shipping.entities else { panic!("expected shipping order entities") };
    assert_eq!(so.order_number, "BOL-7");
    assert_eq!(so.cargo_items.len(), 1);
    assert_eq!(so.cargo_items[0].weight_unit.as_deref(), Some("kg"));
    assert_eq!(so.cargo_items[0].package_type.as_deref(), Some("pallet"));
    assert_eq!(so.origin.as_deref(), Some("Shanghai"));

    assert!(pending_documents(&raw, &store).is_empty(), "annotated sources are no longer pending");
}

#[test]
fn declining_to_continue_stops_the_session() {
    let tmp = TempDir::new().unwrap();
    let raw = raw_tree(&tmp);
    let store = RecordStore::new(tmp.path().join("annotated"));
    let pending = pending_documents(&raw, &store);

    let mut filler = ScriptedFiller::new(["INV-1", "", "", "", "", "", "", "", ""], [false, false, false, false]);
    let outcome = run_session(&raw, &store, &pending, "manual", &mut filler).unwrap();
    assert_eq!(outcome.saved.len(), 1);
    assert_eq!(outcome.remaining, 1);
    assert_eq!(pending_documents(&raw, &store).len(), 1);
}

#[test]
fn classification_ignores_directories_above_the_raw_root() {
    let tmp = TempDir::new().unwrap();
    let raw = tmp.path().join("invoice-tools/raw");
    let pdf = raw.join("shipping_orders/x.pdf");
    fs::create_dir_all(pdf.parent().unwrap()).unwrap();
    fs::write(&pdf, b"%PDF-1.4").unwrap();

    let pending = pending_documents(&raw, &RecordStore::new(tmp.path().join("annotated")));
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].document_type, Some(DocumentType::ShippingOrder));
}
