use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use tradedoc_core::error::Error;
use tradedoc_core::store::RecordStore;
use tradedoc_split::{check_layout, load_candidates, materialize, stratified_split, MaterializeOptions, SplitCandidate, SplitLabel, SplitManifest, SplitRatios};

const RATIO_TRIPLES: [(f64, f64, f64); 6] = [(0.7, 0.15, 0.15), (0.8, 0.1, 0.1), (0.5, 0.25, 0.25), (1.0, 0.0, 0.0), (0.34, 0.33, 0.33), (0.0, 0.5, 0.505)];

fn mixed_candidates(counts: &[(&str, usize)]) -> Vec<SplitCandidate> {
    let mut out = Vec::new();
    for (doc_type, n) in counts {
        for i in 0..*n {
            let id = format!("{}_{:04}", doc_type, i);
            out.push(SplitCandidate { path: PathBuf::from(format!("{}/{}.json", doc_type, id)), document_id: id, document_type: doc_type.to_string() });
        }
    }
    out
}

fn ids(candidates: &[SplitCandidate]) -> Vec<String> { candidates.iter().map(|c| c.document_id.clone()).collect() }

#[test]
fn every_record_lands_in_exactly_one_set() {
    for (a, b, c) in RATIO_TRIPLES {
        let ratios = SplitRatios::new(a, b, c).unwrap();
        for counts in [vec![("invoice", 1)], vec![("invoice", 7), ("purchase_order", 2)], vec![("invoice", 40), ("purchase_order", 13), ("shipping_order", 29), ("unknown", 1)]] {
            let input = mixed_candidates(&counts);
            let expected: BTreeSet<String> = ids(&input).into_iter().collect();
            let plan = stratified_split(input, ratios, 42).unwrap();

            let mut seen = BTreeSet::new();
            for label in SplitLabel::ALL {
                for id in ids(plan.set(label)) {
                    assert!(seen.insert(id.clone()), "{} assigned twice for {:?}", id, ratios);
                }
            }
            assert_eq!(seen, expected, "union differs for {:?} / {:?}", ratios, counts);
        }
    }
}

#[test]
fn same_seed_same_membership() {
    let counts = [("invoice", 23), ("purchase_order", 11), ("shipping_order", 17)];
    let ratios = SplitRatios::new(0.7, 0.15, 0.15).unwrap();
    for seed in [0, 1, 42, 9_999] {
        let first = stratified_split(mixed_candidates(&counts), ratios, seed).unwrap();
        let second = stratified_split(mixed_candidates(&counts), ratios, seed).unwrap();
        for label in SplitLabel::ALL {
            assert_eq!(ids(first.set(label)), ids(second.set(label)), "seed {} label {}", seed, label);
        }
    }
}

#[test]
fn different_seeds_shuffle_differently() {
    let ratios = SplitRatios::new(0.5, 0.25, 0.25).unwrap();
    let a = stratified_split(mixed_candidates(&[("invoice", 50)]), ratios, 1).unwrap();
    let b = stratified_split(mixed_candidates(&[("invoice", 50)]), ratios, 2).unwrap();
    assert_ne!(ids(&a.train), ids(&b.train));
}

#[test]
fn single_type_counts_follow_floor_rule() {
    for (a, b, c) in RATIO_TRIPLES {
        let ratios = SplitRatios::new(a, b, c).unwrap();
        for n in 1..=60 {
            let plan = stratified_split(mixed_candidates(&[("invoice", n)]), ratios, 7).unwrap();
            let n_train = (n as f64 * a).floor() as usize;
            let n_val = (n as f64 * b).floor() as usize;
            assert_eq!(plan.train.len(), n_train, "train n={} {:?}", n, ratios);
            assert_eq!(plan.validation.len(), n_val, "validation n={} {:?}", n, ratios);
            assert_eq!(plan.test.len(), n - n_train - n_val, "test n={} {:?}", n, ratios);
        }
    }
}

#[test]
fn empty_input_is_rejected() {
    let ratios = SplitRatios::new(0.7, 0.15, 0.15).unwrap();
    assert!(matches!(stratified_split(Vec::new(), ratios, 42), Err(Error::NotFound(_))));
}

fn write_record(dir: &Path, subdir: &str, id: &str, doc_type: &str) {
    let path = dir.join(subdir).join(format!("{}.json", id));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let body = serde_json::json!({"document_id": id, "filename": format!("{}.pdf", id), "document_type": doc_type,
                                  "entities": {"document_type": doc_type}});
    fs::write(path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
}

fn seeded_ground_truth(tmp: &TempDir) -> (PathBuf, PathBuf) {
    let root = tmp.path().join("ground_truth");
    let input = root.join("annotated");
    for i in 0..8 {
        write_record(&input, "invoices", &format!("inv{}", i), "invoice");
    }
    for i in 0..4 {
        write_record(&input, "shipping_orders", &format!("bol{}", i), "shipping_order");
    }
    fs::write(input.join("invoices/broken.json"), "{ not json").unwrap();
    (input, root)
}

#[test]
fn load_candidates_groups_unreadable_records_as_unknown() {
    let tmp = TempDir::new().unwrap();
    let (input, _) = seeded_ground_truth(&tmp);
    let candidates = load_candidates(&RecordStore::new(&input));
    assert_eq!(candidates.len(), 13);
    let broken = candidates.iter().find(|c| c.document_id == "broken").unwrap();
    assert_eq!(broken.document_type, "unknown");
    assert_eq!(candidates.iter().filter(|c| c.document_type == "invoice").count(), 8);
}

#[test]
fn materialize_writes_sets_and_manifest() {
    let tmp = TempDir::new().unwrap();
    let (input, root) = seeded_ground_truth(&tmp);
    let plan = stratified_split(load_candidates(&RecordStore::new(&input)), SplitRatios::new(0.5, 0.25, 0.25).unwrap(), 42).unwrap();
    let manifest = SplitManifest::from_plan(&plan);
    let outcome = materialize(&plan, &manifest, &MaterializeOptions::new(&input, &root)).unwrap();

    assert_eq!(outcome.records_copied, 13);
    for label in SplitLabel::ALL {
        let store = RecordStore::new(root.join(label.as_str()));
        let written: BTreeSet<String> = store.list_records().iter().map(|p| tradedoc_core::store::file_stem(p)).collect();
        let planned: BTreeSet<String> = plan.document_ids(label).into_iter().collect();
        assert_eq!(written, planned, "{}", label);
    }
    assert!(root.join("train/invoices").is_dir(), "type subdirectories are mirrored");

    let back = SplitManifest::read(&outcome.manifest_path).unwrap();
    assert_eq!(back.seed, 42);
    assert_eq!(back.counts.total, 13);
    assert_eq!(back.document_ids, manifest.document_ids);

    let leftovers: Vec<_> = fs::read_dir(&root).unwrap().filter_map(|e| e.ok()).filter(|e| e.file_name().to_string_lossy().starts_with(".split-staging")).collect();
    assert!(leftovers.is_empty(), "staging directory is cleaned up");
}

#[test]
fn rerun_clears_previous_split() {
    let tmp = TempDir::new().unwrap();
    let (input, root) = seeded_ground_truth(&tmp);
    write_record(&root.join("train"), "invoices", "stale", "invoice");

    let plan = stratified_split(load_candidates(&RecordStore::new(&input)), SplitRatios::new(0.7, 0.15, 0.15).unwrap(), 3).unwrap();
    materialize(&plan, &SplitManifest::from_plan(&plan), &MaterializeOptions::new(&input, &root)).unwrap();
    assert!(!root.join("train/invoices/stale.json").exists());
    assert!(input.join("invoices/inv0.json").exists(), "input is never touched");
}

#[test]
fn pdfs_are_copied_next_to_split_when_requested() {
    let tmp = TempDir::new().unwrap();
    let (input, root) = seeded_ground_truth(&tmp);
    let raw = tmp.path().join("raw");
    fs::create_dir_all(raw.join("invoices")).unwrap();
    for i in 0..8 {
        fs::write(raw.join(format!("invoices/inv{}.pdf", i)), b"%PDF-1.4").unwrap();
    }

    let plan = stratified_split(load_candidates(&RecordStore::new(&input)), SplitRatios::new(1.0, 0.0, 0.0).unwrap(), 42).unwrap();
    let options = MaterializeOptions::new(&input, &root).with_pdf_dir(&raw);
    let outcome = materialize(&plan, &SplitManifest::from_plan(&plan), &options).unwrap();
    assert_eq!(outcome.pdfs_copied, 8);
    assert_eq!(outcome.pdfs_missing, 5, "shipping orders and the broken record have no PDF");
    assert!(root.join("raw_splits/train/invoices/inv3.pdf").is_file());
}

#[test]
fn input_inside_a_destination_is_rejected_before_writing() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("ground_truth");
    let input = root.join("train");
    write_record(&input, "invoices", "inv0", "invoice");

    let err = check_layout(&MaterializeOptions::new(&input, &root)).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));

    let plan = stratified_split(load_candidates(&RecordStore::new(&input)), SplitRatios::new(0.7, 0.15, 0.15).unwrap(), 42).unwrap();
    assert!(materialize(&plan, &SplitManifest::from_plan(&plan), &MaterializeOptions::new(&input, &root)).is_err());
    assert!(input.join("invoices/inv0.json").exists());
    assert!(!root.join("split_manifest.json").exists());
}

#[test]
fn output_root_as_input_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let (_, root) = seeded_ground_truth(&tmp);
    assert!(matches!(check_layout(&MaterializeOptions::new(&root, &root)), Err(Error::InvalidConfig(_))));
}

#[test]
fn split_without_pdfs_drops_stale_pdf_copies() {
    let tmp = TempDir::new().unwrap();
    let (input, root) = seeded_ground_truth(&tmp);
    let raw = tmp.path().join("raw");
    fs::create_dir_all(raw.join("invoices")).unwrap();
    fs::write(raw.join("invoices/inv0.pdf"), b"%PDF-1.4").unwrap();

    let plan = stratified_split(load_candidates(&RecordStore::new(&input)), SplitRatios::new(1.0, 0.0, 0.0).unwrap(), 42).unwrap();
    let with_pdfs = MaterializeOptions::new(&input, &root).with_pdf_dir(&raw);
    materialize(&plan, &SplitManifest::from_plan(&plan), &with_pdfs).unwrap();
    assert!(root.join("raw_splits/train/invoices/inv0.pdf").is_file());

    let plan = stratified_split(load_candidates(&RecordStore::new(&input)), SplitRatios::new(0.0, 0.5, 0.5).unwrap(), 7).unwrap();
    let outcome = materialize(&plan, &SplitManifest::from_plan(&plan), &MaterializeOptions::new(&input, &root)).unwrap();
    assert_eq!(outcome.pdfs_copied, 0);
    for label in SplitLabel::ALL {
        assert!(!root.join("raw_splits").join(label.as_str()).exists(), "{} PDFs left from the previous split", label);
    }
}
