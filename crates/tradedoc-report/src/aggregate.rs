use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use tradedoc_core::store::RecordStore;
use tradedoc_core::validate::{record_stats_file, RecordStats};

/// Aggregates over one named record set (e.g. `train`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetSummary {
    pub name: String,
    pub total: usize,
    pub type_counts: BTreeMap<String, usize>,
    pub avg_fields: BTreeMap<String, f64>,
    pub total_items: usize,
    pub with_company: usize,
    pub with_amounts: usize,
    /// Files found but left out because they could not be parsed.
    pub skipped: usize,
}

impl SetSummary {
    pub fn from_stats<'a>(name: impl Into<String>, stats: impl IntoIterator<Item = &'a RecordStats>) -> Self {
        let mut summary = Self { name: name.into(), ..Default::default() };
        let mut field_sums: BTreeMap<String, usize> = BTreeMap::new();
        for s in stats {
            summary.total += 1;
            *summary.type_counts.entry(s.document_type.clone()).or_default() += 1;
            *field_sums.entry(s.document_type.clone()).or_default() += s.field_count;
            summary.total_items += s.items_count;
            summary.with_company += usize::from(s.has_company_info);
            summary.with_amounts += usize::from(s.has_amounts);
        }
        summary.avg_fields = field_sums
            .into_iter()
            .map(|(t, sum)| {
                let n = summary.type_counts.get(&t).copied().unwrap_or(1).max(1);
                (t, sum as f64 / n as f64)
            })
            .collect();
        summary
    }

    /// Read every record under `dir`; unparsable files are logged and counted in `skipped`.
    pub fn from_dir(name: impl Into<String>, dir: &Path) -> Self {
        let store = RecordStore::new(dir);
        let mut stats = Vec::new();
        let mut skipped = 0;
        for path in store.list_records() {
            match record_stats_file(&path) {
                Some(s) => stats.push(s),
                None => {
                    tracing::warn!(path = %path.display(), "error reading record, excluded from report");
                    skipped += 1;
                }
            }
        }
        let mut summary = Self::from_stats(name, &stats);
        summary.skipped = skipped;
        summary
    }

    pub fn is_empty(&self) -> bool { self.total == 0 }

    pub fn type_share(&self, doc_type: &str) -> f64 { ratio(self.type_counts.get(doc_type).copied().unwrap_or(0), self.total) }

    pub fn avg_items(&self) -> f64 { ratio(self.total_items, self.total) }

    pub fn company_fraction(&self) -> f64 { ratio(self.with_company, self.total) }

    pub fn amount_fraction(&self) -> f64 { ratio(self.with_amounts, self.total) }
}

pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(doc_type: &str, fields: usize, items: usize, company: bool, amounts: bool) -> RecordStats {
        RecordStats { document_type: doc_type.into(), field_count: fields, items_count: items, has_company_info: company, has_amounts: amounts }
    }

    #[test]
    fn aggregates_counts_and_averages() {
        let input = vec![
            stats("invoice", 4, 2, true, true),
            stats("invoice", 6, 0, false, true),
            stats("shipping_order", 3, 5, true, false),
            stats("shipping_order", 5, 1, false, false),
        ];
        let s = SetSummary::from_stats("train", &input);
        assert_eq!(s.total, 4);
        assert_eq!(s.type_counts["invoice"], 2);
        assert!((s.avg_fields["invoice"] - 5.0).abs() < 1e-9);
        assert!((s.avg_fields["shipping_order"] - 4.0).abs() < 1e-9);
        assert_eq!(s.total_items, 8);
        assert!((s.avg_items() - 2.0).abs() < 1e-9);
        assert!((s.company_fraction() - 0.5).abs() < 1e-9);
        assert!((s.amount_fraction() - 0.5).abs() < 1e-9);
        assert!((s.type_share("shipping_order") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_set_has_zero_fractions() {
        let s = SetSummary::from_stats("test", &Vec::<RecordStats>::new());
        assert!(s.is_empty());
        assert_eq!(s.avg_items(), 0.0);
        assert_eq!(s.type_share("invoice"), 0.0);
    }
}
