//! Dataset readiness checks over a collection of [`SetSummary`]s.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::aggregate::{ratio, SetSummary};

pub const SPLIT_NAMES: [&str; 3] = ["train", "validation", "test"];
pub const MIN_TYPES_PER_SET: usize = 2;
pub const READY_TOTAL: usize = 30;
pub const GOOD_TOTAL: usize = 100;
pub const MIN_COMPANY_COVERAGE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Small,
    Moderate,
    Good,
}

impl SizeTier {
    pub fn for_total(total: usize) -> Self {
        match total {
            t if t < READY_TOTAL => Self::Small,
            t if t < GOOD_TOTAL => Self::Moderate,
            _ => Self::Good,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ready,
    NeedsMoreData,
    ReviewWarnings,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "READY FOR TRAINING",
            Self::NeedsMoreData => "MORE DATA RECOMMENDED",
            Self::ReviewWarnings => "REVIEW WARNINGS",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityChecks {
    pub balanced: bool,
    /// Sets with fewer than [`MIN_TYPES_PER_SET`] document types, with their type count.
    pub thin_sets: Vec<(String, usize)>,
    pub total: usize,
    pub size_tier: SizeTier,
    pub company_coverage: f64,
}

impl QualityChecks {
    pub fn types_well_distributed(&self) -> bool { self.thin_sets.is_empty() }

    pub fn company_coverage_ok(&self) -> bool { self.company_coverage >= MIN_COMPANY_COVERAGE }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub sets: Vec<SetSummary>,
    pub checks: QualityChecks,
    pub verdict: Verdict,
}

/// Smallest set at least half the largest; trivially true for fewer than two sets.
pub fn is_balanced(sizes: &[usize]) -> bool {
    match (sizes.iter().min(), sizes.iter().max()) {
        (Some(&min), Some(&max)) if sizes.len() >= 2 && max > 0 => min * 2 >= max,
        _ => true,
    }
}

pub fn assess(sets: Vec<SetSummary>) -> QualityReport {
    let sizes: Vec<usize> = sets.iter().map(|s| s.total).collect();
    let total: usize = sizes.iter().sum();
    let thin_sets = sets
        .iter()
        .filter(|s| s.type_counts.len() < MIN_TYPES_PER_SET)
        .map(|s| (s.name.clone(), s.type_counts.len()))
        .collect();
    let checks = QualityChecks {
        balanced: is_balanced(&sizes),
        thin_sets,
        total,
        size_tier: SizeTier::for_total(total),
        company_coverage: ratio(sets.iter().map(|s| s.with_company).sum(), total),
    };
    let verdict = if checks.balanced && checks.types_well_distributed() && total >= READY_TOTAL {
        Verdict::Ready
    } else if total < READY_TOTAL {
        Verdict::NeedsMoreData
    } else {
        Verdict::ReviewWarnings
    };
    QualityReport { sets, checks, verdict }
}

/// Summaries for the standard split directories under `root`; missing or
/// empty splits are skipped with a warning.
pub fn load_splits(root: &Path) -> Vec<SetSummary> {
    let mut sets = Vec::new();
    for name in SPLIT_NAMES {
        let dir = root.join(name);
        if !dir.is_dir() {
            tracing::warn!("{} directory not found, skipping", name);
            continue;
        }
        let summary = SetSummary::from_dir(name, &dir);
        if summary.is_empty() {
            tracing::warn!("{} has no readable records, skipping", name);
            continue;
        }
        tracing::info!("{}: {} documents analyzed", name, summary.total);
        sets.push(summary);
    }
    sets
}
