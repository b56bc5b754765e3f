use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tradedoc_core::config::SplitConfig;
use tradedoc_core::error::{Error, Result};
use tradedoc_core::store::{file_stem, RecordStore};

/// Groups smaller than this still split, but stratification gets coarse.
pub const MIN_GROUP_SIZE: usize = 3;
pub const UNKNOWN_TYPE: &str = "unknown";

/// Dataset partitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitLabel {
    Train,
    Validation,
    Test,
}

impl SplitLabel {
    pub const ALL: [SplitLabel; 3] = [Self::Train, Self::Validation, Self::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Requested train/validation/test proportions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl SplitRatios {
    /// Allowed distance of the ratio sum from 1.0.
    pub const TOLERANCE: f64 = 0.01;

    pub fn new(train: f64, validation: f64, test: f64) -> Result<Self> { Self { train, validation, test }.validated() }

    pub fn from_config(config: &SplitConfig) -> Result<Self> { Self::new(config.train, config.validation, config.test) }

    pub fn sum(&self) -> f64 { self.train + self.validation + self.test }

    pub fn validated(self) -> Result<Self> {
        if [self.train, self.validation, self.test].iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(Error::InvalidConfig(format!("split ratios must be non-negative, got {:?}", self)));
        }
        if (self.sum() - 1.0).abs() > Self::TOLERANCE {
            return Err(Error::InvalidConfig(format!("Ratios must sum to 1.0 (current: {:.4})", self.sum())));
        }
        Ok(self)
    }

    pub fn get(&self, label: SplitLabel) -> f64 {
        match label {
            SplitLabel::Train => self.train,
            SplitLabel::Validation => self.validation,
            SplitLabel::Test => self.test,
        }
    }
}

/// A record file about to be assigned to a split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitCandidate {
    pub document_id: String,
    pub document_type: String,
    pub path: PathBuf,
}

/// Read every record under the store root in discovery order.
///
/// Unreadable records keep their place under the `unknown` type so they are
/// still carried into a split.
pub fn load_candidates(store: &RecordStore) -> Vec<SplitCandidate> {
    store
        .list_records()
        .into_iter()
        .map(|path| {
            let document_type = match store.read_value(&path) {
                Ok(value) => value.get("document_type").and_then(|t| t.as_str()).unwrap_or(UNKNOWN_TYPE).to_string(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable record, grouping as unknown");
                    UNKNOWN_TYPE.to_string()
                }
            };
            SplitCandidate { document_id: file_stem(&path), document_type, path }
        })
        .collect()
}

/// Per-type assignment counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSplit {
    pub document_type: String,
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

impl GroupSplit {
    pub fn total(&self) -> usize { self.train + self.validation + self.test }
}

#[derive(Clone, Debug)]
pub struct SplitPlan {
    pub seed: u64,
    pub ratios: SplitRatios,
    pub train: Vec<SplitCandidate>,
    pub validation: Vec<SplitCandidate>,
    pub test: Vec<SplitCandidate>,
    pub groups: Vec<GroupSplit>,
    pub warnings: Vec<String>,
}

impl SplitPlan {
    pub fn set(&self, label: SplitLabel) -> &[SplitCandidate] {
        match label {
            SplitLabel::Train => &self.train,
            SplitLabel::Validation => &self.validation,
            SplitLabel::Test => &self.test,
        }
    }

    pub fn total(&self) -> usize { self.train.len() + self.validation.len() + self.test.len() }

    pub fn document_ids(&self, label: SplitLabel) -> Vec<String> { self.set(label).iter().map(|c| c.document_id.clone()).collect() }
}

/// Partition `candidates` into train/validation/test, stratified by type.
///
/// Groups are visited in sorted type order and all of them draw from one
/// `StdRng` seeded with `seed`, so the result is a pure function of the seed,
/// the ratios and the input order. Within a group of size `n` the first
/// `floor(n * train)` shuffled items go to train, the next
/// `floor(n * validation)` to validation and everything left to test.
pub fn stratified_split(candidates: Vec<SplitCandidate>, ratios: SplitRatios, seed: u64) -> Result<SplitPlan> {
    let ratios = ratios.validated()?;
    if candidates.is_empty() {
        return Err(Error::NotFound("no records to split".to_string()));
    }

    let mut by_type: BTreeMap<String, Vec<SplitCandidate>> = BTreeMap::new();
    for candidate in candidates {
        by_type.entry(candidate.document_type.clone()).or_default().push(candidate);
    }

    let mut warnings = Vec::new();
    if let Some((smallest_type, smallest)) = by_type.iter().min_by_key(|(_, items)| items.len()) {
        if smallest.len() < MIN_GROUP_SIZE {
            let msg = format!("Smallest type '{}' has only {} samples; stratified split may not work well", smallest_type, smallest.len());
            tracing::warn!("{}", msg);
            warnings.push(msg);
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut train, mut validation, mut test) = (Vec::new(), Vec::new(), Vec::new());
    let mut groups = Vec::with_capacity(by_type.len());
    for (document_type, mut items) in by_type {
        items.shuffle(&mut rng);
        let n = items.len();
        let n_train = ((n as f64 * ratios.train).floor() as usize).min(n);
        let n_val = ((n as f64 * ratios.validation).floor() as usize).min(n - n_train);

        let mut rest = items.into_iter();
        train.extend(rest.by_ref().take(n_train));
        validation.extend(rest.by_ref().take(n_val));
        let before = test.len();
        test.extend(rest);
        let group = GroupSplit { document_type, train: n_train, validation: n_val, test: test.len() - before };
        tracing::info!("{}: {} train, {} val, {} test", group.document_type, group.train, group.validation, group.test);
        groups.push(group);
    }

    Ok(SplitPlan { seed, ratios, train, validation, test, groups, warnings })
}
