use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tradedoc_core::error::{Error, Result};

use crate::splitter::{SplitLabel, SplitPlan, SplitRatios};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCounts {
    pub total: usize,
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDocumentIds {
    pub train: Vec<String>,
    pub validation: Vec<String>,
    pub test: Vec<String>,
}

/// Audit trail written next to a materialized split.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitManifest {
    pub created_at: DateTime<Utc>,
    pub seed: u64,
    pub ratios: SplitRatios,
    pub counts: SplitCounts,
    pub document_ids: SplitDocumentIds,
}

impl SplitManifest {
    pub fn from_plan(plan: &SplitPlan) -> Self {
        Self {
            created_at: Utc::now(),
            seed: plan.seed,
            ratios: plan.ratios,
            counts: SplitCounts { total: plan.total(), train: plan.train.len(), validation: plan.validation.len(), test: plan.test.len() },
            document_ids: SplitDocumentIds {
                train: plan.document_ids(SplitLabel::Train),
                validation: plan.document_ids(SplitLabel::Validation),
                test: plan.document_ids(SplitLabel::Test),
            },
        }
    }

    pub fn ids(&self, label: SplitLabel) -> &[String] {
        match label {
            SplitLabel::Train => &self.document_ids.train,
            SplitLabel::Validation => &self.document_ids.validation,
            SplitLabel::Test => &self.document_ids.test,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut body = serde_json::to_string_pretty(self)?;
        body.push('\n');
        fs::write(path, body)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}
