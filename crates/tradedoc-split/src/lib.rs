#![deny(unused_imports)]

pub mod manifest;
pub mod materialize;
pub mod splitter;

pub use manifest::SplitManifest;
pub use materialize::{check_layout, materialize, MaterializeOptions, MaterializeOutcome};
pub use splitter::{load_candidates, stratified_split, SplitCandidate, SplitLabel, SplitPlan, SplitRatios};
