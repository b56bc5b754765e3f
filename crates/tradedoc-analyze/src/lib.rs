#![deny(unused_imports)]

pub mod analysis;
pub mod extract;
pub mod keywords;
pub mod render;

pub use analysis::{analyze_text, analyze_type, DocumentAnalysis, TypeAnalysis};
pub use extract::LopdfExtractor;
pub use render::{render_report, render_summary};
