#![deny(unused_imports)]

pub mod aggregate;
pub mod quality;
pub mod render;
pub mod sink;

pub use aggregate::SetSummary;
pub use quality::{assess, is_balanced, load_splits, QualityReport, Verdict};
pub use render::render_quality_report;
pub use sink::{ConsoleSink, MarkdownSink};
