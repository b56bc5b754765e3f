use clap::Parser;
use std::path::PathBuf;

use tradedoc_analyze::{analyze_type, render_report, render_summary, LopdfExtractor};
use tradedoc_cli::{banner, bootstrap, path_or};
use tradedoc_core::types::DocumentType;
use tradedoc_report::{ConsoleSink, MarkdownSink};

/// Sample PDFs of each type and report structure and keyword signals.
#[derive(Parser, Debug)]
#[command(name = "tradedoc-analyze")]
struct Args {
    /// Directory containing PDFs, one subdirectory per type (default: paths.raw_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output analysis file (default: <paths.docs_dir>/document_analysis.md)
    #[arg(long)]
    output: Option<PathBuf>,

    /// PDFs to sample per type (default: analysis.samples_per_type)
    #[arg(long)]
    samples: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = bootstrap()?;
    let data_dir = path_or(args.data_dir, config.raw_dir());
    let output = path_or(args.output, config.docs_dir().join("document_analysis.md"));
    let samples = args.samples.unwrap_or(config.analysis.samples_per_type).max(1);

    banner("Document Structure Analysis");
    let extractor = LopdfExtractor;
    let analyses: Vec<_> = DocumentType::ALL
        .into_iter()
        .filter_map(|t| analyze_type(&data_dir, t, &extractor, samples, config.analysis.preview_chars))
        .collect();
    tracing::info!(types = analyses.len(), samples, dir = %data_dir.display(), "analysis finished");

    render_summary(&analyses, &mut ConsoleSink::stdout())?;
    let mut markdown = MarkdownSink::new();
    render_report(&analyses, &mut markdown)?;
    markdown.write_to(&output)?;

    println!("\n✅ Analysis report saved to: {}", output.display());
    println!("\nNext steps:");
    println!("1. Review the report: {}", output.display());
    println!("2. Start annotation: tradedoc-annotate");
    Ok(())
}
