use clap::Parser;
use std::path::PathBuf;

use tradedoc_cli::{banner, bootstrap, path_or};
use tradedoc_report::{assess, load_splits, render_quality_report, ConsoleSink, MarkdownSink, Verdict};

/// Summarize the train/validation/test splits and judge dataset readiness.
#[derive(Parser, Debug)]
#[command(name = "tradedoc-quality-report")]
struct Args {
    /// Ground truth directory containing the splits (default: paths.ground_truth_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output markdown report (default: <paths.docs_dir>/data_quality_report.md)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = bootstrap()?;
    let data_dir = path_or(args.data_dir, config.ground_truth_dir());
    let output = path_or(args.output, config.docs_dir().join("data_quality_report.md"));

    banner("📊 Generating Data Quality Report");
    let sets = load_splits(&data_dir);
    if sets.is_empty() {
        println!("No data found to analyze in {}", data_dir.display());
        return Ok(());
    }

    let report = assess(sets);
    tracing::info!(sets = report.sets.len(), total = report.checks.total, verdict = %report.verdict, "quality assessed");
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    render_quality_report(&report, &generated, &mut ConsoleSink::stdout())?;

    let mut markdown = MarkdownSink::new();
    render_quality_report(&report, &generated, &mut markdown)?;
    markdown.write_to(&output)?;
    println!("\n✅ Report saved: {}", output.display());

    match report.verdict {
        Verdict::Ready => println!("✅ Dataset quality: GOOD ({} documents). Ready to proceed.", report.checks.total),
        Verdict::NeedsMoreData => println!("⚠️  Dataset quality: NEEDS MORE DATA ({} documents, at least 30 recommended)", report.checks.total),
        Verdict::ReviewWarnings => println!("⚠️  Dataset quality: REVIEW WARNINGS ({} documents)", report.checks.total),
    }
    Ok(())
}
