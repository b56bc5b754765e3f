use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use tradedoc_cli::{banner, bootstrap, path_or};
use tradedoc_core::store::RecordStore;
use tradedoc_core::traits::ReportSink;
use tradedoc_core::validate::{record_stats_file, validate_file, RecordStats, ValidationReport};
use tradedoc_report::ConsoleSink;

/// Check every annotation file for structural problems.
#[derive(Parser, Debug)]
#[command(name = "tradedoc-validate")]
struct Args {
    /// Directory containing annotations (default: paths.annotations_dir)
    #[arg(long)]
    annotation_dir: Option<PathBuf>,

    /// Print every issue under its file
    #[arg(long)]
    detailed: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = bootstrap()?;
    let dir = path_or(args.annotation_dir, config.annotations_dir());

    banner("🔍 Validating Annotations");
    let store = RecordStore::new(&dir);
    let files = store.list_records();
    if files.is_empty() {
        println!("⚠️  No annotation files found!");
        println!("Looking in: {}", dir.display());
        return Ok(ExitCode::SUCCESS);
    }
    println!("📊 Found {} annotation files\n", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")?.progress_chars("#>-"));
    let mut results: Vec<(PathBuf, ValidationReport)> = Vec::with_capacity(files.len());
    let mut by_type: BTreeMap<String, Vec<RecordStats>> = BTreeMap::new();
    for path in &files {
        let report = validate_file(path);
        if let Some(stats) = record_stats_file(path) {
            by_type.entry(stats.document_type.clone()).or_default().push(stats);
        }
        results.push((store.relative(path).to_path_buf(), report));
        pb.inc(1);
    }
    pb.finish_and_clear();
    tracing::info!(files = results.len(), dir = %dir.display(), "validation finished");

    let valid = results.iter().filter(|(_, r)| r.valid).count();
    let invalid = results.len() - valid;
    let mut sink = ConsoleSink::stdout();
    sink.table(
        "Validation Summary",
        &["Metric", "Value"],
        &[
            vec!["Total Files".into(), results.len().to_string()],
            vec!["Valid".into(), valid.to_string()],
            vec!["Invalid".into(), invalid.to_string()],
            vec!["Success Rate".into(), format!("{:.1}%", 100.0 * valid as f64 / results.len() as f64)],
        ],
    )?;

    let type_rows: Vec<Vec<String>> = by_type
        .iter()
        .map(|(t, stats)| {
            let n = stats.len() as f64;
            let fields = stats.iter().map(|s| s.field_count).sum::<usize>() as f64 / n;
            let items = stats.iter().map(|s| s.items_count).sum::<usize>() as f64 / n;
            vec![t.clone(), stats.len().to_string(), format!("{:.1}", fields), format!("{:.1}", items)]
        })
        .collect();
    if !type_rows.is_empty() {
        sink.table("Statistics by Document Type", &["Type", "Count", "Avg Fields", "Avg Items"], &type_rows)?;
    }

    if invalid == 0 {
        println!("\n✅ All annotations are valid!");
        println!("💡 Next step: split data with tradedoc-split");
        return Ok(ExitCode::SUCCESS);
    }

    println!("\n⚠️  Files with Issues:\n");
    for (path, report) in results.iter().filter(|(_, r)| !r.valid) {
        println!("✗ {}", path.display());
        if args.detailed {
            for issue in &report.issues {
                println!("  • {}", issue);
            }
            println!();
        }
    }
    println!("\n❌ {} annotation(s) have issues. Please fix them before proceeding.", invalid);
    if !args.detailed {
        println!("💡 To see detailed issues: tradedoc-validate --detailed");
    }
    Ok(ExitCode::FAILURE)
}
