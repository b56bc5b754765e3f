use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use tradedoc_annotate::TerminalFormFiller;
use tradedoc_cli::{banner, bootstrap, path_or};
use tradedoc_core::store::RecordStore;
use tradedoc_core::traits::{FormFiller, ReportSink};
use tradedoc_report::ConsoleSink;
use tradedoc_split::{check_layout, load_candidates, materialize, stratified_split, MaterializeOptions, SplitManifest, SplitRatios};

/// Split annotations into train/validation/test, stratified by document type.
#[derive(Parser, Debug)]
#[command(name = "tradedoc-split")]
struct Args {
    /// Input directory with all annotations (default: paths.annotations_dir)
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Base output directory receiving train/, validation/, test/ (default: paths.ground_truth_dir)
    #[arg(long)]
    output_base: Option<PathBuf>,

    #[arg(long)]
    train_ratio: Option<f64>,

    #[arg(long)]
    val_ratio: Option<f64>,

    #[arg(long)]
    test_ratio: Option<f64>,

    /// Random seed for reproducibility (default: split.seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Also copy the corresponding PDF files
    #[arg(long)]
    copy_pdfs: bool,

    /// Directory containing original PDFs, used with --copy-pdfs (default: paths.raw_dir)
    #[arg(long)]
    pdf_dir: Option<PathBuf>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = bootstrap()?;

    let ratios = SplitRatios::new(
        args.train_ratio.unwrap_or(config.split.train),
        args.val_ratio.unwrap_or(config.split.validation),
        args.test_ratio.unwrap_or(config.split.test),
    )?;
    let seed = args.seed.unwrap_or(config.split.seed);
    let input_dir = path_or(args.input_dir, config.annotations_dir());
    let output_base = path_or(args.output_base, config.ground_truth_dir());
    let mut options = MaterializeOptions::new(&input_dir, &output_base).with_progress(true);
    if args.copy_pdfs {
        options = options.with_pdf_dir(path_or(args.pdf_dir, config.raw_dir()));
    }
    check_layout(&options)?;

    banner("✂️  Stratified Data Split");
    println!("Input: {}", input_dir.display());
    println!("Output: {}", output_base.display());
    println!("Ratios: train {:.2} / validation {:.2} / test {:.2}, seed {}", ratios.train, ratios.validation, ratios.test, seed);

    let candidates = load_candidates(&RecordStore::new(&input_dir));
    println!("📊 Found {} annotation files\n", candidates.len());
    let plan = stratified_split(candidates, ratios, seed).context("No annotation files to split")?;
    tracing::info!(seed, train = plan.train.len(), validation = plan.validation.len(), test = plan.test.len(), "split planned");

    let mut rows: Vec<Vec<String>> = plan
        .groups
        .iter()
        .map(|g| vec![g.document_type.clone(), g.total().to_string(), g.train.to_string(), g.validation.to_string(), g.test.to_string()])
        .collect();
    rows.push(vec!["TOTAL".into(), plan.total().to_string(), plan.train.len().to_string(), plan.validation.len().to_string(), plan.test.len().to_string()]);
    let mut sink = ConsoleSink::stdout();
    sink.table("Split Plan", &["Type", "Total", "Train", "Validation", "Test"], &rows)?;
    for warning in &plan.warnings {
        println!("⚠️  {}", warning);
    }

    if !args.yes {
        let mut filler = TerminalFormFiller::stdio();
        if !filler.confirm("\nProceed with split?", true)? {
            println!("Split cancelled");
            return Ok(());
        }
    }

    let manifest = SplitManifest::from_plan(&plan);
    let outcome = materialize(&plan, &manifest, &options)?;
    println!("\n✅ Split complete: {} records copied", outcome.records_copied);
    if args.copy_pdfs {
        println!("📄 PDFs copied: {} ({} not found)", outcome.pdfs_copied, outcome.pdfs_missing);
    }
    println!("📝 Split manifest saved: {}", outcome.manifest_path.display());
    println!("💡 Next step: tradedoc-quality-report");
    Ok(())
}
