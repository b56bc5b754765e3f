use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;

use tradedoc_annotate::{pending_documents, run_session, TerminalFormFiller};
use tradedoc_cli::{banner, bootstrap, path_or};
use tradedoc_core::store::RecordStore;
use tradedoc_core::traits::{FormFiller, ReportSink};
use tradedoc_report::ConsoleSink;

/// Interactively annotate the PDFs that have no ground-truth record yet.
#[derive(Parser, Debug)]
#[command(name = "tradedoc-annotate")]
struct Args {
    /// Directory containing raw PDFs (default: paths.raw_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving annotations (default: paths.annotations_dir)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Name recorded in each record's metadata
    #[arg(long, default_value = "manual")]
    annotator: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = bootstrap()?;
    let raw_dir = path_or(args.data_dir, config.raw_dir());
    let store = RecordStore::new(path_or(args.output_dir, config.annotations_dir()));

    banner("📝 Ground Truth Annotation");
    let pending = pending_documents(&raw_dir, &store);
    if pending.is_empty() {
        println!("✓ All PDFs are annotated!");
        return Ok(());
    }

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &pending {
        *by_type.entry(doc.document_type.map_or("unknown", |t| t.as_str())).or_default() += 1;
    }
    let rows: Vec<Vec<String>> = by_type.iter().map(|(t, n)| vec![t.to_string(), n.to_string()]).collect();
    let mut sink = ConsoleSink::stdout();
    sink.table(&format!("Documents to Annotate ({})", pending.len()), &["Type", "Count"], &rows)?;

    let mut filler = TerminalFormFiller::stdio();
    if !filler.confirm("\nStart annotation?", true)? {
        println!("Annotation cancelled");
        return Ok(());
    }

    tracing::info!(pending = pending.len(), annotator = %args.annotator, "starting annotation session");
    let outcome = run_session(&raw_dir, &store, &pending, &args.annotator, &mut filler)?;
    println!("\n✅ Saved {} annotation(s) to {}", outcome.saved.len(), store.root().display());
    if outcome.remaining > 0 {
        println!("⏸️  {} document(s) remaining. Run tradedoc-annotate again to continue.", outcome.remaining);
    } else {
        println!("🎉 All documents annotated!");
        println!("💡 Next step: tradedoc-validate");
    }
    Ok(())
}
