use std::path::Path;
use std::process::ExitCode;

use tradedoc_cli::banner;
use tradedoc_core::config::AppConfig;
use tradedoc_core::logging;
use tradedoc_core::store::list_sources;
use tradedoc_core::types::DocumentType;

#[derive(Default)]
struct Tally {
    passed: usize,
    failed: usize,
}

impl Tally {
    fn check(&mut self, ok: bool, label: &str, detail: &str) {
        if ok {
            self.passed += 1;
            println!("✓ {}: {}", label, detail);
        } else {
            self.failed += 1;
            println!("✗ {}: {}", label, detail);
        }
    }
}

fn check_dir(tally: &mut Tally, label: &str, dir: &Path) {
    tally.check(dir.is_dir(), label, &dir.display().to_string());
}

fn main() -> anyhow::Result<ExitCode> {
    banner("🩺 Environment Check");
    let mut tally = Tally::default();

    let config = match AppConfig::load() {
        Ok(config) => {
            tally.check(true, "Configuration", "loaded");
            config
        }
        Err(e) => {
            tally.check(false, "Configuration", &e.to_string());
            println!("\nPassed: {}  Failed: {}", tally.passed, tally.failed);
            return Ok(ExitCode::FAILURE);
        }
    };
    logging::init(&config.logging, config.log_file().as_deref())?;

    let raw_dir = config.raw_dir();
    tracing::debug!(raw = %raw_dir.display(), "checking directories");
    check_dir(&mut tally, "Raw PDF directory", &raw_dir);
    check_dir(&mut tally, "Ground truth directory", &config.ground_truth_dir());

    if raw_dir.is_dir() {
        for doc_type in DocumentType::ALL {
            let dir = raw_dir.join(doc_type.subdir());
            let count = list_sources(&dir).len();
            if count == 0 {
                println!("⚠️  {}: no PDFs in {}", doc_type.label(), dir.display());
            } else {
                println!("📄 {}: {} PDFs", doc_type.label(), count);
            }
        }
    }

    println!("\nPassed: {}  Failed: {}", tally.passed, tally.failed);
    if tally.failed > 0 {
        println!("❌ Some checks failed");
        return Ok(ExitCode::FAILURE);
    }
    println!("✅ Environment ready");
    Ok(ExitCode::SUCCESS)
}
