//! unmask command line.
//!
//! ```bash
//! unmask upload.png
//! unmask --json --signatures magic.json shell.php.png
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use unmask::core::classification::{ClassificationResult, Evidence, RiskFlag, RiskLevel};
use unmask::logging;
use unmask::triage::config::TriageConfig;
use unmask::triage::io::SafeFileReader;
use unmask::triage::sniffers::FileName;
use unmask::triage::{Classifier, Registry};

/// Identify a file's real type from its content and flag misleading names
#[derive(Parser, Debug)]
#[command(name = "unmask", version)]
struct Args {
    /// File to classify
    file: PathBuf,

    /// Signature source (JSON); defaults to the built-in set
    #[arg(short, long)]
    signatures: Option<PathBuf>,

    /// Configuration file (JSON); missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if args.log_json {
        logging::init_tracing_json();
    } else {
        logging::init_tracing();
    }

    match run(&args) {
        Ok(RiskLevel::High) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "unmask failed");
            eprintln!("[!] {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<RiskLevel> {
    let config = match &args.config {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            TriageConfig::from_json_str(&src)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TriageConfig::default(),
    };

    let registry = match &args.signatures {
        Some(path) => Registry::from_path(path)
            .with_context(|| format!("loading signatures {}", path.display()))?,
        None => Registry::builtin().context("loading built-in signatures")?,
    };

    let classifier = Classifier::new(Arc::new(registry), config.clone());
    let mut reader = SafeFileReader::open(&args.file, config.io.clone().into())
        .with_context(|| format!("opening {}", args.file.display()))?;
    let data = reader
        .read_prefix(classifier.window() as u64)
        .with_context(|| format!("reading {}", args.file.display()))?;

    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    let result = classifier.classify(&data, name.as_deref());

    if args.json {
        println!("{}", result.to_json_pretty()?);
    } else {
        print_report(&args.file, name.as_deref(), &result);
    }
    Ok(result.risk_level)
}

fn print_report(path: &Path, name: Option<&str>, result: &ClassificationResult) {
    let extension = name
        .and_then(|n| FileName::parse(n).trailing)
        .map(|e| e.to_ascii_uppercase())
        .unwrap_or_default();

    println!("\n--- File Type Analysis Report ---");
    println!("File Name     : {}", name.unwrap_or_else(|| path.to_str().unwrap_or("?")));
    println!("Extension     : {}", extension);
    match &result.evidence {
        Evidence::Signature {
            pattern, offset, ..
        } => println!("Magic Number  : {} (offset {})", pattern, offset),
        Evidence::Shebang {
            directive, program, ..
        } => println!(
            "Magic Number  : Interpreter directive (#!{}, runs {})",
            directive, program
        ),
        Evidence::Text(stats) => println!(
            "Magic Number  : Text-based detection (heuristic, {:.1}% text{})",
            stats.text_ratio() * 100.0,
            if stats.bom { ", UTF-8 BOM" } else { "" }
        ),
        Evidence::Inconclusive(_) => println!("Magic Number  : Not found"),
    }
    println!("Detected Type : {}", result.detected_type);
    println!("Category      : {}", result.category);
    println!("Risk Level    : {}", result.risk_level);
    println!("Reason        : {}", reason(result));
    println!("--------------------------------\n");
}

fn reason(result: &ClassificationResult) -> String {
    if result.risk_flags.is_empty() {
        return if result.risk_level == RiskLevel::Medium {
            "Unknown file signature".to_string()
        } else {
            "File appears legitimate".to_string()
        };
    }
    result
        .risk_flags
        .iter()
        .rev()
        .map(|f| match f {
            RiskFlag::ExecutableMasquerade => "Executable content masquerading as inert file",
            RiskFlag::ExtensionMismatch => "Extension does not match content",
            RiskFlag::DoubleExtension => "Multiple extensions in file name",
        })
        .collect::<Vec<_>>()
        .join("; ")
}
