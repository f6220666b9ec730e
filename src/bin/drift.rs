//! Exchange Drift Detection CLI
//!
//! Compares the checked-in language copies against freshly generated ones
//! and reports drift for review. Meant to run in CI.
//!
//! Usage:
//!   exchange-drift
//!   exchange-drift --scan . --strict
//!   exchange-drift --format json
//!
//! Exit codes: 0 in sync, 1 drift, 2 a target is missing, 3 tooling error.

use std::path::PathBuf;

use clap::Parser;
use exchange_definitions::config::OutputFormat;
use exchange_definitions::drift::{check_targets, find_unmanaged_copies, DriftReport, TargetStatus};
use exchange_definitions::DefinitionsConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exchange-drift")]
#[command(about = "Detect drift between exchange definitions and their language copies")]
struct Cli {
    /// Config file layered over exchanges.toml and the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scan this tree for copies that are not registered targets
    #[arg(short, long)]
    scan: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Fail when unmanaged copies are found
    #[arg(long)]
    strict: bool,

    /// Print unified diffs for drifted copies
    #[arg(long)]
    verbose: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(3);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = DefinitionsConfig::load_from(cli.config.as_deref())?;
    let registry = config.registry()?;
    let strict = cli.strict || config.drift.strict;
    let format = match cli.format.as_deref() {
        Some("json") => OutputFormat::Json,
        Some("text") => OutputFormat::Text,
        Some(other) => anyhow::bail!("unknown format '{}' (expected text or json)", other),
        None => config.output.format,
    };

    let mut report = check_targets(&registry, &config.targets, &config.render)?;

    if let Some(root) = cli.scan.as_ref().or(config.drift.scan_root.as_ref()) {
        let managed: Vec<PathBuf> = config.targets.iter().map(|t| t.path.clone()).collect();
        report.unmanaged = find_unmanaged_copies(root, &registry, &managed, &config.drift.ignore_paths)?;
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text_report(&report, cli.verbose),
    }

    let code = if report.has_missing() {
        eprintln!("\n❌ Missing language copies - run `exchange-defs generate`");
        2
    } else if report.has_drift() {
        eprintln!("\n❌ Language copies drifted from their definitions - run `exchange-defs generate`");
        1
    } else if !report.unmanaged.is_empty() && strict {
        eprintln!("\n⚠️  Unmanaged copies found (strict mode) - register them as targets");
        1
    } else if !report.unmanaged.is_empty() {
        eprintln!("\n⚠️  Unmanaged copies found - consider registering them as targets");
        0
    } else {
        eprintln!("\n✅ No drift detected - copies are in sync");
        0
    };
    Ok(code)
}

/// Print human-readable report
fn print_text_report(report: &DriftReport, verbose: bool) {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    EXCHANGE DRIFT REPORT                          ");
    println!("═══════════════════════════════════════════════════════════════════\n");

    for target in &report.targets {
        let t = &target.target;
        match &target.status {
            TargetStatus::InSync => {
                if verbose {
                    println!("✅ {} [{}] {}", t.definition, t.language, t.path.display());
                }
            }
            TargetStatus::Missing => {
                println!("📕 {} [{}] {} - MISSING", t.definition, t.language, t.path.display());
            }
            TargetStatus::Drifted { literals, diff } => {
                println!("🔴 {} [{}] {} - DRIFTED", t.definition, t.language, t.path.display());
                for value in &literals.missing {
                    println!("   - {:?}", value);
                }
                for value in &literals.unexpected {
                    println!("   + {:?}", value);
                }
                if let Some(tuple) = &literals.exchange_tuple {
                    println!(
                        "   exchange tuple: expected [{}], found [{}]",
                        tuple.expected.join(", "),
                        tuple.actual.join(", ")
                    );
                }
                if literals.is_empty() {
                    println!("   (formatting only)");
                }
                if verbose {
                    println!("{}", diff);
                }
            }
        }
    }

    if !report.unmanaged.is_empty() {
        println!("\n🟡 UNMANAGED COPIES ({}):", report.unmanaged.len());
        for copy in &report.unmanaged {
            println!("   {} ({})", copy.path.display(), copy.exchange_names.join(", "));
        }
    }

    println!("\n───────────────────────────────────────────────────────────────────");
    println!(
        "📊 Summary: {} in sync, {} target(s), registry {}",
        report.in_sync_count(),
        report.targets.len(),
        &report.registry_fingerprint[..report.registry_fingerprint.len().min(12)]
    );
}
