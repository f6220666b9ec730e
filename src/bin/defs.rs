//! Exchange Definitions CLI
//!
//! Inspects, validates and generates language copies of exchange definitions.
//!
//! Usage:
//!   exchange-defs list
//!   exchange-defs show preprocessor_status
//!   exchange-defs validate definitions/
//!   exchange-defs generate
//!   exchange-defs generate --out-dir build/bindings --language cpp

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use exchange_definitions::config::OutputFormat;
use exchange_definitions::{
    generate, DefinitionsConfig, ExchangeDefinition, ExchangeRegistry, Language,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exchange-defs")]
#[command(about = "Inspect, validate and generate exchange definitions")]
struct Cli {
    /// Config file layered over exchanges.toml and the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered definitions
    List,

    /// Show one definition
    Show {
        /// Definition id or exchange name
        id: String,

        /// Output format (text, json); defaults to the configured format
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Validate manifest files or directories
    Validate {
        /// Manifests or directories of manifests (default: configured sources)
        paths: Vec<PathBuf>,
    },

    /// Write generated language copies
    Generate {
        /// Write every copy under this directory instead of the configured targets
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Only this language
        #[arg(short, long)]
        language: Option<Language>,

        /// Only this definition
        #[arg(short, long)]
        definition: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = DefinitionsConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::List => {
            let registry = config.registry()?;
            for definition in registry.definitions() {
                println!(
                    "{:<24} v{:<8} {} ({})",
                    definition.id,
                    definition.version.to_string(),
                    definition.exchange.name,
                    definition.exchange.kind
                );
            }
            Ok(())
        }

        Commands::Show { id, format } => {
            let registry = config.registry()?;
            let definition = lookup(&registry, &id)?;
            let format = match format.as_deref() {
                Some("json") => OutputFormat::Json,
                Some("text") => OutputFormat::Text,
                Some(other) => bail!("unknown format '{}' (expected text or json)", other),
                None => config.output.format,
            };

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(definition)?),
                OutputFormat::Text => print_definition(definition),
            }
            Ok(())
        }

        Commands::Validate { paths } => {
            if paths.is_empty() {
                let registry = config.registry()?;
                println!("✅ {} definition(s) valid", registry.len());
                println!("   Fingerprint: {}", registry.fingerprint().short());
                return Ok(());
            }

            let mut definitions = Vec::new();
            for path in &paths {
                definitions.extend(load_path(path)?);
            }
            for definition in &definitions {
                println!("✅ {} v{} ({})", definition.id, definition.version, definition.fingerprint().short());
            }

            // Ids and exchange names must also be unique across the set
            let registry = ExchangeRegistry::from_definitions(definitions)?;
            println!("\n{} definition(s) valid", registry.len());
            Ok(())
        }

        Commands::Generate {
            out_dir,
            language,
            definition,
        } => {
            let registry = config.registry()?;
            if let Some(id) = &definition {
                lookup(&registry, id)?;
            }

            let wanted_language = |l: Language| language.map_or(true, |wanted| wanted == l);
            let wanted_definition = |d: &str| definition.as_deref().map_or(true, |wanted| wanted == d);

            let mut written = 0;
            let mut unchanged = 0;

            if let Some(out_dir) = out_dir {
                for def in registry.definitions().filter(|d| wanted_definition(&d.id)) {
                    for lang in Language::ALL.into_iter().filter(|l| wanted_language(*l)) {
                        let copy = generate(def, lang, &config.render);
                        let path = out_dir.join(lang.as_str()).join(lang.file_name(def));
                        if copy.write_to(&path)? {
                            written += 1;
                        } else {
                            unchanged += 1;
                        }
                    }
                }
            } else {
                if config.targets.is_empty() {
                    bail!("no [[targets]] configured; pass --out-dir to write every copy");
                }
                for target in config
                    .targets
                    .iter()
                    .filter(|t| wanted_language(t.language) && wanted_definition(&t.definition))
                {
                    let def = registry.require(&target.definition)?;
                    let copy = generate(def, target.language, &target.render_profile(&config.render));
                    if copy
                        .write_to(&target.path)
                        .with_context(|| format!("writing {}", target.path.display()))?
                    {
                        written += 1;
                    } else {
                        unchanged += 1;
                    }
                }
            }

            info!(written, unchanged, "generation finished");
            println!("✅ {} written, {} unchanged", written, unchanged);
            Ok(())
        }
    }
}

/// Resolve an id or exchange name, with a suggestion when neither matches
fn lookup<'a>(registry: &'a ExchangeRegistry, id: &str) -> Result<&'a ExchangeDefinition> {
    if let Some(definition) = registry.get(id).or_else(|| registry.by_exchange_name(id)) {
        return Ok(definition);
    }
    match registry.suggest(id) {
        Some(suggestion) => bail!("unknown definition '{}' (did you mean '{}'?)", id, suggestion),
        None => bail!("unknown definition '{}'", id),
    }
}

fn load_path(path: &Path) -> Result<Vec<ExchangeDefinition>> {
    if path.is_dir() {
        ExchangeDefinition::load_dir(path).with_context(|| format!("validating {}", path.display()))
    } else {
        let definition =
            ExchangeDefinition::from_file(path).with_context(|| format!("validating {}", path.display()))?;
        Ok(vec![definition])
    }
}

fn print_definition(definition: &ExchangeDefinition) {
    let info = &definition.exchange;
    println!("{} v{}", definition.id, definition.version);
    println!("  exchange:    {}", info.name);
    println!("  kind:        {}", info.kind);
    println!("  durable:     {}", info.durable);
    println!("  auto_delete: {}", info.auto_delete);
    println!("  internal:    {}", info.internal);
    println!("  fingerprint: {}", definition.fingerprint());

    println!("\n  routing keys:");
    for key in &definition.keys {
        println!("    {} = {:?}", key.ident, key.value);
    }

    for vocabulary in &definition.vocabularies {
        println!("\n  {}:", vocabulary.qualified_name());
        for literal in &vocabulary.literals {
            println!("    {} = {:?}", literal.ident, literal.value);
        }
    }
}
