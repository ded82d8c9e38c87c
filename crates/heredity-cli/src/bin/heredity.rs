//! Heredity CLI - posterior gene and trait probabilities for a pedigree file
//!
//! Usage:
//!   heredity <file>                         # Print marginals for every person
//!   heredity <file> --model model.json      # Use custom model tables
//!   heredity <file> --mutation-rate 0.02    # Override the mutation rate
//!   heredity <file> -o json                 # Output marginals and diagnostics as JSON
//!   heredity <file> --log-domain            # Sum probabilities as logs

use clap::{Parser, ValueEnum};
use heredity_core::{
    infer_with_options, parse_and_build, Evidence, InferenceDiagnostics, InferenceError,
    InferenceOptions, InheritanceModel, Marginals, Summation,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "heredity")]
#[command(version)]
#[command(about = "Heredity - exact gene and trait inference over a family pedigree")]
#[command(
    long_about = "Reads a pedigree CSV (name,mother,father,trait) and prints each person's \
                  posterior distribution over gene copies and trait presence"
)]
struct Cli {
    /// Input pedigree CSV file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// JSON file with model tables (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Override the model's mutation rate
    #[arg(long, value_name = "RATE")]
    mutation_rate: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary, value_name = "FORMAT")]
    output: OutputFormat,

    /// Enumerate on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Accumulate probabilities in the log domain
    #[arg(long)]
    log_domain: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(message) = run(&cli) {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = std::fs::read_to_string(&cli.file)
        .map_err(|e| format!("Error reading file '{}': {}", cli.file.display(), e))?;

    let mut model = match &cli.model {
        Some(path) => load_model(path)?,
        None => InheritanceModel::default(),
    };
    if let Some(rate) = cli.mutation_rate {
        model = model.with_mutation_rate(rate);
    }

    let pedigree = parse_and_build(&source).map_err(|e| format!("Pedigree error: {}", e))?;
    tracing::info!(
        file = %cli.file.display(),
        persons = pedigree.len(),
        "loaded pedigree"
    );

    let mut options = if cli.sequential {
        InferenceOptions::sequential()
    } else {
        InferenceOptions::default()
    };
    if cli.log_domain {
        options.summation = Summation::LogDomain;
    }
    let evidence = Evidence::from_pedigree(&pedigree);
    let (marginals, diagnostics) = infer_with_options(&pedigree, &evidence, &model, options)
        .map_err(|e| match e {
            InferenceError::InvalidConfiguration { .. } => format!("Model error: {}", e),
            other => format!("Inference error: {}", other),
        })?;

    match cli.output {
        OutputFormat::Summary => print_summary(&marginals),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&format_result(&marginals, &diagnostics))
                .map_err(|e| format!("Error serializing to JSON: {}", e))?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn load_model(path: &Path) -> Result<InheritanceModel, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading model '{}': {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing model '{}': {}", path.display(), e))
}

/// Prints gene copies from 2 down to 0, then trait True before False.
fn print_summary(marginals: &Marginals) {
    for person in marginals {
        println!("{}:", person.name);
        println!("  Gene:");
        println!("    2: {:.4}", person.gene.two);
        println!("    1: {:.4}", person.gene.one);
        println!("    0: {:.4}", person.gene.zero);
        println!("  Trait:");
        println!("    True: {:.4}", person.trait_.present);
        println!("    False: {:.4}", person.trait_.absent);
    }
}

/// Format marginals and diagnostics for JSON serialization
fn format_result(marginals: &Marginals, diagnostics: &InferenceDiagnostics) -> serde_json::Value {
    use serde_json::json;
    json!({
        "persons": marginals.iter().collect::<Vec<_>>(),
        "diagnostics": diagnostics,
    })
}
