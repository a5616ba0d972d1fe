//! iqcompare CLI: aggregate per-image quality metrics across uploads.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use iqcompare::{
    AveragedMetric, Availability, Chart, CompareConfig, Comparison, MetricField, TableFormat,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "iqcompare")]
#[command(about = "Average, normalize and compare image-quality metrics per model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate metric files and print a comparison table.
    Compare(CliCompareArgs),

    /// Print the metric catalogue.
    Fields,

    /// Parse metric files and report per-file record counts.
    Validate {
        /// Metric files (JSON arrays of records).
        #[arg(long = "input", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct CliCompareArgs {
    /// Metric files (JSON arrays of records).
    #[arg(long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Engine configuration (JSON). Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write averages, availability and chart payloads (JSON).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Table syntax.
    #[arg(long, value_enum, default_value_t = TableFormatArg::Plain)]
    table_format: TableFormatArg,

    /// Write the table to this file instead of stdout.
    #[arg(long)]
    table_out: Option<PathBuf>,

    /// Decimal places in table cells.
    #[arg(long)]
    precision: Option<usize>,

    /// Token printed for missing cells.
    #[arg(long)]
    missing: Option<String>,

    /// Model name for records without `model` or `method`.
    #[arg(long)]
    fallback_model: Option<String>,

    /// Exit with an error if no records were accepted.
    #[arg(long)]
    fail_on_empty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableFormatArg {
    Plain,
    Markdown,
    Latex,
}

impl TableFormatArg {
    fn to_core(self) -> TableFormat {
        match self {
            Self::Plain => TableFormat::Plain,
            Self::Markdown => TableFormat::Markdown,
            Self::Latex => TableFormat::Latex,
        }
    }
}

impl CliCompareArgs {
    /// File config (or defaults) with flag overrides applied.
    fn to_config(&self) -> CliResult<CompareConfig> {
        let mut config = match &self.config {
            Some(path) => CompareConfig::from_json_file(path)?,
            None => CompareConfig::default(),
        };
        if let Some(precision) = self.precision {
            config.table.precision = precision;
        }
        if let Some(missing) = &self.missing {
            config.table.missing_token = missing.clone();
        }
        if let Some(fallback) = &self.fallback_model {
            config.fallback_model = fallback.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Document written by `compare --out`.
#[derive(serde::Serialize)]
struct CompareOutput<'a> {
    models: &'a [String],
    averaged: &'a [AveragedMetric],
    availability: &'a Availability,
    charts: &'a [Chart],
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare(args) => run_compare(&args),
        Commands::Fields => run_fields(),
        Commands::Validate { inputs } => run_validate(&inputs),
    }
}

// ── subcommands ─────────────────────────────────────────────────────────

fn run_fields() -> CliResult<()> {
    println!(
        "{:<28} {:<22} {:<9} {:<7} family",
        "key", "label", "shape", "better"
    );
    for field in MetricField::ALL {
        println!(
            "{:<28} {:<22} {:<9} {:<7} {:?}",
            field.key(),
            field.label(),
            format!("{:?}", field.shape()),
            match field.direction() {
                iqcompare::Direction::HigherIsBetter => "higher",
                iqcompare::Direction::LowerIsBetter => "lower",
            },
            field.family(),
        );
    }
    Ok(())
}

fn run_validate(inputs: &[PathBuf]) -> CliResult<()> {
    let fallback = CompareConfig::default().fallback_model;
    let outcomes = iqcompare::load_batches(inputs, &fallback);
    let mut failed = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(records) => {
                let with_metrics = records.iter().filter(|r| !r.metrics.is_empty()).count();
                println!(
                    "{}: {} records ({} with metrics)",
                    outcome.path.display(),
                    records.len(),
                    with_metrics
                );
            }
            Err(err) => {
                failed += 1;
                println!("{}: error: {err}", outcome.path.display());
            }
        }
    }
    if failed > 0 {
        return Err(format!("{failed} of {} file(s) failed to parse", outcomes.len()).into());
    }
    Ok(())
}

fn run_compare(args: &CliCompareArgs) -> CliResult<()> {
    let config = args.to_config()?;
    let mut cmp = Comparison::with_config(config)?;
    tracing::debug!("Effective config: {:?}", cmp.config());

    tracing::info!("Loading {} metric file(s)", args.inputs.len());
    let report = cmp.load_files(&args.inputs);
    tracing::info!(
        "Accepted {}/{} file(s), {} records, {} model(s)",
        report.accepted_batches,
        args.inputs.len(),
        report.records_appended,
        cmp.model_names().len(),
    );
    if report.has_rejections() {
        eprintln!("{} file(s) rejected:", report.rejected.len());
        for (path, err) in &report.rejected {
            eprintln!("  {}: {}", path.display(), err);
        }
    }

    if args.fail_on_empty && cmp.records().is_empty() {
        return Err("no records were accepted".into());
    }

    let table = cmp.render_table(args.table_format.to_core());
    match &args.table_out {
        Some(path) => {
            std::fs::write(path, &table)?;
            tracing::info!("Table written to {}", path.display());
        }
        None => print!("{table}"),
    }

    if let Some(out) = &args.out {
        let snapshot = cmp.snapshot();
        let doc = CompareOutput {
            models: snapshot.model_names(),
            averaged: snapshot.averaged_metrics(),
            availability: &snapshot.availability,
            charts: &snapshot.charts,
        };
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(out, &json)?;
        tracing::info!("Results written to {}", out.display());
    }

    Ok(())
}
