//! Fremantle CLI binary.
//!
//! Batch-parses already-downloaded EDGAR company-facts files into reports.

mod inputs;

use clap::{Parser, Subcommand, ValueEnum};
use fremantle::metrics::{Statement, metrics_by_statement};
use fremantle::output::{ExportFormat, Exporter};
use fremantle::{FilingParser, FiscalYearGrouping, ParserConfig};
use indicatif::{ProgressBar, ProgressStyle};
use inputs::{collect_inputs, output_path};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fremantle")]
#[command(about = "Fremantle: EDGAR XBRL metric extraction", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug events (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse company-facts JSON files or directories of them
    Parse {
        /// Input files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Directory parsed reports are written to
        #[arg(short, long, default_value = "parsed")]
        output_dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Skip quarterly (10-Q) periods
        #[arg(long)]
        annual_only: bool,

        /// Group quarters by calendar year instead of reported fiscal year ends
        #[arg(long)]
        calendar_year: bool,

        /// Do not print per-company summaries
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the extracted metrics and their candidate tags
    Metrics,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::PrettyJson,
            OutputFormat::Csv => Self::Csv,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Parse {
            paths,
            output_dir,
            format,
            annual_only,
            calendar_year,
            quiet,
        } => {
            let mut config = if annual_only {
                ParserConfig::annual_only()
            } else {
                ParserConfig::default()
            };
            if calendar_year {
                config.fiscal_year_grouping = FiscalYearGrouping::CalendarYear;
            }
            parse_all(&paths, &output_dir, format.into(), config, quiet)?;
        }
        Commands::Metrics => list_metrics(),
    }

    Ok(())
}

fn parse_all(
    paths: &[PathBuf],
    output_dir: &Path,
    format: ExportFormat,
    config: ParserConfig,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = collect_inputs(paths)?;
    if inputs.is_empty() {
        return Err("no company-facts files found".into());
    }
    std::fs::create_dir_all(output_dir)?;

    let parser = FilingParser::with_config(config);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(inputs.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut failed = 0usize;
    for input in &inputs {
        pb.set_message(input.display().to_string());
        let output = output_path(output_dir, input, format.extension());

        match parse_one(&parser, input, &output, format) {
            Ok(summary) => {
                info!(input = %input.display(), output = %output.display(), "report written");
                if !quiet {
                    pb.suspend(|| println!("{summary}"));
                }
            }
            Err(e) => {
                failed += 1;
                error!(input = %input.display(), error = %e, "failed to parse");
                pb.suspend(|| eprintln!("Failed: {}: {}", input.display(), e));
            }
        }
        pb.inc(1);
    }

    let parsed = inputs.len() - failed;
    pb.finish_with_message(format!("Parsed {parsed} of {} files", inputs.len()));

    if !quiet {
        println!("Reports written to {}", output_dir.display());
    }

    if failed > 0 {
        return Err(format!("{failed} of {} files failed to parse", inputs.len()).into());
    }
    Ok(())
}

/// Parse one file and write its report, returning the rendered summary.
fn parse_one(
    parser: &FilingParser,
    input: &Path,
    output: &Path,
    format: ExportFormat,
) -> fremantle::Result<String> {
    let report = parser.parse_file(input)?;
    report.export_to_file(output, format)?;
    Ok(report.to_ascii_table())
}

fn list_metrics() {
    for statement in [Statement::IncomeStatement, Statement::BalanceSheet] {
        println!("{}", statement);
        println!("{}\n", "=".repeat(statement.to_string().len()));

        for metric in metrics_by_statement(statement) {
            let cumulative = if metric.cumulative {
                " (year-to-date in 10-Q)"
            } else {
                ""
            };
            println!("{}{}", metric.name, cumulative);
            println!("  {}", metric.description);
            println!("  Tags: {}\n", metric.candidate_tags.join(", "));
        }
    }
}
