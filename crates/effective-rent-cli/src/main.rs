mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::effective_rent::{CalculateArgs, ExportArgs};

/// Lease rent schedule and net effective rent analysis
#[derive(Parser)]
#[command(
    name = "ner",
    version,
    about = "Lease rent schedule and net effective rent analysis",
    long_about = "Computes a monthly lease rent schedule with annual escalations, \
                  free-rent concessions and TI amortization, and summarises it as \
                  net effective rent from the tenant's or landlord's perspective. \
                  Results can be printed or exported to CSV / XLSX."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the rent schedule and net effective rent
    Calculate(CalculateArgs),
    /// Write the rent schedule (and summary for XLSX) to a file
    Export(ExportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::effective_rent::run_calculate(args)
            .and_then(|out| output::format_output(&cli.output, &out)),
        Commands::Export(args) => commands::effective_rent::run_export(args).map(|path| {
            println!("{}", path.display());
        }),
        Commands::Version => {
            println!("ner {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
