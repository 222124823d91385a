mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::allocate::AllocateArgs;
use commands::schedule::ScheduleArgs;

/// Debt amortization calculations for Budget Pro
#[derive(Parser)]
#[command(
    name = "bpro",
    version,
    about = "Debt amortization calculations for Budget Pro",
    long_about = "A CLI for the Budget Pro debt engine with decimal precision. \
                  Builds full amortization schedules (annuity, constant-principal, \
                  interest-only, balloon) and allocates payments across the \
                  fees/interest/insurance/principal waterfall."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a full amortization schedule for a loan
    Schedule(ScheduleArgs),
    /// Allocate a payment across the fees/interest/insurance/principal waterfall
    Allocate(AllocateArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Allocate(args) => commands::allocate::run_allocate(args),
        Commands::Version => {
            println!("bpro {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
