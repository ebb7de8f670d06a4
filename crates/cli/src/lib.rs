pub mod commands;

use clap::{Parser, Subcommand};
use repricer_core::config::{AppConfig, LoadOptions, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "repricer",
    about = "Precious-metals repricer CLI",
    long_about = "Recompute retail prices for a product-catalog export from a pricing reference table and current gold/silver spot prices.",
    after_help = "Examples:\n  repricer process --reference reference.csv --products products_export.csv --gold 2000 --silver 25 --out repriced.csv\n  repricer tiers --gold 2000 --silver 25\n  repricer config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Reprice a product export against a reference table and write the updated CSV"
    )]
    Process {
        #[arg(long, help = "Path to the pricing reference CSV (Latin-1)")]
        reference: PathBuf,
        #[arg(long, help = "Path to the product export CSV (Latin-1)")]
        products: PathBuf,
        #[arg(long, help = "Gold spot price per oz (default: spot.gold from config)")]
        gold: Option<String>,
        #[arg(long, help = "Silver spot price per oz (default: spot.silver from config)")]
        silver: Option<String>,
        #[arg(long, help = "Path the repriced CSV is written to")]
        out: PathBuf,
        #[arg(long, help = "Pretty-print the statistics payload")]
        pretty_stats: bool,
    },
    #[command(about = "Print the gold and silver multiplier tier tables for given spot prices")]
    Tiers {
        #[arg(long, help = "Gold spot price per oz")]
        gold: String,
        #[arg(long, help = "Silver spot price per oz")]
        silver: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Process { reference, products, gold, silver, out, pretty_stats } => {
            commands::process::run(
                &config,
                commands::process::ProcessArgs {
                    reference,
                    products,
                    gold,
                    silver,
                    out,
                    pretty_stats,
                },
            )
        }
        Command::Tiers { gold, silver } => commands::tiers::run(&gold, &silver),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(&config) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}
