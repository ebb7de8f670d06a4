use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use repricer_core::config::AppConfig;
use repricer_core::pipeline::{self, PipelineInput};
use repricer_core::RunStats;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug)]
pub struct ProcessArgs {
    pub reference: PathBuf,
    pub products: PathBuf,
    pub gold: Option<String>,
    pub silver: Option<String>,
    pub out: PathBuf,
    pub pretty_stats: bool,
}

#[derive(Debug, Serialize)]
struct ProcessReport {
    command: &'static str,
    status: &'static str,
    output_path: String,
    stats: RunStats,
}

pub fn run(config: &AppConfig, args: ProcessArgs) -> CommandResult {
    let gold = match resolve_spot("process", "gold", args.gold.as_deref(), config.spot.gold) {
        Ok(value) => value,
        Err(result) => return result,
    };
    let silver = match resolve_spot("process", "silver", args.silver.as_deref(), config.spot.silver) {
        Ok(value) => value,
        Err(result) => return result,
    };

    let reference_csv = match read_input(&args.reference) {
        Ok(bytes) => bytes,
        Err(error) => return CommandResult::failure("process", "io", format!("{error:#}"), 3),
    };
    let products_csv = match read_input(&args.products) {
        Ok(bytes) => bytes,
        Err(error) => return CommandResult::failure("process", "io", format!("{error:#}"), 3),
    };

    let output = match pipeline::process(PipelineInput {
        reference_csv: &reference_csv,
        products_csv: &products_csv,
        gold_spot: gold,
        silver_spot: silver,
    }) {
        Ok(output) => output,
        // structural failure: no output artifact is written
        Err(error) => return CommandResult::failure("process", "pipeline", error.to_string(), 4),
    };

    if let Err(error) = fs::write(&args.out, &output.products_csv)
        .with_context(|| format!("could not write output file `{}`", args.out.display()))
    {
        return CommandResult::failure("process", "io", format!("{error:#}"), 3);
    }

    tracing::info!(
        event_name = "cli.process.completed",
        successful_updates = output.stats.successful_updates,
        skipped_blank_sku = output.stats.skipped_blank_sku,
        skipped_no_match = output.stats.skipped_no_match,
        "repricing run completed"
    );

    let report = ProcessReport {
        command: "process",
        status: "ok",
        output_path: args.out.display().to_string(),
        stats: output.stats,
    };
    let payload = if args.pretty_stats {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match payload {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("process", "serialization", error.to_string(), 5),
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("could not read input file `{}`", path.display()))
}

/// Spot prices must be strictly positive before the pipeline runs; the flag
/// wins over the configured default.
pub(crate) fn resolve_spot(
    command: &'static str,
    metal: &str,
    flag: Option<&str>,
    configured: Option<Decimal>,
) -> Result<Decimal, CommandResult> {
    let value = match flag {
        Some(raw) => match Decimal::from_str(raw.trim()) {
            Ok(value) => value,
            Err(error) => {
                return Err(CommandResult::failure(
                    command,
                    "invalid_spot_price",
                    format!("could not parse {metal} spot price `{raw}`: {error}"),
                    2,
                ))
            }
        },
        None => match configured {
            Some(value) => value,
            None => {
                return Err(CommandResult::failure(
                    command,
                    "invalid_spot_price",
                    format!(
                        "no {metal} spot price given; pass --{metal} or set spot.{metal} in repricer.toml"
                    ),
                    2,
                ))
            }
        },
    };

    if value <= Decimal::ZERO {
        return Err(CommandResult::failure(
            command,
            "invalid_spot_price",
            format!("{metal} spot price must be strictly positive, got {value}"),
            2,
        ));
    }
    Ok(value)
}
