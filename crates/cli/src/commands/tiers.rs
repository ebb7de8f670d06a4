use repricer_core::MultiplierTable;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::{process::resolve_spot, CommandResult};

#[derive(Debug, Serialize)]
struct TierRow {
    breakpoint: Decimal,
    multiplier: Decimal,
}

#[derive(Debug, Serialize)]
struct TiersReport {
    command: &'static str,
    status: &'static str,
    gold: Vec<TierRow>,
    silver: Vec<TierRow>,
}

/// Operator aid: shows the exact breakpoints a pair of spot prices
/// generates, matching what a `process` run would use.
pub fn run(gold: &str, silver: &str) -> CommandResult {
    let gold_spot = match resolve_spot("tiers", "gold", Some(gold), None) {
        Ok(value) => value,
        Err(result) => return result,
    };
    let silver_spot = match resolve_spot("tiers", "silver", Some(silver), None) {
        Ok(value) => value,
        Err(result) => return result,
    };

    let report = TiersReport {
        command: "tiers",
        status: "ok",
        gold: rows(&MultiplierTable::gold(gold_spot)),
        silver: rows(&MultiplierTable::silver(silver_spot)),
    };

    match serde_json::to_string_pretty(&report) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("tiers", "serialization", error.to_string(), 5),
    }
}

fn rows(table: &MultiplierTable) -> Vec<TierRow> {
    table
        .tiers()
        .iter()
        .map(|tier| TierRow {
            breakpoint: tier.breakpoint.round_dp(2),
            multiplier: tier.multiplier,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn prints_both_tables_with_nine_tiers_each() {
        let result = run("2000", "25");
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.output.matches("breakpoint").count(), 18);
        // top silver tier: breakpoint equals the spot with multiplier 1
        assert!(result.output.contains("\"25\""));
    }

    #[test]
    fn rejects_non_positive_spot_prices() {
        let result = run("-5", "25");
        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("strictly positive"));
    }
}
