pub mod normalize;
pub mod propagate;
pub mod sanitize;
pub mod tiers;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::stats::RunStats;
use crate::errors::PipelineError;
use crate::table::{Frame, TableKind};

use self::tiers::MultiplierTable;

#[derive(Clone, Copy, Debug)]
pub struct PipelineInput<'a> {
    /// Pricing reference export, Latin-1 encoded CSV.
    pub reference_csv: &'a [u8],
    /// Product catalog export, Latin-1 encoded CSV.
    pub products_csv: &'a [u8],
    pub gold_spot: Decimal,
    pub silver_spot: Decimal,
}

#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// The product export with updated prices and sanitized text, original
    /// column set and row order preserved.
    pub products_csv: Vec<u8>,
    pub stats: RunStats,
}

/// Runs the full repricing pipeline against the local calendar date.
///
/// Spot prices are assumed strictly positive; callers validate before
/// invoking. A non-positive spot yields a degenerate tier table, not an
/// error.
pub fn process(input: PipelineInput<'_>) -> Result<PipelineOutput, PipelineError> {
    process_with_today(input, Local::now().date_naive())
}

/// Same as [`process`] with the processing date supplied explicitly, which
/// keeps the future-dated-row cutoff deterministic under test.
pub fn process_with_today(
    input: PipelineInput<'_>,
    today: NaiveDate,
) -> Result<PipelineOutput, PipelineError> {
    let reference_frame = Frame::from_latin1_csv(input.reference_csv, TableKind::Reference)?;
    let mut products = Frame::from_latin1_csv(input.products_csv, TableKind::Products)?;

    let rows = normalize::parse_reference(&reference_frame)?;
    let mut rows = normalize::normalize_reference(rows, today);
    tracing::info!(
        event_name = "pipeline.reference_normalized",
        reference_rows = rows.len(),
        "reference table parsed and normalized"
    );

    let gold = MultiplierTable::gold(input.gold_spot);
    let silver = MultiplierTable::silver(input.silver_spot);
    tiers::resolve_multipliers(&mut rows, &gold, &silver);
    tiers::apply_pricing(&mut rows);
    tracing::info!(
        event_name = "pipeline.prices_computed",
        reference_rows = rows.len(),
        "tier multipliers resolved and new prices computed"
    );

    let outcome = propagate::propagate_prices(&mut products, &rows);
    sanitize::sanitize_frame(&mut products);
    tracing::info!(
        event_name = "pipeline.prices_propagated",
        successful_updates = outcome.successful_updates,
        skipped_blank_sku = outcome.skipped_blank_sku,
        skipped_no_match = outcome.skipped_no_match,
        "prices propagated into the product export"
    );

    let stats = RunStats {
        successful_updates: outcome.successful_updates,
        skipped_blank_sku: outcome.skipped_blank_sku,
        skipped_no_match: outcome.skipped_no_match,
        total_rows: products.len() as u64,
        reference_rows: rows.len() as u64,
    };

    Ok(PipelineOutput { products_csv: products.to_csv()?, stats })
}
