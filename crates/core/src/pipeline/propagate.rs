use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::reference::ReferenceRow;
use crate::pipeline::tiers::round_price;
use crate::table::Frame;

pub const SKU_COLUMN: &str = "Variant SKU";
pub const PRICE_COLUMN: &str = "Variant Price";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationOutcome {
    pub successful_updates: u64,
    pub skipped_blank_sku: u64,
    pub skipped_no_match: u64,
}

/// Writes each reference row's new price into the product export by SKU.
/// Rows are never added or removed; only the price column is touched, and a
/// row with a blank or unmatched SKU keeps its original price. Every price
/// cell in the output (updated or not) is re-rendered rounded to two
/// decimals, with unparsable originals rendered empty.
pub fn propagate_prices(products: &mut Frame, reference: &[ReferenceRow]) -> PropagationOutcome {
    let sku_column = products.ensure_column(SKU_COLUMN, "");
    let price_column = products.ensure_column(PRICE_COLUMN, "0");

    let mut prices: Vec<Option<Decimal>> =
        (0..products.len()).map(|row| parse_price_cell(products.cell(row, price_column))).collect();

    // one entry per unique non-empty stock id; normalization already
    // guarantees uniqueness, later duplicates would overwrite earlier ones
    let lookup: HashMap<&str, Decimal> = reference
        .iter()
        .filter(|row| !row.stock_id.is_empty())
        .filter_map(|row| row.new_price.map(|price| (row.stock_id.as_str(), price)))
        .collect();

    let mut outcome = PropagationOutcome::default();
    for row in 0..products.len() {
        let sku = normalize_sku(products.cell(row, sku_column));
        products.set_cell(row, sku_column, sku.clone());

        if sku.is_empty() {
            outcome.skipped_blank_sku += 1;
            continue;
        }
        match lookup.get(sku.as_str()) {
            Some(&price) => {
                prices[row] = Some(price);
                outcome.successful_updates += 1;
            }
            None => outcome.skipped_no_match += 1,
        }
    }

    for (row, price) in prices.into_iter().enumerate() {
        let rendered = price.map(|value| format!("{:.2}", round_price(value))).unwrap_or_default();
        products.set_cell(row, price_column, rendered);
    }

    outcome
}

fn parse_price_cell(raw: &str) -> Option<Decimal> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    Decimal::from_str(value).ok()
}

/// Trims the SKU and resets the literal stringified-missing marker `nan`
/// to empty.
fn normalize_sku(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "nan" {
        String::new()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::reference::ReferenceRow;
    use crate::table::Frame;

    use super::{propagate_prices, PropagationOutcome};

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal literal")
    }

    fn priced_row(stock_id: &str, new_price: &str) -> ReferenceRow {
        let mut row = ReferenceRow::new(stock_id, "14K", Decimal::ONE, None, None);
        row.new_price = Some(dec(new_price));
        row
    }

    fn products(rows: &[[&str; 3]]) -> Frame {
        Frame::new(
            vec!["Title".to_string(), "Variant SKU".to_string(), "Variant Price".to_string()],
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn updates_matches_and_counts_every_row_once() {
        let mut frame = products(&[
            ["Ring", "ABC1", "5.00"],
            ["Chain", "", "7.50"],
            ["Coin", "ZZZ", "9.99"],
            ["Bar", "nan", "1.00"],
        ]);
        let reference = vec![priced_row("ABC1", "10.00")];

        let outcome = propagate_prices(&mut frame, &reference);

        assert_eq!(
            outcome,
            PropagationOutcome {
                successful_updates: 1,
                skipped_blank_sku: 2,
                skipped_no_match: 1,
            }
        );
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.cell(0, 2), "10.00");
        assert_eq!(frame.cell(1, 2), "7.50");
        assert_eq!(frame.cell(2, 2), "9.99");
        // "nan" SKU resets to blank and its price stays put
        assert_eq!(frame.cell(3, 1), "");
        assert_eq!(frame.cell(3, 2), "1.00");
    }

    #[test]
    fn synthesizes_missing_sku_and_price_columns() {
        let mut frame = Frame::new(
            vec!["Title".to_string()],
            vec![vec!["Ring".to_string()], vec!["Chain".to_string()]],
        );

        let outcome = propagate_prices(&mut frame, &[]);

        assert_eq!(frame.columns(), ["Title", "Variant SKU", "Variant Price"]);
        assert_eq!(outcome.skipped_blank_sku, 2);
        assert_eq!(frame.cell(0, 2), "0.00");
    }

    #[test]
    fn untouched_prices_are_rerendered_to_two_decimals() {
        let mut frame = products(&[["Ring", "ZZZ", "5.5"], ["Coin", "YYY", "junk"]]);

        let outcome = propagate_prices(&mut frame, &[]);

        assert_eq!(outcome.skipped_no_match, 2);
        assert_eq!(frame.cell(0, 2), "5.50");
        // unparsable original renders as a missing value
        assert_eq!(frame.cell(1, 2), "");
    }

    #[test]
    fn sku_whitespace_is_trimmed_before_matching() {
        let mut frame = products(&[["Ring", "  ABC1  ", "5.00"]]);
        let reference = vec![priced_row("ABC1", "12.34")];

        let outcome = propagate_prices(&mut frame, &reference);

        assert_eq!(outcome.successful_updates, 1);
        assert_eq!(frame.cell(0, 1), "ABC1");
        assert_eq!(frame.cell(0, 2), "12.34");
    }

    #[test]
    fn reference_rows_without_a_price_never_enter_the_lookup() {
        let mut frame = products(&[["Ring", "ABC1", "5.00"]]);
        let reference = vec![ReferenceRow::new("ABC1", "14K", Decimal::ONE, None, None)];

        let outcome = propagate_prices(&mut frame, &reference);

        assert_eq!(outcome.skipped_no_match, 1);
        assert_eq!(frame.cell(0, 2), "5.00");
    }
}
