use thiserror::Error;

use crate::table::{TableError, TableKind};

/// Logical columns the reference export must carry for a run to proceed.
pub const REFERENCE_COLUMNS: [&str; 7] = [
    "Stock ID",
    "Metal",
    "Price Per Unit",
    "Gold Market",
    "Date Created",
    "Date Last Price Change",
    "Last Stocked",
];

/// Logical columns of the product export; both are synthesized when absent,
/// so they are named in error text only as guidance.
pub const PRODUCT_COLUMNS: [&str; 2] = ["Variant SKU", "Variant Price"];

/// Terminal failures for a repricing run. Field-level data problems (bad
/// dates, bad numerics) never surface here; they collapse to documented
/// defaults during normalization.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "{kind} file is missing required columns: {}. expected reference columns: {}; expected product columns: {}",
        .missing.join(", "),
        REFERENCE_COLUMNS.join(", "),
        PRODUCT_COLUMNS.join(", ")
    )]
    MissingColumns { kind: TableKind, missing: Vec<String> },
    #[error(transparent)]
    Table(#[from] TableError),
}

#[cfg(test)]
mod tests {
    use super::PipelineError;
    use crate::table::TableKind;

    #[test]
    fn missing_columns_message_names_both_expected_column_sets() {
        let error = PipelineError::MissingColumns {
            kind: TableKind::Reference,
            missing: vec!["Stock ID".to_string(), "Metal".to_string()],
        };

        let message = error.to_string();
        assert!(message.contains("reference file is missing required columns: Stock ID, Metal"));
        assert!(message.contains("Date Last Price Change"));
        assert!(message.contains("Variant SKU, Variant Price"));
    }
}
