use serde::Serialize;

/// Per-run propagation counters. Computed once per invocation and returned
/// to the caller alongside the repriced export; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub successful_updates: u64,
    pub skipped_blank_sku: u64,
    pub skipped_no_match: u64,
    pub total_rows: u64,
    pub reference_rows: u64,
}

impl RunStats {
    /// Every product row lands in exactly one counter bucket.
    pub fn is_conserved(&self) -> bool {
        self.successful_updates + self.skipped_blank_sku + self.skipped_no_match == self.total_rows
    }
}
