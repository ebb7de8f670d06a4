pub mod reference;
pub mod stats;
