pub mod config;
pub mod domain;
pub mod errors;
pub mod pipeline;
pub mod table;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::reference::ReferenceRow;
pub use domain::stats::RunStats;
pub use errors::{PipelineError, PRODUCT_COLUMNS, REFERENCE_COLUMNS};
pub use pipeline::tiers::{MultiplierTable, PriceTier};
pub use pipeline::{process, process_with_today, PipelineInput, PipelineOutput};
pub use table::{Frame, TableError, TableKind};
