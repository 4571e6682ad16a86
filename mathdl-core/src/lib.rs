pub mod archive;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use catalog::{Candidate, Catalog, CategoryTable, Month};
pub use config::{Config, InstanceConfig};
pub use error::CoreError;
pub use pipeline::{ProgressCallback, RunOptions, run_instance};
pub use report::RunReport;
