//! pf-results: solve reports and their JSON persistence.

pub mod hash;
pub mod report;
pub mod store;
pub mod types;

pub use hash::config_fingerprint;
pub use report::{SOLVER_VERSION, build_report};
pub use store::{load_report, report_from_json, report_to_json, save_report};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
