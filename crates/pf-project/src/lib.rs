//! pf-project: pipeline configuration file format, validation and
//! compilation into a solver snapshot.

pub mod compile;
pub mod edit;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use compile::compile_pipeline;
pub use edit::{
    add_leak, close_all_valves, open_all_valves, remove_leak, set_leak_active, toggle_valve,
};
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_pipeline};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<PipelineDef> {
    let content = std::fs::read_to_string(path)?;
    let mut pipeline: PipelineDef = serde_yaml::from_str(&content)?;
    pipeline = migrate_to_latest(pipeline)?;
    validate_pipeline(&pipeline)?;
    Ok(pipeline)
}

pub fn save_yaml(path: &std::path::Path, pipeline: &PipelineDef) -> ProjectResult<()> {
    validate_pipeline(pipeline)?;
    let content = serde_yaml::to_string(pipeline)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<PipelineDef> {
    let content = std::fs::read_to_string(path)?;
    let mut pipeline: PipelineDef = serde_json::from_str(&content)?;
    pipeline = migrate_to_latest(pipeline)?;
    validate_pipeline(&pipeline)?;
    Ok(pipeline)
}

pub fn save_json(path: &std::path::Path, pipeline: &PipelineDef) -> ProjectResult<()> {
    validate_pipeline(pipeline)?;
    let content = serde_json::to_string_pretty(pipeline)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<PipelineDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
