//! Content-based fingerprint of a solved configuration.

use pf_project::schema::PipelineDef;
use sha2::{Digest, Sha256};

pub fn config_fingerprint(pipeline: &PipelineDef, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let pipeline_json = serde_json::to_string(pipeline).unwrap_or_default();
    hasher.update(pipeline_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
