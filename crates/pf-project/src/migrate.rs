//! Schema migration framework.

use crate::ProjectError;
use crate::schema::PipelineDef;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut pipeline: PipelineDef) -> Result<PipelineDef, ProjectError> {
    while pipeline.version < LATEST_VERSION {
        pipeline = migrate_one_version(pipeline)?;
    }
    Ok(pipeline)
}

fn migrate_one_version(pipeline: PipelineDef) -> Result<PipelineDef, ProjectError> {
    match pipeline.version {
        0 => migrate_v0_to_v1(pipeline),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut pipeline: PipelineDef) -> Result<PipelineDef, ProjectError> {
    pipeline.version = 1;
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FluidDef, FlowTypeDef, PhaseDef, UnitValueDef};

    fn bare(version: u32) -> PipelineDef {
        PipelineDef {
            version,
            name: "p".into(),
            fluid: FluidDef {
                species: "CH4".into(),
                phase: PhaseDef::Gas,
                temperature: UnitValueDef::new(60.0, "F"),
                molecular_weight: None,
            },
            flow_type: FlowTypeDef::Compressible,
            ambient_pressure: None,
            segments: vec![],
            solver: None,
        }
    }

    #[test]
    fn v0_upgrades() {
        let p = migrate_to_latest(bare(0)).unwrap();
        assert_eq!(p.version, LATEST_VERSION);
    }

    #[test]
    fn latest_untouched() {
        let p = bare(LATEST_VERSION);
        assert_eq!(migrate_to_latest(p.clone()).unwrap(), p);
    }
}
