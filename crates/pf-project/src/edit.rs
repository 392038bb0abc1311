//! Valve and leak edits on a configuration record.
//!
//! These only touch the persisted tree; compile again to solve the edited
//! pipeline.

use crate::schema::{LeakDef, PipelineDef, SegmentDef, ValveDef, ValvePositionDef, ValveStateDef};
use crate::{ProjectError, ProjectResult};

fn segment_mut<'a>(pipeline: &'a mut PipelineDef, name: &str) -> ProjectResult<&'a mut SegmentDef> {
    pipeline
        .segment_mut(name)
        .ok_or_else(|| ProjectError::NotFound {
            what: format!("segment '{name}'"),
        })
}

fn set_all_valves(pipeline: &mut PipelineDef, state: ValveStateDef) -> usize {
    let mut changed = 0;
    for valve in pipeline.segments.iter_mut().flat_map(|s| s.valves.iter_mut()) {
        if valve.state != state {
            valve.state = state;
            changed += 1;
        }
    }
    changed
}

/// Open every configured valve. Returns how many changed.
pub fn open_all_valves(pipeline: &mut PipelineDef) -> usize {
    set_all_valves(pipeline, ValveStateDef::Open)
}

/// Close every configured valve. Returns how many changed.
pub fn close_all_valves(pipeline: &mut PipelineDef) -> usize {
    set_all_valves(pipeline, ValveStateDef::Closed)
}

/// Flip the valve at `position` on `segment` and return its new state.
///
/// A missing valve behaves as open, so toggling one adds it closed.
pub fn toggle_valve(
    pipeline: &mut PipelineDef,
    segment: &str,
    position: ValvePositionDef,
) -> ProjectResult<ValveStateDef> {
    let seg = segment_mut(pipeline, segment)?;
    match seg.valves.iter_mut().find(|v| v.position == position) {
        Some(valve) => {
            valve.state = match valve.state {
                ValveStateDef::Open => ValveStateDef::Closed,
                ValveStateDef::Closed => ValveStateDef::Open,
            };
            Ok(valve.state)
        }
        None => {
            seg.valves.push(ValveDef {
                name: None,
                position,
                state: ValveStateDef::Closed,
            });
            Ok(ValveStateDef::Closed)
        }
    }
}

/// Append a leak to `segment` and return its index.
pub fn add_leak(pipeline: &mut PipelineDef, segment: &str, leak: LeakDef) -> ProjectResult<usize> {
    if !(0.0..=1.0).contains(&leak.location) {
        return Err(ProjectError::Validation(
            crate::ValidationError::InvalidValue {
                field: format!("segments[{segment}].leaks"),
                value: leak.location.to_string(),
                reason: "location must be in [0, 1]".to_string(),
            },
        ));
    }
    let seg = segment_mut(pipeline, segment)?;
    seg.leaks.push(leak);
    Ok(seg.leaks.len() - 1)
}

pub fn remove_leak(pipeline: &mut PipelineDef, segment: &str, index: usize) -> ProjectResult<LeakDef> {
    let seg = segment_mut(pipeline, segment)?;
    if index >= seg.leaks.len() {
        return Err(ProjectError::NotFound {
            what: format!("leak {index} on segment '{segment}'"),
        });
    }
    Ok(seg.leaks.remove(index))
}

/// Inactive leaks stay in the configuration but contribute no flow.
pub fn set_leak_active(
    pipeline: &mut PipelineDef,
    segment: &str,
    index: usize,
    active: bool,
) -> ProjectResult<()> {
    let seg = segment_mut(pipeline, segment)?;
    let leak = seg.leaks.get_mut(index).ok_or_else(|| ProjectError::NotFound {
        what: format!("leak {index} on segment '{segment}'"),
    })?;
    leak.active = active;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn u(value: f64, unit: &str) -> UnitValueDef {
        UnitValueDef::new(value, unit)
    }

    fn two_segments() -> PipelineDef {
        let seg = |name: &str| {
            SegmentDef::new(name, u(1.0, "km"), u(200.0, "mm"), u(6.0, "bar"), u(5.0, "bar"))
        };
        let mut a = seg("A");
        a.valves.push(ValveDef {
            name: None,
            position: ValvePositionDef::Start,
            state: ValveStateDef::Open,
        });
        let mut b = seg("B");
        b.valves.push(ValveDef {
            name: None,
            position: ValvePositionDef::End,
            state: ValveStateDef::Closed,
        });
        PipelineDef {
            version: 1,
            name: "water".into(),
            fluid: FluidDef {
                species: "H2O".into(),
                phase: PhaseDef::Liquid,
                temperature: u(15.0, "C"),
                molecular_weight: None,
            },
            flow_type: FlowTypeDef::Incompressible,
            ambient_pressure: None,
            segments: vec![a, b],
            solver: None,
        }
    }

    #[test]
    fn open_and_close_all() {
        let mut p = two_segments();
        assert_eq!(open_all_valves(&mut p), 1);
        assert_eq!(open_all_valves(&mut p), 0);
        assert_eq!(close_all_valves(&mut p), 2);
        assert!(p.segments.iter().flat_map(|s| &s.valves).all(|v| v.state == ValveStateDef::Closed));
    }

    #[test]
    fn toggle_existing_and_missing() {
        let mut p = two_segments();
        assert_eq!(
            toggle_valve(&mut p, "A", ValvePositionDef::Start).unwrap(),
            ValveStateDef::Closed
        );
        assert_eq!(
            toggle_valve(&mut p, "A", ValvePositionDef::Start).unwrap(),
            ValveStateDef::Open
        );
        assert_eq!(
            toggle_valve(&mut p, "A", ValvePositionDef::End).unwrap(),
            ValveStateDef::Closed
        );
        assert_eq!(p.segments[0].valves.len(), 2);
        assert!(toggle_valve(&mut p, "Z", ValvePositionDef::End).is_err());
    }

    #[test]
    fn leak_lifecycle() {
        let mut p = two_segments();
        let idx = add_leak(&mut p, "B", LeakDef::with_diameter(0.3, u(5.0, "mm"))).unwrap();
        assert_eq!(idx, 0);
        set_leak_active(&mut p, "B", 0, false).unwrap();
        assert!(!p.segments[1].leaks[0].active);
        assert!(set_leak_active(&mut p, "B", 4, true).is_err());

        let removed = remove_leak(&mut p, "B", 0).unwrap();
        assert_eq!(removed.location, 0.3);
        assert!(p.segments[1].leaks.is_empty());
        assert!(remove_leak(&mut p, "B", 0).is_err());
    }

    #[test]
    fn add_leak_rejects_bad_location() {
        let mut p = two_segments();
        assert!(add_leak(&mut p, "A", LeakDef::with_diameter(-0.1, u(5.0, "mm"))).is_err());
        assert!(p.segments[0].leaks.is_empty());
    }
}
