use pf_components::{FlowEquation, GateState};
use pf_fluids::{ConstantPropertyModel, IdealGasModel};
use pf_project::{compile_pipeline, load_yaml};
use pf_solver::solve;
use std::path::Path;

fn demo(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demos_load_and_validate() {
    for name in ["methane_line.yaml", "water_main.yaml"] {
        let pipeline =
            load_yaml(&demo(name)).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        compile_pipeline(&pipeline)
            .unwrap_or_else(|e| panic!("Failed to compile {}: {}", name, e));
    }
}

#[test]
fn methane_demo_solves() {
    let def = load_yaml(&demo("methane_line.yaml")).unwrap();
    let (pipeline, settings) = compile_pipeline(&def).unwrap();
    let model = IdealGasModel::new().with_compressibility(0.998);

    let result = solve(&pipeline, &model, &settings).unwrap();
    assert_eq!(result.segments[0].equation, FlowEquation::Weymouth);
    assert_eq!(result.segments[1].equation, FlowEquation::PanhandleA);
    assert!(result.total_leak.value > 0.0);
    assert!(!result.is_blocked());
}

#[test]
fn water_demo_with_closed_valve() {
    let mut def = load_yaml(&demo("water_main.yaml")).unwrap();
    pf_project::toggle_valve(&mut def, "S1", pf_project::ValvePositionDef::Start).unwrap();
    let (pipeline, settings) = compile_pipeline(&def).unwrap();
    assert_eq!(settings.flow.friction.rel_tol, 1e-8);

    let result = solve(&pipeline, &ConstantPropertyModel::water(), &settings).unwrap();
    assert_eq!(result.segments[1].gate, GateState::BlockedAtStart);
    assert_eq!(result.segments[2].blocked_by, Some(1));
    assert_eq!(result.outlet_flow.value, 0.0);
}
