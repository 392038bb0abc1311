use pf_fluids::{ConstantPropertyModel, IdealGasModel};
use pf_project::{compile_pipeline, load_yaml, toggle_valve, ValvePositionDef};
use pf_results::{
    FlowReport, PipelineReport, build_report, config_fingerprint, load_report, report_from_json,
    report_to_json, save_report, SOLVER_VERSION,
};
use pf_solver::solve;
use std::path::{Path, PathBuf};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
}

fn flows_close(a: &FlowReport, b: &FlowReport) -> bool {
    close(a.m3_per_s, b.m3_per_s) && close(a.ft3_per_s, b.ft3_per_s)
}

fn assert_reports_match(a: &PipelineReport, b: &PipelineReport) {
    assert_eq!(a.pipeline, b.pipeline);
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_eq!(a.timestamp, b.timestamp);
    assert_eq!(a.blocked_at, b.blocked_at);
    assert_eq!(a.warnings, b.warnings);
    assert!(flows_close(&a.inlet_flow, &b.inlet_flow));
    assert!(flows_close(&a.outlet_flow, &b.outlet_flow));
    assert!(flows_close(&a.total_leak, &b.total_leak));
    assert!(close(a.inlet_mass_flow_kg_s, b.inlet_mass_flow_kg_s));
    assert_eq!(a.segments.len(), b.segments.len());

    for (sa, sb) in a.segments.iter().zip(&b.segments) {
        assert_eq!(sa.name, sb.name);
        assert_eq!(sa.gate, sb.gate);
        assert_eq!(sa.equation, sb.equation);
        assert_eq!(sa.blocked_by, sb.blocked_by);
        assert!(close(sa.upstream_pressure.pa, sb.upstream_pressure.pa));
        assert!(close(sa.downstream_pressure.psi, sb.downstream_pressure.psi));
        assert!(flows_close(&sa.inlet_flow, &sb.inlet_flow));
        assert!(flows_close(&sa.outlet_flow, &sb.outlet_flow));
        assert!(close(sa.reynolds, sb.reynolds));
        assert_eq!(sa.leaks.len(), sb.leaks.len());
        for (la, lb) in sa.leaks.iter().zip(&sb.leaks) {
            assert_eq!(la.severity, lb.severity);
            assert!(flows_close(&la.rate, &lb.rate));
        }
    }
}

#[test]
fn water_report_survives_json_round_trip() {
    let def = load_yaml(&demo("water_main.yaml")).unwrap();
    let (pipeline, settings) = compile_pipeline(&def).unwrap();
    let result = solve(&pipeline, &ConstantPropertyModel::water(), &settings).unwrap();

    let report = build_report(&def, &result);
    assert_eq!(report.solver_version, SOLVER_VERSION);
    assert_eq!(report.segments.len(), result.segments.len());
    assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());

    let json = report_to_json(&report).unwrap();
    let back = report_from_json(&json).unwrap();
    assert_reports_match(&report, &back);
}

#[test]
fn methane_report_file_round_trip() {
    let def = load_yaml(&demo("methane_line.yaml")).unwrap();
    let (pipeline, settings) = compile_pipeline(&def).unwrap();
    let model = IdealGasModel::new().with_compressibility(0.998);
    let result = solve(&pipeline, &model, &settings).unwrap();

    let report = build_report(&def, &result);
    assert_eq!(report.segments[0].equation, "weymouth");
    assert!(report.segments.iter().any(|s| !s.leaks.is_empty()));

    let path = std::env::temp_dir().join("pf_results_methane_report.json");
    save_report(&path, &report).unwrap();
    let back = load_report(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_reports_match(&report, &back);
}

#[test]
fn fingerprint_tracks_configuration() {
    let def = load_yaml(&demo("water_main.yaml")).unwrap();
    let same = load_yaml(&demo("water_main.yaml")).unwrap();
    assert_eq!(
        config_fingerprint(&def, SOLVER_VERSION),
        config_fingerprint(&same, SOLVER_VERSION)
    );

    let mut toggled = def.clone();
    toggle_valve(&mut toggled, "S1", ValvePositionDef::Start).unwrap();
    assert_ne!(
        config_fingerprint(&def, SOLVER_VERSION),
        config_fingerprint(&toggled, SOLVER_VERSION)
    );
}

#[test]
fn blocked_report_records_origin() {
    let mut def = load_yaml(&demo("water_main.yaml")).unwrap();
    toggle_valve(&mut def, "S1", ValvePositionDef::Start).unwrap();
    let (pipeline, settings) = compile_pipeline(&def).unwrap();
    let result = solve(&pipeline, &ConstantPropertyModel::water(), &settings).unwrap();

    let report = build_report(&def, &result);
    assert_eq!(report.blocked_at, Some(1));
    let s2 = report.segment("S2").unwrap();
    assert_eq!(s2.blocked_by, Some(1));
    assert_eq!(s2.outlet_flow.m3_per_s, 0.0);
    assert!(report.segment("S1").unwrap().blocked_by.is_none());
}
