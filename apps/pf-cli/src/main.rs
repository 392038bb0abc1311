use clap::{Parser, Subcommand, ValueEnum};
use pf_components::{FlowType, FrictionSettings, friction_factor, select_flow_equation};
use pf_core::units::field;
use pf_core::{QuantityKind, UnitError, parse_quantity};
use pf_fluids::{ConstantPropertyModel, CoolPropModel, FluidModel, IdealGasModel, Phase};
use pf_project::{ProjectError, compile_pipeline, load};
use pf_results::{ResultsError, build_report, report_to_json, save_report};
use pf_solver::{PipelineResult, SolverError, solve};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PipeFlow CLI - steady-state pipeline flow and leak solver", long_about = None)]
struct Cli {
    /// Raise the default log level to debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a pipeline file and compile it to SI
    Validate {
        /// Path to the pipeline YAML or JSON file
        pipeline_path: PathBuf,
    },
    /// Solve a pipeline and print the per-segment results
    Solve {
        /// Path to the pipeline YAML or JSON file
        pipeline_path: PathBuf,
        /// Fluid property provider
        #[arg(long, value_enum, default_value_t = ModelChoice::Coolprop)]
        model: ModelChoice,
        /// Print the JSON report instead of the table
        #[arg(long)]
        json: bool,
        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show which flow equation a segment would use
    Select {
        #[arg(long, value_enum)]
        phase: PhaseChoice,
        #[arg(long, value_enum, default_value_t = FlowTypeChoice::Compressible)]
        flow_type: FlowTypeChoice,
        /// Length with unit, e.g. "20.5 mile"
        #[arg(long)]
        length: String,
        /// Inner diameter with unit, e.g. "12 in"
        #[arg(long)]
        diameter: String,
    },
    /// Evaluate the Darcy friction factor
    Friction {
        #[arg(long)]
        reynolds: f64,
        /// Absolute roughness divided by diameter
        #[arg(long, default_value_t = 0.0)]
        relative_roughness: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelChoice {
    Coolprop,
    Ideal,
    Water,
}

#[derive(Clone, Copy, ValueEnum)]
enum PhaseChoice {
    Gas,
    Liquid,
}

#[derive(Clone, Copy, ValueEnum)]
enum FlowTypeChoice {
    Compressible,
    Incompressible,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Results(#[from] ResultsError),
    #[error(transparent)]
    Component(#[from] pf_components::ComponentError),
    #[error(transparent)]
    Unit(#[from] UnitError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { pipeline_path } => cmd_validate(&pipeline_path),
        Commands::Solve {
            pipeline_path,
            model,
            json,
            output,
        } => cmd_solve(&pipeline_path, model, json, output.as_deref()),
        Commands::Select {
            phase,
            flow_type,
            length,
            diameter,
        } => cmd_select(phase, flow_type, &length, &diameter),
        Commands::Friction {
            reynolds,
            relative_roughness,
        } => cmd_friction(reynolds, relative_roughness),
    }
}

fn cmd_validate(pipeline_path: &Path) -> CliResult<()> {
    println!("Validating pipeline: {}", pipeline_path.display());
    let def = load(pipeline_path)?;
    let (pipeline, _settings) = compile_pipeline(&def)?;
    println!("✓ Pipeline is valid");
    println!(
        "  {} segments, {} leaks, {:.3} mi",
        pipeline.segments.len(),
        pipeline.leak_count(),
        field::to_miles(pipeline.total_length())
    );
    Ok(())
}

fn fluid_model(choice: ModelChoice) -> Box<dyn FluidModel> {
    match choice {
        ModelChoice::Coolprop => Box::new(CoolPropModel::new()),
        ModelChoice::Ideal => Box::new(IdealGasModel::new()),
        ModelChoice::Water => Box::new(ConstantPropertyModel::water()),
    }
}

fn cmd_solve(
    pipeline_path: &Path,
    model: ModelChoice,
    json: bool,
    output: Option<&Path>,
) -> CliResult<()> {
    let def = load(pipeline_path)?;
    let (pipeline, settings) = compile_pipeline(&def)?;
    let model = fluid_model(model);

    tracing::info!(pipeline = %pipeline.name, segments = pipeline.segments.len(), "solving");
    let result = solve(&pipeline, model.as_ref(), &settings)?;
    let report = build_report(&def, &result);

    if let Some(path) = output {
        save_report(path, &report)?;
        tracing::info!(path = %path.display(), "report written");
    }

    if json {
        println!("{}", report_to_json(&report)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &PipelineResult) {
    println!("Pipeline: {}", result.name);
    println!(
        "  {:<12} {:<16} {:<14} {:>10} {:>10} {:>12} {:>12} {:>12}",
        "segment", "equation", "gate", "P_in psi", "P_out psi", "in ft3/s", "leak ft3/s", "out ft3/s"
    );
    for seg in &result.segments {
        println!(
            "  {:<12} {:<16} {:<14} {:>10.2} {:>10.2} {:>12.4} {:>12.4} {:>12.4}",
            seg.name,
            seg.equation.key(),
            seg.gate.to_string(),
            field::to_psi(seg.upstream_pressure),
            field::to_psi(seg.downstream_pressure),
            field::to_ft3ps(seg.inlet_flow),
            field::to_ft3ps(seg.leak_flow),
            field::to_ft3ps(seg.outlet_flow),
        );
        for leak in &seg.leaks {
            println!(
                "    leak {} @ {:.2}: {:.4} ft3/s ({})",
                leak.name.as_deref().unwrap_or("-"),
                leak.location,
                field::to_ft3ps(leak.rate),
                leak.severity
            );
        }
    }

    println!("\nTotals:");
    println!("  Inlet:   {:.4} ft3/s", field::to_ft3ps(result.inlet_flow));
    println!("  Leaks:   {:.4} ft3/s", field::to_ft3ps(result.total_leak));
    println!("  Outlet:  {:.4} ft3/s", field::to_ft3ps(result.outlet_flow));
    println!("  Balance residual: {:.3e}", result.relative_balance_residual());
    if let Some(index) = result.blocked_at {
        println!("  Blocked at segment {}", index);
    }
    if result.has_warnings() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  {}", warning);
        }
    }
}

fn cmd_select(
    phase: PhaseChoice,
    flow_type: FlowTypeChoice,
    length: &str,
    diameter: &str,
) -> CliResult<()> {
    let phase = match phase {
        PhaseChoice::Gas => Phase::Gas,
        PhaseChoice::Liquid => Phase::Liquid,
    };
    let flow_type = match flow_type {
        FlowTypeChoice::Compressible => FlowType::Compressible,
        FlowTypeChoice::Incompressible => FlowType::Incompressible,
    };
    let length = pf_core::units::m(parse_quantity(length, QuantityKind::Length)?);
    let diameter = pf_core::units::m(parse_quantity(diameter, QuantityKind::Length)?);

    let equation = select_flow_equation(phase, flow_type, length, diameter);
    println!(
        "{} ({:.3} mi, {:.2} in)",
        equation,
        field::to_miles(length),
        field::to_inches(diameter)
    );
    Ok(())
}

fn cmd_friction(reynolds: f64, relative_roughness: f64) -> CliResult<()> {
    let estimate = friction_factor(reynolds, relative_roughness, &FrictionSettings::default())?;
    println!("f = {:.6} ({})", estimate.factor, estimate.regime);
    if estimate.iterations > 0 {
        println!("  iterations: {}", estimate.iterations);
    }
    if let Some(warning) = estimate.warning {
        println!("  warning: {}", warning);
    }
    Ok(())
}
