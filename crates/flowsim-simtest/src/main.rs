//! FlowSim Headless Harness
//!
//! Checks the allocation model and figure composition without a window.
//! Runs entirely in-process: no dashboard, no rendering backend.
//!
//! Usage:
//!   cargo run -p flowsim-simtest
//!   cargo run -p flowsim-simtest -- --verbose
//!   cargo run -p flowsim-simtest -- --json
//!   cargo run -p flowsim-simtest -- --svg out/

use std::fmt;
use std::path::{Path, PathBuf};

use flowsim_logic::allocation::{allocate, AllocationResult, Allocator};
use flowsim_logic::config::{DashboardControls, SimulationInputs};
use flowsim_logic::diagram::{build_diagram, SystemStatus};
use flowsim_logic::figure::{render, Shape};
use flowsim_logic::policy::{ParsePolicyError, Policy};
use flowsim_logic::svg::to_svg;
use serde::{Deserialize, Serialize};

// ── Scenario table ──────────────────────────────────────────────────────
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");

const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Deserialize)]
struct ScenarioSpec {
    name: String,
    inputs: ScenarioInputs,
    expect: Expectation,
}

/// Inputs as written in the scenario file; the policy is a selector name.
#[derive(Debug, Deserialize)]
struct ScenarioInputs {
    population: f64,
    qlt: f64,
    jobs_available: f64,
    total_value: f64,
    policy: String,
}

impl ScenarioInputs {
    fn resolve(&self) -> Result<SimulationInputs, HarnessError> {
        Ok(SimulationInputs {
            population: self.population,
            qlt: self.qlt,
            jobs_available: self.jobs_available,
            total_value: self.total_value,
            policy: self.policy.parse()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Expectation {
    labor: f64,
    automation: f64,
    public_allocation: f64,
    elite_surplus: f64,
    label: String,
    stable: bool,
}

#[derive(Debug, Serialize)]
struct ScenarioReport {
    name: String,
    inputs: SimulationInputs,
    result: AllocationResult,
    status: SystemStatus,
    passed: bool,
}

/// `--json` output: the control surface the sweeps ran over, then scenarios.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    controls: DashboardControls,
    scenarios: &'a [ScenarioReport],
}

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug)]
enum HarnessError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Policy(ParsePolicyError),
    Usage(String),
}

impl From<std::io::Error> for HarnessError {
    fn from(e: std::io::Error) -> Self {
        HarnessError::Io(e)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        HarnessError::Json(e)
    }
}

impl From<ParsePolicyError> for HarnessError {
    fn from(e: ParsePolicyError) -> Self {
        HarnessError::Policy(e)
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Io(e) => write!(f, "IO error: {}", e),
            HarnessError::Json(e) => write!(f, "JSON error: {}", e),
            HarnessError::Policy(e) => write!(f, "Scenario error: {}", e),
            HarnessError::Usage(msg) => write!(f, "Usage error: {}", msg),
        }
    }
}

impl std::error::Error for HarnessError {}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    json: bool,
    svg_dir: Option<PathBuf>,
}

fn parse_options() -> Result<Options, HarnessError> {
    let mut options = Options {
        verbose: false,
        json: false,
        svg_dir: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => options.verbose = true,
            "--json" => options.json = true,
            "--svg" => match args.next() {
                Some(dir) => options.svg_dir = Some(PathBuf::from(dir)),
                None => return Err(HarnessError::Usage("--svg needs a directory".into())),
            },
            other => return Err(HarnessError::Usage(format!("unknown argument '{}'", other))),
        }
    }
    Ok(options)
}

fn main() {
    let options = match parse_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: flowsim-simtest [--verbose] [--json] [--svg <dir>]");
            std::process::exit(2);
        }
    };
    println!("=== FlowSim Headless Harness ===\n");

    let mut results = Vec::new();

    // 1. Reference scenarios
    let (scenario_results, reports) = validate_scenarios(options.verbose);
    results.extend(scenario_results);

    // 2. Clamp invariant over the control surface
    results.extend(validate_clamp_invariant(options.verbose));

    // 3. Stability status
    results.extend(validate_stability(options.verbose));

    // 4. Purity
    results.extend(validate_idempotence(options.verbose));

    // 5. Labor monotonicity
    results.extend(validate_monotonic_labor(options.verbose));

    // 6. Legacy flag priority
    results.extend(validate_flag_priority(options.verbose));

    // 7. Figure composition
    results.extend(validate_figure(options.verbose));

    if options.json {
        let report = JsonReport {
            controls: DashboardControls::default(),
            scenarios: &reports,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => results.push(TestResult {
                name: "json_report".into(),
                passed: false,
                detail: HarnessError::from(e).to_string(),
            }),
        }
    }

    if let Some(dir) = &options.svg_dir {
        results.push(match write_svgs(dir, &reports) {
            Ok(count) => TestResult {
                name: "svg_export".into(),
                passed: true,
                detail: format!("{} figures written to {}", count, dir.display()),
            },
            Err(e) => TestResult {
                name: "svg_export".into(),
                passed: false,
                detail: e.to_string(),
            },
        });
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Reference Scenarios ──────────────────────────────────────────────

fn load_scenarios() -> Result<Vec<(ScenarioSpec, SimulationInputs)>, HarnessError> {
    let specs: Vec<ScenarioSpec> = serde_json::from_str(SCENARIOS_JSON)?;
    specs
        .into_iter()
        .map(|spec| {
            let inputs = spec.inputs.resolve()?;
            Ok((spec, inputs))
        })
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

fn check_expectation(result: &AllocationResult, status: SystemStatus, e: &Expectation) -> Vec<String> {
    let mut mismatches = Vec::new();
    let numeric = [
        ("labor", result.labor, e.labor),
        ("automation", result.automation, e.automation),
        ("public", result.public_allocation, e.public_allocation),
        ("elites", result.elite_surplus, e.elite_surplus),
    ];
    for (field, got, want) in numeric {
        if !close(got, want) {
            mismatches.push(format!("{}={} (want {})", field, got, want));
        }
    }
    if result.status.label() != e.label {
        mismatches.push(format!(
            "label='{}' (want '{}')",
            result.status.label(),
            e.label
        ));
    }
    if status.is_stable() != e.stable {
        mismatches.push(format!("status={} (want stable={})", status.text(), e.stable));
    }
    mismatches
}

fn validate_scenarios(verbose: bool) -> (Vec<TestResult>, Vec<ScenarioReport>) {
    println!("--- Reference Scenarios ---");
    let mut results = Vec::new();
    let mut reports = Vec::new();

    let scenarios = match load_scenarios() {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "scenario_parse".into(),
                passed: false,
                detail: e.to_string(),
            });
            return (results, reports);
        }
    };

    results.push(TestResult {
        name: "scenarios_not_empty".into(),
        passed: !scenarios.is_empty(),
        detail: format!("{} scenarios loaded", scenarios.len()),
    });

    for (spec, inputs) in &scenarios {
        let diagram = build_diagram(inputs);
        let mismatches = check_expectation(&diagram.allocation, diagram.status, &spec.expect);
        let passed = mismatches.is_empty();

        if verbose {
            println!(
                "  {:32} {:>8} {:>8} {:>8} {:>8}  {} / {}",
                spec.name,
                diagram.allocation.labor,
                diagram.allocation.automation,
                diagram.allocation.public_allocation,
                diagram.allocation.elite_surplus,
                diagram.policy_label(),
                diagram.status.text()
            );
        }

        results.push(TestResult {
            name: format!("scenario_{}", spec.name),
            passed,
            detail: if passed {
                format!("{} ({})", diagram.policy_label(), diagram.status.text())
            } else {
                mismatches.join(", ")
            },
        });
        reports.push(ScenarioReport {
            name: spec.name.clone(),
            inputs: *inputs,
            result: diagram.allocation,
            status: diagram.status,
            passed,
        });
    }

    (results, reports)
}

// ── 2-6. Properties ─────────────────────────────────────────────────────

/// Every slider step for every policy, free entries at their defaults.
fn control_sweep() -> Vec<SimulationInputs> {
    let controls = DashboardControls::default();
    let base = controls.default_inputs();
    let mut sweep = Vec::new();
    for policy in Policy::ALL {
        for tvg in controls.total_value.steps() {
            for jobs in controls.jobs.steps() {
                sweep.push(
                    base.with_policy(policy)
                        .with_total_value(tvg)
                        .with_jobs(jobs),
                );
            }
        }
    }
    sweep
}

fn validate_clamp_invariant(_verbose: bool) -> Vec<TestResult> {
    println!("--- Clamp Invariant ---");
    let sweep = control_sweep();

    let over: Vec<_> = sweep
        .iter()
        .filter(|i| allocate(i).public_allocation > i.total_value)
        .collect();
    let negative: Vec<_> = sweep
        .iter()
        .filter(|i| allocate(i).elite_surplus < 0.0)
        .collect();
    let unbalanced = sweep
        .iter()
        .filter(|i| !close(allocate(i).distribution_total(), i.total_value))
        .count();

    vec![
        TestResult {
            name: "public_within_total_value".into(),
            passed: over.is_empty(),
            detail: format!("{} of {} inputs over-allocated", over.len(), sweep.len()),
        },
        TestResult {
            name: "surplus_non_negative".into(),
            passed: negative.is_empty(),
            detail: format!("{} of {} inputs with negative surplus", negative.len(), sweep.len()),
        },
        TestResult {
            name: "distribution_balances".into(),
            passed: unbalanced == 0,
            detail: format!("{} of {} inputs unbalanced", unbalanced, sweep.len()),
        },
    ]
}

fn validate_stability(verbose: bool) -> Vec<TestResult> {
    println!("--- Stability Status ---");
    let sweep = control_sweep();
    let mut mismatched = 0;
    let mut stable = 0;
    for inputs in &sweep {
        let d = build_diagram(inputs);
        if d.status.is_stable() != (d.allocation.public_allocation >= inputs.qlt) {
            mismatched += 1;
        }
        if d.status.is_stable() {
            stable += 1;
        }
    }
    if verbose {
        println!("  {} of {} swept inputs are STABLE", stable, sweep.len());
    }
    vec![TestResult {
        name: "stable_iff_public_meets_qlt".into(),
        passed: mismatched == 0,
        detail: format!("{} mismatches over {} inputs", mismatched, sweep.len()),
    }]
}

fn validate_idempotence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Purity ---");
    let sweep = control_sweep();
    let differing = sweep
        .iter()
        .filter(|i| {
            let a = allocate(i);
            let b = allocate(i);
            a.labor.to_bits() != b.labor.to_bits()
                || a.automation.to_bits() != b.automation.to_bits()
                || a.public_allocation.to_bits() != b.public_allocation.to_bits()
                || a.elite_surplus.to_bits() != b.elite_surplus.to_bits()
                || a.status != b.status
        })
        .count();
    let figures_differ = sweep
        .iter()
        .step_by(97)
        .filter(|i| render(i) != render(i))
        .count();
    vec![
        TestResult {
            name: "allocation_bit_identical".into(),
            passed: differing == 0,
            detail: format!("{} of {} repeated calls differ", differing, sweep.len()),
        },
        TestResult {
            name: "figure_identical".into(),
            passed: figures_differ == 0,
            detail: format!("{} repeated renders differ", figures_differ),
        },
    ]
}

fn validate_monotonic_labor(_verbose: bool) -> Vec<TestResult> {
    println!("--- Labor Monotonicity ---");
    let controls = DashboardControls::default();
    let base = controls.default_inputs();
    let calc = Allocator::new(base.population, base.qlt);
    let mut violations = Vec::new();

    for tvg in controls.total_value.steps() {
        let mut previous: Option<(f64, AllocationResult)> = None;
        for jobs in controls.jobs.steps().filter(|j| *j <= base.population) {
            let current = calc.calculate(jobs, tvg, Policy::None);
            if let Some((prev_jobs, prev)) = previous {
                let capped = prev.labor >= tvg;
                if !capped && current.labor <= prev.labor {
                    violations.push(format!("tvg={} jobs {}→{}", tvg, prev_jobs, jobs));
                }
                if current.automation > prev.automation {
                    violations.push(format!("automation rose at tvg={} jobs={}", tvg, jobs));
                }
            }
            previous = Some((jobs, current));
        }
    }

    vec![TestResult {
        name: "labor_increases_with_jobs".into(),
        passed: violations.is_empty(),
        detail: if violations.is_empty() {
            "labor strictly increases until the total value cap".into()
        } else {
            violations.join("; ")
        },
    }]
}

fn validate_flag_priority(_verbose: bool) -> Vec<TestResult> {
    println!("--- Flag Priority ---");
    let calc = Allocator::new(18.0, 667.0);
    let mut mismatched = Vec::new();
    for tvg in [600.0, 900.0, 1500.0, 2500.0] {
        let cases = [
            ((true, true), Policy::NationalDividend),
            ((true, false), Policy::NationalDividend),
            ((false, true), Policy::StabilizationFund),
            ((false, false), Policy::None),
        ];
        for ((dividend, stabilization), policy) in cases {
            if calc.calculate_flags(16.5, tvg, dividend, stabilization)
                != calc.calculate(16.5, tvg, policy)
            {
                mismatched.push(format!("tvg={} flags=({}, {})", tvg, dividend, stabilization));
            }
        }
    }
    vec![TestResult {
        name: "dividend_over_stabilization".into(),
        passed: mismatched.is_empty(),
        detail: if mismatched.is_empty() {
            "both flags resolve to National Dividend".into()
        } else {
            mismatched.join("; ")
        },
    }]
}

// ── 7. Figure Composition ───────────────────────────────────────────────

fn validate_figure(_verbose: bool) -> Vec<TestResult> {
    println!("--- Figure Composition ---");
    let mut results = Vec::new();

    let figure = render(&SimulationInputs::default());
    let count = |pred: fn(&Shape) -> bool| figure.shapes.iter().filter(|s| pred(s)).count();
    let boxes = count(|s| matches!(s, Shape::Box(_)));
    let arrows = count(|s| matches!(s, Shape::Arrow(_)));
    let lines = count(|s| matches!(s, Shape::HLine(_)));

    results.push(TestResult {
        name: "figure_topology".into(),
        passed: boxes == 6 && arrows == 4 && lines == 1,
        detail: format!("{} boxes, {} arrows, {} marker lines", boxes, arrows, lines),
    });

    let collapse = render(&SimulationInputs::default().with_total_value(900.0));
    results.push(TestResult {
        name: "figure_status_title".into(),
        passed: figure.title.text == "SYSTEM STATUS: STABLE"
            && collapse.title.text == "SYSTEM STATUS: COLLAPSE",
        detail: format!("'{}' / '{}'", figure.title.text, collapse.title.text),
    });

    let svg = to_svg(&figure);
    results.push(TestResult {
        name: "svg_document".into(),
        passed: svg.starts_with("<svg") && svg.contains("Active Policy: Standard Model"),
        detail: format!("{} bytes", svg.len()),
    });

    results
}

fn write_svgs(dir: &Path, reports: &[ScenarioReport]) -> Result<usize, HarnessError> {
    std::fs::create_dir_all(dir)?;
    for report in reports {
        let path = dir.join(format!("{}.svg", report.name));
        std::fs::write(&path, to_svg(&render(&report.inputs)))?;
    }
    Ok(reports.len())
}
