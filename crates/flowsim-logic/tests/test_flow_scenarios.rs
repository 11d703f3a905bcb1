//! Integration tests for the calculate → diagram → figure pipeline.
//!
//! Exercises: SimulationInputs → AllocationResult → DiagramSpec → Figure → SVG
//!
//! All tests are pure logic, no window, no dashboard.

use flowsim_logic::allocation::{allocate, Allocator, PolicyStatus};
use flowsim_logic::config::{DashboardControls, SimulationInputs};
use flowsim_logic::diagram::{build_diagram, FlowKind, SystemStatus};
use flowsim_logic::figure::{render, render_parts, Shape};
use flowsim_logic::policy::Policy;
use flowsim_logic::svg::to_svg;

// ── Helpers ────────────────────────────────────────────────────────────

fn reference_inputs() -> SimulationInputs {
    SimulationInputs {
        population: 18.0,
        qlt: 667.0,
        jobs_available: 16.5,
        total_value: 1500.0,
        policy: Policy::None,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Every slider position for every policy, with the default free entries.
fn control_sweep() -> Vec<SimulationInputs> {
    let controls = DashboardControls::default();
    let mut sweep = Vec::new();
    for policy in Policy::ALL {
        for tvg in controls.total_value.steps() {
            for jobs in controls.jobs.steps() {
                sweep.push(
                    reference_inputs()
                        .with_total_value(tvg)
                        .with_jobs(jobs)
                        .with_policy(policy),
                );
            }
        }
    }
    sweep
}

// ── Reference scenarios ────────────────────────────────────────────────

#[test]
fn standard_model_scenario() {
    let r = allocate(&reference_inputs());
    assert_eq!(r.workforce, 16.5);
    assert_eq!(r.labor, 1485.0);
    assert_eq!(r.automation, 15.0);
    assert_eq!(r.public_allocation, 825.0);
    assert_eq!(r.elite_surplus, 675.0);
    assert_eq!(r.status.label(), "Standard Model");
}

#[test]
fn recession_cutbacks_scenario() {
    let r = allocate(&reference_inputs().with_total_value(900.0));
    assert!(approx(r.public_allocation, 495.0));
    assert!(approx(r.elite_surplus, 405.0));
    assert_eq!(r.status.label(), "Recession Cutbacks");
}

#[test]
fn national_dividend_scenario() {
    let r = allocate(&reference_inputs().with_policy(Policy::NationalDividend));
    assert_eq!(r.public_allocation, 675.0);
    assert_eq!(r.elite_surplus, 825.0);
    assert_eq!(r.status.label(), "National Dividend Active");
}

#[test]
fn stabilization_triggered_scenario() {
    let r = allocate(
        &reference_inputs()
            .with_total_value(900.0)
            .with_policy(Policy::StabilizationFund),
    );
    assert_eq!(r.public_allocation, 667.0);
    assert_eq!(r.elite_surplus, 233.0);
    assert_eq!(r.status.label(), "Stabilization Fund TRIGGERED");
}

#[test]
fn stabilization_standby_scenario() {
    let r = allocate(&reference_inputs().with_policy(Policy::StabilizationFund));
    assert_eq!(r.public_allocation, 825.0);
    assert_eq!(r.status.label(), "Stabilization Fund (Standby)");
}

// ── Properties ─────────────────────────────────────────────────────────

#[test]
fn allocation_never_exceeds_total_value() {
    for inputs in control_sweep() {
        let r = allocate(&inputs);
        assert!(
            r.public_allocation <= inputs.total_value,
            "public {} > tvg {} for {:?}",
            r.public_allocation,
            inputs.total_value,
            inputs
        );
        assert!(r.elite_surplus >= 0.0);
    }
}

#[test]
fn stability_iff_allocation_meets_threshold() {
    for inputs in control_sweep() {
        let d = build_diagram(&inputs);
        assert_eq!(
            d.status == SystemStatus::Stable,
            d.allocation.public_allocation >= inputs.qlt
        );
    }
}

#[test]
fn calculation_is_idempotent() {
    for inputs in control_sweep() {
        let a = allocate(&inputs);
        let b = allocate(&inputs);
        assert_eq!(a.labor.to_bits(), b.labor.to_bits());
        assert_eq!(a.automation.to_bits(), b.automation.to_bits());
        assert_eq!(a.public_allocation.to_bits(), b.public_allocation.to_bits());
        assert_eq!(a.elite_surplus.to_bits(), b.elite_surplus.to_bits());
        assert_eq!(a.status, b.status);
    }
}

#[test]
fn labor_grows_with_jobs_below_population() {
    let calc = Allocator::new(18.0, 667.0);
    let mut previous = calc.calculate(0.0, 3000.0, Policy::None);
    let mut jobs = 0.5;
    while jobs < 18.0 {
        let current = calc.calculate(jobs, 3000.0, Policy::None);
        if previous.labor < 3000.0 {
            assert!(current.labor > previous.labor, "jobs={jobs}");
        }
        assert!(approx(current.labor + current.automation, 3000.0));
        previous = current;
        jobs += 0.5;
    }
}

#[test]
fn labor_flat_once_jobs_exceed_population() {
    let calc = Allocator::new(10.0, 667.0);
    let at_pop = calc.calculate(10.0, 3000.0, Policy::None);
    let beyond = calc.calculate(20.0, 3000.0, Policy::None);
    assert_eq!(at_pop, beyond);
}

#[test]
fn flag_priority_matches_enum_dispatch() {
    let calc = Allocator::new(18.0, 667.0);
    for tvg in [600.0, 900.0, 1500.0] {
        assert_eq!(
            calc.calculate_flags(16.5, tvg, true, true),
            calc.calculate(16.5, tvg, Policy::NationalDividend)
        );
        assert_eq!(
            calc.calculate_flags(16.5, tvg, false, true),
            calc.calculate(16.5, tvg, Policy::StabilizationFund)
        );
    }
}

#[test]
fn every_status_reachable_from_controls() {
    let mut seen = Vec::new();
    for inputs in control_sweep() {
        let status = allocate(&inputs).status;
        if !seen.contains(&status) {
            seen.push(status);
        }
    }
    for status in [
        PolicyStatus::Standard,
        PolicyStatus::DividendActive,
        PolicyStatus::StabilizationTriggered,
        PolicyStatus::StabilizationStandby,
        PolicyStatus::RecessionCutbacks,
    ] {
        assert!(seen.contains(&status), "{status:?} unreachable");
    }
}

// ── Rendering pipeline ─────────────────────────────────────────────────

#[test]
fn render_parts_matches_struct_render() {
    let by_parts = render_parts(900.0, 16.5, 18.0, 667.0, "National Dividend");
    let by_struct = render(
        &reference_inputs()
            .with_total_value(900.0)
            .with_policy(Policy::NationalDividend),
    );
    assert_eq!(by_parts, by_struct);
}

#[test]
fn public_flow_tracks_status_colour() {
    for inputs in [
        reference_inputs(),
        reference_inputs().with_total_value(900.0),
    ] {
        let d = build_diagram(&inputs);
        assert_eq!(d.flow(FlowKind::Public).color, d.status.color());
    }
}

#[test]
fn svg_export_for_every_policy() {
    for policy in Policy::ALL {
        let figure = render(&reference_inputs().with_policy(policy));
        let svg = to_svg(&figure);
        let label = allocate(&reference_inputs().with_policy(policy))
            .status
            .label()
            .replace('&', "&amp;");
        assert!(svg.contains(&format!("Active Policy: {label}")));
    }
}

#[test]
fn figure_serializes_to_json() {
    let figure = render(&reference_inputs());
    let json = serde_json::to_value(&figure).unwrap();
    assert_eq!(json["width_pt"], 864.0);
    let shapes = json["shapes"].as_array().unwrap();
    assert_eq!(shapes.len(), figure.shapes.len());
    assert!(figure
        .shapes
        .iter()
        .any(|s| matches!(s, Shape::HLine(l) if l.dashed)));
}

// ── Non-finite inputs ──────────────────────────────────────────────────

#[test]
fn non_finite_inputs_still_render() {
    let shape_count = render(&reference_inputs()).shapes.len();
    for inputs in [
        reference_inputs().with_total_value(f64::NAN),
        reference_inputs().with_total_value(f64::INFINITY),
        reference_inputs().with_qlt(f64::NAN),
        reference_inputs().with_population(f64::NEG_INFINITY),
    ] {
        let figure = render(&inputs);
        assert_eq!(figure.shapes.len(), shape_count, "{inputs:?}");
        let svg = to_svg(&figure);
        assert!(svg.starts_with("<svg"), "{inputs:?}");
        assert!(svg.ends_with("</svg>\n"), "{inputs:?}");
    }
}

#[test]
fn nan_total_value_keeps_standard_allocation() {
    // NaN never compares smaller, so every `min` keeps its first argument.
    let d = build_diagram(&reference_inputs().with_total_value(f64::NAN));
    assert_eq!(d.allocation.labor, 1485.0);
    assert_eq!(d.allocation.public_allocation, 825.0);
    assert!(d.allocation.elite_surplus.is_nan());
    assert_eq!(d.status, SystemStatus::Stable);
    assert!(to_svg(&render(&d.inputs)).contains("NaN"));
}

#[test]
fn infinite_total_value_keeps_standard_allocation() {
    let d = build_diagram(&reference_inputs().with_total_value(f64::INFINITY));
    assert_eq!(d.allocation.public_allocation, 825.0);
    assert_eq!(d.allocation.elite_surplus, f64::INFINITY);
    assert_eq!(d.status, SystemStatus::Stable);
}

#[test]
fn nan_qlt_collapses() {
    let d = build_diagram(&reference_inputs().with_qlt(f64::NAN));
    assert_eq!(d.allocation.public_allocation, 825.0);
    assert_eq!(d.status, SystemStatus::Collapse);
    assert_eq!(render(&d.inputs).title.text, "SYSTEM STATUS: COLLAPSE");
}

#[test]
fn negative_infinite_population_drains_reservoir() {
    let d = build_diagram(&reference_inputs().with_population(f64::NEG_INFINITY));
    assert_eq!(d.allocation.public_allocation, f64::NEG_INFINITY);
    assert_eq!(d.reservoir.fill_rect().height, f64::NEG_INFINITY);
    assert_eq!(d.status, SystemStatus::Collapse);
}

#[test]
fn negative_population_fills_below_reservoir_base() {
    let d = build_diagram(&reference_inputs().with_population(-5.0));
    let fill = d.reservoir.fill_rect();
    assert!(fill.height < 0.0);
    assert_eq!(fill.y, d.reservoir.rect.y);
}
