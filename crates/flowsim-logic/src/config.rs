//! Simulation inputs and the dashboard's control surface.
//!
//! [`SimulationInputs`] is the only state the system has. It is a small
//! `Copy` value handed to the calculator and renderer on every change;
//! nothing is cached between calls.
//!
//! [`DashboardControls`] describes the sliders a front end should offer.
//! The core never clamps inputs to these ranges.
//!
//! ```
//! use flowsim_logic::config::SimulationInputs;
//! use flowsim_logic::policy::Policy;
//!
//! let inputs = SimulationInputs::default()
//!     .with_total_value(900.0)
//!     .with_policy(Policy::StabilizationFund);
//! assert_eq!(inputs.qlt, 667.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::policy::Policy;

/// Everything the calculator and renderer read.
///
/// Units follow the dashboard: population and jobs in millions, value and
/// QLT in billions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationInputs {
    pub population: f64,
    /// Quality-of-life threshold: the minimum public allocation considered stable.
    pub qlt: f64,
    pub jobs_available: f64,
    /// Total value generated this period.
    pub total_value: f64,
    pub policy: Policy,
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self {
            population: 18.0,
            qlt: 667.0,
            jobs_available: 16.5,
            total_value: 1500.0,
            policy: Policy::None,
        }
    }
}

impl SimulationInputs {
    pub fn with_population(mut self, population: f64) -> Self {
        self.population = population;
        self
    }

    pub fn with_qlt(mut self, qlt: f64) -> Self {
        self.qlt = qlt;
        self
    }

    pub fn with_jobs(mut self, jobs_available: f64) -> Self {
        self.jobs_available = jobs_available;
        self
    }

    pub fn with_total_value(mut self, total_value: f64) -> Self {
        self.total_value = total_value;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }
}

/// A bounded slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ControlRange {
    /// Nearest step inside the range. UI helper only.
    pub fn snap(&self, value: f64) -> f64 {
        if self.step <= 0.0 {
            return value.clamp(self.min, self.max);
        }
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Every step from `min` to `max` inclusive.
    pub fn steps(&self) -> impl Iterator<Item = f64> + '_ {
        let count = if self.step > 0.0 {
            ((self.max - self.min) / self.step).round() as usize + 1
        } else {
            1
        };
        (0..count).map(move |i| self.min + i as f64 * self.step)
    }
}

/// Control surface of the dashboard sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardControls {
    /// Total Value ($B).
    pub total_value: ControlRange,
    /// Jobs (Millions).
    pub jobs: ControlRange,
    /// Population (M), free entry.
    pub population_default: f64,
    /// QLT Threshold ($B), free entry.
    pub qlt_default: f64,
}

impl Default for DashboardControls {
    fn default() -> Self {
        let inputs = SimulationInputs::default();
        Self {
            total_value: ControlRange {
                min: 500.0,
                max: 3000.0,
                step: 50.0,
                default: inputs.total_value,
            },
            jobs: ControlRange {
                min: 0.0,
                max: 20.0,
                step: 0.5,
                default: inputs.jobs_available,
            },
            population_default: inputs.population,
            qlt_default: inputs.qlt,
        }
    }
}

impl DashboardControls {
    /// Inputs with every control at its default position.
    pub fn default_inputs(&self) -> SimulationInputs {
        SimulationInputs {
            population: self.population_default,
            qlt: self.qlt_default,
            jobs_available: self.jobs.default,
            total_value: self.total_value.default,
            policy: Policy::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let inputs = SimulationInputs::default();
        assert_eq!(inputs.total_value, 1500.0);
        assert_eq!(inputs.jobs_available, 16.5);
        assert_eq!(inputs.population, 18.0);
        assert_eq!(inputs.qlt, 667.0);
        assert_eq!(inputs.policy, Policy::None);
        assert_eq!(DashboardControls::default().default_inputs(), inputs);
    }

    #[test]
    fn test_builders_set_one_field() {
        let inputs = SimulationInputs::default()
            .with_population(10.0)
            .with_jobs(4.0)
            .with_qlt(100.0)
            .with_total_value(700.0)
            .with_policy(Policy::NationalDividend);
        assert_eq!(inputs.population, 10.0);
        assert_eq!(inputs.jobs_available, 4.0);
        assert_eq!(inputs.qlt, 100.0);
        assert_eq!(inputs.total_value, 700.0);
        assert_eq!(inputs.policy, Policy::NationalDividend);
    }

    #[test]
    fn test_snap_to_step() {
        let controls = DashboardControls::default();
        assert_eq!(controls.total_value.snap(1520.0), 1500.0);
        assert_eq!(controls.total_value.snap(1530.0), 1550.0);
        assert_eq!(controls.total_value.snap(100.0), 500.0);
        assert_eq!(controls.total_value.snap(9000.0), 3000.0);
        assert_eq!(controls.jobs.snap(16.4), 16.5);
    }

    #[test]
    fn test_steps_cover_range() {
        let controls = DashboardControls::default();
        let values: Vec<f64> = controls.total_value.steps().collect();
        assert_eq!(values.len(), 51);
        assert_eq!(values[0], 500.0);
        assert_eq!(*values.last().unwrap(), 3000.0);
        assert_eq!(controls.jobs.steps().count(), 41);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let inputs: SimulationInputs =
            serde_json::from_str(r#"{"total_value": 900.0, "policy": "stabilization_fund"}"#)
                .unwrap();
        assert_eq!(inputs.total_value, 900.0);
        assert_eq!(inputs.policy, Policy::StabilizationFund);
        assert_eq!(inputs.population, 18.0);
    }

    #[test]
    fn test_controls_serialize_for_reports() {
        let json = serde_json::to_value(DashboardControls::default()).unwrap();
        assert_eq!(json["total_value"]["min"], 500.0);
        assert_eq!(json["total_value"]["step"], 50.0);
        assert_eq!(json["jobs"]["max"], 20.0);
        assert_eq!(json["jobs"]["default"], 16.5);
        assert_eq!(json["qlt_default"], 667.0);
    }
}
