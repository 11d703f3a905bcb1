//! Allocation calculator: where total value comes from and where it goes.
//!
//! Origin: labor claims up to [`LABOR_VALUE_PER_WORKER`] per workforce unit,
//! automation gets the rest. Distribution: the active [`Policy`] decides the
//! public allocation, which is clamped to total value; elites keep the
//! remainder.
//!
//! Inputs are never validated. Negative or non-finite numbers flow straight
//! through the arithmetic.

use serde::{Deserialize, Serialize};

use crate::config::SimulationInputs;
use crate::constants::{
    DIVIDEND_RATE, LABOR_VALUE_PER_WORKER, RECESSION_SCALE, RECESSION_THRESHOLD,
    STANDARD_ALLOCATION_PER_WORKER,
};
use crate::policy::Policy;

/// Which branch of the distribution logic produced the allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    #[serde(rename = "Standard Model")]
    Standard,
    #[serde(rename = "National Dividend Active")]
    DividendActive,
    #[serde(rename = "Stabilization Fund TRIGGERED")]
    StabilizationTriggered,
    #[serde(rename = "Stabilization Fund (Standby)")]
    StabilizationStandby,
    #[serde(rename = "Recession Cutbacks")]
    RecessionCutbacks,
}

impl PolicyStatus {
    pub fn label(self) -> &'static str {
        match self {
            PolicyStatus::Standard => "Standard Model",
            PolicyStatus::DividendActive => "National Dividend Active",
            PolicyStatus::StabilizationTriggered => "Stabilization Fund TRIGGERED",
            PolicyStatus::StabilizationStandby => "Stabilization Fund (Standby)",
            PolicyStatus::RecessionCutbacks => "Recession Cutbacks",
        }
    }
}

/// Output of one calculation. Recomputed from scratch every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Lesser of jobs available and population.
    pub workforce: f64,
    pub labor: f64,
    pub automation: f64,
    pub public_allocation: f64,
    pub elite_surplus: f64,
    pub status: PolicyStatus,
}

impl AllocationResult {
    /// `labor + automation`.
    pub fn origin_total(&self) -> f64 {
        self.labor + self.automation
    }

    /// `public_allocation + elite_surplus`.
    pub fn distribution_total(&self) -> f64 {
        self.public_allocation + self.elite_surplus
    }
}

/// Calculator bound to one population and quality-of-life threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocator {
    pub population: f64,
    pub qlt: f64,
}

impl Allocator {
    pub fn new(population: f64, qlt: f64) -> Self {
        Self { population, qlt }
    }

    /// Split `total_value` for the given jobs and policy.
    pub fn calculate(
        &self,
        jobs_available: f64,
        total_value: f64,
        policy: Policy,
    ) -> AllocationResult {
        let workforce = lesser(jobs_available, self.population);

        let labor = lesser(workforce * LABOR_VALUE_PER_WORKER, total_value);
        let automation = total_value - labor;

        let standard_allocation = workforce * STANDARD_ALLOCATION_PER_WORKER;
        let in_recession = total_value < RECESSION_THRESHOLD;

        let (allocation, status) = match policy {
            Policy::NationalDividend => {
                (total_value * DIVIDEND_RATE, PolicyStatus::DividendActive)
            }
            Policy::StabilizationFund if in_recession => {
                (self.qlt, PolicyStatus::StabilizationTriggered)
            }
            Policy::StabilizationFund => {
                (standard_allocation, PolicyStatus::StabilizationStandby)
            }
            Policy::None if in_recession => (
                standard_allocation * (total_value / RECESSION_SCALE),
                PolicyStatus::RecessionCutbacks,
            ),
            Policy::None => (standard_allocation, PolicyStatus::Standard),
        };

        let public_allocation = lesser(allocation, total_value);
        let elite_surplus = total_value - public_allocation;

        log::debug!(
            "allocation: policy={} tvg={} workforce={} labor={} automation={} public={} elites={}",
            policy,
            total_value,
            workforce,
            labor,
            automation,
            public_allocation,
            elite_surplus
        );

        AllocationResult {
            workforce,
            labor,
            automation,
            public_allocation,
            elite_surplus,
            status,
        }
    }

    /// Legacy two-flag entry point. Dividend takes priority over stabilization.
    pub fn calculate_flags(
        &self,
        jobs_available: f64,
        total_value: f64,
        use_dividend: bool,
        use_stabilization: bool,
    ) -> AllocationResult {
        self.calculate(
            jobs_available,
            total_value,
            Policy::from_flags(use_dividend, use_stabilization),
        )
    }
}

/// Run the calculator for a full set of inputs.
pub fn allocate(inputs: &SimulationInputs) -> AllocationResult {
    Allocator::new(inputs.population, inputs.qlt).calculate(
        inputs.jobs_available,
        inputs.total_value,
        inputs.policy,
    )
}

/// `a` unless `b` is strictly smaller. A NaN on either side yields `a`.
fn lesser(a: f64, b: f64) -> f64 {
    if b < a {
        b
    } else {
        a
    }
}
