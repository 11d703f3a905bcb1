//! Dashboard state: current inputs and the figure rendered from them.

use bevy::prelude::*;
use flowsim_logic::config::SimulationInputs;
use flowsim_logic::diagram::{build_diagram, DiagramSpec, SystemStatus};
use flowsim_logic::figure::{compose, Figure};
use flowsim_logic::policy::Policy;

/// Something worth logging after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardChange {
    Status {
        from: SystemStatus,
        to: SystemStatus,
    },
    Policy {
        from: Policy,
        to: Policy,
    },
}

#[derive(Resource)]
pub struct Dashboard {
    inputs: SimulationInputs,
    diagram: DiagramSpec,
    figure: Figure,
    dirty: bool,
}

impl Dashboard {
    pub fn new(inputs: SimulationInputs) -> Self {
        let diagram = build_diagram(&inputs);
        let figure = compose(&diagram);
        Self {
            inputs,
            diagram,
            figure,
            dirty: false,
        }
    }

    pub fn inputs(&self) -> SimulationInputs {
        self.inputs
    }

    pub fn diagram(&self) -> &DiagramSpec {
        &self.diagram
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Store new inputs. Only a real change schedules a redraw.
    pub fn set_inputs(&mut self, inputs: SimulationInputs) {
        if inputs != self.inputs {
            self.inputs = inputs;
            self.dirty = true;
        }
    }

    /// Recompute the diagram and figure if the inputs changed since the
    /// last refresh.
    pub fn refresh(&mut self) -> Vec<DashboardChange> {
        if !self.dirty {
            return Vec::new();
        }
        self.dirty = false;

        let previous_status = self.diagram.status;
        let previous_policy = self.diagram.inputs.policy;

        self.diagram = build_diagram(&self.inputs);
        self.figure = compose(&self.diagram);

        let mut changes = Vec::new();
        if self.diagram.inputs.policy != previous_policy {
            changes.push(DashboardChange::Policy {
                from: previous_policy,
                to: self.diagram.inputs.policy,
            });
        }
        if self.diagram.status != previous_status {
            changes.push(DashboardChange::Status {
                from: previous_status,
                to: self.diagram.status,
            });
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_renders_immediately() {
        let dashboard = Dashboard::new(SimulationInputs::default());
        assert!(!dashboard.is_dirty());
        assert_eq!(dashboard.figure().title.text, "SYSTEM STATUS: STABLE");
        assert_eq!(dashboard.diagram().allocation.public_allocation, 825.0);
    }

    #[test]
    fn test_same_inputs_do_not_dirty() {
        let mut dashboard = Dashboard::new(SimulationInputs::default());
        dashboard.set_inputs(SimulationInputs::default());
        assert!(!dashboard.is_dirty());
        assert!(dashboard.refresh().is_empty());
    }

    #[test]
    fn test_refresh_reports_status_transition() {
        let mut dashboard = Dashboard::new(SimulationInputs::default());
        dashboard.set_inputs(SimulationInputs::default().with_total_value(900.0));
        assert!(dashboard.is_dirty());
        let changes = dashboard.refresh();
        assert_eq!(
            changes,
            vec![DashboardChange::Status {
                from: SystemStatus::Stable,
                to: SystemStatus::Collapse,
            }]
        );
        assert!(!dashboard.is_dirty());
        assert_eq!(dashboard.figure().title.text, "SYSTEM STATUS: COLLAPSE");
    }

    #[test]
    fn test_refresh_reports_policy_then_status() {
        let mut dashboard = Dashboard::new(SimulationInputs::default().with_total_value(900.0));
        dashboard.set_inputs(
            SimulationInputs::default()
                .with_total_value(900.0)
                .with_policy(Policy::StabilizationFund),
        );
        let changes = dashboard.refresh();
        assert_eq!(changes.len(), 2);
        assert_eq!(
            changes[0],
            DashboardChange::Policy {
                from: Policy::None,
                to: Policy::StabilizationFund,
            }
        );
        assert_eq!(
            changes[1],
            DashboardChange::Status {
                from: SystemStatus::Collapse,
                to: SystemStatus::Stable,
            }
        );
    }

    #[test]
    fn test_refresh_is_noop_when_clean() {
        let mut dashboard = Dashboard::new(SimulationInputs::default());
        dashboard.set_inputs(SimulationInputs::default().with_jobs(10.0));
        dashboard.refresh();
        let before = dashboard.figure().clone();
        assert!(dashboard.refresh().is_empty());
        assert_eq!(dashboard.figure(), &before);
    }
}
