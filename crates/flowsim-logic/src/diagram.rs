//! Flow diagram model: five nodes, four flows, one reservoir gauge.
//!
//! The topology and coordinates never change. Only node values, the
//! reservoir levels, the status colour and arrow thickness depend on the
//! inputs, and none of them feed back into the numbers.

use serde::Serialize;

use crate::allocation::{allocate, AllocationResult};
use crate::config::SimulationInputs;
use crate::constants::{
    layout, palette, ARROW_MIN_WIDTH, ARROW_REFERENCE_VALUE, ARROW_REFERENCE_WIDTH,
    RESERVOIR_SCALE,
};
use crate::figure::{Point, Rect, Rgb};

/// Whether the public allocation meets the quality-of-life threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SystemStatus {
    Stable,
    Collapse,
}

impl SystemStatus {
    /// Stable when `public_allocation >= qlt`. Any NaN means collapse.
    pub fn assess(public_allocation: f64, qlt: f64) -> Self {
        if public_allocation >= qlt {
            SystemStatus::Stable
        } else {
            SystemStatus::Collapse
        }
    }

    pub fn is_stable(self) -> bool {
        self == SystemStatus::Stable
    }

    pub fn text(self) -> &'static str {
        match self {
            SystemStatus::Stable => "STABLE",
            SystemStatus::Collapse => "COLLAPSE",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            SystemStatus::Stable => palette::STABLE,
            SystemStatus::Collapse => palette::COLLAPSE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    LaborForce,
    Automation,
    Economy,
    Elites,
    PublicAllocation,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::LaborForce,
        NodeKind::Automation,
        NodeKind::Economy,
        NodeKind::Elites,
        NodeKind::PublicAllocation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            NodeKind::LaborForce => "Labor Force",
            NodeKind::Automation => "Automation",
            NodeKind::Economy => "The Economy",
            NodeKind::Elites => "Elites/Corps",
            NodeKind::PublicAllocation => "Public Allocation",
        }
    }

    pub fn rect(self) -> Rect {
        let (x, y, width, height) = match self {
            NodeKind::LaborForce => layout::LABOR_BOX,
            NodeKind::Automation => layout::AUTOMATION_BOX,
            NodeKind::Economy => layout::ECONOMY_BOX,
            NodeKind::Elites => layout::ELITES_BOX,
            NodeKind::PublicAllocation => layout::PUBLIC_BOX,
        };
        Rect::new(x, y, width, height)
    }

    /// Box colour. The public reservoir is drawn empty and filled separately.
    pub fn fill(self) -> Rgb {
        match self {
            NodeKind::LaborForce => palette::LABOR,
            NodeKind::Automation => palette::AUTOMATION,
            NodeKind::Economy => palette::ECONOMY,
            NodeKind::Elites => palette::ELITES,
            NodeKind::PublicAllocation => palette::RESERVOIR_EMPTY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub title: &'static str,
    pub rect: Rect,
    pub fill: Rgb,
    /// Amount shown on the node.
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlowKind {
    Labor,
    Automation,
    Elites,
    Public,
}

impl FlowKind {
    pub const ALL: [FlowKind; 4] = [
        FlowKind::Labor,
        FlowKind::Automation,
        FlowKind::Elites,
        FlowKind::Public,
    ];

    pub fn source(self) -> NodeKind {
        match self {
            FlowKind::Labor => NodeKind::LaborForce,
            FlowKind::Automation => NodeKind::Automation,
            FlowKind::Elites | FlowKind::Public => NodeKind::Economy,
        }
    }

    pub fn target(self) -> NodeKind {
        match self {
            FlowKind::Labor | FlowKind::Automation => NodeKind::Economy,
            FlowKind::Elites => NodeKind::Elites,
            FlowKind::Public => NodeKind::PublicAllocation,
        }
    }

    fn endpoints(self) -> (Point, Point) {
        let ((x1, y1), (x2, y2)) = match self {
            FlowKind::Labor => layout::LABOR_FLOW,
            FlowKind::Automation => layout::AUTOMATION_FLOW,
            FlowKind::Elites => layout::ELITES_FLOW,
            FlowKind::Public => layout::PUBLIC_FLOW,
        };
        (Point::new(x1, y1), Point::new(x2, y2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Flow {
    pub kind: FlowKind,
    pub source: NodeKind,
    pub target: NodeKind,
    pub start: Point,
    pub end: Point,
    pub value: f64,
    pub color: Rgb,
    /// Arrow tail width in points.
    pub thickness: f64,
}

/// Water-level gauge inside the public allocation node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reservoir {
    pub rect: Rect,
    /// `min(1, public / 1500)`. Negative allocations give a negative level.
    pub fill_fraction: f64,
    /// `min(1, qlt / 1500)`.
    pub qlt_fraction: f64,
    pub fill_color: Rgb,
}

impl Reservoir {
    /// Filled part of the reservoir, growing up from its base.
    pub fn fill_rect(&self) -> Rect {
        Rect::new(
            self.rect.x,
            self.rect.y,
            self.rect.width,
            self.rect.height * self.fill_fraction,
        )
    }

    /// Data-space height of the dashed QLT marker.
    pub fn marker_y(&self) -> f64 {
        self.rect.y + self.rect.height * self.qlt_fraction
    }
}

/// Everything the renderer needs, derived from one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramSpec {
    pub inputs: SimulationInputs,
    pub allocation: AllocationResult,
    pub status: SystemStatus,
    pub nodes: [Node; 5],
    pub flows: [Flow; 4],
    pub reservoir: Reservoir,
}

impl DiagramSpec {
    pub fn node(&self, kind: NodeKind) -> &Node {
        &self.nodes[kind as usize]
    }

    pub fn flow(&self, kind: FlowKind) -> &Flow {
        &self.flows[kind as usize]
    }

    pub fn policy_label(&self) -> &'static str {
        self.allocation.status.label()
    }
}

/// Tail width for a flow carrying `value`, floored at [`ARROW_MIN_WIDTH`].
pub fn arrow_thickness(value: f64) -> f64 {
    let width = value * (ARROW_REFERENCE_WIDTH / ARROW_REFERENCE_VALUE);
    if width < ARROW_MIN_WIDTH {
        ARROW_MIN_WIDTH
    } else {
        width
    }
}

/// `value` on the reservoir scale, capped at 1 but not floored.
pub fn reservoir_fraction(value: f64) -> f64 {
    let fraction = value / RESERVOIR_SCALE;
    if fraction < 1.0 {
        fraction
    } else {
        1.0
    }
}

/// Run the calculator and lay out the diagram for `inputs`.
pub fn build_diagram(inputs: &SimulationInputs) -> DiagramSpec {
    let allocation = allocate(inputs);
    let status = SystemStatus::assess(allocation.public_allocation, inputs.qlt);

    let nodes = NodeKind::ALL.map(|kind| Node {
        kind,
        title: kind.title(),
        rect: kind.rect(),
        fill: kind.fill(),
        value: match kind {
            NodeKind::LaborForce => allocation.labor,
            NodeKind::Automation => allocation.automation,
            NodeKind::Economy => inputs.total_value,
            NodeKind::Elites => allocation.elite_surplus,
            NodeKind::PublicAllocation => allocation.public_allocation,
        },
    });

    let flows = FlowKind::ALL.map(|kind| {
        let (start, end) = kind.endpoints();
        let (value, color) = match kind {
            FlowKind::Labor => (allocation.labor, palette::LABOR),
            FlowKind::Automation => (allocation.automation, palette::AUTOMATION),
            FlowKind::Elites => (allocation.elite_surplus, palette::ELITES),
            FlowKind::Public => (allocation.public_allocation, status.color()),
        };
        Flow {
            kind,
            source: kind.source(),
            target: kind.target(),
            start,
            end,
            value,
            color,
            thickness: arrow_thickness(value),
        }
    });

    let reservoir = Reservoir {
        rect: NodeKind::PublicAllocation.rect(),
        fill_fraction: reservoir_fraction(allocation.public_allocation),
        qlt_fraction: reservoir_fraction(inputs.qlt),
        fill_color: status.color(),
    };

    DiagramSpec {
        inputs: *inputs,
        allocation,
        status,
        nodes,
        flows,
        reservoir,
    }
}
