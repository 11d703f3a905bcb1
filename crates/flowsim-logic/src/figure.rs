//! Figure composition: turns a [`DiagramSpec`] into drawable primitives.
//!
//! A [`Figure`] is a retained list of shapes in data coordinates (both axes
//! 0..100, y up) plus the page size in points. Front ends never lay
//! anything out themselves: they ask the figure to project points into page
//! space (y down, points) and scale that uniformly onto their surface.
//!
//! Page layout mirrors a 12 × 7 inch plotting figure with default subplot
//! margins, so the axes occupy the frame given by [`AxesFrame::default`].
//!
//! ```
//! use flowsim_logic::config::SimulationInputs;
//! use flowsim_logic::figure::render;
//!
//! let figure = render(&SimulationInputs::default());
//! assert_eq!(figure.title.text, "SYSTEM STATUS: STABLE");
//! assert_eq!(figure.shapes.len(), figure.draw_order().len());
//! ```

use serde::Serialize;

use crate::config::SimulationInputs;
use crate::constants::layout;
use crate::constants::palette;
use crate::diagram::{build_diagram, DiagramSpec, NodeKind};
use crate::policy::Policy;

// ── Primitives ──────────────────────────────────────────────────────────

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Axis-aligned rectangle anchored at its lower-left corner in data space.
/// Height may be negative (a reservoir filled below empty).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grown by `pad` on every side.
    pub fn padded(&self, pad: f64) -> Rect {
        Rect::new(
            self.x - pad,
            self.y - pad,
            self.width + 2.0 * pad,
            self.height + 2.0 * pad,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Round-cornered box; the outline is drawn `pad` outside `rect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxShape {
    pub rect: Rect,
    pub pad: f64,
    pub fill: Rgb,
    pub alpha: f64,
    /// Outline colour and width in points.
    pub outline: Option<(Rgb, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextShape {
    /// Data coordinates. Lines are separated by `\n`.
    pub at: Point,
    pub text: String,
    pub color: Rgb,
    pub size_pt: f64,
    pub bold: bool,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

/// Curved flow arrow with a constant-width tail and a triangular head.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowShape {
    pub start: Point,
    pub end: Point,
    /// arc3 curvature: control-point offset as a fraction of the chord.
    pub curvature: f64,
    pub tail_width_pt: f64,
    pub head_length_pt: f64,
    pub head_width_pt: f64,
    pub color: Rgb,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HLineShape {
    pub y: f64,
    pub x0: f64,
    pub x1: f64,
    pub color: Rgb,
    pub width_pt: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Box(BoxShape),
    Arrow(ArrowShape),
    HLine(HLineShape),
    Text(TextShape),
}

impl Shape {
    /// Patches below lines below text.
    pub fn z_order(&self) -> u8 {
        match self {
            Shape::Box(_) | Shape::Arrow(_) => 1,
            Shape::HLine(_) => 2,
            Shape::Text(_) => 3,
        }
    }
}

/// Centred figure title, positioned as a fraction of page height from the
/// bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub color: Rgb,
    pub size_pt: f64,
    pub y_fraction: f64,
}

/// Axes rectangle as fractions of the page (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxesFrame {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Default for AxesFrame {
    fn default() -> Self {
        Self {
            left: 0.125,
            bottom: 0.11,
            right: 0.9,
            top: 0.88,
        }
    }
}

/// Arrow outline resolved into page space.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowGeometry {
    /// Tail centre line, ending where the head begins.
    pub shaft: Vec<Point>,
    /// Tip first, then the two base corners.
    pub head: [Point; 3],
    pub tail_width_pt: f64,
}

/// The rendered figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub width_pt: f64,
    pub height_pt: f64,
    pub background: Rgb,
    pub axes: AxesFrame,
    pub title: Title,
    pub shapes: Vec<Shape>,
}

const SHAFT_SAMPLES: usize = 24;

impl Figure {
    fn new(title: Title) -> Self {
        Self {
            width_pt: layout::FIGURE_WIDTH_PT,
            height_pt: layout::FIGURE_HEIGHT_PT,
            background: palette::BACKGROUND,
            axes: AxesFrame::default(),
            title,
            shapes: Vec::new(),
        }
    }

    /// Shapes in painting order: stable sort by [`Shape::z_order`].
    pub fn draw_order(&self) -> Vec<&Shape> {
        let mut ordered: Vec<&Shape> = self.shapes.iter().collect();
        ordered.sort_by_key(|s| s.z_order());
        ordered
    }

    /// Points per data unit along x.
    pub fn x_scale(&self) -> f64 {
        (self.axes.right - self.axes.left) * self.width_pt / layout::CANVAS_EXTENT
    }

    /// Points per data unit along y.
    pub fn y_scale(&self) -> f64 {
        (self.axes.top - self.axes.bottom) * self.height_pt / layout::CANVAS_EXTENT
    }

    /// Data coordinates to page points, y growing downwards.
    pub fn project(&self, p: Point) -> Point {
        let x = self.axes.left * self.width_pt + p.x * self.x_scale();
        let y_up = self.axes.bottom * self.height_pt + p.y * self.y_scale();
        Point::new(x, self.height_pt - y_up)
    }

    /// Data rectangle to page space as `(top_left, width, height)`, with
    /// negative extents flipped so width and height are never negative.
    pub fn project_rect(&self, r: &Rect) -> (Point, f64, f64) {
        let a = self.project(Point::new(r.x, r.y));
        let b = self.project(Point::new(r.x + r.width, r.y + r.height));
        let top_left = Point::new(a.x.min(b.x), a.y.min(b.y));
        (top_left, (b.x - a.x).abs(), (b.y - a.y).abs())
    }

    /// Title anchor in page points.
    pub fn title_anchor(&self) -> Point {
        Point::new(
            self.width_pt / 2.0,
            self.height_pt * (1.0 - self.title.y_fraction),
        )
    }

    /// Quadratic control point of an arrow's arc3 connection, in page points.
    pub fn arrow_control_point(&self, arrow: &ArrowShape) -> Point {
        // arc3 is defined with y up; flip in, offset, flip back.
        let a = self.project(arrow.start);
        let b = self.project(arrow.end);
        let (x1, y1) = (a.x, self.height_pt - a.y);
        let (x2, y2) = (b.x, self.height_pt - b.y);
        let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
        let (dx, dy) = (x2 - x1, y2 - y1);
        let cx = mx + arrow.curvature * dy;
        let cy = my - arrow.curvature * dx;
        Point::new(cx, self.height_pt - cy)
    }

    /// Points along the arrow's curve from start to end, in page points.
    pub fn sample_arrow(&self, arrow: &ArrowShape, segments: usize) -> Vec<Point> {
        let p0 = self.project(arrow.start);
        let p2 = self.project(arrow.end);
        let c = self.arrow_control_point(arrow);
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                p0.lerp(c, t).lerp(c.lerp(p2, t), t)
            })
            .collect()
    }

    /// Shaft and head of an arrow, in page points.
    pub fn arrow_geometry(&self, arrow: &ArrowShape) -> ArrowGeometry {
        let tip = self.project(arrow.end);
        let control = self.arrow_control_point(arrow);

        let (mut ux, mut uy) = (tip.x - control.x, tip.y - control.y);
        let len = (ux * ux + uy * uy).sqrt();
        if len > 0.0 {
            ux /= len;
            uy /= len;
        }
        let base = Point::new(
            tip.x - ux * arrow.head_length_pt,
            tip.y - uy * arrow.head_length_pt,
        );
        let half = arrow.head_width_pt / 2.0;
        let head = [
            tip,
            Point::new(base.x - uy * half, base.y + ux * half),
            Point::new(base.x + uy * half, base.y - ux * half),
        ];

        let mut shaft: Vec<Point> = self
            .sample_arrow(arrow, SHAFT_SAMPLES)
            .into_iter()
            .take_while(|p| p.distance(tip) > arrow.head_length_pt)
            .collect();
        shaft.push(base);

        ArrowGeometry {
            shaft,
            head,
            tail_width_pt: arrow.tail_width_pt,
        }
    }
}

// ── Composition ─────────────────────────────────────────────────────────

/// `$1485B` style amount.
pub fn format_billions(value: f64) -> String {
    format!("${:.0}B", value)
}

fn node_box(rect: Rect, fill: Rgb) -> Shape {
    Shape::Box(BoxShape {
        rect,
        pad: layout::BOX_PAD,
        fill,
        alpha: 1.0,
        outline: Some((palette::WHITE, 1.0)),
    })
}

fn text(at: Point, text: impl Into<String>, color: Rgb, size_pt: f64, bold: bool) -> TextShape {
    TextShape {
        at,
        text: text.into(),
        color,
        size_pt,
        bold,
        h_align: HAlign::Center,
        v_align: VAlign::Center,
    }
}

/// Compose the figure for an already-built diagram.
pub fn compose(diagram: &DiagramSpec) -> Figure {
    let status = diagram.status;
    let status_color = status.color();

    let mut figure = Figure::new(Title {
        text: format!("SYSTEM STATUS: {}", status.text()),
        color: status_color,
        size_pt: layout::TITLE_SIZE_PT,
        y_fraction: layout::TITLE_Y_FRACTION,
    });

    // Nodes
    for node in diagram
        .nodes
        .iter()
        .filter(|n| n.kind != NodeKind::PublicAllocation)
    {
        figure.shapes.push(node_box(node.rect, node.fill));
        let center = node.rect.center();
        let sublabel = match node.kind {
            NodeKind::Economy => format!("Total: ${}B", node.value),
            _ => format_billions(node.value),
        };
        figure.shapes.push(Shape::Text(text(
            Point::new(center.x, center.y + layout::LABEL_OFFSET),
            node.title,
            palette::WHITE,
            layout::NODE_TITLE_SIZE_PT,
            true,
        )));
        figure.shapes.push(Shape::Text(text(
            Point::new(center.x, center.y - layout::LABEL_OFFSET),
            sublabel,
            palette::WHITE,
            layout::NODE_VALUE_SIZE_PT,
            false,
        )));
    }

    // Public reservoir: empty box, water level, QLT marker, caption
    let reservoir = &diagram.reservoir;
    figure
        .shapes
        .push(node_box(reservoir.rect, NodeKind::PublicAllocation.fill()));
    figure.shapes.push(Shape::Box(BoxShape {
        rect: reservoir.fill_rect(),
        pad: layout::BOX_PAD,
        fill: reservoir.fill_color,
        alpha: layout::RESERVOIR_FILL_ALPHA,
        outline: None,
    }));

    let marker_y = reservoir.marker_y();
    figure.shapes.push(Shape::HLine(HLineShape {
        y: marker_y,
        x0: layout::QLT_MARKER_X0,
        x1: layout::QLT_MARKER_X1,
        color: palette::WHITE,
        width_pt: layout::QLT_MARKER_WIDTH_PT,
        dashed: true,
    }));
    figure.shapes.push(Shape::Text(TextShape {
        h_align: HAlign::Left,
        ..text(
            Point::new(layout::QLT_LABEL_X, marker_y),
            "QLT",
            palette::WHITE,
            layout::NODE_VALUE_SIZE_PT,
            true,
        )
    }));

    let public_center = reservoir.rect.center();
    figure.shapes.push(Shape::Text(TextShape {
        v_align: VAlign::Top,
        ..text(
            Point::new(
                public_center.x,
                reservoir.rect.y - layout::PUBLIC_CAPTION_DROP,
            ),
            format!(
                "{}\n{}",
                NodeKind::PublicAllocation.title(),
                format_billions(diagram.allocation.public_allocation)
            ),
            status_color,
            layout::DEFAULT_TEXT_SIZE_PT,
            true,
        )
    }));

    // Flows
    for flow in &diagram.flows {
        figure.shapes.push(Shape::Arrow(ArrowShape {
            start: flow.start,
            end: flow.end,
            curvature: layout::FLOW_CURVATURE,
            tail_width_pt: flow.thickness,
            head_length_pt: layout::ARROW_HEAD_LENGTH_PT,
            head_width_pt: layout::ARROW_HEAD_WIDTH_PT,
            color: flow.color,
            alpha: layout::FLOW_ALPHA,
        }));
    }

    let (cx, cy) = layout::POLICY_CAPTION;
    figure.shapes.push(Shape::Text(TextShape {
        v_align: VAlign::Bottom,
        ..text(
            Point::new(cx, cy),
            format!("Active Policy: {}", diagram.policy_label()),
            palette::WHITE,
            layout::CAPTION_SIZE_PT,
            false,
        )
    }));

    log::debug!(
        "figure composed: status={} shapes={}",
        status.text(),
        figure.shapes.len()
    );

    figure
}

/// Calculate, lay out and compose in one call.
pub fn render(inputs: &SimulationInputs) -> Figure {
    compose(&build_diagram(inputs))
}

/// Render from loose dashboard values. Unknown policy names mean no policy.
pub fn render_parts(
    total_value: f64,
    jobs_available: f64,
    population: f64,
    qlt: f64,
    policy_name: &str,
) -> Figure {
    render(&SimulationInputs {
        population,
        qlt,
        jobs_available,
        total_value,
        policy: Policy::from_name(policy_name),
    })
}
