//! Fixed numbers: economic rates, diagram layout and palette.
//!
//! The economic constants drive [`crate::allocation`]. Everything in
//! [`layout`] and [`palette`] is presentation only and never feeds back into
//! a computed value.

/// Value one workforce unit can claim as labor, capped by total value.
pub const LABOR_VALUE_PER_WORKER: f64 = 90.0;

/// Baseline public allocation per workforce unit.
pub const STANDARD_ALLOCATION_PER_WORKER: f64 = 50.0;

/// Share of total value paid out while the National Dividend is active.
pub const DIVIDEND_RATE: f64 = 0.45;

/// Total value below which the economy is in recession.
pub const RECESSION_THRESHOLD: f64 = 1000.0;

/// Divisor applied to total value when scaling recession cutbacks.
pub const RECESSION_SCALE: f64 = 1500.0;

/// Reference ceiling of the public reservoir gauge (visual scale only).
pub const RESERVOIR_SCALE: f64 = 1500.0;

/// Flow value rendered at the widest arrow tail.
pub const ARROW_REFERENCE_VALUE: f64 = 3000.0;

/// Arrow tail width, in points, at [`ARROW_REFERENCE_VALUE`].
pub const ARROW_REFERENCE_WIDTH: f64 = 25.0;

/// Thinnest arrow tail still drawn, in points.
pub const ARROW_MIN_WIDTH: f64 = 1.0;

pub mod layout {
    //! Canvas geometry in data units (both axes span 0..100, y up).

    /// Axis extent of the canvas.
    pub const CANVAS_EXTENT: f64 = 100.0;

    /// Figure width in points (12 inches at 72 points per inch).
    pub const FIGURE_WIDTH_PT: f64 = 864.0;
    /// Figure height in points (7 inches).
    pub const FIGURE_HEIGHT_PT: f64 = 504.0;

    /// Rounded-box padding around every node rectangle.
    pub const BOX_PAD: f64 = 0.5;

    // Node rectangles as `(x, y, width, height)`.
    pub const LABOR_BOX: (f64, f64, f64, f64) = (5.0, 65.0, 15.0, 10.0);
    pub const AUTOMATION_BOX: (f64, f64, f64, f64) = (5.0, 25.0, 15.0, 10.0);
    pub const ECONOMY_BOX: (f64, f64, f64, f64) = (42.0, 40.0, 16.0, 20.0);
    pub const ELITES_BOX: (f64, f64, f64, f64) = (80.0, 65.0, 15.0, 10.0);
    pub const PUBLIC_BOX: (f64, f64, f64, f64) = (80.0, 15.0, 15.0, 20.0);

    /// Vertical offset of a node's title and sublabel from its centre.
    pub const LABEL_OFFSET: f64 = 2.0;

    // Flow endpoints as `((x1, y1), (x2, y2))`.
    pub const LABOR_FLOW: ((f64, f64), (f64, f64)) = ((21.0, 70.0), (41.0, 55.0));
    pub const AUTOMATION_FLOW: ((f64, f64), (f64, f64)) = ((21.0, 30.0), (41.0, 45.0));
    pub const ELITES_FLOW: ((f64, f64), (f64, f64)) = ((59.0, 55.0), (79.0, 70.0));
    pub const PUBLIC_FLOW: ((f64, f64), (f64, f64)) = ((59.0, 45.0), (79.0, 25.0));

    // Flow arrows: arc3 curvature, opacity and head size in points.
    pub const FLOW_CURVATURE: f64 = -0.1;
    pub const FLOW_ALPHA: f64 = 0.6;
    pub const ARROW_HEAD_LENGTH_PT: f64 = 10.0;
    pub const ARROW_HEAD_WIDTH_PT: f64 = 10.0;

    /// Opacity of the reservoir's water level.
    pub const RESERVOIR_FILL_ALPHA: f64 = 0.8;

    // Dashed QLT marker span, line width and the label to its right.
    pub const QLT_MARKER_X0: f64 = 79.0;
    pub const QLT_MARKER_X1: f64 = 96.0;
    pub const QLT_MARKER_WIDTH_PT: f64 = 2.0;
    pub const QLT_LABEL_X: f64 = 97.0;

    /// Public caption sits below the reservoir.
    pub const PUBLIC_CAPTION_DROP: f64 = 5.0;

    /// Anchor of the "Active Policy" caption.
    pub const POLICY_CAPTION: (f64, f64) = (50.0, 90.0);

    /// Suptitle height as a fraction of the figure.
    pub const TITLE_Y_FRACTION: f64 = 0.95;

    // Font sizes in points.
    pub const TITLE_SIZE_PT: f64 = 20.0;
    pub const CAPTION_SIZE_PT: f64 = 12.0;
    pub const NODE_TITLE_SIZE_PT: f64 = 10.0;
    pub const NODE_VALUE_SIZE_PT: f64 = 9.0;
    pub const DEFAULT_TEXT_SIZE_PT: f64 = 10.0;
}

pub mod palette {
    //! sRGB colours used by the figure.

    use crate::figure::Rgb;

    pub const BACKGROUND: Rgb = Rgb::new(0x2b, 0x2b, 0x2b);
    pub const RESERVOIR_EMPTY: Rgb = Rgb::new(0x22, 0x22, 0x22);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const LABOR: Rgb = Rgb::new(0x34, 0x98, 0xdb);
    pub const AUTOMATION: Rgb = Rgb::new(0x9b, 0x59, 0xb6);
    pub const ECONOMY: Rgb = Rgb::new(0x34, 0x49, 0x5e);
    pub const ELITES: Rgb = Rgb::new(0x95, 0xa5, 0xa6);

    pub const STABLE: Rgb = Rgb::new(0x2e, 0xcc, 0x71);
    pub const COLLAPSE: Rgb = Rgb::new(0xe7, 0x4c, 0x3c);
}
