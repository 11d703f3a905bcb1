//! Standalone SVG export of a [`Figure`].
//!
//! One page point is one SVG user unit. Shapes are written in
//! [`Figure::draw_order`]; numbers are written as-is, so non-finite inputs
//! produce a document with `NaN` attributes rather than an error.

use std::fmt::Write;

use crate::figure::{
    ArrowShape, BoxShape, Figure, HAlign, HLineShape, Point, Shape, TextShape, VAlign,
};

/// Dash pattern for a dashed line, as multiples of its width.
const DASH_ON: f64 = 3.7;
const DASH_OFF: f64 = 1.6;

/// Line height as a multiple of font size.
const LINE_SPACING: f64 = 1.2;

pub fn to_svg(figure: &Figure) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = figure.width_pt,
        h = figure.height_pt
    );
    let _ = writeln!(
        out,
        r#"<rect x="0" y="0" width="{:.0}" height="{:.0}" fill="{}"/>"#,
        figure.width_pt,
        figure.height_pt,
        figure.background.hex()
    );

    for shape in figure.draw_order() {
        match shape {
            Shape::Box(b) => write_box(&mut out, figure, b),
            Shape::Arrow(a) => write_arrow(&mut out, figure, a),
            Shape::HLine(l) => write_hline(&mut out, figure, l),
            Shape::Text(t) => write_text(&mut out, figure, t),
        }
    }

    let title = figure.title_anchor();
    let _ = writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" font-weight="bold" text-anchor="middle" dominant-baseline="hanging" fill="{}">{}</text>"#,
        title.x,
        title.y,
        figure.title.size_pt,
        figure.title.color.hex(),
        escape(&figure.title.text)
    );

    out.push_str("</svg>\n");
    out
}

fn write_box(out: &mut String, figure: &Figure, b: &BoxShape) {
    let (top_left, width, height) = figure.project_rect(&b.rect.padded(b.pad));
    let rx = b.pad * figure.x_scale();
    let ry = b.pad * figure.y_scale();
    let stroke = match b.outline {
        Some((color, width)) => {
            format!(r#" stroke="{}" stroke-width="{:.1}""#, color.hex(), width)
        }
        None => String::from(r#" stroke="none""#),
    };
    let _ = writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" ry="{:.2}" fill="{}" fill-opacity="{:.2}"{}/>"#,
        top_left.x,
        top_left.y,
        width,
        height,
        rx,
        ry,
        b.fill.hex(),
        b.alpha,
        stroke
    );
}

fn write_arrow(out: &mut String, figure: &Figure, a: &ArrowShape) {
    let geom = figure.arrow_geometry(a);
    let shaft = geom
        .shaft
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let head = geom
        .head
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let color = a.color.hex();
    let _ = writeln!(
        out,
        r#"<g opacity="{:.2}"><polyline points="{}" fill="none" stroke="{}" stroke-width="{:.2}"/><polygon points="{}" fill="{}"/></g>"#,
        a.alpha, shaft, color, geom.tail_width_pt, head, color
    );
}

fn write_hline(out: &mut String, figure: &Figure, l: &HLineShape) {
    let a = figure.project(Point::new(l.x0, l.y));
    let b = figure.project(Point::new(l.x1, l.y));
    let dash = if l.dashed {
        format!(
            r#" stroke-dasharray="{:.1} {:.1}""#,
            DASH_ON * l.width_pt,
            DASH_OFF * l.width_pt
        )
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.1}"{}/>"#,
        a.x,
        a.y,
        b.x,
        b.y,
        l.color.hex(),
        l.width_pt,
        dash
    );
}

fn write_text(out: &mut String, figure: &Figure, t: &TextShape) {
    let anchor = figure.project(t.at);
    let lines: Vec<&str> = t.text.split('\n').collect();
    let line_height = t.size_pt * LINE_SPACING;
    let block = line_height * (lines.len() as f64 - 1.0);

    // Baseline of the first line so the block honours the vertical alignment.
    let first_y = match t.v_align {
        VAlign::Top => anchor.y + t.size_pt,
        VAlign::Center => anchor.y - block / 2.0 + t.size_pt * 0.35,
        VAlign::Bottom => anchor.y - block,
    };
    let text_anchor = match t.h_align {
        HAlign::Left => "start",
        HAlign::Center => "middle",
        HAlign::Right => "end",
    };
    let weight = if t.bold { "bold" } else { "normal" };

    let _ = write!(
        out,
        r#"<text font-family="sans-serif" font-size="{:.1}" font-weight="{}" text-anchor="{}" fill="{}">"#,
        t.size_pt,
        weight,
        text_anchor,
        t.color.hex()
    );
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<tspan x="{:.2}" y="{:.2}">{}</tspan>"#,
            anchor.x,
            first_y + i as f64 * line_height,
            escape(line)
        );
    }
    out.push_str("</text>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationInputs;
    use crate::figure::render;

    #[test]
    fn test_document_shell() {
        let svg = to_svg(&render(&SimulationInputs::default()));
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 864 504""#));
        assert!(svg.contains("#2b2b2b"));
    }

    #[test]
    fn test_contains_every_shape() {
        let svg = to_svg(&render(&SimulationInputs::default()));
        // Background plus six boxes.
        assert_eq!(svg.matches("<rect ").count(), 7);
        assert_eq!(svg.matches("<polygon ").count(), 4);
        assert_eq!(svg.matches("<line ").count(), 1);
        assert!(svg.contains("stroke-dasharray=\"7.4 3.2\""));
        assert!(svg.contains("SYSTEM STATUS: STABLE"));
        assert!(svg.contains("Elites/Corps"));
    }

    #[test]
    fn test_multiline_caption_uses_tspans() {
        let svg = to_svg(&render(&SimulationInputs::default()));
        assert!(svg.contains(">Public Allocation</tspan>"));
        assert!(svg.contains(">$825B</tspan>"));
    }

    #[test]
    fn test_collapse_colours() {
        let svg = to_svg(&render(&SimulationInputs::default().with_total_value(900.0)));
        assert!(svg.contains("SYSTEM STATUS: COLLAPSE"));
        assert!(svg.contains("#e74c3c"));
        assert!(!svg.contains("#2ecc71"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("A & B <c>"), "A &amp; B &lt;c&gt;");
    }
}
