//! Central panel: paints the current [`Figure`] with the egui painter.
//!
//! The figure is laid out in page points; [`PageTransform`] scales that
//! page uniformly into whatever area the panel has left, centred.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use flowsim_logic::figure::{
    ArrowShape, BoxShape, Figure, HAlign, HLineShape, Point, Rgb, Shape, TextShape, VAlign,
};

use crate::state::Dashboard;

/// Dash length and gap as multiples of line width.
const DASH_ON: f32 = 3.7;
const DASH_OFF: f32 = 1.6;

/// Page points to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub origin: egui::Pos2,
    pub scale: f32,
}

impl PageTransform {
    /// Largest uniform scale that fits the page into `area`, centred.
    pub fn fit(page_width: f64, page_height: f64, area: egui::Rect) -> Self {
        let sx = area.width() / page_width as f32;
        let sy = area.height() / page_height as f32;
        let scale = sx.min(sy).max(0.0);
        let used = egui::vec2(page_width as f32 * scale, page_height as f32 * scale);
        let origin = area.min + (area.size() - used) / 2.0;
        Self { origin, scale }
    }

    pub fn pos(&self, p: Point) -> egui::Pos2 {
        self.origin + egui::vec2(p.x as f32 * self.scale, p.y as f32 * self.scale)
    }

    pub fn px(&self, points: f64) -> f32 {
        points as f32 * self.scale
    }
}

pub fn color32(rgb: Rgb, alpha: f64) -> egui::Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(rgb.r, rgb.g, rgb.b, a)
}

pub fn align2(h: HAlign, v: VAlign) -> egui::Align2 {
    let h = match h {
        HAlign::Left => egui::Align::Min,
        HAlign::Center => egui::Align::Center,
        HAlign::Right => egui::Align::Max,
    };
    let v = match v {
        VAlign::Top => egui::Align::Min,
        VAlign::Center => egui::Align::Center,
        VAlign::Bottom => egui::Align::Max,
    };
    egui::Align2([h, v])
}

pub fn figure_panel(mut contexts: EguiContexts, dashboard: Res<Dashboard>) {
    egui::CentralPanel::default().show(contexts.ctx_mut(), |ui| {
        ui.heading("Macro-Economic Flow Simulator");
        ui.label("Visualize how value flows from Labor/Automation to the Public/Elites.");
        ui.add_space(8.0);

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        paint_figure(&painter, response.rect, dashboard.figure());
    });
}

pub fn paint_figure(painter: &egui::Painter, area: egui::Rect, figure: &Figure) {
    let t = PageTransform::fit(figure.width_pt, figure.height_pt, area);

    let page = egui::Rect::from_min_size(
        t.pos(Point::new(0.0, 0.0)),
        egui::vec2(t.px(figure.width_pt), t.px(figure.height_pt)),
    );
    painter.rect_filled(page, 0.0, color32(figure.background, 1.0));

    for shape in figure.draw_order() {
        match shape {
            Shape::Box(b) => paint_box(painter, &t, figure, b),
            Shape::Arrow(a) => paint_arrow(painter, &t, figure, a),
            Shape::HLine(l) => paint_hline(painter, &t, figure, l),
            Shape::Text(text) => paint_text(painter, &t, figure, text),
        }
    }

    painter.text(
        t.pos(figure.title_anchor()),
        egui::Align2::CENTER_TOP,
        &figure.title.text,
        egui::FontId::proportional(t.px(figure.title.size_pt)),
        color32(figure.title.color, 1.0),
    );
}

fn paint_box(painter: &egui::Painter, t: &PageTransform, figure: &Figure, b: &BoxShape) {
    let (top_left, width, height) = figure.project_rect(&b.rect.padded(b.pad));
    let rect = egui::Rect::from_min_size(
        t.pos(top_left),
        egui::vec2(t.px(width), t.px(height)),
    );
    let outline = b
        .outline
        .map(|(color, width_pt)| egui::Stroke::new(t.px(width_pt), color32(color, 1.0)));
    painter.extend(rounded_box(
        rect,
        t.px(b.pad * figure.x_scale()),
        color32(b.fill, b.alpha),
        outline,
    ));
}

/// Fill and optional outline of a box, both on the same rounded corners.
pub fn rounded_box(
    rect: egui::Rect,
    radius: f32,
    fill: egui::Color32,
    outline: Option<egui::Stroke>,
) -> Vec<egui::Shape> {
    let mut shapes = vec![egui::Shape::Rect(egui::epaint::RectShape::filled(
        rect, radius, fill,
    ))];
    if let Some(stroke) = outline {
        shapes.push(egui::Shape::Rect(egui::epaint::RectShape::stroke(
            rect,
            radius,
            stroke,
            egui::StrokeKind::Middle,
        )));
    }
    shapes
}

fn paint_arrow(painter: &egui::Painter, t: &PageTransform, figure: &Figure, a: &ArrowShape) {
    let geom = figure.arrow_geometry(a);
    let color = color32(a.color, a.alpha);

    let shaft: Vec<egui::Pos2> = geom.shaft.iter().map(|p| t.pos(*p)).collect();
    painter.add(egui::Shape::line(
        shaft,
        egui::Stroke::new(t.px(geom.tail_width_pt), color),
    ));

    let head: Vec<egui::Pos2> = geom.head.iter().map(|p| t.pos(*p)).collect();
    painter.add(egui::Shape::convex_polygon(head, color, egui::Stroke::NONE));
}

fn paint_hline(painter: &egui::Painter, t: &PageTransform, figure: &Figure, l: &HLineShape) {
    let a = t.pos(figure.project(Point::new(l.x0, l.y)));
    let b = t.pos(figure.project(Point::new(l.x1, l.y)));
    let width = t.px(l.width_pt);
    let stroke = egui::Stroke::new(width, color32(l.color, 1.0));
    if l.dashed {
        painter.extend(egui::Shape::dashed_line(
            &[a, b],
            stroke,
            DASH_ON * width,
            DASH_OFF * width,
        ));
    } else {
        painter.line_segment([a, b], stroke);
    }
}

fn paint_text(painter: &egui::Painter, t: &PageTransform, figure: &Figure, text: &TextShape) {
    // Default egui fonts carry no bold face, so weight is not rendered.
    painter.text(
        t.pos(figure.project(text.at)),
        align2(text.h_align, text.v_align),
        &text.text,
        egui::FontId::proportional(t.px(text.size_pt)),
        color32(text.color, 1.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_area_is_height_limited() {
        let area = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(2000.0, 504.0));
        let t = PageTransform::fit(864.0, 504.0, area);
        assert!((t.scale - 1.0).abs() < 1e-6);
        // Centred horizontally.
        assert!((t.origin.x - (100.0 + (2000.0 - 864.0) / 2.0)).abs() < 1e-3);
        assert!((t.origin.y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_tall_area_is_width_limited() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(432.0, 1000.0));
        let t = PageTransform::fit(864.0, 504.0, area);
        assert!((t.scale - 0.5).abs() < 1e-6);
        let far = t.pos(Point::new(864.0, 504.0));
        assert!((far.x - 432.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_empty_area() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(0.0, 0.0));
        let t = PageTransform::fit(864.0, 504.0, area);
        assert_eq!(t.scale, 0.0);
    }

    #[test]
    fn test_color32_alpha() {
        let c = color32(Rgb::new(0x2e, 0xcc, 0x71), 1.0);
        assert_eq!(c, egui::Color32::from_rgb(0x2e, 0xcc, 0x71));
        let translucent = color32(Rgb::new(255, 0, 0), 0.6);
        assert_eq!(translucent.a(), 153);
        assert_eq!(color32(Rgb::new(0, 0, 0), 3.0).a(), 255);
    }

    #[test]
    fn test_outline_follows_fill_corners() {
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(120.0, 60.0));
        let stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
        let shapes = rounded_box(rect, 4.0, egui::Color32::from_rgb(0x34, 0x98, 0xdb), Some(stroke));
        assert_eq!(shapes.len(), 2);
        match (&shapes[0], &shapes[1]) {
            (egui::Shape::Rect(fill), egui::Shape::Rect(outline)) => {
                assert_eq!(fill.rect, outline.rect);
                assert_eq!(fill.corner_radius, outline.corner_radius);
                assert_ne!(outline.corner_radius, egui::CornerRadius::ZERO);
                assert_eq!(outline.stroke, stroke);
            }
            other => panic!("unexpected shapes {other:?}"),
        }
    }

    #[test]
    fn test_box_without_outline_is_fill_only() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(50.0, 20.0));
        let shapes = rounded_box(rect, 4.0, egui::Color32::RED, None);
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn test_align2_mapping() {
        assert_eq!(align2(HAlign::Center, VAlign::Center), egui::Align2::CENTER_CENTER);
        assert_eq!(align2(HAlign::Left, VAlign::Center), egui::Align2::LEFT_CENTER);
        assert_eq!(align2(HAlign::Center, VAlign::Top), egui::Align2::CENTER_TOP);
        assert_eq!(align2(HAlign::Right, VAlign::Bottom), egui::Align2::RIGHT_BOTTOM);
    }
}
