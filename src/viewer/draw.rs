use eframe::egui::{self, Color32, FontId, Pos2, Rect, Stroke, Vec2};

use crate::geometry::{LayoutConfig, Point};
use crate::graph::SchemaGraph;
use crate::orchestrator::LayoutResult;

fn to_screen(p: Point, pan: Vec2, zoom: f32) -> Pos2 {
    Pos2::new(p.x as f32 * zoom + pan.x, p.y as f32 * zoom + pan.y)
}

pub fn paint(
    ui: &mut egui::Ui,
    g: &SchemaGraph,
    result: &LayoutResult,
    config: &LayoutConfig,
    pan: Vec2,
    zoom: f32,
    search: &str,
) {
    let painter = ui.painter();
    let search_lower = search.to_lowercase();

    for route in &result.routes {
        if route.points.len() < 2 {
            continue;
        }
        let screen_points: Vec<Pos2> = route.points.iter().map(|&p| to_screen(p, pan, zoom)).collect();
        for w in screen_points.windows(2) {
            painter.line_segment([w[0], w[1]], Stroke::new(1.5, Color32::from_gray(110)));
        }
    }

    for idx in g.graph.node_indices() {
        let Some(bounds) = result.bounds.get(&idx) else { continue };
        let node = &g.graph[idx];
        let matches_search = search_lower.is_empty() || node.key.to_lowercase().contains(&search_lower);

        let top_left = to_screen(Point::new(bounds.left, bounds.top), pan, zoom);
        let bottom_right = to_screen(Point::new(bounds.right, bounds.bottom), pan, zoom);
        let rect = Rect::from_min_max(top_left, bottom_right);

        let border = if matches_search { Color32::from_rgb(255, 196, 0) } else { Color32::from_gray(140) };
        painter.rect_filled(rect, 6.0, Color32::WHITE);
        painter.rect_stroke(rect, 6.0, Stroke::new(if matches_search { 2.5 } else { 1.0 }, border));

        let header_height = config.header_height as f32 * zoom;
        let header_rect = Rect::from_min_size(rect.min, Vec2::new(rect.width(), header_height));
        painter.rect_filled(header_rect, 6.0, Color32::from_rgb(43, 87, 151));
        painter.text(
            header_rect.left_center() + Vec2::new(8.0, 0.0),
            egui::Align2::LEFT_CENTER,
            &node.model.verbose_name,
            FontId::proportional(13.0 * zoom.max(0.4)),
            Color32::WHITE,
        );

        for (i, field) in node.model.fields.iter().take(config.visible_field_max).enumerate() {
            let y = rect.min.y + header_height + (8.0 + i as f32 * 20.0) * zoom;
            painter.text(
                Pos2::new(rect.min.x + 8.0, y),
                egui::Align2::LEFT_CENTER,
                format!("{}: {}", field.name, field.field_type),
                FontId::proportional(11.0 * zoom.max(0.4)),
                Color32::from_gray(40),
            );
        }

        if node.has_self_connection {
            let loop_points = crate::orchestrator::self_loop_points(bounds, config);
            let screen_loop: Vec<Pos2> = loop_points.iter().map(|&p| to_screen(p, pan, zoom)).collect();
            for w in screen_loop.windows(2) {
                painter.line_segment([w[0], w[1]], Stroke::new(1.5, Color32::from_gray(110)));
            }
        }
    }
}
