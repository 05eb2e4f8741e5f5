use eframe::egui::{self, Pos2, Rect, Vec2};

use crate::geometry::Point;
use crate::graph::SchemaGraph;
use crate::orchestrator::LayoutResult;

fn to_screen(p: Point, pan: Vec2, zoom: f32) -> Pos2 {
    Pos2::new(p.x as f32 * zoom + pan.x, p.y as f32 * zoom + pan.y)
}

fn to_layout(p: Pos2, pan: Vec2, zoom: f32) -> Point {
    Point::new(((p.x - pan.x) / zoom) as f64, ((p.y - pan.y) / zoom) as f64)
}

/// Scroll pans, ctrl/cmd+scroll (or pinch) zooms. Zoom is clamped so the
/// diagram never shrinks to nothing or blows up past readability.
pub fn handle_pan_zoom(ui: &mut egui::Ui, pan: &mut Vec2, zoom: &mut f32) {
    let scroll = ui.input(|i| i.smooth_scroll_delta);
    let zoom_delta = ui.input(|i| i.zoom_delta());

    if zoom_delta != 1.0 {
        *zoom = (*zoom * zoom_delta).clamp(0.3, 3.0);
    } else {
        *pan += scroll;
    }
}

/// Hit-tests the node under the pointer on drag start, then tracks the
/// pointer every frame the primary button stays down. Returns the dragged
/// node and its proposed new layout-space position so the caller can commit
/// it through the orchestrator; `None` when nothing is being dragged this
/// frame.
pub fn handle_drag(
    ui: &mut egui::Ui,
    g: &SchemaGraph,
    result: &LayoutResult,
    pan: Vec2,
    zoom: f32,
    dragging: &mut Option<petgraph::graph::NodeIndex>,
) -> Option<(petgraph::graph::NodeIndex, Point)> {
    let pointer = ui.ctx().pointer_interact_pos()?;
    let primary_down = ui.input(|i| i.pointer.primary_down());

    if !primary_down {
        *dragging = None;
        return None;
    }

    if dragging.is_none() {
        for idx in g.graph.node_indices() {
            let Some(bounds) = result.bounds.get(&idx) else { continue };
            let rect = Rect::from_min_max(
                to_screen(Point::new(bounds.left, bounds.top), pan, zoom),
                to_screen(Point::new(bounds.right, bounds.bottom), pan, zoom),
            );
            if rect.contains(pointer) {
                *dragging = Some(idx);
                break;
            }
        }
    }

    let node = (*dragging)?;
    Some((node, to_layout(pointer, pan, zoom)))
}
