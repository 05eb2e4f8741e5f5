use crate::geometry::{Bounds, LayoutConfig, Point};
use crate::graph::SchemaGraph;
use crate::model::RelationshipType;
use crate::orchestrator::{self_loop_points, LayoutResult};
use crate::path::path_to_svg_rounded;

const MARGIN: f64 = 40.0;

/// Renders a full schema layout as a standalone SVG document: one rounded
/// card per node, one routed path per edge with a small crow's-foot-style
/// marker at the target end, and a self-loop hook for nodes with
/// `has_self_connection`. Presentation only — nothing here feeds back into
/// placement or routing.
pub fn render_svg(g: &SchemaGraph, result: &LayoutResult, config: &LayoutConfig) -> String {
    let (width, height) = document_extent(result, config);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\">\n",
        width, height, width, height
    ));
    svg.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#fafafa\"/>\n");

    for idx in g.graph.node_indices() {
        if let Some(bounds) = result.bounds.get(&idx) {
            render_node(&mut svg, g, idx, bounds, config);
            if g.graph[idx].has_self_connection {
                render_self_loop(&mut svg, bounds, config);
            }
        }
    }

    for route in &result.routes {
        let rel = &g.graph[route.edge];
        render_edge(&mut svg, &route.points, rel.rel_type, config);
    }

    svg.push_str("</svg>\n");
    svg
}

fn document_extent(result: &LayoutResult, config: &LayoutConfig) -> (f64, f64) {
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    for b in result.bounds.values() {
        max_x = max_x.max(b.right);
        max_y = max_y.max(b.bottom);
    }
    for route in &result.routes {
        for p in &route.points {
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
    }
    (max_x + config.outer_margin + MARGIN, max_y + MARGIN)
}

fn render_node(svg: &mut String, g: &SchemaGraph, idx: petgraph::graph::NodeIndex, bounds: &Bounds, config: &LayoutConfig) {
    let node = &g.graph[idx];
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" fill=\"#ffffff\" stroke=\"#888888\"/>\n",
        bounds.left, bounds.top, bounds.width(), bounds.height()
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#2b5797\"/>\n",
        bounds.left, bounds.top, bounds.width(), config.header_height
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" fill=\"#ffffff\" font-size=\"14\" font-weight=\"bold\">{}</text>\n",
        bounds.left + 8.0,
        bounds.top + config.header_height / 2.0 + 5.0,
        escape_xml(&node.model.verbose_name)
    ));

    let visible = node.model.fields.iter().take(config.visible_field_max);
    for (i, field) in visible.enumerate() {
        let y = bounds.top + config.header_height + config.body_pad / 2.0 + (i as f64) * config.row_height + config.row_height / 2.0 + 4.0;
        let label = if field.primary_key {
            format!("🔑 {}", field.name)
        } else {
            field.name.clone()
        };
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" fill=\"#222222\" font-size=\"12\">{}: {}</text>\n",
            bounds.left + 8.0,
            y,
            escape_xml(&label),
            escape_xml(&field.field_type)
        ));
    }
    if node.model.fields.len() > config.visible_field_max {
        let y = bounds.bottom - config.more_indicator_height / 2.0 + 4.0;
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" fill=\"#666666\" font-size=\"11\" font-style=\"italic\">+{} more</text>\n",
            bounds.left + 8.0,
            y,
            node.model.fields.len() - config.visible_field_max
        ));
    }
}

fn render_self_loop(svg: &mut String, bounds: &Bounds, config: &LayoutConfig) {
    let points = self_loop_points(bounds, config);
    let d = path_to_svg_rounded(&points, config.corner_radius);
    svg.push_str(&format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"#555555\" stroke-width=\"1.5\"/>\n",
        d
    ));
}

fn render_edge(svg: &mut String, points: &[Point], rel_type: RelationshipType, config: &LayoutConfig) {
    if points.len() < 2 {
        return;
    }
    let d = path_to_svg_rounded(points, config.corner_radius);
    svg.push_str(&format!("<path d=\"{}\" fill=\"none\" stroke=\"#555555\" stroke-width=\"1.5\"/>\n", d));

    let end = points[points.len() - 1];
    let before = points[points.len() - 2];
    render_marker(svg, before, end, rel_type);
}

/// A minimal crow's-foot-ish marker at the arrival end: a short
/// perpendicular tick for a one-to-one relationship, a small fork for
/// many-to-many, nothing extra for a plain foreign key beyond the line
/// itself. This is pure decoration layered on top of an already-computed
/// route; it never influences scoring or path selection.
fn render_marker(svg: &mut String, before: Point, end: Point, rel_type: RelationshipType) {
    let (dx, dy) = (end.x - before.x, end.y - before.y);
    let len = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
    let (ux, uy) = (dx / len, dy / len);
    let (px, py) = (-uy, ux);
    let tick = 6.0;

    match rel_type {
        RelationshipType::OneToOne => {
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#555555\" stroke-width=\"1.5\"/>\n",
                end.x - ux * 10.0 + px * tick,
                end.y - uy * 10.0 + py * tick,
                end.x - ux * 10.0 - px * tick,
                end.y - uy * 10.0 - py * tick
            ));
        }
        RelationshipType::ManyToMany => {
            for sign in [-1.0, 1.0] {
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#555555\" stroke-width=\"1.5\"/>\n",
                    end.x,
                    end.y,
                    end.x - ux * 10.0 + sign * px * tick,
                    end.y - uy * 10.0 + sign * py * tick
                ));
            }
        }
        RelationshipType::ForeignKey => {}
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
