use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::LayoutError;
use crate::geometry::{Bounds, LayoutConfig, Point};
use crate::graph::SchemaGraph;

use super::candidates::{
    build_hvh, direct_candidate, obstacle_extent, outer_candidate, short_jog_candidate, side_x,
    simplify_polyline, wide_jog_candidate, Side, SIDE_PAIRS,
};
use super::scoring::score;

#[derive(Debug, Clone)]
pub struct Route {
    pub edge: EdgeIndex,
    pub points: Vec<Point>,
}

/// Routes every edge in insertion order, scoring each edge's candidates
/// against the routes already placed earlier in that same order. An edge
/// whose source or target has no known bounds (a node the position mapper
/// never reached) is skipped rather than treated as an error.
///
/// Fails only when asked to route over a graph with no nodes at all — the
/// one case where there is nothing to route around and no bounds to anchor
/// to, as distinct from an ordinary empty edge set.
pub fn route_edges(
    g: &SchemaGraph,
    _positions: &HashMap<NodeIndex, Point>,
    bounds: &HashMap<NodeIndex, Bounds>,
    config: &LayoutConfig,
) -> Result<Vec<Route>, LayoutError> {
    if g.graph.node_count() == 0 {
        return Err(LayoutError::EmptyGraph);
    }

    let mut placed: Vec<Route> = Vec::new();
    let mut placed_points: Vec<Vec<Point>> = Vec::new();

    for edge_ref in g.graph.edge_references() {
        let eidx = edge_ref.id();
        let source = edge_ref.source();
        let target = edge_ref.target();
        let rel = edge_ref.weight();

        let (Some(sb), Some(tb)) = (bounds.get(&source), bounds.get(&target)) else {
            continue;
        };

        let start_y = sb.top + config.field_y_offset(g.graph[source].model, &rel.rel_name);

        let k = g.graph[target].incoming.len();
        let fan_index = g.graph[target].incoming.iter().position(|&e| e == eidx).unwrap_or(0);
        let fan_offset = (fan_index as f64 - (k as f64 - 1.0) / 2.0) * config.fan_step;
        let end_y = tb.top + config.pk_y_offset(g.graph[target].model) + fan_offset;

        let src_point = |side: Side| Point::new(side_x(sb, side), start_y);
        let tgt_point = |side: Side| Point::new(side_x(tb, side), end_y);

        let obstacles: Vec<&Bounds> = bounds
            .iter()
            .filter(|&(&idx, _)| idx != source && idx != target)
            .map(|(_, b)| b)
            .collect();
        let extent = obstacle_extent(&obstacles);

        let mut candidates: Vec<Vec<Point>> = Vec::new();

        for &(src_side, tgt_side) in &SIDE_PAIRS {
            let src = src_point(src_side);
            let tgt = tgt_point(tgt_side);

            if let Some(pts) = direct_candidate(src, tgt, src_side, tgt_side, config, &obstacles) {
                candidates.push(simplify_polyline(&pts));
            }

            if src_side == Side::Left && tgt_side == Side::Left {
                if let Some((left, _)) = extent {
                    let runway = left - config.outer_margin;
                    if let Some(pts) = outer_candidate(src, tgt, runway, &obstacles) {
                        candidates.push(simplify_polyline(&pts));
                    }
                }
            }
            if src_side == Side::Right && tgt_side == Side::Right {
                if let Some((_, right)) = extent {
                    let runway = right + config.outer_margin;
                    if let Some(pts) = outer_candidate(src, tgt, runway, &obstacles) {
                        candidates.push(simplify_polyline(&pts));
                    }
                }
            }

            candidates.push(simplify_polyline(&short_jog_candidate(src, tgt, src_side, config)));

            let wide_runway = match src_side {
                Side::Left => extent.map(|(left, _)| left - config.outer_margin),
                Side::Right => extent.map(|(_, right)| right + config.outer_margin),
            };
            if let Some(runway) = wide_runway {
                candidates.push(simplify_polyline(&wide_jog_candidate(src, tgt, runway)));
            }
        }

        let chosen = if candidates.is_empty() {
            let fallback_x = extent.map(|(_, r)| r).unwrap_or(sb.right.max(tb.right) + config.outer_margin);
            simplify_polyline(&build_hvh(src_point(Side::Right), tgt_point(Side::Right), fallback_x))
        } else {
            candidates
                .into_iter()
                .min_by(|a, b| {
                    score(a, &placed_points, &obstacles, config)
                        .partial_cmp(&score(b, &placed_points, &obstacles, config))
                        .unwrap()
                })
                .unwrap()
        };

        placed_points.push(chosen.clone());
        placed.push(Route { edge: eidx, points: chosen });
    }

    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{assign_columns, assign_rows, compute_positions};
    use crate::model::Schema;

    fn build(json: &str) -> (Schema, LayoutConfig) {
        (Schema::from_json(json).unwrap(), LayoutConfig::default())
    }

    #[test]
    fn simple_forward_relationship_routes_with_no_crossings_or_touches() {
        let json = r#"{
            "apps": {
                "auth": { "verbose_name": "Auth", "models": {
                    "User": {"verbose_name": "User", "table_name": "auth_user", "fields": [
                        {"name": "id", "type": "AutoField", "primary_key": true}
                    ], "relationships": []}
                }},
                "blog": { "verbose_name": "Blog", "models": {
                    "Post": {"verbose_name": "Post", "table_name": "blog_post", "fields": [
                        {"name": "id", "type": "AutoField", "primary_key": true}
                    ], "relationships": [
                        {"name": "author", "type": "foreign_key", "direction": "forward", "target_app": "auth", "target_model": "User"}
                    ]}
                }}
            }
        }"#;
        let (schema, config) = build(json);
        let g = SchemaGraph::build(&schema, &config);
        let columns = assign_columns(&g);
        let rows = assign_rows(&g, &columns);
        let positions = compute_positions(&g, &columns, &rows, &config);
        let bounds = crate::geometry::compute_bounds(
            &positions,
            &g.graph.node_indices().map(|i| (i, g.graph[i].height)).collect(),
            &config,
        );
        let routes = route_edges(&g, &positions, &bounds, &config).unwrap();

        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert!(route.points.len() >= 2);
        // Only two nodes exist (the edge's own endpoints), so there are no
        // obstacles at all and the route necessarily touches and crosses
        // nothing.
        assert_eq!(super::super::scoring::count_node_touches(&route.points, &[]), 0);
    }

    #[test]
    fn edge_with_missing_bounds_is_skipped_not_fatal() {
        let json = r#"{
            "apps": { "x": { "verbose_name": "X", "models": {
                "A": {"verbose_name": "A", "table_name": "a", "fields": [], "relationships": [
                    {"name": "b", "type": "foreign_key", "direction": "forward", "target_app": "x", "target_model": "B"}
                ]},
                "B": {"verbose_name": "B", "table_name": "b", "fields": [], "relationships": []}
            }}}
        }"#;
        let (schema, config) = build(json);
        let g = SchemaGraph::build(&schema, &config);
        let columns = assign_columns(&g);
        let rows = assign_rows(&g, &columns);
        let positions = compute_positions(&g, &columns, &rows, &config);
        // Drop B's bounds to simulate a node the position mapper never reached.
        let b = g.index_of["x.B"];
        let heights: HashMap<NodeIndex, f64> =
            g.graph.node_indices().filter(|&i| i != b).map(|i| (i, g.graph[i].height)).collect();
        let bounds = crate::geometry::compute_bounds(&positions, &heights, &config);

        let routes = route_edges(&g, &positions, &bounds, &config).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn routing_over_an_empty_graph_is_an_error() {
        let (schema, config) = build(r#"{"apps": {}}"#);
        let g = SchemaGraph::build(&schema, &config);
        let positions = HashMap::new();
        let bounds = HashMap::new();

        let err = route_edges(&g, &positions, &bounds, &config).unwrap_err();
        assert!(matches!(err, LayoutError::EmptyGraph));
    }
}
