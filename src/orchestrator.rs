use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::geometry::{compute_bounds, Bounds, LayoutConfig, Point};
use crate::graph::SchemaGraph;
use crate::layout::{assign_columns, assign_rows, compute_positions};
use crate::routing::{route_edges, Route};

/// A complete, ready-to-render layout: positions and bounds per node, a
/// route per edge, and the column/row assignments that produced the
/// positions (kept around so dragging a node can re-derive bounds without
/// redoing the placement pass).
pub struct LayoutResult {
    pub positions: HashMap<NodeIndex, Point>,
    pub bounds: HashMap<NodeIndex, Bounds>,
    pub routes: Vec<Route>,
    pub columns: HashMap<NodeIndex, usize>,
    pub rows: HashMap<NodeIndex, usize>,
}

/// Runs the full pipeline: columns, then rows, then positions, then bounds,
/// then routes. Each stage only reads the previous stage's output — nothing
/// here re-enters an earlier stage.
pub fn compute_layout(g: &SchemaGraph, config: &LayoutConfig) -> LayoutResult {
    let columns = assign_columns(g);
    let rows = assign_rows(g, &columns);
    let positions = compute_positions(g, &columns, &rows, config);
    let heights: HashMap<NodeIndex, f64> = g.graph.node_indices().map(|i| (i, g.graph[i].height)).collect();
    let bounds = compute_bounds(&positions, &heights, config);
    // An empty schema has no nodes to route around; route_edges only ever
    // errors on that degenerate case, so there is nothing to propagate here.
    let routes = route_edges(g, &positions, &bounds, config).unwrap_or_default();

    LayoutResult { positions, bounds, routes, columns, rows }
}

#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub x: f64,
    pub y: f64,
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub from: String,
    pub to: String,
    pub points: Vec<[f64; 2]>,
}

/// A JSON-friendly view of a [`LayoutResult`]: node keys in place of
/// `NodeIndex`, in node-insertion order, for the `layout` CLI command to
/// print directly.
#[derive(Debug, Serialize)]
pub struct LayoutReport {
    pub nodes: IndexMap<String, PositionReport>,
    pub routes: Vec<RouteReport>,
}

pub fn layout_report(g: &SchemaGraph, result: &LayoutResult) -> LayoutReport {
    let mut nodes = IndexMap::new();
    for idx in g.graph.node_indices() {
        let Some(pos) = result.positions.get(&idx) else { continue };
        nodes.insert(
            g.graph[idx].key.clone(),
            PositionReport {
                x: pos.x,
                y: pos.y,
                column: result.columns.get(&idx).copied().unwrap_or(0),
                row: result.rows.get(&idx).copied().unwrap_or(0),
            },
        );
    }

    let routes = result
        .routes
        .iter()
        .filter_map(|route| {
            let (source, target) = g.graph.edge_endpoints(route.edge)?;
            Some(RouteReport {
                from: g.graph[source].key.clone(),
                to: g.graph[target].key.clone(),
                points: route.points.iter().map(|p| [p.x, p.y]).collect(),
            })
        })
        .collect();

    LayoutReport { nodes, routes }
}

/// Recomputes bounds and re-routes every edge from the current positions,
/// without touching column/row assignment or any other node's position.
/// This is what a node drag calls: repositioning one card never reshuffles
/// the grid, it only asks the router to find new paths around the new
/// obstacle layout.
pub fn recompute_routes(g: &SchemaGraph, result: &mut LayoutResult, config: &LayoutConfig) {
    let heights: HashMap<NodeIndex, f64> = g.graph.node_indices().map(|i| (i, g.graph[i].height)).collect();
    result.bounds = compute_bounds(&result.positions, &heights, config);
    result.routes = route_edges(g, &result.positions, &result.bounds, config).unwrap_or_default();
}

/// Moves a node to `new_position` and re-routes. Last-write-wins: a second
/// drag before the first finishes simply overwrites the position before
/// anything re-routes from it.
pub fn drag_node(g: &SchemaGraph, result: &mut LayoutResult, node: NodeIndex, new_position: Point, config: &LayoutConfig) {
    result.positions.insert(node, new_position);
    recompute_routes(g, result, config);
}

/// The fixed self-loop affordance for a node with `has_self_connection` set:
/// a small rectangular hook off the right edge, spanning from roughly a
/// third down the card to two-thirds down it.
pub fn self_loop_points(bounds: &Bounds, config: &LayoutConfig) -> Vec<Point> {
    let h = bounds.height();
    let top_y = bounds.top + h / 3.0;
    let bottom_y = bounds.top + 2.0 * h / 3.0;
    vec![
        Point::new(bounds.right, top_y),
        Point::new(bounds.right + config.outer_margin, top_y),
        Point::new(bounds.right + config.outer_margin, bottom_y),
        Point::new(bounds.right, bottom_y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Schema;

    #[test]
    fn full_pipeline_produces_a_position_and_bounds_per_node() {
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
        let schema = Schema::from_json(json).unwrap();
        let config = LayoutConfig::default();
        let g = SchemaGraph::build(&schema, &config);
        let result = compute_layout(&g, &config);

        assert_eq!(result.positions.len(), 2);
        assert_eq!(result.bounds.len(), 2);
        assert_eq!(result.routes.len(), 1);
    }

    #[test]
    fn dragging_a_node_reroutes_without_moving_other_nodes() {
        let json = r#"{
            "apps": {
                "auth": { "verbose_name": "Auth", "models": {
                    "User": {"verbose_name": "User", "table_name": "auth_user", "fields": [], "relationships": []}
                }},
                "blog": { "verbose_name": "Blog", "models": {
                    "Post": {"verbose_name": "Post", "table_name": "blog_post", "fields": [], "relationships": [
                        {"name": "author", "type": "foreign_key", "direction": "forward", "target_app": "auth", "target_model": "User"}
                    ]}
                }}
            }
        }"#;
        let schema = Schema::from_json(json).unwrap();
        let config = LayoutConfig::default();
        let g = SchemaGraph::build(&schema, &config);
        let mut result = compute_layout(&g, &config);

        let post = g.index_of["blog.Post"];
        let user = g.index_of["auth.User"];
        let user_before = result.positions[&user];

        drag_node(&g, &mut result, post, Point::new(900.0, 500.0), &config);

        assert_eq!(result.positions[&user], user_before);
        assert_eq!(result.positions[&post], Point::new(900.0, 500.0));
    }

    #[test]
    fn layout_report_keys_nodes_and_routes_by_name_not_index() {
        let json = r#"{
            "apps": {
                "auth": { "verbose_name": "Auth", "models": {
                    "User": {"verbose_name": "User", "table_name": "auth_user", "fields": [], "relationships": []}
                }},
                "blog": { "verbose_name": "Blog", "models": {
                    "Post": {"verbose_name": "Post", "table_name": "blog_post", "fields": [], "relationships": [
                        {"name": "author", "type": "foreign_key", "direction": "forward", "target_app": "auth", "target_model": "User"}
                    ]}
                }}
            }
        }"#;
        let schema = Schema::from_json(json).unwrap();
        let config = LayoutConfig::default();
        let g = SchemaGraph::build(&schema, &config);
        let result = compute_layout(&g, &config);
        let report = layout_report(&g, &result);

        assert_eq!(report.nodes.len(), 2);
        assert!(report.nodes.contains_key("auth.User"));
        assert!(report.nodes.contains_key("blog.Post"));
        assert_eq!(report.routes.len(), 1);
        assert_eq!(report.routes[0].from, "blog.Post");
        assert_eq!(report.routes[0].to, "auth.User");
        assert!(report.routes[0].points.len() >= 2);

        let json_out = serde_json::to_string(&report).unwrap();
        assert!(json_out.contains("auth.User"));
    }

    #[test]
    fn self_loop_hooks_off_the_right_edge() {
        let bounds = Bounds { left: 0.0, right: 220.0, top: 0.0, bottom: 90.0 };
        let config = LayoutConfig::default();
        let points = self_loop_points(&bounds, &config);
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.x >= bounds.right));
    }
}
