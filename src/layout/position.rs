use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::geometry::{LayoutConfig, Point};
use crate::graph::SchemaGraph;

/// Maps column/row indices to absolute coordinates. Column x-offsets
/// accumulate a fixed node width plus horizontal gap; row y-offsets
/// accumulate the tallest node in the previous row plus vertical gap, so a
/// row with one very tall card pushes every row below it down, not just the
/// cards in its own column.
pub fn compute_positions(
    g: &SchemaGraph,
    columns: &HashMap<NodeIndex, usize>,
    rows: &HashMap<NodeIndex, usize>,
    config: &LayoutConfig,
) -> HashMap<NodeIndex, Point> {
    if columns.is_empty() {
        return HashMap::new();
    }

    let max_col = columns.values().copied().max().unwrap_or(0);
    let max_row = rows.values().copied().max().unwrap_or(0);

    let mut col_x = vec![0.0; max_col + 1];
    col_x[0] = 50.0;
    for c in 1..=max_col {
        col_x[c] = col_x[c - 1] + config.node_width + config.horizontal_gap;
    }

    let mut row_height = vec![0.0_f64; max_row + 1];
    for idx in g.graph.node_indices() {
        let r = rows[&idx];
        row_height[r] = row_height[r].max(g.graph[idx].height);
    }
    for h in &mut row_height {
        if *h <= 0.0 {
            *h = config.default_row_height;
        }
    }

    let mut row_y = vec![0.0; max_row + 1];
    row_y[0] = 50.0;
    for r in 1..=max_row {
        row_y[r] = row_y[r - 1] + row_height[r - 1] + config.vertical_gap;
    }

    g.graph
        .node_indices()
        .map(|idx| {
            let c = columns[&idx];
            let r = rows[&idx];
            (idx, Point::new(col_x[c], row_y[r]))
        })
        .collect()
}
