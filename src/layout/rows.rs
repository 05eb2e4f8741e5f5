use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use crate::graph::SchemaGraph;

/// Assigns each node a row within its column. Nodes in a column are visited
/// most-connected first (stable sort, so schema declaration order breaks
/// ties); each is placed in the lowest candidate row — preferring rows
/// already used by one of its connections, then scanning upward — whose
/// cell is free and whose co-location rule is satisfied.
pub fn assign_rows(g: &SchemaGraph, columns: &HashMap<NodeIndex, usize>) -> HashMap<NodeIndex, usize> {
    let node_order: Vec<NodeIndex> = g.graph.node_indices().collect();
    let node_count = node_order.len();
    let max_col = columns.values().copied().max().unwrap_or(0);

    let mut rows: HashMap<NodeIndex, usize> = HashMap::new();
    let mut grid: HashSet<(usize, usize)> = HashSet::new();

    for col in 0..=max_col {
        let mut in_col: Vec<NodeIndex> = node_order.iter().copied().filter(|n| columns[n] == col).collect();
        in_col.sort_by_key(|&n| std::cmp::Reverse(g.graph[n].connections.len()));

        for node in in_col {
            let row = place_node(g, node, col, columns, &rows, &grid, node_count);
            rows.insert(node, row);
            grid.insert((col, row));
        }
    }

    compact(&rows)
}

fn place_node(
    g: &SchemaGraph,
    node: NodeIndex,
    col: usize,
    columns: &HashMap<NodeIndex, usize>,
    rows: &HashMap<NodeIndex, usize>,
    grid: &HashSet<(usize, usize)>,
    node_count: usize,
) -> usize {
    let connections = &g.graph[node].connections;

    let mut candidates: Vec<usize> = Vec::new();
    for c in connections {
        if let Some(&r) = rows.get(c) {
            if !candidates.contains(&r) {
                candidates.push(r);
            }
        }
    }
    for r in 0..node_count.max(1) {
        if !candidates.contains(&r) {
            candidates.push(r);
        }
    }

    for &row in &candidates {
        if grid.contains(&(col, row)) {
            continue;
        }
        if row_permits(g, node, col, row, columns, rows, connections) {
            return row;
        }
    }

    rows.values().copied().max().map(|m| m + 1).unwrap_or(0)
}

fn row_permits(
    g: &SchemaGraph,
    node: NodeIndex,
    col: usize,
    row: usize,
    columns: &HashMap<NodeIndex, usize>,
    rows: &HashMap<NodeIndex, usize>,
    connections: &[NodeIndex],
) -> bool {
    if connections.len() <= 1 {
        let Some(&only) = connections.first() else {
            return true;
        };
        match rows.get(&only) {
            Some(&conn_row) if conn_row == row => {
                let conn_col = columns[&only];
                (conn_col as isize - col as isize).abs() == 1
            }
            _ => true,
        }
    } else {
        rows.iter().filter(|&(_, &r)| r == row).all(|(&m, _)| {
            connections.contains(&m) || g.graph[m].has_self_connection
        })
    }
}

fn compact(rows: &HashMap<NodeIndex, usize>) -> HashMap<NodeIndex, usize> {
    let mut used: Vec<usize> = rows.values().copied().collect::<HashSet<_>>().into_iter().collect();
    used.sort_unstable();
    let remap: HashMap<usize, usize> = used.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    rows.iter().map(|(&n, &r)| (n, remap[&r])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LayoutConfig;
    use crate::graph::SchemaGraph;
    use crate::layout::columns::assign_columns;
    use crate::model::Schema;

    #[test]
    fn chain_of_three_lands_on_a_single_row() {
        let json = r#"{
            "apps": { "x": { "verbose_name": "X", "models": {
                "A": {"verbose_name": "A", "table_name": "a", "fields": [], "relationships": [
                    {"name": "b", "type": "foreign_key", "direction": "forward", "target_app": "x", "target_model": "B"}
                ]},
                "B": {"verbose_name": "B", "table_name": "b", "fields": [], "relationships": [
                    {"name": "c", "type": "foreign_key", "direction": "forward", "target_app": "x", "target_model": "C"}
                ]},
                "C": {"verbose_name": "C", "table_name": "c", "fields": [], "relationships": []}
            }}}
        }"#;
        let schema = Schema::from_json(json).unwrap();
        let config = LayoutConfig::default();
        let g = SchemaGraph::build(&schema, &config);
        let columns = assign_columns(&g);
        let rows = assign_rows(&g, &columns);

        let distinct: HashSet<usize> = rows.values().copied().collect();
        assert_eq!(distinct, HashSet::from([0]));
    }

    #[test]
    fn diamond_places_b_and_c_on_separate_rows() {
        let json = r#"{
            "apps": { "d": { "verbose_name": "D", "models": {
                "A": {"verbose_name": "A", "table_name": "a", "fields": [], "relationships": []},
                "B": {"verbose_name": "B", "table_name": "b", "fields": [], "relationships": [
                    {"name": "a", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "A"}
                ]},
                "C": {"verbose_name": "C", "table_name": "c", "fields": [], "relationships": [
                    {"name": "a", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "A"}
                ]},
                "D": {"verbose_name": "D", "table_name": "d", "fields": [], "relationships": [
                    {"name": "b", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "B"},
                    {"name": "c", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "C"}
                ]}
            }}}
        }"#;
        let schema = Schema::from_json(json).unwrap();
        let config = LayoutConfig::default();
        let g = SchemaGraph::build(&schema, &config);
        let columns = assign_columns(&g);
        let rows = assign_rows(&g, &columns);

        let b = g.index_of["d.B"];
        let c = g.index_of["d.C"];
        assert_ne!(rows[&b], rows[&c]);
    }

    #[test]
    fn no_two_nodes_share_a_cell() {
        let json = r#"{
            "apps": { "d": { "verbose_name": "D", "models": {
                "A": {"verbose_name": "A", "table_name": "a", "fields": [], "relationships": []},
                "B": {"verbose_name": "B", "table_name": "b", "fields": [], "relationships": [
                    {"name": "a", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "A"}
                ]},
                "C": {"verbose_name": "C", "table_name": "c", "fields": [], "relationships": [
                    {"name": "a", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "A"}
                ]},
                "D": {"verbose_name": "D", "table_name": "d", "fields": [], "relationships": [
                    {"name": "b", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "B"},
                    {"name": "c", "type": "foreign_key", "direction": "forward", "target_app": "d", "target_model": "C"}
                ]}
            }}}
        }"#;
        let schema = Schema::from_json(json).unwrap();
        let config = LayoutConfig::default();
        let g = SchemaGraph::build(&schema, &config);
        let columns = assign_columns(&g);
        let rows = assign_rows(&g, &columns);

        let mut cells = HashSet::new();
        for (&n, &r) in &rows {
            assert!(cells.insert((columns[&n], r)), "duplicate cell");
        }
    }
}
