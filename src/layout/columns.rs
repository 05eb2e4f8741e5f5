use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::graph::SchemaGraph;

/// Assigns each node a column expressing dependency depth: a model sits one
/// column to the right of the deepest model it forward-references.
///
/// Seeds every node with no outgoing edges at column 0, then repeatedly
/// assigns any node whose outgoing targets are all already assigned to one
/// more than the deepest of them, until nothing changes. Anything still
/// unassigned afterwards only participates in cycles unreachable from a
/// true sink, and collapses to column 0 — the cyclic residual set the
/// invariant `col(source) >= col(target) + 1` is explicitly allowed to skip.
///
/// This folds the "no sink anywhere, so force one node to column 0" fallback
/// into the same residual step rather than giving it its own seeding pass:
/// forcing an arbitrary node to column 0 and then propagating through it as
/// if it were a genuine sink produces columns that can violate the
/// dependency-depth invariant on the very edge that closes the cycle (try it
/// on a 2-node mutual cycle — one node ends up a column ahead of the other
/// for no real reason). Leaving every cyclic node equally in the residual
/// set avoids manufacturing that asymmetry. See DESIGN.md.
pub fn assign_columns(g: &SchemaGraph) -> HashMap<NodeIndex, usize> {
    let node_order: Vec<NodeIndex> = g.graph.node_indices().collect();
    let mut columns: HashMap<NodeIndex, usize> = HashMap::new();

    for &idx in &node_order {
        if g.graph[idx].outgoing.is_empty() {
            columns.insert(idx, 0);
        }
    }

    loop {
        let mut changed = false;
        for &idx in &node_order {
            if columns.contains_key(&idx) {
                continue;
            }
            let targets: Vec<NodeIndex> = g.graph[idx]
                .outgoing
                .iter()
                .map(|&e| g.edge_endpoints(e).1)
                .collect();
            if !targets.is_empty() && targets.iter().all(|t| columns.contains_key(t)) {
                let max_col = targets.iter().map(|t| columns[t]).max().unwrap();
                columns.insert(idx, max_col + 1);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for &idx in &node_order {
        columns.entry(idx).or_insert(0);
    }

    columns
}
