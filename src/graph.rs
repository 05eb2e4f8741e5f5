use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::{node_key, ModelRecord, RelationshipDirection, RelationshipType, Schema};

/// A card in the diagram: one Django model, with its own slice of the schema
/// and the edges (by index, not by weight) that touch it.
pub struct Node<'a> {
    pub key: String,
    pub app: &'a str,
    pub model_name: &'a str,
    pub model: &'a ModelRecord,
    pub height: f64,
    pub has_self_connection: bool,
    pub outgoing: Vec<EdgeIndex>,
    pub incoming: Vec<EdgeIndex>,
    /// Deduplicated union of outgoing and incoming neighbours, outgoing
    /// first, in edge-insertion order. Used by row assignment's co-location
    /// heuristic.
    pub connections: Vec<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct EdgeData {
    pub rel_name: String,
    pub rel_type: RelationshipType,
}

pub struct SchemaGraph<'a> {
    pub graph: DiGraph<Node<'a>, EdgeData>,
    pub index_of: HashMap<String, NodeIndex>,
}

impl<'a> SchemaGraph<'a> {
    /// Builds one node per model and one edge per forward relationship whose
    /// target resolves to a node in this schema. Self-relationships set a
    /// flag on the node instead of an edge (§4.7's self-loop handles them as
    /// a single fixed affordance per node regardless of how many
    /// self-referential forward relationships exist). Unknown targets and
    /// reverse-direction relationships are dropped silently, not errors:
    /// they're the other half of a forward relationship declared elsewhere,
    /// or simply the far end of a field this schema slice doesn't include.
    pub fn build(schema: &'a Schema, config: &crate::geometry::LayoutConfig) -> Self {
        let mut graph = DiGraph::new();
        let mut index_of = HashMap::new();

        for (app_label, app) in &schema.apps {
            for (model_name, model) in &app.models {
                let key = node_key(app_label, model_name);
                let height = config.node_height(model.fields.len());
                let idx = graph.add_node(Node {
                    key: key.clone(),
                    app: app_label.as_str(),
                    model_name: model_name.as_str(),
                    model,
                    height,
                    has_self_connection: false,
                    outgoing: Vec::new(),
                    incoming: Vec::new(),
                    connections: Vec::new(),
                });
                index_of.insert(key, idx);
            }
        }

        let mut seen = HashSet::new();

        for (app_label, app) in &schema.apps {
            for (model_name, model) in &app.models {
                let source_key = node_key(app_label, model_name);
                let source_idx = index_of[&source_key];
                for rel in &model.relationships {
                    if rel.direction != RelationshipDirection::Forward {
                        continue;
                    }
                    let target_key = node_key(&rel.target_app, &rel.target_model);
                    if target_key == source_key {
                        graph[source_idx].has_self_connection = true;
                        continue;
                    }
                    let Some(&target_idx) = index_of.get(&target_key) else {
                        continue;
                    };
                    let dedup_key = (source_key.clone(), target_key.clone(), rel.name.clone());
                    if !seen.insert(dedup_key) {
                        continue;
                    }
                    graph.add_edge(
                        source_idx,
                        target_idx,
                        EdgeData {
                            rel_name: rel.name.clone(),
                            rel_type: rel.rel_type,
                        },
                    );
                }
            }
        }

        // Populate outgoing/incoming in edge-insertion order. `edge_references`
        // walks petgraph's backing Vec directly, so this is creation order —
        // `neighbors_directed` is not, since Graph prepends to its per-node
        // adjacency list. Fan-out offsets and row tie-breaking both depend on
        // this being the real insertion order.
        let edges: Vec<(EdgeIndex, NodeIndex, NodeIndex)> =
            graph.edge_references().map(|e| (e.id(), e.source(), e.target())).collect();
        for (eidx, src, tgt) in &edges {
            graph[*src].outgoing.push(*eidx);
            graph[*tgt].incoming.push(*eidx);
        }

        let node_indices: Vec<NodeIndex> = graph.node_indices().collect();
        for idx in node_indices {
            let mut conns = Vec::new();
            let outgoing = graph[idx].outgoing.clone();
            let incoming = graph[idx].incoming.clone();
            for e in outgoing {
                let (_, t) = graph.edge_endpoints(e).unwrap();
                if !conns.contains(&t) {
                    conns.push(t);
                }
            }
            for e in incoming {
                let (s, _) = graph.edge_endpoints(e).unwrap();
                if !conns.contains(&s) {
                    conns.push(s);
                }
            }
            graph[idx].connections = conns;
        }

        SchemaGraph { graph, index_of }
    }

    pub fn edge_endpoints(&self, e: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.graph.edge_endpoints(e).expect("edge index from this graph")
    }

    /// The node with the greatest total connection count. Reported for
    /// diagnostics (the CLI prints it) but not consulted by column or row
    /// assignment.
    pub fn hub(&self) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .max_by_key(|&idx| self.graph[idx].connections.len())
    }
}
