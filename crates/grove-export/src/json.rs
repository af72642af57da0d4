//! JSON dump of a finished graph

use grove_core::{DependencyGraph, Language};
use serde::Serialize;

#[derive(Serialize)]
pub struct NodeDump {
    pub path: String,
    pub language: Option<Language>,
    pub external: bool,
}

#[derive(Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub labels: Vec<String>,
}

#[derive(Serialize)]
pub struct GraphDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

impl GraphDump {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|n| NodeDump {
                path: n.path.clone(),
                language: n.language,
                external: n.external,
            })
            .collect();
        let edges = graph
            .edges()
            .map(|(from, to, edge)| EdgeDump {
                from: from.path.clone(),
                to: to.path.clone(),
                labels: edge.labels.iter().cloned().collect(),
            })
            .collect();
        GraphDump { nodes, edges }
    }
}

/// Pretty-printed JSON of the whole graph.
pub fn to_json(graph: &DependencyGraph) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&GraphDump::from_graph(graph))?)
}
