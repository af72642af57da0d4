//! Mermaid diagram rendering

use grove_core::DependencyGraph;

/// Mermaid node ids allow only word characters.
fn node_id(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Render the graph as a Mermaid `graph TD` diagram.
pub fn to_mermaid(graph: &DependencyGraph) -> String {
    let mut out = String::from("graph TD\n");
    for node in graph.nodes() {
        out.push_str(&format!("    {}[\"{}\"]\n", node_id(&node.path), node.path));
    }
    for (from, to, edge) in graph.edges() {
        // One label keeps the diagram readable; the rest are in the data.
        let label = edge.labels.iter().next().map(String::as_str).unwrap_or("");
        out.push_str(&format!(
            "    {} -->|\"{}\"| {}\n",
            node_id(&from.path),
            label,
            node_id(&to.path),
        ));
    }
    out
}
