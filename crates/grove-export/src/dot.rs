//! Graphviz DOT rendering

use grove_core::DependencyGraph;

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the graph as a DOT digraph. External modules are drawn dashed.
pub fn to_dot(graph: &DependencyGraph) -> String {
    let mut out = String::from("digraph dependencies {\n");
    out.push_str("    rankdir=LR;\n    node [shape=box, fontsize=10];\n");

    for node in graph.nodes() {
        if node.external {
            out.push_str(&format!("    \"{}\" [style=dashed];\n", escape(&node.path)));
        } else {
            out.push_str(&format!("    \"{}\";\n", escape(&node.path)));
        }
    }
    for (from, to, edge) in graph.edges() {
        let labels: Vec<&str> = edge.labels.iter().map(String::as_str).collect();
        out.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
            escape(&from.path),
            escape(&to.path),
            escape(&labels.join(", ")),
        ));
    }
    out.push_str("}\n");
    out
}
