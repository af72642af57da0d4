//! CSV rendering of edges and metrics

use grove_core::{DependencyGraph, GraphMetrics};

fn quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One row per edge: source, target, labels joined with `;`.
pub fn edges_csv(graph: &DependencyGraph) -> String {
    let mut out = String::from("source,target,labels\n");
    for (from, to, edge) in graph.edges() {
        let labels: Vec<&str> = edge.labels.iter().map(String::as_str).collect();
        out.push_str(&format!(
            "{},{},{}\n",
            quote(&from.path),
            quote(&to.path),
            quote(&labels.join(";")),
        ));
    }
    out
}

/// One row per file: path, fan-in, fan-out.
pub fn metrics_csv(metrics: &GraphMetrics) -> String {
    let mut out = String::from("file,fan_in,fan_out\n");
    for entry in &metrics.degrees {
        out.push_str(&format!("{},{},{}\n", quote(&entry.path), entry.fan_in, entry.fan_out));
    }
    out
}
