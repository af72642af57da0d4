//! File dependency graph over petgraph::StableDiGraph

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::model::Language;

/// A node: one project file, or an external module pseudo-node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub language: Option<Language>,
    /// External module (`module:Foundation`), not a project file.
    pub external: bool,
}

/// A directed edge with the set of symbols justifying it. Multiple
/// references between the same file pair collapse into one edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub labels: BTreeSet<String>,
}

/// The dependency graph. Immutable once built; queries never mutate it.
pub struct DependencyGraph {
    inner: StableDiGraph<FileNode, DependencyEdge>,
    by_path: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        DependencyGraph {
            inner: StableDiGraph::new(),
            by_path: HashMap::new(),
        }
    }

    /// Add a project file node. Idempotent.
    pub fn add_file(&mut self, path: &str, language: Language) {
        if !self.by_path.contains_key(path) {
            let idx = self.inner.add_node(FileNode {
                path: path.to_string(),
                language: Some(language),
                external: false,
            });
            self.by_path.insert(path.to_string(), idx);
        }
    }

    /// Add an external module pseudo-node. Idempotent.
    pub fn add_external(&mut self, path: &str) {
        if !self.by_path.contains_key(path) {
            let idx = self.inner.add_node(FileNode {
                path: path.to_string(),
                language: None,
                external: true,
            });
            self.by_path.insert(path.to_string(), idx);
        }
    }

    /// Record that `from` depends on `to`, justified by `label`. Self-edges
    /// and edges touching unknown nodes are rejected.
    pub fn add_dependency(&mut self, from: &str, to: &str, label: String) -> bool {
        if from == to {
            return false;
        }
        let (Some(&a), Some(&b)) = (self.by_path.get(from), self.by_path.get(to)) else {
            return false;
        };
        if let Some(edge) = self.inner.find_edge(a, b) {
            self.inner[edge].labels.insert(label);
        } else {
            let mut labels = BTreeSet::new();
            labels.insert(label);
            self.inner.add_edge(a, b, DependencyEdge { labels });
        }
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn node(&self, path: &str) -> Option<&FileNode> {
        self.by_path.get(path).map(|&idx| &self.inner[idx])
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &FileNode> {
        self.inner.node_indices().map(|idx| &self.inner[idx])
    }

    /// Iterate over all edges as (from, to, edge).
    pub fn edges(&self) -> impl Iterator<Item = (&FileNode, &FileNode, &DependencyEdge)> {
        self.inner.edge_indices().filter_map(|idx| {
            let (a, b) = self.inner.edge_endpoints(idx)?;
            Some((&self.inner[a], &self.inner[b], &self.inner[idx]))
        })
    }

    /// The edge from `from` to `to`, if present.
    pub fn edge(&self, from: &str, to: &str) -> Option<&DependencyEdge> {
        let (&a, &b) = (self.by_path.get(from)?, self.by_path.get(to)?);
        let idx = self.inner.find_edge(a, b)?;
        Some(&self.inner[idx])
    }

    /// Files `path` depends on, with the justifying edges, sorted by path.
    pub fn dependencies_of(&self, path: &str) -> Vec<(&str, &DependencyEdge)> {
        self.labeled_neighbors(path, Direction::Outgoing)
    }

    /// Files depending on `path`, with the justifying edges, sorted by path.
    pub fn dependents_of(&self, path: &str) -> Vec<(&str, &DependencyEdge)> {
        self.labeled_neighbors(path, Direction::Incoming)
    }

    fn labeled_neighbors(&self, path: &str, dir: Direction) -> Vec<(&str, &DependencyEdge)> {
        let Some(&idx) = self.by_path.get(path) else {
            return Vec::new();
        };
        let mut out: Vec<(&str, &DependencyEdge)> = self
            .inner
            .edges_directed(idx, dir)
            .map(|e| {
                let other = if dir == Direction::Outgoing { e.target() } else { e.source() };
                (self.inner[other].path.as_str(), e.weight())
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    pub fn in_degree(&self, path: &str) -> Option<usize> {
        let &idx = self.by_path.get(path)?;
        Some(self.inner.edges_directed(idx, Direction::Incoming).count())
    }

    pub fn out_degree(&self, path: &str) -> Option<usize> {
        let &idx = self.by_path.get(path)?;
        Some(self.inner.edges_directed(idx, Direction::Outgoing).count())
    }

    pub(crate) fn index_of(&self, path: &str) -> Option<NodeIndex> {
        self.by_path.get(path).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &FileNode {
        &self.inner[idx]
    }

    /// Neighbor indices in the given direction, sorted by node path so
    /// traversal order never depends on insertion order.
    pub(crate) fn sorted_neighbors(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.inner.neighbors_directed(idx, dir).collect();
        out.sort_by(|&a, &b| self.inner[a].path.cmp(&self.inner[b].path));
        out.dedup();
        out
    }

    pub(crate) fn node_indices(&self) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.inner.node_indices().collect();
        out.sort_by(|&a, &b| self.inner[a].path.cmp(&self.inner[b].path));
        out
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
