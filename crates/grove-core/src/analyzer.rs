//! Read-only queries over a built dependency graph

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::Direction as PetDirection;
use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use crate::error::GraphError;
use crate::graph::DependencyGraph;

/// Which way a closure expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges forward: what does the seed depend on.
    Dependencies,
    /// Follow edges backward: what depends on the seed.
    Dependents,
}

impl Direction {
    fn petgraph(self) -> PetDirection {
        match self {
            Direction::Dependencies => PetDirection::Outgoing,
            Direction::Dependents => PetDirection::Incoming,
        }
    }
}

/// Result of a transitive closure query. `complete` is false when the depth
/// bound truncated the expansion.
#[derive(Debug, Clone, Serialize)]
pub struct Closure {
    /// Reached nodes with their shortest hop distance from the seed,
    /// sorted by (depth, path). The seed itself is not included.
    pub members: Vec<(String, usize)>,
    pub complete: bool,
}

/// Result of cycle enumeration. `complete` is false when the visit budget
/// was exhausted before the search finished.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Each cycle as the file paths along it, first node not repeated.
    pub cycles: Vec<Vec<String>>,
    pub complete: bool,
}

/// Fan-in/fan-out for one node.
#[derive(Debug, Clone, Serialize)]
pub struct DegreeEntry {
    pub path: String,
    pub fan_in: usize,
    pub fan_out: usize,
}

/// Aggregate graph metrics.
#[derive(Debug, Clone, Serialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// edge_count / (n * (n - 1)) over non-external nodes.
    pub density: f64,
    pub avg_dependencies: f64,
    /// Per project file, sorted by path.
    pub degrees: Vec<DegreeEntry>,
    /// Highest fan-in first, top ten.
    pub most_depended_on: Vec<(String, usize)>,
    /// Highest fan-out first, top ten.
    pub most_dependencies: Vec<(String, usize)>,
}

impl DependencyGraph {
    /// Breadth-first transitive closure from `seed`. Nodes already visited
    /// are never re-expanded, so cycles cannot loop the search.
    pub fn closure(
        &self,
        seed: &str,
        direction: Direction,
        max_depth: usize,
        include_external: bool,
    ) -> Result<Closure, GraphError> {
        let start = self.index_of(seed).ok_or_else(|| GraphError::NodeNotFound {
            path: seed.to_string(),
        })?;

        let mut depths: HashMap<NodeIndex, usize> = HashMap::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        let mut complete = true;
        depths.insert(start, 0);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let depth = depths[&current];
            for next in self.sorted_neighbors(current, direction.petgraph()) {
                if !include_external && self.node_at(next).external {
                    continue;
                }
                if depths.contains_key(&next) {
                    continue;
                }
                if depth >= max_depth {
                    // Unvisited nodes remain beyond the bound.
                    complete = false;
                    continue;
                }
                depths.insert(next, depth + 1);
                queue.push_back(next);
            }
        }

        let mut members: Vec<(String, usize)> = depths
            .into_iter()
            .filter(|&(idx, _)| idx != start)
            .map(|(idx, d)| (self.node_at(idx).path.clone(), d))
            .collect();
        members.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(Closure { members, complete })
    }

    /// Enumerate distinct simple cycles via depth-first search with an
    /// on-stack marker set. A back-edge to a node still on the stack yields
    /// the stack slice from that node as a cycle; rotations of the same
    /// cycle are deduplicated by member set. `visit_budget` bounds edge
    /// visits (0 = unbounded); exceeding it returns a partial report.
    pub fn cycles(&self, visit_budget: usize) -> CycleReport {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut seen_sets: HashSet<BTreeSet<String>> = HashSet::new();
        let mut cycles: Vec<Vec<String>> = Vec::new();
        let mut visits: usize = 0;
        let mut complete = true;

        'roots: for root in self.node_indices() {
            if visited.contains(&root) {
                continue;
            }
            // Iterative DFS: (node, neighbors, next neighbor position).
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();
            let mut on_stack: HashSet<NodeIndex> = HashSet::new();
            let mut path: Vec<NodeIndex> = Vec::new();

            visited.insert(root);
            on_stack.insert(root);
            path.push(root);
            stack.push((root, self.sorted_neighbors(root, PetDirection::Outgoing), 0));

            while let Some((_, neighbors, pos)) = stack.last_mut() {
                if *pos >= neighbors.len() {
                    let (done, _, _) = stack.pop().expect("stack entry");
                    on_stack.remove(&done);
                    path.pop();
                    continue;
                }
                let next = neighbors[*pos];
                *pos += 1;
                visits += 1;
                if visit_budget != 0 && visits > visit_budget {
                    complete = false;
                    break 'roots;
                }
                if on_stack.contains(&next) {
                    let at = path.iter().position(|&n| n == next).expect("on stack");
                    let cycle: Vec<String> =
                        path[at..].iter().map(|&n| self.node_at(n).path.clone()).collect();
                    let key: BTreeSet<String> = cycle.iter().cloned().collect();
                    if seen_sets.insert(key) {
                        cycles.push(cycle);
                    }
                } else if !visited.contains(&next) {
                    visited.insert(next);
                    on_stack.insert(next);
                    path.push(next);
                    stack.push((next, self.sorted_neighbors(next, PetDirection::Outgoing), 0));
                }
            }
        }

        CycleReport { cycles, complete }
    }

    /// Files with no incoming edges that the caller does not designate as
    /// entry points. External pseudo-nodes are never reported.
    pub fn orphans(&self, is_entry_point: &dyn Fn(&str) -> bool) -> Vec<String> {
        let mut out: Vec<String> = self
            .node_indices()
            .into_iter()
            .filter(|&idx| {
                let node = self.node_at(idx);
                !node.external
                    && self.in_degree(&node.path) == Some(0)
                    && !is_entry_point(&node.path)
            })
            .map(|idx| self.node_at(idx).path.clone())
            .collect();
        out.sort();
        out
    }

    /// All shortest paths from `from` to `to`, in the order the search
    /// frontier encounters them. Unreachable targets give an empty result;
    /// `from == to` gives the trivial single-node path.
    pub fn shortest_paths(&self, from: &str, to: &str) -> Result<Vec<Vec<String>>, GraphError> {
        let start = self.index_of(from).ok_or_else(|| GraphError::NodeNotFound {
            path: from.to_string(),
        })?;
        let goal = self.index_of(to).ok_or_else(|| GraphError::NodeNotFound {
            path: to.to_string(),
        })?;
        if start == goal {
            return Ok(vec![vec![from.to_string()]]);
        }

        // Distance labeling pass; prunes the path enumeration below to
        // edges that stay on some shortest path.
        let mut dist: HashMap<NodeIndex, usize> = HashMap::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for next in self.sorted_neighbors(current, PetDirection::Outgoing) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        let Some(&goal_dist) = dist.get(&goal) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<Vec<String>> = Vec::new();
        let mut paths: VecDeque<Vec<NodeIndex>> = VecDeque::new();
        paths.push_back(vec![start]);
        while let Some(path) = paths.pop_front() {
            let current = *path.last().expect("non-empty path");
            let d = path.len() - 1;
            for next in self.sorted_neighbors(current, PetDirection::Outgoing) {
                if dist.get(&next) != Some(&(d + 1)) {
                    continue;
                }
                if next == goal {
                    let mut full: Vec<String> =
                        path.iter().map(|&n| self.node_at(n).path.clone()).collect();
                    full.push(self.node_at(goal).path.clone());
                    results.push(full);
                } else if d + 1 < goal_dist {
                    let mut extended = path.clone();
                    extended.push(next);
                    paths.push_back(extended);
                }
            }
        }
        Ok(results)
    }

    /// Pure aggregation: degrees, totals, density.
    pub fn metrics(&self) -> GraphMetrics {
        let mut degrees: Vec<DegreeEntry> = self
            .node_indices()
            .into_iter()
            .filter(|&idx| !self.node_at(idx).external)
            .map(|idx| {
                let path = self.node_at(idx).path.clone();
                let fan_in = self.in_degree(&path).unwrap_or(0);
                let fan_out = self.out_degree(&path).unwrap_or(0);
                DegreeEntry { path, fan_in, fan_out }
            })
            .collect();
        degrees.sort_by(|a, b| a.path.cmp(&b.path));

        let n = degrees.len();
        let edge_count = self.edge_count();
        let density = if n > 1 {
            edge_count as f64 / (n as f64 * (n as f64 - 1.0))
        } else {
            0.0
        };
        let avg_dependencies = if n > 0 { edge_count as f64 / n as f64 } else { 0.0 };

        let mut by_fan_in: Vec<(String, usize)> = degrees
            .iter()
            .filter(|d| d.fan_in > 0)
            .map(|d| (d.path.clone(), d.fan_in))
            .collect();
        by_fan_in.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        by_fan_in.truncate(10);

        let mut by_fan_out: Vec<(String, usize)> = degrees
            .iter()
            .filter(|d| d.fan_out > 0)
            .map(|d| (d.path.clone(), d.fan_out))
            .collect();
        by_fan_out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        by_fan_out.truncate(10);

        GraphMetrics {
            node_count: self.node_count(),
            edge_count,
            density,
            avg_dependencies,
            degrees,
            most_depended_on: by_fan_in,
            most_dependencies: by_fan_out,
        }
    }
}
