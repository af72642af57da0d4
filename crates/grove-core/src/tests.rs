//! Unit tests for grove-core

use std::collections::BTreeSet;

use crate::analyzer::Direction;
use crate::cache::ExtractionCache;
use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::index::{SymbolIndex, TieBreak};
use crate::model::*;

fn decl(name: &str, kind: SymbolKind, file: &str) -> Declaration {
    Declaration {
        name: name.to_string(),
        kind,
        file: file.to_string(),
    }
}

/// Build a Swift-only graph from (from, to) pairs, each labeled with the
/// target's name.
fn graph_from(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for node in nodes {
        graph.add_file(node, Language::Swift);
    }
    for (from, to) in edges {
        graph.add_dependency(from, to, format!("{to}[type]"));
    }
    graph
}

#[test]
fn test_language_detection() {
    let test_cases = vec![
        ("App.swift", Some(Language::Swift)),
        ("Sources/Deep/Model.swift", Some(Language::Swift)),
        ("Store.m", Some(Language::ObjC)),
        ("Store.h", Some(Language::ObjC)),
        ("Render.mm", Some(Language::ObjCpp)),
        ("Render.hh", Some(Language::ObjCpp)),
        ("readme.md", None),
        ("script.py", None),
        ("noextension", None),
    ];

    for (path, expected) in test_cases {
        assert_eq!(Language::from_path(path), expected, "failed for {}", path);
    }
}

#[test]
fn test_fingerprint_is_content_addressed() {
    assert_eq!(fingerprint("let a = 1"), fingerprint("let a = 1"));
    assert_ne!(fingerprint("let a = 1"), fingerprint("let a = 2"));
}

#[test]
fn test_graph_rejects_self_edges() {
    let mut graph = graph_from(&["A.swift"], &[]);
    assert!(!graph.add_dependency("A.swift", "A.swift", "A[type]".to_string()));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_graph_rejects_unknown_endpoints() {
    let mut graph = graph_from(&["A.swift"], &[]);
    assert!(!graph.add_dependency("A.swift", "Missing.swift", "x[type]".to_string()));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_graph_collapses_parallel_edges() {
    let mut graph = graph_from(&["A.swift", "B.swift"], &[]);
    graph.add_dependency("A.swift", "B.swift", "Widget[type]".to_string());
    graph.add_dependency("A.swift", "B.swift", "Widget.render[call]".to_string());
    graph.add_dependency("A.swift", "B.swift", "Widget[type]".to_string());

    assert_eq!(graph.edge_count(), 1);
    let edge = graph.edge("A.swift", "B.swift").unwrap();
    let expected: BTreeSet<String> =
        ["Widget[type]".to_string(), "Widget.render[call]".to_string()].into_iter().collect();
    assert_eq!(edge.labels, expected);
}

#[test]
fn test_graph_neighbor_queries() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("A.swift", "C.swift"), ("C.swift", "B.swift")],
    );

    let deps: Vec<&str> = graph.dependencies_of("A.swift").iter().map(|(p, _)| *p).collect();
    assert_eq!(deps, vec!["B.swift", "C.swift"]);

    let dependents: Vec<&str> = graph.dependents_of("B.swift").iter().map(|(p, _)| *p).collect();
    assert_eq!(dependents, vec!["A.swift", "C.swift"]);

    assert_eq!(graph.in_degree("B.swift"), Some(2));
    assert_eq!(graph.out_degree("A.swift"), Some(2));
}

// ── Symbol index ────────────────────────────────────────

#[test]
fn test_index_unique_symbol_resolves() {
    let decls = vec![decl("NetworkManager", SymbolKind::Type, "Sources/NetworkManager.swift")];
    let index = SymbolIndex::build(&decls);
    assert_eq!(
        index.resolve("NetworkManager", "Sources/App.swift"),
        Some("Sources/NetworkManager.swift")
    );
    assert_eq!(index.resolve("Unknown", "Sources/App.swift"), None);
}

#[test]
fn test_index_same_directory_tiebreak() {
    let decls = vec![
        decl("Helper", SymbolKind::Type, "FeatureA/Helper.swift"),
        decl("Helper", SymbolKind::Type, "FeatureB/Helper.swift"),
    ];
    let index = SymbolIndex::build(&decls);
    assert_eq!(index.resolve("Helper", "FeatureB/View.swift"), Some("FeatureB/Helper.swift"));
    assert_eq!(index.resolve("Helper", "FeatureA/View.swift"), Some("FeatureA/Helper.swift"));
}

#[test]
fn test_index_file_stem_tiebreak() {
    let decls = vec![
        decl("Parser", SymbolKind::Type, "Lib/Internals.swift"),
        decl("Parser", SymbolKind::Type, "Lib/Parser.swift"),
    ];
    let index = SymbolIndex::build(&decls);
    // Referencer in another directory: the stem match wins.
    assert_eq!(index.resolve("Parser", "App/Main.swift"), Some("Lib/Parser.swift"));
}

#[test]
fn test_index_lexicographic_tiebreak() {
    let decls = vec![
        decl("Shared", SymbolKind::Type, "Zeta/Common.swift"),
        decl("Shared", SymbolKind::Type, "Alpha/Common.swift"),
    ];
    let index = SymbolIndex::build(&decls);
    assert_eq!(index.resolve("Shared", "App/Main.swift"), Some("Alpha/Common.swift"));
}

#[test]
fn test_index_policy_order_is_configurable() {
    let decls = vec![
        decl("Helper", SymbolKind::Type, "FeatureB/Helper.swift"),
        decl("Helper", SymbolKind::Type, "FeatureB/Legacy.swift"),
    ];
    // Lexicographic-only policy ignores the stem convention.
    let index = SymbolIndex::with_policy(&decls, vec![TieBreak::Lexicographic]);
    assert_eq!(index.resolve("Helper", "FeatureA/View.swift"), Some("FeatureB/Helper.swift"));
}

#[test]
fn test_index_dotted_symbol_resolves_by_base() {
    let decls = vec![decl("Logger", SymbolKind::Type, "Util/Logger.swift")];
    let index = SymbolIndex::build(&decls);
    assert_eq!(index.resolve("Logger.record", "App/Main.swift"), Some("Util/Logger.swift"));
}

#[test]
fn test_index_extension_never_owns() {
    let decls = vec![
        decl("DataStore", SymbolKind::Extension, "Ext/DataStore+Sync.swift"),
        decl("DataStore", SymbolKind::Type, "Model/DataStore.swift"),
    ];
    let index = SymbolIndex::build(&decls);
    assert_eq!(index.resolve("DataStore", "App/Main.swift"), Some("Model/DataStore.swift"));
    assert_eq!(index.candidates("DataStore"), ["Model/DataStore.swift"]);
}

#[test]
fn test_index_reports_ambiguities() {
    let decls = vec![
        decl("Helper", SymbolKind::Type, "A/Helper.swift"),
        decl("Helper", SymbolKind::Type, "B/Helper.swift"),
        decl("Unique", SymbolKind::Type, "C/Unique.swift"),
    ];
    let index = SymbolIndex::build(&decls);
    let diags = index.ambiguities();
    assert_eq!(diags.len(), 1);
    match &diags[0] {
        Diagnostic::AmbiguousSymbol { name, candidates } => {
            assert_eq!(name, "Helper");
            assert_eq!(candidates, &["A/Helper.swift".to_string(), "B/Helper.swift".to_string()]);
        }
        other => panic!("unexpected diagnostic: {other:?}"),
    }
}

// ── Closure ─────────────────────────────────────────────

#[test]
fn test_closure_reports_shortest_depths() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift", "D.swift"],
        &[
            ("A.swift", "B.swift"),
            ("B.swift", "C.swift"),
            ("A.swift", "C.swift"),
            ("C.swift", "D.swift"),
        ],
    );
    let closure = graph.closure("A.swift", Direction::Dependencies, 64, false).unwrap();
    assert!(closure.complete);
    assert_eq!(
        closure.members,
        vec![
            ("B.swift".to_string(), 1),
            ("C.swift".to_string(), 1),
            ("D.swift".to_string(), 2),
        ]
    );
}

#[test]
fn test_closure_handles_cycles() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("B.swift", "C.swift"), ("C.swift", "A.swift")],
    );
    let closure = graph.closure("A.swift", Direction::Dependencies, 64, false).unwrap();
    // Nodes reachable only through the cycle appear exactly once; the
    // seed itself is not re-reported.
    assert_eq!(
        closure.members,
        vec![("B.swift".to_string(), 1), ("C.swift".to_string(), 2)]
    );
}

#[test]
fn test_closure_depth_bound_marks_incomplete() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("B.swift", "C.swift")],
    );
    let closure = graph.closure("A.swift", Direction::Dependencies, 1, false).unwrap();
    assert!(!closure.complete);
    assert_eq!(closure.members, vec![("B.swift".to_string(), 1)]);
}

#[test]
fn test_closure_dependents_direction() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("B.swift", "C.swift")],
    );
    let closure = graph.closure("C.swift", Direction::Dependents, 64, false).unwrap();
    assert_eq!(
        closure.members,
        vec![("B.swift".to_string(), 1), ("A.swift".to_string(), 2)]
    );
}

#[test]
fn test_closure_unknown_seed_is_an_error() {
    let graph = graph_from(&["A.swift"], &[]);
    let err = graph.closure("Missing.swift", Direction::Dependencies, 64, false).unwrap_err();
    assert_eq!(err, GraphError::NodeNotFound { path: "Missing.swift".to_string() });
}

#[test]
fn test_closure_skips_external_nodes_unless_requested() {
    let mut graph = graph_from(&["A.swift"], &[]);
    graph.add_external("module:Foundation");
    graph.add_dependency("A.swift", "module:Foundation", "<module-import>".to_string());

    let without = graph.closure("A.swift", Direction::Dependencies, 64, false).unwrap();
    assert!(without.members.is_empty());

    let with = graph.closure("A.swift", Direction::Dependencies, 64, true).unwrap();
    assert_eq!(with.members, vec![("module:Foundation".to_string(), 1)]);
}

// ── Cycles ──────────────────────────────────────────────

#[test]
fn test_cycles_triangle_reported_once() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("B.swift", "C.swift"), ("C.swift", "A.swift")],
    );
    let report = graph.cycles(0);
    assert!(report.complete);
    assert_eq!(report.cycles.len(), 1);
    let members: BTreeSet<&str> = report.cycles[0].iter().map(String::as_str).collect();
    assert_eq!(members, ["A.swift", "B.swift", "C.swift"].into_iter().collect());
}

#[test]
fn test_cycles_start_node_does_not_matter() {
    // Same triangle, node names sorting the other way around.
    let graph = graph_from(
        &["z.swift", "m.swift", "a.swift"],
        &[("z.swift", "a.swift"), ("a.swift", "m.swift"), ("m.swift", "z.swift")],
    );
    let report = graph.cycles(0);
    assert_eq!(report.cycles.len(), 1);
    let members: BTreeSet<&str> = report.cycles[0].iter().map(String::as_str).collect();
    assert_eq!(members, ["a.swift", "m.swift", "z.swift"].into_iter().collect());
}

#[test]
fn test_cycles_two_disjoint() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift", "D.swift"],
        &[
            ("A.swift", "B.swift"),
            ("B.swift", "A.swift"),
            ("C.swift", "D.swift"),
            ("D.swift", "C.swift"),
        ],
    );
    let report = graph.cycles(0);
    assert_eq!(report.cycles.len(), 2);
}

#[test]
fn test_cycles_none_on_dag() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("A.swift", "C.swift"), ("B.swift", "C.swift")],
    );
    let report = graph.cycles(0);
    assert!(report.complete);
    assert!(report.cycles.is_empty());
}

#[test]
fn test_cycles_budget_marks_incomplete() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("B.swift", "C.swift"), ("C.swift", "A.swift")],
    );
    let report = graph.cycles(1);
    assert!(!report.complete);
}

// ── Orphans ─────────────────────────────────────────────

#[test]
fn test_orphans_respect_entry_point_predicate() {
    let graph = graph_from(
        &["App.swift", "Used.swift", "Orphan.swift"],
        &[("App.swift", "Used.swift")],
    );

    let orphans = graph.orphans(&|_| false);
    assert_eq!(orphans, vec!["App.swift".to_string(), "Orphan.swift".to_string()]);

    let orphans = graph.orphans(&|path| path == "App.swift");
    assert_eq!(orphans, vec!["Orphan.swift".to_string()]);

    let orphans = graph.orphans(&|path| path == "App.swift" || path == "Orphan.swift");
    assert!(orphans.is_empty());
}

#[test]
fn test_orphans_exclude_external_nodes() {
    let mut graph = graph_from(&["A.swift"], &[]);
    graph.add_external("module:Foundation");
    let orphans = graph.orphans(&|path| path == "A.swift");
    assert!(orphans.is_empty());
}

// ── Shortest paths ──────────────────────────────────────

#[test]
fn test_shortest_paths_returns_all_tied() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift", "D.swift"],
        &[
            ("A.swift", "B.swift"),
            ("A.swift", "C.swift"),
            ("B.swift", "D.swift"),
            ("C.swift", "D.swift"),
        ],
    );
    let paths = graph.shortest_paths("A.swift", "D.swift").unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths.contains(&vec!["A.swift".to_string(), "B.swift".to_string(), "D.swift".to_string()]));
    assert!(paths.contains(&vec!["A.swift".to_string(), "C.swift".to_string(), "D.swift".to_string()]));
}

#[test]
fn test_shortest_paths_prefers_minimum_length() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("B.swift", "C.swift"), ("A.swift", "C.swift")],
    );
    let paths = graph.shortest_paths("A.swift", "C.swift").unwrap();
    assert_eq!(paths, vec![vec!["A.swift".to_string(), "C.swift".to_string()]]);
}

#[test]
fn test_shortest_paths_unreachable_is_empty_not_error() {
    let graph = graph_from(&["A.swift", "B.swift"], &[("B.swift", "A.swift")]);
    let paths = graph.shortest_paths("A.swift", "B.swift").unwrap();
    assert!(paths.is_empty());
}

#[test]
fn test_shortest_paths_trivial_when_endpoints_equal() {
    let graph = graph_from(&["A.swift"], &[]);
    let paths = graph.shortest_paths("A.swift", "A.swift").unwrap();
    assert_eq!(paths, vec![vec!["A.swift".to_string()]]);
}

#[test]
fn test_shortest_paths_unknown_node_is_an_error() {
    let graph = graph_from(&["A.swift"], &[]);
    let err = graph.shortest_paths("A.swift", "Missing.swift").unwrap_err();
    assert_eq!(err, GraphError::NodeNotFound { path: "Missing.swift".to_string() });
}

#[test]
fn test_shortest_paths_survive_cycles() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("B.swift", "A.swift"), ("B.swift", "C.swift")],
    );
    let paths = graph.shortest_paths("A.swift", "C.swift").unwrap();
    assert_eq!(paths, vec![vec!["A.swift".to_string(), "B.swift".to_string(), "C.swift".to_string()]]);
}

// ── Metrics ─────────────────────────────────────────────

#[test]
fn test_metrics_aggregation() {
    let graph = graph_from(
        &["A.swift", "B.swift", "C.swift"],
        &[("A.swift", "B.swift"), ("C.swift", "B.swift"), ("A.swift", "C.swift")],
    );
    let metrics = graph.metrics();

    assert_eq!(metrics.node_count, 3);
    assert_eq!(metrics.edge_count, 3);
    assert_eq!(metrics.most_depended_on[0], ("B.swift".to_string(), 2));
    assert_eq!(metrics.most_dependencies[0], ("A.swift".to_string(), 2));
    assert!((metrics.density - 0.5).abs() < 1e-9);
    assert!((metrics.avg_dependencies - 1.0).abs() < 1e-9);

    let a = metrics.degrees.iter().find(|d| d.path == "A.swift").unwrap();
    assert_eq!((a.fan_in, a.fan_out), (0, 2));
}

// ── Cache ───────────────────────────────────────────────

fn sample_file(path: &str, content: &str, mtime: i64) -> SourceFile {
    SourceFile::new(path.to_string(), Language::Swift, content.to_string(), mtime)
}

fn sample_record(symbol: &str) -> ExtractionRecord {
    ExtractionRecord {
        declarations: vec![decl(symbol, SymbolKind::Type, "A.swift")],
        imports: Vec::new(),
        usages: Vec::new(),
    }
}

#[test]
fn test_cache_hit_on_unchanged_file() {
    let cache = ExtractionCache::ephemeral();
    let file = sample_file("A.swift", "class Widget {}", 100);
    cache.insert(&file, sample_record("Widget"));

    let hit = cache.lookup(&file).expect("unchanged file should hit");
    assert_eq!(hit.declarations[0].name, "Widget");
}

#[test]
fn test_cache_hit_when_only_mtime_changes() {
    let cache = ExtractionCache::ephemeral();
    let file = sample_file("A.swift", "class Widget {}", 100);
    cache.insert(&file, sample_record("Widget"));

    // Touched but identical content: the fingerprint check rescues it.
    let touched = sample_file("A.swift", "class Widget {}", 200);
    assert!(cache.lookup(&touched).is_some());
}

#[test]
fn test_cache_miss_when_content_changes() {
    let cache = ExtractionCache::ephemeral();
    let file = sample_file("A.swift", "class Widget {}", 100);
    cache.insert(&file, sample_record("Widget"));

    let changed = sample_file("A.swift", "class Gadget {}", 200);
    assert!(cache.lookup(&changed).is_none());
}

#[test]
fn test_cache_retains_only_live_files() {
    let cache = ExtractionCache::ephemeral();
    cache.insert(&sample_file("A.swift", "class A1 {}", 1), sample_record("A1"));
    cache.insert(&sample_file("B.swift", "class B1 {}", 1), sample_record("B1"));

    cache.retain_files(["A.swift"]);
    assert_eq!(cache.len(), 1);
    assert!(cache.lookup(&sample_file("A.swift", "class A1 {}", 1)).is_some());
    assert!(cache.lookup(&sample_file("B.swift", "class B1 {}", 1)).is_none());
}

#[test]
fn test_cache_roundtrip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = sample_file("A.swift", "class Widget {}", 100);

    let cache = ExtractionCache::open(dir.path());
    cache.insert(&file, sample_record("Widget"));
    cache.flush();

    let reopened = ExtractionCache::open(dir.path());
    assert_eq!(reopened.len(), 1);
    assert!(reopened.lookup(&file).is_some());
}

#[test]
fn test_cache_corruption_degrades_to_cold_start() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join(crate::cache::CACHE_DIR).join(crate::cache::CACHE_FILE);
    std::fs::create_dir_all(cache_path.parent().unwrap()).unwrap();
    std::fs::write(&cache_path, b"not a cache snapshot").unwrap();

    let cache = ExtractionCache::open(dir.path());
    assert!(cache.is_empty());
}
