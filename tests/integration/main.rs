//! Integration tests for Grove
//!
//! These drive the full pipeline the way the CLI does: a project tree, the
//! extraction cache, graph construction, and the query surface.

use std::process::Command;

use grove_core::{AnalysisOptions, DetectionMode, Direction, ExtractionCache, Language, SourceFile};

/// The fixture project: a small app with a call chain, a cycle, an orphan,
/// and a bridged Objective-C store.
const FIXTURE: &[(&str, &str)] = &[
    (
        "Sources/AppDelegate.swift",
        "import UIKit\n\nclass AppDelegate {\n    var store: DataStore\n\n    func applicationDidFinishLaunching() {\n        NetworkManager.shared.configureSession()\n        var legacy: LegacyStore\n    }\n}\n",
    ),
    (
        "Sources/NetworkManager.swift",
        "import Foundation\n\nclass NetworkManager {\n    func configureSession() {\n        Logger.shared.record(message)\n    }\n}\n",
    ),
    (
        "Sources/DataStore.swift",
        "import Foundation\n\nstruct DataStore {\n    func persistSnapshot() {\n        Logger.shared.record(message)\n    }\n}\n",
    ),
    (
        "Sources/Logger.swift",
        "import Foundation\n\nclass Logger {\n    func record(_ message: String) {\n    }\n}\n",
    ),
    (
        "Sources/SyncService.swift",
        "class SyncService {\n    var scheduler: SyncScheduler\n}\n",
    ),
    (
        "Sources/SyncScheduler.swift",
        "class SyncScheduler {\n    var service: SyncService\n}\n",
    ),
    ("Sources/UnusedFormatter.swift", "class UnusedFormatter {\n}\n"),
    (
        "Legacy/LegacyStore.h",
        "#import <Foundation/Foundation.h>\n\n@interface LegacyStore : NSObject\n@end\n",
    ),
    (
        "App-Bridging-Header.h",
        "#import \"LegacyStore.h\"\n",
    ),
];

fn fixture_files() -> Vec<SourceFile> {
    let mut files: Vec<SourceFile> = FIXTURE
        .iter()
        .map(|(path, content)| {
            SourceFile::new(
                path.to_string(),
                Language::from_path(path).expect("supported fixture extension"),
                content.to_string(),
                0,
            )
        })
        .collect();
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    files
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--", "--help"])
        .current_dir(".")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("grove"));
    assert!(stdout.contains("dependency"));
}

/// Test the full pipeline over the fixture project
#[test]
fn test_end_to_end_analysis() {
    let files = fixture_files();
    let cache = ExtractionCache::ephemeral();
    let result = grove_parsers::analyze(&files, &AnalysisOptions::default(), &cache);
    let graph = &result.graph;

    // Every fixture file is a node.
    assert_eq!(graph.node_count(), files.len());

    // Usage edges point from referencer to declarer.
    assert!(graph.edge("Sources/AppDelegate.swift", "Sources/NetworkManager.swift").is_some());
    assert!(graph.edge("Sources/AppDelegate.swift", "Sources/DataStore.swift").is_some());
    assert!(graph.edge("Sources/NetworkManager.swift", "Sources/Logger.swift").is_some());
    assert!(graph.edge("Sources/NetworkManager.swift", "Sources/AppDelegate.swift").is_none());

    // Swift reaches the bridged Objective-C store.
    assert!(graph.edge("Sources/AppDelegate.swift", "Legacy/LegacyStore.h").is_some());
}

/// Test cycle, orphan, closure, and path queries over the built graph
#[test]
fn test_graph_queries_end_to_end() {
    let files = fixture_files();
    let cache = ExtractionCache::ephemeral();
    let result = grove_parsers::analyze(&files, &AnalysisOptions::default(), &cache);
    let graph = &result.graph;

    // The sync pair forms exactly one cycle.
    let report = graph.cycles(0);
    assert!(report.complete);
    assert_eq!(report.cycles.len(), 1);
    assert!(report.cycles[0].contains(&"Sources/SyncService.swift".to_string()));
    assert!(report.cycles[0].contains(&"Sources/SyncScheduler.swift".to_string()));

    // The formatter is an orphan; the app delegate is an entry point.
    let orphans = graph.orphans(&|path| path.contains("AppDelegate") || path.contains("Bridging"));
    assert!(orphans.contains(&"Sources/UnusedFormatter.swift".to_string()));
    assert!(!orphans.contains(&"Sources/AppDelegate.swift".to_string()));

    // Closure from the app delegate reaches the logger in two hops.
    let closure = graph
        .closure("Sources/AppDelegate.swift", Direction::Dependencies, 64, false)
        .unwrap();
    assert!(closure.complete);
    let logger = closure
        .members
        .iter()
        .find(|(path, _)| path == "Sources/Logger.swift")
        .expect("logger reachable");
    assert_eq!(logger.1, 2);

    // Shortest path follows the call chain.
    let paths = graph
        .shortest_paths("Sources/AppDelegate.swift", "Sources/Logger.swift")
        .unwrap();
    assert!(!paths.is_empty());
    assert!(paths.iter().all(|p| p.len() == 3));
}

/// Test extended mode adds import-declared edges
#[test]
fn test_extended_mode_end_to_end() {
    let files = fixture_files();
    let cache = ExtractionCache::ephemeral();
    let options = AnalysisOptions {
        mode: DetectionMode::Extended,
        ..AnalysisOptions::default()
    };
    let result = grove_parsers::analyze(&files, &options, &cache);

    // The bridging header's import shows up as an edge in extended mode.
    let edge = result
        .graph
        .edge("App-Bridging-Header.h", "Legacy/LegacyStore.h")
        .expect("import edge");
    assert!(edge.labels.contains("<import>"));
}

/// Test that the cache persists across runs and skips re-extraction
#[test]
fn test_cache_persists_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let files = fixture_files();

    let cache = ExtractionCache::open(dir.path());
    let first = grove_parsers::analyze(&files, &AnalysisOptions::default(), &cache);
    assert_eq!(first.stats.cache_misses, files.len());
    cache.flush();

    let reopened = ExtractionCache::open(dir.path());
    let second = grove_parsers::analyze(&files, &AnalysisOptions::default(), &reopened);
    assert_eq!(second.stats.cache_hits, files.len());
    assert_eq!(second.stats.cache_misses, 0);
    assert_eq!(second.graph.edge_count(), first.graph.edge_count());
}
