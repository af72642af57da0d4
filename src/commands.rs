//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use grove_core::{AnalysisOptions, DetectionMode, Direction, ExtractionCache};
use grove_parsers::AnalysisResult;

use crate::AnalysisFlags;
use crate::config::GroveConfig;
use crate::walk;

/// Entry-point globs applied when the caller supplies none.
const DEFAULT_ENTRY_POINTS: &[&str] =
    &["*App.swift", "AppDelegate*", "main.m", "main.mm", "*Tests*", "*Spec*"];

/// Merge config-file settings under the CLI flags and run the pipeline.
fn run_analysis(root: &Path, flags: &AnalysisFlags) -> anyhow::Result<(AnalysisResult, GroveConfig, AnalysisOptions)> {
    let config = GroveConfig::load(root);

    let mut ignore = config.ignore.clone();
    ignore.extend(flags.ignore.iter().cloned());

    let options = AnalysisOptions {
        mode: if flags.extended || config.extended {
            DetectionMode::Extended
        } else {
            DetectionMode::Shallow
        },
        include_external_modules: flags.include_modules || config.include_modules,
        max_closure_depth: config.max_depth.unwrap_or_else(|| AnalysisOptions::default().max_closure_depth),
        ..AnalysisOptions::default()
    };

    let files = walk::collect_sources(root, &ignore)?;
    tracing::info!("analyzing {} source files under {}", files.len(), root.display());

    let cache = if flags.no_cache {
        ExtractionCache::ephemeral()
    } else {
        ExtractionCache::open(root)
    };
    let result = grove_parsers::analyze(&files, &options, &cache);
    cache.retain_files(files.iter().map(|f| f.rel_path.as_str()));
    cache.flush();

    tracing::info!(
        "graph: {} nodes, {} edges ({} cache hits, {} misses)",
        result.graph.node_count(),
        result.graph.edge_count(),
        result.stats.cache_hits,
        result.stats.cache_misses,
    );
    for diagnostic in &result.diagnostics {
        tracing::debug!("{}", diagnostic);
    }
    Ok((result, config, options))
}

pub fn analyze(
    root: &Path,
    flags: &AnalysisFlags,
    dot: bool,
    mermaid: bool,
    csv: bool,
    json: bool,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (result, _, _) = run_analysis(root, flags)?;
    let graph = &result.graph;

    println!("{} files, {} dependency edges", graph.node_count(), graph.edge_count());
    if !result.diagnostics.is_empty() {
        println!("{} ambiguous symbols (run with --verbose for details)", result.diagnostics.len());
    }

    let out_dir = output_dir.unwrap_or_else(|| root.to_path_buf());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;

    if dot {
        let path = out_dir.join("dependencies.dot");
        std::fs::write(&path, grove_export::to_dot(graph))?;
        println!("wrote {}", path.display());
    }
    if mermaid {
        let path = out_dir.join("dependencies.mmd");
        std::fs::write(&path, grove_export::to_mermaid(graph))?;
        println!("wrote {}", path.display());
    }
    if csv {
        let edges = out_dir.join("edges.csv");
        std::fs::write(&edges, grove_export::edges_csv(graph))?;
        let metrics = out_dir.join("metrics.csv");
        std::fs::write(&metrics, grove_export::metrics_csv(&graph.metrics()))?;
        println!("wrote {} and {}", edges.display(), metrics.display());
    }
    if json {
        let path = out_dir.join("dependencies.json");
        std::fs::write(&path, grove_export::to_json(graph)?)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

pub fn cycles(root: &Path, flags: &AnalysisFlags) -> anyhow::Result<()> {
    let (result, _, options) = run_analysis(root, flags)?;
    let report = result.graph.cycles(options.cycle_visit_budget);

    if report.cycles.is_empty() {
        println!("no circular dependencies found");
    } else {
        println!("{} circular dependencies:", report.cycles.len());
        for (i, cycle) in report.cycles.iter().enumerate() {
            println!("  {}. {} -> {}", i + 1, cycle.join(" -> "), cycle[0]);
        }
    }
    if !report.complete {
        println!("search truncated by visit budget; more cycles may exist");
    }
    Ok(())
}

pub fn orphans(root: &Path, flags: &AnalysisFlags, entry_points: &[String]) -> anyhow::Result<()> {
    let (result, config, _) = run_analysis(root, flags)?;

    let mut patterns: Vec<String> = config.entry_points.clone();
    patterns.extend(entry_points.iter().cloned());
    if patterns.is_empty() {
        patterns = DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect();
    }
    let matcher = build_globset(&patterns)?;
    let is_entry = |path: &str| {
        let basename = path.rsplit('/').next().unwrap_or(path);
        matcher.is_match(path) || matcher.is_match(basename)
    };

    let orphans = result.graph.orphans(&is_entry);
    if orphans.is_empty() {
        println!("no orphan files");
    } else {
        println!("{} orphan files:", orphans.len());
        for orphan in &orphans {
            println!("  {}", orphan);
        }
    }
    Ok(())
}

pub fn paths(root: &Path, flags: &AnalysisFlags, from: &str, to: &str) -> anyhow::Result<()> {
    let (result, _, _) = run_analysis(root, flags)?;
    let paths = result.graph.shortest_paths(from, to)?;

    if paths.is_empty() {
        println!("no dependency path from {} to {}", from, to);
    } else {
        println!("{} shortest path(s), {} hops:", paths.len(), paths[0].len() - 1);
        for path in &paths {
            println!("  {}", path.join(" -> "));
        }
    }
    Ok(())
}

pub fn closure(
    root: &Path,
    flags: &AnalysisFlags,
    file: &str,
    dependents: bool,
    max_depth: Option<usize>,
) -> anyhow::Result<()> {
    let (result, _, options) = run_analysis(root, flags)?;
    let direction = if dependents { Direction::Dependents } else { Direction::Dependencies };
    let depth = max_depth.unwrap_or(options.max_closure_depth);
    let closure = result
        .graph
        .closure(file, direction, depth, options.include_external_modules)?;

    let what = if dependents { "dependents" } else { "dependencies" };
    println!("{} transitive {} of {}:", closure.members.len(), what, file);
    for (path, depth) in &closure.members {
        println!("  [{}] {}", depth, path);
    }
    if !closure.complete {
        println!("expansion truncated at depth {}", depth);
    }
    Ok(())
}

pub fn metrics(root: &Path, flags: &AnalysisFlags) -> anyhow::Result<()> {
    let (result, _, _) = run_analysis(root, flags)?;
    let metrics = result.graph.metrics();

    println!("files: {}", metrics.node_count);
    println!("edges: {}", metrics.edge_count);
    println!("density: {:.4}", metrics.density);
    println!("avg dependencies per file: {:.2}", metrics.avg_dependencies);
    if !metrics.most_depended_on.is_empty() {
        println!("most depended on:");
        for (path, count) in &metrics.most_depended_on {
            println!("  {:>3}  {}", count, path);
        }
    }
    if !metrics.most_dependencies.is_empty() {
        println!("most dependencies:");
        for (path, count) in &metrics.most_dependencies {
            println!("  {:>3}  {}", count, path);
        }
    }
    Ok(())
}

pub fn clear(root: &Path) -> anyhow::Result<()> {
    grove_core::clear_cache(root)?;
    tracing::info!("cache cleared");
    Ok(())
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("bad entry-point glob: {pattern}"))?);
    }
    Ok(builder.build()?)
}
