//! Extraction pipeline and dependency graph construction

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rayon::prelude::*;

use grove_core::{
    AnalysisOptions, Declaration, DependencyGraph, DetectionMode, Diagnostic, ExtractionCache,
    ExtractionRecord, Import, ImportTarget, Language, SourceFile, SymbolIndex, SymbolKind,
    UsageReference,
};

use crate::bridging::{self, BridgingInfo};
use crate::languages::parser_for;

/// Edge label for an import with no confirmed symbol use.
pub const IMPORT_LABEL: &str = "<import>";

/// Edge label for a module import.
pub const MODULE_IMPORT_LABEL: &str = "<module-import>";

/// Cache effectiveness for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionStats {
    pub files: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

/// A finished analysis: the graph plus everything worth reporting about
/// how it was built.
pub struct AnalysisResult {
    pub graph: DependencyGraph,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ExtractionStats,
}

/// Run the scanners over one file. Pure text work; never fails — a file
/// the scanners cannot make sense of yields an empty record.
pub fn extract_file(file: &SourceFile) -> ExtractionRecord {
    let parser = parser_for(file.language);

    let mut declarations: Vec<Declaration> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for raw in parser.declarations(&file.content) {
        if raw.name.is_empty() {
            tracing::warn!("{}: dropping declaration with empty name", file.rel_path);
            continue;
        }
        if !seen.insert(raw.name.clone()) {
            tracing::warn!("{}: duplicate declaration of `{}` dropped", file.rel_path, raw.name);
            continue;
        }
        declarations.push(Declaration {
            name: raw.name,
            kind: raw.kind,
            file: file.rel_path.clone(),
        });
    }

    // Extensions do not shield the extended name from usage detection:
    // `extension Foo` in a file still depends on wherever Foo lives.
    let own: HashSet<String> = declarations
        .iter()
        .filter(|d| d.kind != SymbolKind::Extension)
        .map(|d| d.name.clone())
        .collect();

    let imports: Vec<Import> = parser
        .imports(&file.content)
        .into_iter()
        .map(|raw| Import {
            file: file.rel_path.clone(),
            target: raw.target,
            raw: raw.raw,
        })
        .collect();

    let usages: Vec<UsageReference> = parser
        .usages(&file.content, &own)
        .into_iter()
        .map(|raw| UsageReference {
            file: file.rel_path.clone(),
            symbol: raw.symbol,
            kind: raw.kind,
            line: raw.line,
            resolved: None,
        })
        .collect();

    ExtractionRecord {
        declarations,
        imports,
        usages,
    }
}

/// Extract all files in parallel, consulting the cache before scanning.
/// Results are merged into a sorted map so downstream stages see files in
/// path order regardless of worker completion order.
pub fn extract_all(
    files: &[SourceFile],
    cache: &ExtractionCache,
) -> (BTreeMap<String, ExtractionRecord>, ExtractionStats) {
    let extracted: Vec<(String, ExtractionRecord, bool)> = files
        .par_iter()
        .map(|file| {
            if let Some(record) = cache.lookup(file) {
                (file.rel_path.clone(), record, true)
            } else {
                let record = extract_file(file);
                cache.insert(file, record.clone());
                (file.rel_path.clone(), record, false)
            }
        })
        .collect();

    let mut stats = ExtractionStats {
        files: files.len(),
        ..ExtractionStats::default()
    };
    let mut records = BTreeMap::new();
    for (path, record, hit) in extracted {
        if hit {
            stats.cache_hits += 1;
        } else {
            stats.cache_misses += 1;
        }
        records.insert(path, record);
    }
    (records, stats)
}

fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split_once('.').map(|(stem, _)| stem).unwrap_or(name)
}

/// Whether an edge between two project files is plausible for their
/// language pair. Swift sees Objective-C only through a bridging header;
/// Objective-C never sees Swift.
fn pair_valid(source: Language, target: Language, bridging: &BridgingInfo) -> bool {
    match (source.is_objc_family(), target.is_objc_family()) {
        (false, false) | (true, true) => true,
        (false, true) => bridging.bridging_available(),
        (true, false) => false,
    }
}

/// Build the dependency graph for `files`. Deterministic: identical file
/// content yields an identical graph. Pure over in-memory data; the
/// filesystem is never touched here.
pub fn analyze(
    files: &[SourceFile],
    options: &AnalysisOptions,
    cache: &ExtractionCache,
) -> AnalysisResult {
    let (records, stats) = extract_all(files, cache);

    // Declarations in sorted file order; collision resolution below must
    // not depend on extraction order.
    let declarations: Vec<Declaration> = records
        .values()
        .flat_map(|r| r.declarations.iter().cloned())
        .collect();
    let index = SymbolIndex::build(&declarations);
    let bridging = bridging::detect(files);

    let mut languages: BTreeMap<&str, Language> = BTreeMap::new();
    let mut by_basename: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for file in files {
        languages.insert(&file.rel_path, file.language);
        let name = file.rel_path.rsplit('/').next().unwrap_or(&file.rel_path);
        by_basename.entry(name).or_default().insert(&file.rel_path);
    }

    // Symbols each file declares, for bridging attribution.
    let mut declared_in: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for decl in &declarations {
        if decl.kind != SymbolKind::Extension {
            declared_in.entry(&decl.file).or_default().insert(&decl.name);
        }
    }

    let mut graph = DependencyGraph::new();
    for (path, language) in &languages {
        graph.add_file(path, *language);
    }

    for (path, record) in &records {
        let source_lang = languages[path.as_str()];

        // Usage-confirmed edges.
        for usage in &record.usages {
            if let Some(target) = index.resolve(&usage.symbol, path) {
                let target = target.to_string();
                if target != *path && pair_valid(source_lang, languages[target.as_str()], &bridging)
                {
                    graph.add_dependency(path, &target, usage.label());
                }
            }

            // Swift reaching Objective-C through the bridging header.
            if source_lang == Language::Swift {
                let base = usage.base_symbol();
                for bridged in &bridging.bridged_files {
                    if bridged != path
                        && declared_in
                            .get(bridged.as_str())
                            .is_some_and(|names| names.contains(base))
                    {
                        graph.add_dependency(path, bridged, usage.label());
                    }
                }
            }
        }

        // Import-declared edges.
        let has_unqualified_use = record.usages.iter().any(|u| !u.symbol.contains('.'));
        for import in &record.imports {
            match &import.target {
                ImportTarget::Module(name) => {
                    // A module name matching a project file stem is an
                    // internal import; in extended mode it raises an edge
                    // even without confirmed use.
                    let internal: Vec<&str> = languages
                        .keys()
                        .copied()
                        .filter(|candidate| file_stem(candidate) == name)
                        .collect();
                    if !internal.is_empty() {
                        if options.mode == DetectionMode::Extended {
                            for candidate in internal {
                                if candidate != path
                                    && pair_valid(source_lang, languages[candidate], &bridging)
                                {
                                    graph.add_dependency(path, candidate, IMPORT_LABEL.to_string());
                                }
                            }
                        }
                        continue;
                    }
                    if !options.include_external_modules {
                        continue;
                    }
                    // In shallow mode a module import only counts when the
                    // file shows some use a module could be supplying.
                    if options.mode == DetectionMode::Shallow && !has_unqualified_use {
                        continue;
                    }
                    let node = import.target.node_path();
                    graph.add_external(&node);
                    graph.add_dependency(path, &node, MODULE_IMPORT_LABEL.to_string());
                }
                ImportTarget::File(target_path) => {
                    if options.mode == DetectionMode::Shallow {
                        continue;
                    }
                    let basename = target_path.rsplit('/').next().unwrap_or(target_path);
                    let Some(candidates) = by_basename.get(basename) else {
                        continue;
                    };
                    for &candidate in candidates {
                        if candidate != path
                            && pair_valid(source_lang, languages[candidate], &bridging)
                        {
                            graph.add_dependency(path, candidate, IMPORT_LABEL.to_string());
                        }
                    }
                }
            }
        }
    }

    AnalysisResult {
        graph,
        diagnostics: index.ambiguities(),
        stats,
    }
}
