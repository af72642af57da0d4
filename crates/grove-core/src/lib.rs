//! Grove Core — dependency graph model, symbol index, analyzer, and cache

pub mod analyzer;
pub mod cache;
pub mod error;
pub mod graph;
pub mod index;
pub mod model;

#[cfg(test)]
pub mod tests;

pub use analyzer::{Closure, CycleReport, DegreeEntry, Direction, GraphMetrics};
pub use cache::{CACHE_DIR, CACHE_FILE, CacheEntry, ExtractionCache, clear_cache};
pub use error::GraphError;
pub use graph::{DependencyEdge, DependencyGraph, FileNode};
pub use index::{SymbolIndex, TieBreak};
pub use model::{
    AnalysisOptions, Declaration, DetectionMode, Diagnostic, ExtractionRecord, Import,
    ImportTarget, Language, SourceFile, SymbolKind, UsageKind, UsageReference, fingerprint,
};
