//! Core data structures for dependency analysis

use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Languages the heuristic scanners understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Swift,
    ObjC,
    ObjCpp,
}

impl Language {
    /// Detect language from file extension. Returns `None` for anything
    /// outside the supported set.
    pub fn from_path(path: &str) -> Option<Self> {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("swift") => Some(Language::Swift),
            Some("m") | Some("h") => Some(Language::ObjC),
            Some("mm") | Some("hh") => Some(Language::ObjCpp),
            _ => None,
        }
    }

    /// Swift sits on one side of the bridging rules, the Objective-C
    /// dialects on the other.
    pub fn is_objc_family(self) -> bool {
        matches!(self, Language::ObjC | Language::ObjCpp)
    }
}

/// One file of the analyzed project. Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Canonical path relative to the project root, `/`-separated.
    pub rel_path: String,
    pub language: Language,
    pub content: String,
    pub fingerprint: u64,
    pub mtime_secs: i64,
}

impl SourceFile {
    pub fn new(rel_path: String, language: Language, content: String, mtime_secs: i64) -> Self {
        let fingerprint = fingerprint(&content);
        SourceFile {
            rel_path,
            language,
            content,
            fingerprint,
            mtime_secs,
        }
    }
}

/// Content fingerprint, stable across runs.
pub fn fingerprint(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// What kind of entity a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Type,
    Function,
    Protocol,
    Constant,
    /// Swift `extension Foo` — recorded, but never owns the name `Foo`.
    Extension,
}

/// A symbol introduced by a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: SymbolKind,
    pub file: String,
}

/// Target of an import statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImportTarget {
    /// `import Foundation`, `@import UIKit;` — a named module, usually
    /// external to the project.
    Module(String),
    /// `#import "Foo.h"` — a path, resolved against the project by basename.
    File(String),
}

impl ImportTarget {
    /// Node path used when the target becomes a graph node.
    pub fn node_path(&self) -> String {
        match self {
            ImportTarget::Module(name) => format!("module:{name}"),
            ImportTarget::File(path) => path.clone(),
        }
    }
}

/// A stated import in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub file: String,
    pub target: ImportTarget,
    /// The statement as written, for diagnostics.
    pub raw: String,
}

/// How a symbol reference appears in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UsageKind {
    /// `Type.method(...)` or `[Class selector]` style calls.
    Call,
    /// Type annotations, pointer declarations, forward declarations.
    TypeRef,
    /// Protocol conformance or adoption.
    Conformance,
    /// Free function calls.
    FunctionCall,
}

impl UsageKind {
    pub fn tag(self) -> &'static str {
        match self {
            UsageKind::Call => "call",
            UsageKind::TypeRef => "type",
            UsageKind::Conformance => "proto",
            UsageKind::FunctionCall => "func",
        }
    }
}

/// An occurrence of a symbol name in a file that did not declare it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReference {
    pub file: String,
    pub symbol: String,
    pub kind: UsageKind,
    /// 1-based line of the first occurrence.
    pub line: u32,
    /// Declaring file, once the symbol index has been consulted. Stays
    /// `None` for symbols the project does not declare.
    pub resolved: Option<String>,
}

impl UsageReference {
    /// Edge label: `name[kind]`.
    pub fn label(&self) -> String {
        format!("{}[{}]", self.symbol, self.kind.tag())
    }

    /// Leading segment of a dotted name (`Type.method` -> `Type`).
    pub fn base_symbol(&self) -> &str {
        self.symbol.split('.').next().unwrap_or(&self.symbol)
    }
}

/// Everything extracted from one file. This is also the payload persisted
/// per file by the extraction cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub declarations: Vec<Declaration>,
    pub imports: Vec<Import>,
    pub usages: Vec<UsageReference>,
}

/// How dependency edges are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    /// Edges only for symbols with at least one confirmed reference.
    Shallow,
    /// Additionally, one edge per stated import regardless of use.
    Extended,
}

/// Run configuration consumed by the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub mode: DetectionMode,
    /// Give unresolvable module imports a `module:` pseudo-node instead of
    /// dropping them.
    pub include_external_modules: bool,
    /// Depth bound for closure queries.
    pub max_closure_depth: usize,
    /// Edge-visit budget for cycle search. 0 means unbounded.
    pub cycle_visit_budget: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            mode: DetectionMode::Shallow,
            include_external_modules: false,
            max_closure_depth: 64,
            cycle_visit_budget: 0,
        }
    }
}

/// Non-fatal conditions surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A name declared in more than one file; resolution fell back to the
    /// deterministic tie-break.
    AmbiguousSymbol { name: String, candidates: Vec<String> },
    /// A file declared the same name twice; the first declaration won.
    DuplicateDeclaration { name: String, file: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::AmbiguousSymbol { name, candidates } => {
                write!(f, "symbol `{}` declared in {} files: {}", name, candidates.len(), candidates.join(", "))
            }
            Diagnostic::DuplicateDeclaration { name, file } => {
                write!(f, "symbol `{name}` declared more than once in {file}")
            }
        }
    }
}
