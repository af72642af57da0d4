//! Project-wide symbol index with deterministic ambiguity resolution

use std::collections::HashMap;

use crate::model::{Declaration, Diagnostic, SymbolKind};

/// One rule of the ambiguity tie-break, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Prefer a declaring file in the same directory as the referencer.
    SameDirectory,
    /// Prefer a file whose stem equals the symbol name (the
    /// one-type-per-file convention).
    FileStemMatch,
    /// Take the lexicographically first path.
    Lexicographic,
}

impl TieBreak {
    pub fn default_policy() -> Vec<TieBreak> {
        vec![TieBreak::SameDirectory, TieBreak::FileStemMatch, TieBreak::Lexicographic]
    }
}

/// Maps symbol names to the files declaring them. Built once per run from
/// all declarations; read-only afterwards.
pub struct SymbolIndex {
    by_name: HashMap<String, Vec<String>>,
    policy: Vec<TieBreak>,
}

impl SymbolIndex {
    /// Build from declarations with the default tie-break policy. The input
    /// must already be grouped in sorted file order so that collision
    /// resolution is independent of extraction order.
    pub fn build(declarations: &[Declaration]) -> Self {
        Self::with_policy(declarations, TieBreak::default_policy())
    }

    pub fn with_policy(declarations: &[Declaration], policy: Vec<TieBreak>) -> Self {
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        for decl in declarations {
            // Extensions augment an existing type; they never own its name.
            if decl.kind == SymbolKind::Extension || decl.name.is_empty() {
                continue;
            }
            let files = by_name.entry(decl.name.clone()).or_default();
            if !files.contains(&decl.file) {
                files.push(decl.file.clone());
            }
        }
        for files in by_name.values_mut() {
            files.sort();
        }
        SymbolIndex { by_name, policy }
    }

    /// All files declaring `name`, sorted.
    pub fn candidates(&self, name: &str) -> &[String] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a symbol reference made from `referrer` to its declaring
    /// file. Dotted names (`Type.method`) resolve by their base segment.
    pub fn resolve(&self, symbol: &str, referrer: &str) -> Option<&str> {
        let base = symbol.split('.').next().unwrap_or(symbol);
        let candidates = self.by_name.get(base)?;
        if candidates.len() == 1 {
            return Some(&candidates[0]);
        }
        for rule in &self.policy {
            let matched: Vec<&String> = match rule {
                TieBreak::SameDirectory => {
                    let dir = parent_dir(referrer);
                    candidates.iter().filter(|c| parent_dir(c) == dir).collect()
                }
                TieBreak::FileStemMatch => {
                    candidates.iter().filter(|c| file_stem(c) == base).collect()
                }
                TieBreak::Lexicographic => candidates.iter().collect(),
            };
            // Candidate lists are sorted, so the first match is the
            // lexicographically first within the rule.
            if let Some(first) = matched.first() {
                return Some(first.as_str());
            }
        }
        candidates.first().map(String::as_str)
    }

    /// Names declared in more than one file, as diagnostics.
    pub fn ambiguities(&self) -> Vec<Diagnostic> {
        let mut out: Vec<Diagnostic> = self
            .by_name
            .iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(name, files)| Diagnostic::AmbiguousSymbol {
                name: name.clone(),
                candidates: files.clone(),
            })
            .collect();
        out.sort_by(|a, b| match (a, b) {
            (
                Diagnostic::AmbiguousSymbol { name: a, .. },
                Diagnostic::AmbiguousSymbol { name: b, .. },
            ) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        });
        out
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split_once('.').map(|(stem, _)| stem).unwrap_or(name)
}
