//! Project file discovery

use std::path::Path;
use std::time::UNIX_EPOCH;

use grove_core::{Language, SourceFile};
use ignore::WalkBuilder;

/// Whether a relative path falls under one of the ignore prefixes.
fn is_ignored(rel_path: &str, ignore_prefixes: &[String]) -> bool {
    ignore_prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        rel_path == prefix || rel_path.starts_with(&format!("{prefix}/"))
    })
}

/// Walk `root` and collect every supported source file, sorted by path.
/// Respects .gitignore via the walker; additional prefixes are excluded
/// explicitly. Unreadable files are skipped with a warning.
pub fn collect_sources(root: &Path, ignore_prefixes: &[String]) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for entry in WalkBuilder::new(root).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("walk error: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let rel_path = match path.strip_prefix(root) {
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };
        let Some(language) = Language::from_path(&rel_path) else {
            continue;
        };
        if is_ignored(&rel_path, ignore_prefixes) {
            continue;
        }

        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("cannot read {}: {}", path.display(), e);
                continue;
            }
        };
        let mtime_secs = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        files.push(SourceFile::new(rel_path, language, content, mtime_secs));
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}
