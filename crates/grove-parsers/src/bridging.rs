//! Bridging header detection and resolution

use std::collections::{BTreeMap, BTreeSet};

use grove_core::{ImportTarget, Language, SourceFile};

use crate::languages::parser_for;

/// Which Objective-C files a project's bridging header exposes to Swift.
#[derive(Debug, Clone, Default)]
pub struct BridgingInfo {
    /// Path of the bridging header itself, if the project has one.
    pub header: Option<String>,
    /// Basenames the header imports.
    pub imported_basenames: BTreeSet<String>,
    /// Project files resolved from those imports.
    pub bridged_files: BTreeSet<String>,
}

impl BridgingInfo {
    /// Whether Swift files may depend on Objective-C files at all.
    pub fn bridging_available(&self) -> bool {
        self.header.is_some()
    }
}

fn is_bridging_header(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.ends_with("-Bridging-Header.h") || name == "BridgingHeader.h"
}

/// Find the bridging header among the project files and resolve its
/// imports to project files by basename.
pub fn detect(files: &[SourceFile]) -> BridgingInfo {
    let Some(header) = files.iter().find(|f| is_bridging_header(&f.rel_path)) else {
        return BridgingInfo::default();
    };

    let mut by_basename: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for file in files {
        let name = file.rel_path.rsplit('/').next().unwrap_or(&file.rel_path);
        by_basename.entry(name).or_default().insert(&file.rel_path);
    }

    let mut info = BridgingInfo {
        header: Some(header.rel_path.clone()),
        ..BridgingInfo::default()
    };
    let parser = parser_for(Language::ObjC);
    for import in parser.imports(&header.content) {
        if let ImportTarget::File(path) = import.target {
            let basename = path.rsplit('/').next().unwrap_or(&path).to_string();
            if let Some(matches) = by_basename.get(basename.as_str()) {
                for &m in matches {
                    if m != header.rel_path {
                        info.bridged_files.insert(m.to_string());
                    }
                }
            }
            info.imported_basenames.insert(basename);
        }
    }
    info
}
