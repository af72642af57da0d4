//! Heuristic scanner for Swift source

use std::collections::HashSet;

use grove_core::{ImportTarget, SymbolKind, UsageKind};
use regex::Regex;

use super::{RawDeclaration, RawImport, RawUsage, SourceParser, UsageCollector};
use crate::keywords::{SWIFT_BASIC_TYPES, SWIFT_COMMON_PROTOCOLS, is_plausible_symbol};
use crate::scrub::scrub;

pub struct SwiftParser {
    re_type: Regex,
    re_extension: Regex,
    re_func_top: Regex,
    re_const_top: Regex,
    re_import: Regex,
    re_static_call: Regex,
    re_inst_call: Regex,
    re_free_call: Regex,
    re_type_annotation: Regex,
    re_conformance: Regex,
}

impl SwiftParser {
    pub fn new() -> Self {
        SwiftParser {
            re_type: Regex::new(r"\b(class|struct|enum|protocol|actor)\s+([A-Za-z_]\w*)")
                .expect("swift type pattern"),
            re_extension: Regex::new(r"\bextension\s+([A-Za-z_]\w*)").expect("swift extension pattern"),
            re_func_top: Regex::new(r"(?m)^\s*func\s+([A-Za-z_]\w*)\s*\(").expect("swift func pattern"),
            re_const_top: Regex::new(r"(?m)^(?:public\s+)?let\s+([A-Za-z_]\w*)").expect("swift let pattern"),
            re_import: Regex::new(r"(?m)^\s*import\s+([A-Za-z_][\w.]*)").expect("swift import pattern"),
            re_static_call: Regex::new(r"\b([A-Z][A-Za-z_]\w*)\s*\.\s*([A-Za-z_]\w*)\s*\(")
                .expect("swift static call pattern"),
            re_inst_call: Regex::new(r"\b([a-z_][A-Za-z_]\w*)\s*\.\s*([A-Za-z_]\w*)\s*\(")
                .expect("swift instance call pattern"),
            re_free_call: Regex::new(r"(?:^|[^.\w])([a-z_][A-Za-z_]\w*)\s*\(")
                .expect("swift free call pattern"),
            re_type_annotation: Regex::new(r":\s*([A-Z][A-Za-z_]\w*)").expect("swift annotation pattern"),
            re_conformance: Regex::new(r":\s*([A-Z][A-Za-z_]\w*)(?:\s*,|\s*\{|\s*where|\s*$)")
                .expect("swift conformance pattern"),
        }
    }
}

impl Default for SwiftParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for SwiftParser {
    fn declarations(&self, content: &str) -> Vec<RawDeclaration> {
        let mut out = Vec::new();
        for caps in self.re_type.captures_iter(content) {
            let kind = match &caps[1] {
                "protocol" => SymbolKind::Protocol,
                _ => SymbolKind::Type,
            };
            out.push(RawDeclaration {
                name: caps[2].to_string(),
                kind,
            });
        }
        for caps in self.re_extension.captures_iter(content) {
            out.push(RawDeclaration {
                name: caps[1].to_string(),
                kind: SymbolKind::Extension,
            });
        }
        for caps in self.re_func_top.captures_iter(content) {
            let name = &caps[1];
            if is_plausible_symbol(name) {
                out.push(RawDeclaration {
                    name: name.to_string(),
                    kind: SymbolKind::Function,
                });
            }
        }
        for caps in self.re_const_top.captures_iter(content) {
            let name = &caps[1];
            if is_plausible_symbol(name) {
                out.push(RawDeclaration {
                    name: name.to_string(),
                    kind: SymbolKind::Constant,
                });
            }
        }
        out
    }

    fn imports(&self, content: &str) -> Vec<RawImport> {
        self.re_import
            .captures_iter(content)
            .map(|caps| RawImport {
                target: ImportTarget::Module(caps[1].to_string()),
                raw: caps[0].trim().to_string(),
            })
            .collect()
    }

    fn usages(&self, content: &str, own: &HashSet<String>) -> Vec<RawUsage> {
        let clean = scrub(content);
        let mut collector = UsageCollector::default();

        for (i, line) in clean.lines().enumerate() {
            let lineno = (i + 1) as u32;

            // Type.method(...) — the type and the qualified call.
            for caps in self.re_static_call.captures_iter(line) {
                let type_name = &caps[1];
                let method = &caps[2];
                if !is_plausible_symbol(type_name) || own.contains(type_name) {
                    continue;
                }
                collector.push(type_name, UsageKind::TypeRef, lineno);
                if is_plausible_symbol(method) {
                    collector.push(&format!("{type_name}.{method}"), UsageKind::Call, lineno);
                }
            }

            // obj.method(...) — only distinctive selector names.
            for caps in self.re_inst_call.captures_iter(line) {
                let method = &caps[2];
                if is_plausible_symbol(method)
                    && method.len() > 4
                    && !method.starts_with("set")
                    && !method.starts_with("get")
                    && !own.contains(method)
                {
                    collector.push(method, UsageKind::Call, lineno);
                }
            }

            // Free function calls — only distinctive names, never a
            // dotted receiver (those matched above).
            for caps in self.re_free_call.captures_iter(line) {
                let func = &caps[1];
                if is_plausible_symbol(func)
                    && func.len() > 4
                    && !func.starts_with("set")
                    && !func.starts_with("get")
                    && !own.contains(func)
                {
                    collector.push(func, UsageKind::FunctionCall, lineno);
                }
            }

            // `: Type` annotations.
            for caps in self.re_type_annotation.captures_iter(line) {
                let type_name = &caps[1];
                if is_plausible_symbol(type_name)
                    && !SWIFT_BASIC_TYPES.contains(&type_name)
                    && !own.contains(type_name)
                {
                    collector.push(type_name, UsageKind::TypeRef, lineno);
                }
            }

            // `: Proto {` / `: Proto,` conformance positions.
            for caps in self.re_conformance.captures_iter(line) {
                let proto = &caps[1];
                if is_plausible_symbol(proto)
                    && !SWIFT_COMMON_PROTOCOLS.contains(&proto)
                    && !SWIFT_BASIC_TYPES.contains(&proto)
                    && !own.contains(proto)
                {
                    collector.push(proto, UsageKind::Conformance, lineno);
                }
            }
        }
        collector.finish()
    }
}
