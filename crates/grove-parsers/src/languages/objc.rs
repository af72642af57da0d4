//! Heuristic scanner for Objective-C and Objective-C++ source

use std::collections::HashSet;

use grove_core::{ImportTarget, SymbolKind, UsageKind};
use regex::Regex;

use super::{RawDeclaration, RawImport, RawUsage, SourceParser, UsageCollector};
use crate::keywords::is_plausible_symbol;
use crate::scrub::scrub;

pub struct ObjCParser {
    re_interface: Regex,
    re_protocol: Regex,
    re_implementation: Regex,
    re_category: Regex,
    re_ns_enum: Regex,
    re_c_function: Regex,
    re_define: Regex,
    re_import_local: Regex,
    re_include_local: Regex,
    re_import_module: Regex,
    re_class_forward: Regex,
    re_msg_class: Regex,
    re_msg_obj: Regex,
    re_type_ptr: Regex,
    re_protocol_use: Regex,
    re_c_call: Regex,
}

impl ObjCParser {
    pub fn new() -> Self {
        ObjCParser {
            re_interface: Regex::new(r"@interface\s+([A-Za-z_]\w*)").expect("interface pattern"),
            re_protocol: Regex::new(r"@protocol\s+([A-Za-z_]\w*)").expect("protocol pattern"),
            re_implementation: Regex::new(r"@implementation\s+([A-Za-z_]\w*)")
                .expect("implementation pattern"),
            re_category: Regex::new(r"@interface\s+([A-Za-z_]\w*)\s*\(\s*([A-Za-z_]\w*)\s*\)")
                .expect("category pattern"),
            re_ns_enum: Regex::new(r"typedef\s+NS_ENUM\s*\([^,]+,\s*([A-Za-z_]\w*)\)")
                .expect("NS_ENUM pattern"),
            re_c_function: Regex::new(
                r"(?m)^(?:static\s+)?(?:inline\s+)?(?:extern\s+)?[A-Za-z_]\w*\s+\*?\s*([A-Za-z_]\w*)\s*\(",
            )
            .expect("c function pattern"),
            re_define: Regex::new(r"(?m)^\s*#\s*define\s+([A-Za-z_]\w*)").expect("define pattern"),
            re_import_local: Regex::new(r#"#\s*import\s*"([^"]+)""#).expect("import pattern"),
            re_include_local: Regex::new(r#"#\s*include\s*"([^"]+)""#).expect("include pattern"),
            re_import_module: Regex::new(r"@import\s+([A-Za-z_][\w.]*)\s*;").expect("module pattern"),
            re_class_forward: Regex::new(r"@class\s+([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)\s*;")
                .expect("forward pattern"),
            re_msg_class: Regex::new(r"\[\s*([A-Z][A-Za-z_]\w*)\s+([A-Za-z_]\w*)")
                .expect("class message pattern"),
            re_msg_obj: Regex::new(r"\[\s*([a-z_][A-Za-z_]\w*)\s+([A-Za-z_]\w*)")
                .expect("object message pattern"),
            re_type_ptr: Regex::new(r"\b([A-Z][A-Za-z_]\w*)\s*\*").expect("type pointer pattern"),
            re_protocol_use: Regex::new(r"id\s*<\s*([A-Za-z_]\w*)\s*>").expect("protocol use pattern"),
            re_c_call: Regex::new(
                r"\b(NS[A-Z]\w*|CF[A-Z]\w*|CG[A-Z]\w*|UI[A-Z]\w*|dispatch_\w+|pthread_\w+)\s*\(",
            )
            .expect("c call pattern"),
        }
    }
}

impl Default for ObjCParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for ObjCParser {
    fn declarations(&self, content: &str) -> Vec<RawDeclaration> {
        let mut out = Vec::new();
        for caps in self.re_interface.captures_iter(content) {
            out.push(RawDeclaration {
                name: caps[1].to_string(),
                kind: SymbolKind::Type,
            });
        }
        for caps in self.re_protocol.captures_iter(content) {
            out.push(RawDeclaration {
                name: caps[1].to_string(),
                kind: SymbolKind::Protocol,
            });
        }
        for caps in self.re_implementation.captures_iter(content) {
            out.push(RawDeclaration {
                name: caps[1].to_string(),
                kind: SymbolKind::Type,
            });
        }
        // Categories extend an existing class; record them like Swift
        // extensions so they never claim the base name.
        for caps in self.re_category.captures_iter(content) {
            out.push(RawDeclaration {
                name: format!("{}({})", &caps[1], &caps[2]),
                kind: SymbolKind::Extension,
            });
        }
        for caps in self.re_ns_enum.captures_iter(content) {
            out.push(RawDeclaration {
                name: caps[1].to_string(),
                kind: SymbolKind::Type,
            });
        }
        for caps in self.re_c_function.captures_iter(content) {
            let name = &caps[1];
            if is_plausible_symbol(name) {
                out.push(RawDeclaration {
                    name: name.to_string(),
                    kind: SymbolKind::Function,
                });
            }
        }
        for caps in self.re_define.captures_iter(content) {
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
        let mut out = Vec::new();
        for caps in self.re_import_local.captures_iter(content) {
            out.push(RawImport {
                target: ImportTarget::File(caps[1].to_string()),
                raw: caps[0].to_string(),
            });
        }
        for caps in self.re_include_local.captures_iter(content) {
            out.push(RawImport {
                target: ImportTarget::File(caps[1].to_string()),
                raw: caps[0].to_string(),
            });
        }
        for caps in self.re_import_module.captures_iter(content) {
            out.push(RawImport {
                target: ImportTarget::Module(caps[1].to_string()),
                raw: caps[0].to_string(),
            });
        }
        out
    }

    fn usages(&self, content: &str, own: &HashSet<String>) -> Vec<RawUsage> {
        let clean = scrub(content);
        let mut collector = UsageCollector::default();

        for (i, line) in clean.lines().enumerate() {
            let lineno = (i + 1) as u32;

            // `@class A, B;` forward declarations.
            for caps in self.re_class_forward.captures_iter(line) {
                for name in caps[1].split(',') {
                    let name = name.trim();
                    if is_plausible_symbol(name) && !own.contains(name) {
                        collector.push(name, UsageKind::TypeRef, lineno);
                    }
                }
            }

            // `[Class selector ...]` message sends.
            for caps in self.re_msg_class.captures_iter(line) {
                let class = &caps[1];
                let selector = &caps[2];
                if !is_plausible_symbol(class) || own.contains(class) {
                    continue;
                }
                collector.push(class, UsageKind::TypeRef, lineno);
                if is_plausible_symbol(selector) {
                    collector.push(&format!("{class}.{selector}"), UsageKind::Call, lineno);
                }
            }

            // `[obj selector ...]` — only distinctive selector names.
            for caps in self.re_msg_obj.captures_iter(line) {
                let selector = &caps[2];
                if is_plausible_symbol(selector)
                    && selector.len() > 4
                    && !selector.starts_with("set")
                    && !selector.starts_with("get")
                    && !own.contains(selector)
                {
                    collector.push(selector, UsageKind::Call, lineno);
                }
            }

            // `Type *var` pointer declarations; framework prefixes are
            // never project symbols.
            for caps in self.re_type_ptr.captures_iter(line) {
                let type_name = &caps[1];
                if is_plausible_symbol(type_name)
                    && !type_name.starts_with("NS")
                    && !type_name.starts_with("UI")
                    && !own.contains(type_name)
                {
                    collector.push(type_name, UsageKind::TypeRef, lineno);
                }
            }

            // `id<Proto>` adoption.
            for caps in self.re_protocol_use.captures_iter(line) {
                let proto = &caps[1];
                if is_plausible_symbol(proto) && !own.contains(proto) {
                    collector.push(proto, UsageKind::Conformance, lineno);
                }
            }

            // Framework and C runtime calls.
            for caps in self.re_c_call.captures_iter(line) {
                let func = &caps[1];
                if !own.contains(func) {
                    collector.push(func, UsageKind::FunctionCall, lineno);
                }
            }
        }
        collector.finish()
    }
}
