//! Identifier filters shared by the language scanners

/// Method and keyword names too generic to attribute to any one file.
pub const COMMON_KEYWORDS: &[&str] = &[
    // Language keywords and literals
    "self", "super", "nil", "null", "true", "false", "YES", "NO",
    "while", "switch", "return", "guard", "repeat", "catch", "throw",
    "defer", "await", "async", "break", "continue", "where", "sizeof",
    // Lifecycle
    "init", "dealloc", "alloc", "new", "copy", "retain", "release", "autorelease",
    "description", "debugDescription", "hash", "isEqual", "class",
    // Control
    "cancel", "start", "stop", "pause", "resume", "reset", "clear", "refresh",
    // I/O
    "load", "save", "open", "close", "read", "write", "delete", "remove",
    // Collections
    "add", "insert", "update", "replace", "get", "set", "count", "size",
    "begin", "end", "first", "last", "next", "previous", "current",
    // UI
    "show", "hide", "enable", "disable", "validate", "invalidate",
    // Networking
    "connect", "disconnect", "send", "receive", "process", "handle",
    // Logging
    "error", "warning", "info", "debug", "log", "print", "format",
    // Serialization
    "encode", "decode", "serialize", "deserialize", "parse", "stringify",
];

/// Standard-library types that never justify a dependency edge.
pub const SWIFT_BASIC_TYPES: &[&str] = &[
    "String", "Int", "Bool", "Double", "Float", "Any", "AnyObject",
    "Void", "NSObject", "Array", "Dictionary", "Set", "Optional",
];

/// Standard-library protocols likewise excluded from conformance matching.
pub const SWIFT_COMMON_PROTOCOLS: &[&str] = &[
    "Codable", "Equatable", "Hashable", "Comparable", "Decodable", "Encodable",
];

/// Whether a matched identifier is worth reporting at all: long enough to
/// be distinctive, not a digit-leading token, not a generic name.
pub fn is_plausible_symbol(symbol: &str) -> bool {
    if symbol.len() <= 2 {
        return false;
    }
    if symbol.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    !COMMON_KEYWORDS.contains(&symbol)
}
