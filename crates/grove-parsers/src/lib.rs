//! Grove Parsers — heuristic scanning and graph construction

pub mod bridging;
pub mod keywords;
pub mod languages;
pub mod pipeline;
pub mod scrub;


pub use bridging::BridgingInfo;
pub use languages::{RawDeclaration, RawImport, RawUsage, SourceParser, parser_for};
pub use pipeline::{
    AnalysisResult, ExtractionStats, IMPORT_LABEL, MODULE_IMPORT_LABEL, analyze, extract_all,
    extract_file,
};
pub use scrub::scrub;
