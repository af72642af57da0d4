//! Grove Export — render finished dependency graphs

pub mod csv;
pub mod dot;
pub mod json;
pub mod mermaid;

pub use csv::{edges_csv, metrics_csv};
pub use dot::to_dot;
pub use json::{GraphDump, to_json};
pub use mermaid::to_mermaid;
