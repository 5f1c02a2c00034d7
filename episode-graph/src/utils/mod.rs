//! Shared utilities.
//!
//! Includes:
//! - Date/time helpers (Cypher datetime literals and tolerant parsing of stored values)
//! - Text helpers (code-fence stripping, Lucene escaping, whitespace and preview trimming)

pub mod datetime;
pub mod text;

pub use datetime::{format_neo4j_datetime, parse_store_datetime};
pub use text::{lucene_sanitize, normalize_whitespace, strip_code_fence, truncate_with_ellipsis};
