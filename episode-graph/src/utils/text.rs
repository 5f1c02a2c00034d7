//! Text processing utilities.

use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

static BOOLEAN_OPERATOR_RE: OnceLock<Regex> = OnceLock::new();

fn boolean_operator_re() -> &'static Regex {
    BOOLEAN_OPERATOR_RE.get_or_init(|| Regex::new(r"\b(AND|OR|NOT)\b").expect("static regex is valid"))
}

/// Replace runs of whitespace with a single space and trim both ends.
pub fn normalize_whitespace(s: &str) -> String {
    whitespace_re().replace_all(s, " ").trim().to_string()
}

/// Truncate `s` to at most `max_len` characters, appending `"..."` when cut.
///
/// Counts characters, not bytes, so multi-byte UTF-8 is never split.
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{kept}...")
}

/// Remove the code fence a model may wrap around its JSON reply.
///
/// Trims, drops one leading `` ```json `` (or bare `` ``` ``) and one trailing
/// `` ``` ``, then trims again. Text without fences comes back trimmed and
/// otherwise unchanged.
pub fn strip_code_fence(s: &str) -> &str {
    let s = s.trim();
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    let s = s.strip_suffix("```").unwrap_or(s);
    s.trim()
}

/// Escape Lucene special characters for Neo4j full-text index queries.
///
/// Escapes `+ - ! ( ) { } [ ] ^ " ~ * ? : \ /` and the operators `&&` and `||`.
/// The word operators `AND`, `OR` and `NOT` are lowercased, which the parser
/// reads as plain terms.
pub fn lucene_sanitize(s: &str) -> String {
    const SPECIAL: &[char] = &[
        '+', '-', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
    ];

    let mut out = String::with_capacity(s.len() * 2);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' | '|' if chars.peek() == Some(&c) => {
                chars.next();
                out.push('\\');
                out.push(c);
                out.push(c);
            }
            c if SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    boolean_operator_re()
        .replace_all(&out, |caps: &regex::Captures| caps[1].to_lowercase())
        .into_owned()
}
