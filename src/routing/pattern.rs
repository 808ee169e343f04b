//! Path pattern compilation.
//!
//! # Responsibilities
//! - Tokenize a path pattern into literal and named-capture segments
//! - Match concrete request paths against the compiled form
//! - Capture dynamic segment values as strings
//!
//! # Design Decisions
//! - Patterns are split on `/`; a `:name` token matches exactly one
//!   non-empty segment, never an embedded slash
//! - Trailing slashes are significant: `/products/` and `/products` differ
//! - No regex, so matching stays O(segments) with no compilation cache needed
//! - Captured values are percent-decoded; invalid escapes keep the raw text

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// One token of a compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly (case-sensitive).
    Literal(String),
    /// Matches any single non-empty segment, capturing it under the name.
    Param(String),
}

/// A path pattern tokenized once into a segment sequence.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    segments: Vec<Segment>,
    has_params: bool,
}

impl CompiledPattern {
    /// Compile a pattern such as `/products/:id` into segments.
    pub fn compile(pattern: &str) -> Self {
        let segments: Vec<Segment> = pattern
            .split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(part.to_string()),
            })
            .collect();

        let has_params = segments.iter().any(|s| matches!(s, Segment::Param(_)));
        Self { segments, has_params }
    }

    /// Whether the pattern contains any `:name` captures.
    pub fn has_params(&self) -> bool {
        self.has_params
    }

    /// Match a concrete request path, returning captured parameters.
    ///
    /// Segment counts must agree exactly, so a trailing slash on one side
    /// fails the match (the empty trailing segment has no counterpart).
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), decode_segment(part));
                }
            }
        }
        Some(params)
    }
}

/// Percent-decode a captured segment, falling back to the raw text when the
/// escape sequence is not valid UTF-8.
fn decode_segment(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
