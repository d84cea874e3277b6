//! Route pattern parsing.
//!
//! # Responsibilities
//! - Split request paths and route patterns into segments (one shared function)
//! - Classify pattern segments as static, wildcard, catch-all or regex
//! - Produce the canonical pattern text used for route hashing
//!
//! # Syntax
//! ```text
//! users          static literal
//! {id}           wildcard, one segment, binds `id`
//! {path*}        catch-all, one or more remaining segments, must be last
//! {id:[0-9]+}    regex anchored to the whole segment, binds `id`
//! {:[0-9]+}      regex without a binding
//! ```

use std::fmt;

use regex::Regex;

use crate::routing::error::RouteError;

/// Splits a path into its non-empty segments.
///
/// Trailing and repeated slashes are insignificant: `/a//b/` yields `["a", "b"]`
/// and `/` yields no segments at all.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A single classified segment of a route pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Literal text that must equal the path segment.
    Static(String),
    /// Matches any one segment.
    Wildcard { name: String },
    /// Matches the rest of the path.
    CatchAll { name: String },
    /// Matches one segment accepted by the regex.
    Regex {
        name: Option<String>,
        source: String,
        regex: Regex,
    },
}

impl Segment {
    /// Name of the parameter this segment binds, if any.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Wildcard { name } | Segment::CatchAll { name } => Some(name),
            Segment::Regex { name, .. } => name.as_deref(),
        }
    }

    /// Whether the tree walk produces a captured value for this segment.
    pub fn captures(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => write!(f, "{}", s),
            Segment::Wildcard { name } => write!(f, "{{{}}}", name),
            Segment::CatchAll { name } => write!(f, "{{{}*}}", name),
            Segment::Regex { name, source, .. } => {
                write!(f, "{{{}:{}}}", name.as_deref().unwrap_or(""), source)
            }
        }
    }
}

/// A parsed route pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a pattern string such as `/users/{id}/files/{path*}`.
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
        }

        let mut parsed: Vec<Segment> = Vec::new();
        for raw in segments(pattern) {
            if matches!(parsed.last(), Some(Segment::CatchAll { .. })) {
                return Err(RouteError::CatchAllNotLast(pattern.to_string()));
            }
            parsed.push(classify(raw)?);
        }

        let mut seen: Vec<&str> = Vec::new();
        for name in parsed.iter().filter_map(Segment::param_name) {
            if seen.contains(&name) {
                return Err(RouteError::DuplicateParam(name.to_string()));
            }
            seen.push(name);
        }

        Ok(Self { segments: parsed })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names bound by this pattern, in pattern order.
    ///
    /// Anonymous regex segments appear as `None` so the list lines up with
    /// the captures emitted by the tree walk.
    pub fn param_slots(&self) -> Vec<Option<String>> {
        self.segments
            .iter()
            .filter(|s| s.captures())
            .map(|s| s.param_name().map(str::to_string))
            .collect()
    }

    /// Number of named parameters this pattern writes into a request context.
    pub fn param_count(&self) -> usize {
        self.segments.iter().filter_map(Segment::param_name).count()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

fn classify(raw: &str) -> Result<Segment, RouteError> {
    let inner = match raw.strip_prefix('{') {
        Some(rest) => rest
            .strip_suffix('}')
            .ok_or_else(|| RouteError::UnbalancedBrace(raw.to_string()))?,
        None => {
            if raw.contains('{') || raw.contains('}') {
                return Err(RouteError::UnbalancedBrace(raw.to_string()));
            }
            return Ok(Segment::Static(raw.to_string()));
        }
    };

    if let Some((name, source)) = inner.split_once(':') {
        if source.is_empty() {
            return Err(RouteError::EmptyRegex(raw.to_string()));
        }
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| RouteError::InvalidRegex {
            segment: raw.to_string(),
            source: e,
        })?;
        let name = if name.is_empty() {
            None
        } else {
            Some(valid_name(name, raw)?)
        };
        return Ok(Segment::Regex {
            name,
            source: source.to_string(),
            regex,
        });
    }

    if let Some(name) = inner.strip_suffix('*') {
        return Ok(Segment::CatchAll {
            name: valid_name(name, raw)?,
        });
    }

    Ok(Segment::Wildcard {
        name: valid_name(inner, raw)?,
    })
}

fn valid_name(name: &str, raw: &str) -> Result<String, RouteError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(name.to_string())
    } else {
        Err(RouteError::InvalidParamName(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_ignore_empty_parts() {
        assert_eq!(segments("/a//b/").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(segments("/").count(), 0);
        assert_eq!(segments("").count(), 0);
    }

    #[test]
    fn test_classify_kinds() {
        let p = Pattern::parse("/users/{id}/n/{num:[0-9]+}/{:x+}/{rest*}").unwrap();
        let kinds: Vec<_> = p.segments().iter().map(|s| s.to_string()).collect();
        assert_eq!(kinds, vec!["users", "{id}", "n", "{num:[0-9]+}", "{:x+}", "{rest*}"]);
        assert_eq!(p.param_count(), 3);
        assert_eq!(
            p.param_slots(),
            vec![Some("id".into()), Some("num".into()), None, Some("rest".into())]
        );
    }

    #[test]
    fn test_regex_is_anchored() {
        let p = Pattern::parse("/{n:[0-9]+}").unwrap();
        match &p.segments()[0] {
            Segment::Regex { regex, .. } => {
                assert!(regex.is_match("42"));
                assert!(!regex.is_match("a42"));
                assert!(!regex.is_match("42a"));
            }
            other => panic!("unexpected segment {:?}", other),
        }
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(Pattern::parse("/").unwrap().to_string(), "/");
        assert_eq!(Pattern::parse("/a/{b}/").unwrap().to_string(), "/a/{b}");
    }

    #[test]
    fn test_rejects_bad_patterns() {
        assert!(matches!(Pattern::parse("a/b"), Err(RouteError::MissingLeadingSlash(_))));
        assert!(matches!(Pattern::parse("/{a*}/b"), Err(RouteError::CatchAllNotLast(_))));
        assert!(matches!(Pattern::parse("/{a}/{a}"), Err(RouteError::DuplicateParam(_))));
        assert!(matches!(Pattern::parse("/{a"), Err(RouteError::UnbalancedBrace(_))));
        assert!(matches!(Pattern::parse("/x{a}"), Err(RouteError::UnbalancedBrace(_))));
        assert!(matches!(Pattern::parse("/{}"), Err(RouteError::InvalidParamName(_))));
        assert!(matches!(Pattern::parse("/{a:}"), Err(RouteError::EmptyRegex(_))));
        assert!(matches!(Pattern::parse("/{a:(}"), Err(RouteError::InvalidRegex { .. })));
    }
}
