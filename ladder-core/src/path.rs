//! Route pattern compilation and path matching.
//!
//! A pattern is a `/`-separated list of literal segments and named parameter
//! segments (`:name`). Compiling it once yields a [`PathMatcher`] that answers,
//! for any request path, either "no match" or a [`PathMatch`] holding the
//! consumed prefix and the captured parameters.
//!
//! # Normalization
//!
//! - One trailing `/` is dropped from both the pattern and the candidate path
//!   (a lone `/` is left alone), so `/foo/` and `/foo` are the same pattern.
//! - The candidate path is split on `/` first, then each segment is
//!   percent-decoded, so an encoded `%2F` stays inside its segment.
//!   A path that does not decode to UTF-8 never matches.
//!
//! # Prefix vs. terminal matching
//!
//! A prefix matcher accepts any path that *starts with* the pattern at a
//! segment boundary: `/foo` matches `/foo`, `/foo/` and `/foo/bar` but not
//! `/foobar`. A terminal matcher requires the whole path to be consumed.
//!
//! # Example
//!
//! ```rust
//! use ladder_core::{MatchOptions, PathMatcher};
//!
//! let matcher = PathMatcher::new("/foo/:a/:b", MatchOptions::prefix());
//! let found = matcher.matches("/foo/apple/xiao%20mi/htc").unwrap();
//!
//! assert_eq!(found.path, "/foo/apple/xiao mi");
//! assert_eq!(found.params.get("a"), Some("apple"));
//! assert_eq!(found.params.get("b"), Some("xiao mi"));
//! assert!(matcher.matches("/foo/apple").is_none());
//! ```

use crate::request::Params;
use percent_encoding::percent_decode_str;

/// Matching behaviour of a compiled pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Require the pattern to consume the entire path.
    pub terminal: bool,
    /// Compare literal segments case-sensitively.
    ///
    /// Off by default: `/Foo` and `/foo` are the same route.
    pub case_sensitive: bool,
}

impl MatchOptions {
    /// Prefix matching, case-insensitive.
    pub const fn prefix() -> Self {
        Self {
            terminal: false,
            case_sensitive: false,
        }
    }

    /// Whole-path matching, case-insensitive.
    pub const fn terminal() -> Self {
        Self {
            terminal: true,
            case_sensitive: false,
        }
    }

    /// Set case sensitivity.
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// The decoded prefix of the path consumed by the pattern.
    ///
    /// Empty when the pattern is the root pattern `/`.
    pub path: String,
    /// Captured parameters, in pattern order.
    pub params: Params,
    /// Byte length of the raw (still encoded) path prefix the pattern
    /// consumed.
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: String,
    segments: Vec<Segment>,
    options: MatchOptions,
}

impl PathMatcher {
    /// Compile `pattern`. A missing leading `/` is implied.
    pub fn new(pattern: &str, options: MatchOptions) -> Self {
        let normalized = trim_trailing_slash(pattern);
        let body = normalized.strip_prefix('/').unwrap_or(normalized);
        let segments = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').map(compile_segment).collect()
        };

        Self {
            pattern: pattern.to_owned(),
            segments,
            options,
        }
    }

    /// The pattern as it was registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The options this matcher was compiled with.
    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Whether the matcher requires whole-path consumption.
    pub fn is_terminal(&self) -> bool {
        self.options.terminal
    }

    /// Declared parameter names, in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Number of path segments a successful match consumes.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Match a request path. Returns `None` when the path does not match.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        let path = trim_trailing_slash(path);
        percent_decode_str(path).decode_utf8().ok()?;
        let rest = match path.strip_prefix('/') {
            Some(rest) => rest,
            None if path.is_empty() => "",
            None => return None,
        };
        let mut parts = (!rest.is_empty())
            .then(|| rest.split('/'))
            .into_iter()
            .flatten();

        let mut consumed = String::with_capacity(rest.len() + 1);
        let mut params = Params::new();
        let mut end = 0;

        for segment in &self.segments {
            let raw = parts.next()?;
            let part = percent_decode_str(raw).decode_utf8().ok()?;
            match segment {
                Segment::Literal(literal) => {
                    if !self.literal_eq(literal, &part) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.push(name.as_str(), &*part);
                }
            }
            consumed.push('/');
            consumed.push_str(&part);
            end += 1 + raw.len();
        }

        if self.options.terminal && parts.next().is_some() {
            return None;
        }

        Some(PathMatch {
            path: consumed,
            params,
            end,
        })
    }

    fn literal_eq(&self, literal: &str, part: &str) -> bool {
        if self.options.case_sensitive {
            literal == part
        } else {
            literal
                .chars()
                .flat_map(char::to_lowercase)
                .eq(part.chars().flat_map(char::to_lowercase))
        }
    }
}

fn compile_segment(segment: &str) -> Segment {
    match segment.strip_prefix(':') {
        Some(name) if is_param_name(name) => Segment::Param(name.to_owned()),
        _ => Segment::Literal(segment.to_owned()),
    }
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Drop one trailing `/`, leaving a lone `/` untouched.
pub(crate) fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// The part of `path` after its first `end` bytes, keeping a leading `/`.
pub(crate) fn remainder(path: &str, end: usize) -> String {
    match path.get(end..) {
        Some(rest) if !rest.is_empty() => rest.to_owned(),
        _ => "/".to_owned(),
    }
}
