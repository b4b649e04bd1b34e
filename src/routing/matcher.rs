//! Path prefix matching.
//!
//! # Responsibilities
//! - Match a request path against a route prefix on segment boundaries
//! - Split the unmatched remainder into percent-decoded context segments
//!
//! # Design Decisions
//! - Matching is case-sensitive
//! - `/api` matches `/api` and `/api/...`, never `/apix`
//! - Prefix `/` matches every path
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. Trailing slashes are dropped
    /// (`/api/` and `/api` are the same prefix); the root stays `/`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: normalize_prefix(&prefix.into()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Length used to rank competing matches.
    pub fn specificity(&self) -> usize {
        if self.prefix == "/" {
            0
        } else {
            self.prefix.len()
        }
    }

    /// Returns the part of `path` after the prefix if the prefix matches.
    pub fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.prefix == "/" {
            return path.starts_with('/').then_some(path);
        }
        let rest = path.strip_prefix(self.prefix.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Split a path remainder into its non-empty segments.
pub fn split_segments(rest: &str) -> Vec<String> {
    rest.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a request path remainder into percent-decoded segments.
///
/// Returns `None` if a segment decodes to a `/` or NUL, since the segment
/// boundaries would then be ambiguous.
pub fn context_segments(rest: &str) -> Option<Vec<String>> {
    rest.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let decoded = decode_segment(s);
            (!decoded.contains(['/', '\0'])).then_some(decoded)
        })
        .collect()
}

fn decode_segment(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes()))
            .into_owned(),
    }
}
