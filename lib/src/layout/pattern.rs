use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{ConfigError, Result};
use super::validate::is_pattern_char;

/// A glob over page paths such as `/documentation/1.x/*`.
///
/// Patterns and the paths they're matched against are normalized to begin
/// with a `/`. A `*` matches any run of characters, `/` included, and `?`
/// matches exactly one character that isn't a `/`.
#[derive(derive_more::Debug, Clone, PartialEq, Eq, Hash)]
#[debug("{pattern:?}")]
pub struct PagePattern {
    pattern: Arc<str>,
    literal: bool,
}

impl PagePattern {
    /// ```rust
    /// use siteconf::layout::PagePattern;
    ///
    /// let pattern = PagePattern::new("documentation/1.x/*").unwrap();
    /// assert_eq!(pattern.as_str(), "/documentation/1.x/*");
    ///
    /// assert!(PagePattern::new("").is_err());
    /// assert!(PagePattern::new("/has space/*").is_err());
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        let invalid = |reason| ConfigError::InvalidPattern { pattern: pattern.into(), reason };
        if pattern.is_empty() {
            return Err(invalid("pattern is empty").into());
        }

        if !pattern.bytes().all(|b| is_pattern_char(&b)) {
            return Err(invalid("pattern contains characters not allowed in a page path").into());
        }

        let literal = memchr::memchr2(b'*', b'?', pattern.as_bytes()).is_none();
        let pattern = match pattern.starts_with('/') {
            true => Arc::from(pattern),
            false => Arc::from(format!("/{pattern}")),
        };

        Ok(PagePattern { pattern, literal })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if `self` contains no wildcards.
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// ```rust
    /// use siteconf::layout::PagePattern;
    ///
    /// let pattern = PagePattern::new("/documentation/1.x/*").unwrap();
    /// assert!(pattern.matches("/documentation/1.x/index.html"));
    /// assert!(pattern.matches("documentation/1.x/setup/intro.html"));
    /// assert!(!pattern.matches("/documentation/2.x/index.html"));
    /// assert!(!pattern.matches("/documentation/1.x"));
    ///
    /// let pattern = PagePattern::new("/blog/????.html").unwrap();
    /// assert!(pattern.matches("/blog/2018.html"));
    /// assert!(!pattern.matches("/blog/20/8.html"));
    /// ```
    pub fn matches(&self, path: &str) -> bool {
        let path = path.strip_prefix('/').unwrap_or(path);
        let pattern = &self.pattern.as_bytes()[1..];
        if self.literal {
            return pattern == path.as_bytes();
        }

        wildcard_match(pattern, path.as_bytes())
    }
}

/// Iterative glob matching with single-star backtracking.
fn wildcard_match(pattern: &[u8], path: &[u8]) -> bool {
    let (mut p, mut s) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while s < path.len() {
        match pattern.get(p) {
            Some(b'*') => {
                backtrack = Some((p, s));
                p += 1;
            }
            Some(b'?') if path[s] != b'/' => {
                p += 1;
                s += 1;
            }
            Some(&c) if c != b'?' && c == path[s] => {
                p += 1;
                s += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    s = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            }
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}

impl fmt::Display for PagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl Serialize for PagePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        PagePattern::new(pattern).unwrap().matches(path)
    }

    #[test]
    fn literal_patterns() {
        assert!(PagePattern::new("/about.html").unwrap().is_literal());
        assert!(matches("/about.html", "/about.html"));
        assert!(matches("about.html", "about.html"));
        assert!(!matches("/about.html", "/about.htm"));
        assert!(!matches("/about.html", "/about.html/x"));
    }

    #[test]
    fn star_crosses_segments() {
        assert!(matches("/documentation/1.x/*", "/documentation/1.x/"));
        assert!(matches("/documentation/1.x/*", "/documentation/1.x/a/b/c.html"));
        assert!(matches("/*.html", "/a/b.html"));
        assert!(!matches("/*.html", "/a/b.htm"));
        assert!(matches("/admin/*/edit*", "/admin/users/edit.html"));
        assert!(!matches("/admin/*/edit*", "/admin/users/view.html"));
        assert!(matches("*", "/anything/at/all"));
    }

    #[test]
    fn question_mark_is_one_segment_char() {
        assert!(matches("/v?/index.html", "/v1/index.html"));
        assert!(!matches("/v?/index.html", "/v10/index.html"));
        assert!(!matches("/a?b", "/a/b"));
    }

    #[test]
    fn backtracking() {
        assert!(matches("/*a*b", "/xaxxab"));
        assert!(matches("/**", "/"));
        assert!(!matches("/*ab", "/xaxb"));
    }

    #[test]
    fn invalid_patterns() {
        for bad in ["", "/a b", "/tab\t", "/ünïcode/*", "/quote\""] {
            let err = PagePattern::new(bad).unwrap_err();
            assert!(matches!(err.config_error(), Some(ConfigError::InvalidPattern { .. })), "{bad}");
        }
    }
}
