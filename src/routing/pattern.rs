//! Path pattern module
//!
//! Parses route patterns such as `/user/:name` and matches request paths
//! against them. A `:name` segment captures exactly one non-empty path
//! segment; every other segment must match literally.

use percent_encoding::percent_decode_str;

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A parsed route pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
        };

        let mut segments = Vec::new();
        for part in rest.split('/') {
            let segment = match part.strip_prefix(':') {
                Some("") => return Err(RouteError::EmptyParam(pattern.to_string())),
                Some(name) => {
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                    {
                        return Err(RouteError::DuplicateParam {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                    Segment::Param(name.to_string())
                }
                None => Segment::Static(part.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a raw (still percent-encoded) request path.
    ///
    /// Returns the captured parameters in pattern order, decoded.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            let decoded = percent_decode_str(part).decode_utf8_lossy();
            match segment {
                Segment::Static(literal) => {
                    if decoded != literal.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if decoded.is_empty() {
                        return None;
                    }
                    params.push((name.clone(), decoded.into_owned()));
                }
            }
        }
        Some(params)
    }

    /// Left-to-right static/param shape, used to rank overlapping matches.
    ///
    /// Compared lexicographically, a static segment outranks a parameter at
    /// the first position where two patterns differ.
    pub fn specificity(&self) -> Vec<bool> {
        self.segments
            .iter()
            .map(|s| matches!(s, Segment::Static(_)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert_eq!(
            PathPattern::parse("user").unwrap_err(),
            RouteError::MissingLeadingSlash("user".to_string())
        );
        assert_eq!(
            PathPattern::parse("/user/:").unwrap_err(),
            RouteError::EmptyParam("/user/:".to_string())
        );
        assert!(matches!(
            PathPattern::parse("/a/:id/b/:id"),
            Err(RouteError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn test_match_root() {
        let root = PathPattern::parse("/").unwrap();
        assert_eq!(root.matches("/"), Some(vec![]));
        assert_eq!(root.matches("/health"), None);
        assert_eq!(root.matches(""), None);
    }

    #[test]
    fn test_match_static() {
        let p = PathPattern::parse("/health").unwrap();
        assert_eq!(p.matches("/health"), Some(vec![]));
        assert_eq!(p.matches("/health/"), None);
        assert_eq!(p.matches("/healthz"), None);
        assert_eq!(p.matches("/health/live"), None);
    }

    #[test]
    fn test_match_param() {
        let p = PathPattern::parse("/user/:name").unwrap();
        assert_eq!(
            p.matches("/user/alice"),
            Some(vec![("name".to_string(), "alice".to_string())])
        );
        assert_eq!(p.matches("/user/"), None);
        assert_eq!(p.matches("/user"), None);
        assert_eq!(p.matches("/user/alice/extra"), None);
    }

    #[test]
    fn test_match_param_is_percent_decoded() {
        let p = PathPattern::parse("/user/:name").unwrap();
        assert_eq!(
            p.matches("/user/john%20doe"),
            Some(vec![("name".to_string(), "john doe".to_string())])
        );
        assert_eq!(
            p.matches("/user/%E6%9D%8E"),
            Some(vec![("name".to_string(), "李".to_string())])
        );
        // An encoded slash stays inside the segment
        assert_eq!(
            p.matches("/user/a%2Fb"),
            Some(vec![("name".to_string(), "a/b".to_string())])
        );
    }

    #[test]
    fn test_specificity_prefers_static() {
        let literal = PathPattern::parse("/user/me").unwrap();
        let param = PathPattern::parse("/user/:name").unwrap();
        assert!(literal.specificity() > param.specificity());
    }
}
