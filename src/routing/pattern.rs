//! Route pattern parsing.
//!
//! # Responsibilities
//! - Split a pattern such as `/product/{id}/{rev}` into its base path
//!   (`/product/`) and ordered token names (`["id", "rev"]`)
//! - Reject malformed patterns at configuration time
//!
//! # Design Decisions
//! - No nesting, no escaping: a token ends at the first `}` after its `{`
//! - Duplicate token names are rejected
//! - Literal text after the first token is kept for diagnostics only

use thiserror::Error;

/// Errors raised while parsing a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutePatternError {
    #[error("route pattern is empty")]
    Empty,

    #[error("route pattern `{0}` must begin with `/`")]
    MissingLeadingSlash(String),

    #[error("route pattern `{pattern}` has an unmatched `{{` at byte {position}")]
    UnmatchedOpenBrace { pattern: String, position: usize },

    #[error("route pattern `{pattern}` has an unmatched `}}` at byte {position}")]
    UnmatchedCloseBrace { pattern: String, position: usize },

    #[error("route pattern `{pattern}` has a nested `{{` at byte {position}")]
    NestedBrace { pattern: String, position: usize },

    #[error("route pattern `{pattern}` has an empty token at byte {position}")]
    EmptyToken { pattern: String, position: usize },

    #[error("route pattern `{pattern}` declares token `{token}` more than once")]
    DuplicateToken { pattern: String, token: String },
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    pattern: String,
    base_path: String,
    tokens: Vec<String>,
}

impl RoutePattern {
    /// Parse a pattern into its base path and token names.
    pub fn parse(pattern: &str) -> Result<Self, RoutePatternError> {
        if pattern.is_empty() {
            return Err(RoutePatternError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(RoutePatternError::MissingLeadingSlash(pattern.to_string()));
        }

        let mut tokens: Vec<String> = Vec::new();
        let mut first_open = None;
        let mut cursor = 0;

        while let Some(offset) = pattern[cursor..].find(['{', '}']) {
            let start = cursor + offset;
            if pattern.as_bytes()[start] == b'}' {
                return Err(RoutePatternError::UnmatchedCloseBrace {
                    pattern: pattern.to_string(),
                    position: start,
                });
            }

            let end = match pattern[start + 1..].find('}') {
                Some(len) => start + 1 + len,
                None => {
                    return Err(RoutePatternError::UnmatchedOpenBrace {
                        pattern: pattern.to_string(),
                        position: start,
                    })
                }
            };

            let name = &pattern[start + 1..end];
            if let Some(nested) = name.find('{') {
                return Err(RoutePatternError::NestedBrace {
                    pattern: pattern.to_string(),
                    position: start + 1 + nested,
                });
            }
            if name.is_empty() {
                return Err(RoutePatternError::EmptyToken {
                    pattern: pattern.to_string(),
                    position: start,
                });
            }
            if tokens.iter().any(|t| t == name) {
                return Err(RoutePatternError::DuplicateToken {
                    pattern: pattern.to_string(),
                    token: name.to_string(),
                });
            }

            first_open.get_or_insert(start);
            tokens.push(name.to_string());
            cursor = end + 1;
        }

        let base_path = match first_open {
            Some(start) => pattern[..start].to_string(),
            None => pattern.to_string(),
        };

        Ok(Self {
            pattern: pattern.to_string(),
            base_path,
            tokens,
        })
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Literal prefix up to the first token; the table key.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Token names in declaration order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// True when literal text follows the first token.
    ///
    /// Such text never takes part in matching: every segment after the
    /// base path is bound to a token by position.
    pub fn has_trailing_literals(&self) -> bool {
        self.has_tokens()
            && self.pattern[self.base_path.len()..]
                .split('/')
                .any(|segment| !segment.is_empty() && !is_bare_token(segment))
    }
}

fn is_bare_token(segment: &str) -> bool {
    segment.len() > 2
        && segment.starts_with('{')
        && segment.ends_with('}')
        && !segment[1..].contains('{')
}
