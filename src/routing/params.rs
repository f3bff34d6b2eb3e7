//! Token values handed to route handlers.

use std::fmt;

/// Value bound to a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// A path segment was supplied (possibly empty).
    Present(String),
    /// The request path ended before this token.
    Absent,
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Present(value) => Some(value),
            TokenValue::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TokenValue::Absent)
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Present(value.to_string())
    }
}

impl From<Option<&str>> for TokenValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(TokenValue::Absent, TokenValue::from)
    }
}

/// Ordered token-name to value mapping.
///
/// Names keep their first insertion position; inserting a name again
/// replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, TokenValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace the value bound to `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: TokenValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a token. `None` means the route declares no such token.
    pub fn get(&self, name: &str) -> Option<&TokenValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// The supplied value of a token, if the token exists and is present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TokenValue::as_str)
    }

    /// True when the route declares `name` but the request omitted it.
    pub fn is_absent(&self, name: &str) -> bool {
        self.get(name).is_some_and(TokenValue::is_absent)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                TokenValue::Present(v) => write!(f, "{}={:?}", name, v)?,
                TokenValue::Absent => write!(f, "{}=<absent>", name)?,
            }
        }
        write!(f, "}}")
    }
}
