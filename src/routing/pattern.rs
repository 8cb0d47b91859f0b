//! URI pattern matching.
//!
//! # Responsibilities
//! - Split a URI pattern into typed segments
//! - Match request paths segment by segment
//! - Collect placeholder captures left to right
//!
//! # Design Decisions
//! - Segment counts must be equal (no catch-all segment)
//! - Literal matching is case-sensitive
//! - `[numeric]` is only checked against request input, never at compile time
//! - No regex to guarantee O(n) matching

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::routing::grammar::GrammarFault;

const STRING_PLACEHOLDER: &str = "[string]";
const NUMERIC_PLACEHOLDER: &str = "[numeric]";

/// One `/`-delimited piece of a URI pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Must equal the request segment exactly. May be empty (`/` root).
    Literal(String),
    /// `[string]`: any non-empty segment, captured.
    Text,
    /// `[numeric]`: a non-empty run of ASCII digits, captured.
    Numeric,
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, GrammarFault> {
        match raw {
            STRING_PLACEHOLDER => Ok(Self::Text),
            NUMERIC_PLACEHOLDER => Ok(Self::Numeric),
            literal if literal.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Ok(Self::Literal(literal.to_string()))
            }
            other => Err(GrammarFault::Segment(other.to_string())),
        }
    }

    /// Returns true for the capturing variants.
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }

    fn accepts(&self, input: &str) -> bool {
        match self {
            Self::Literal(expected) => expected == input,
            Self::Text => !input.is_empty(),
            Self::Numeric => !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Text => f.write_str(STRING_PLACEHOLDER),
            Self::Numeric => f.write_str(NUMERIC_PLACEHOLDER),
        }
    }
}

/// A compiled URI pattern with an optional `#anchor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UriPattern {
    segments: Vec<Segment>,
    anchor: Option<String>,
}

impl UriPattern {
    /// Compile the URI field of a route line, e.g. `/users/[numeric]#detail`.
    pub fn parse(raw: &str) -> Result<Self, GrammarFault> {
        let (path, anchor) = match raw.split_once('#') {
            Some((path, anchor)) => (path, Some(parse_anchor(anchor)?)),
            None => (raw, None),
        };

        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| GrammarFault::Uri(raw.to_string()))?;

        let segments = rest
            .split('/')
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments, anchor })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub(crate) fn set_anchor(&mut self, anchor: String) {
        self.anchor = Some(anchor);
    }

    /// Returns true if any segment captures.
    pub fn has_placeholders(&self) -> bool {
        self.segments.iter().any(Segment::is_placeholder)
    }

    /// Match a request URI, returning the captured segments on success.
    ///
    /// A `#fragment` on the input is ignored. Inputs without a leading `/`
    /// never match.
    pub fn captures(&self, uri: &str) -> Option<Vec<String>> {
        let path = uri.split_once('#').map_or(uri, |(path, _)| path);
        let rest = path.strip_prefix('/')?;

        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            if !segment.accepts(part) {
                return None;
            }
            if segment.is_placeholder() {
                captured.push(part.to_string());
            }
        }
        Some(captured)
    }

    /// Returns true if the request URI matches.
    pub fn matches(&self, uri: &str) -> bool {
        self.captures(uri).is_some()
    }
}

pub(crate) fn parse_anchor(raw: &str) -> Result<String, GrammarFault> {
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(raw.to_string())
    } else {
        Err(GrammarFault::Anchor(raw.to_string()))
    }
}

impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        if let Some(anchor) = &self.anchor {
            write!(f, "#{}", anchor)?;
        }
        Ok(())
    }
}
