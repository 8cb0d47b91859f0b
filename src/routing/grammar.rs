//! Route definition grammar.
//!
//! A route line has three fields separated by spaces or tabs:
//!
//! ```text
//! <METHOD> <URI-PATTERN> <Type->method>
//! GET      /users/[numeric]   UserController->show
//! *        /                  HomeController->index#landing
//! ```
//!
//! The line is anchored at both ends: surrounding whitespace is tolerated,
//! extra fields are not.

use std::fmt;
use thiserror::Error;

use crate::routing::pattern::{parse_anchor, UriPattern};
use crate::routing::route::{MethodPattern, Route, Target, TARGET_SEPARATOR};

/// What is wrong with a route definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarFault {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("unsupported method `{0}` (expected GET, POST or *)")]
    Method(String),

    #[error("URI `{0}` must start with `/`")]
    Uri(String),

    #[error("invalid URI segment `{0}`")]
    Segment(String),

    #[error("invalid anchor `{0}`")]
    Anchor(String),

    #[error("target `{0}` must be <Type>->method")]
    Target(String),

    #[error("anchor given on both URI and target")]
    DuplicateAnchor,

    #[error("route definitions must be UTF-8 text")]
    Encoding,
}

/// A route line that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    fault: GrammarFault,
    text: String,
    line: Option<usize>,
}

impl GrammarError {
    pub fn new(fault: GrammarFault, text: impl Into<String>) -> Self {
        Self {
            fault,
            text: text.into(),
            line: None,
        }
    }

    /// Attach the 1-based line number of the definition file.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn fault(&self) -> &GrammarFault {
        &self.fault
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {} in `{}`", line, self.fault, self.text),
            None => write!(f, "{} in `{}`", self.fault, self.text),
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.fault)
    }
}

/// Compile a single route definition line.
pub fn compile(line: &str) -> Result<Route, GrammarError> {
    let text = line.trim();
    compile_fields(text).map_err(|fault| GrammarError::new(fault, text))
}

/// Compile a route from its three fields.
pub fn define(method: &str, uri: &str, target: &str) -> Result<Route, GrammarError> {
    compile(&format!("{} {} {}", method, uri, target))
}

fn compile_fields(text: &str) -> Result<Route, GrammarFault> {
    let fields: Vec<&str> = text
        .split([' ', '\t'])
        .filter(|field| !field.is_empty())
        .collect();

    let [method, uri, target] = fields[..] else {
        return Err(GrammarFault::FieldCount(fields.len()));
    };

    let method = MethodPattern::parse(method)
        .ok_or_else(|| GrammarFault::Method(method.to_string()))?;
    let mut pattern = UriPattern::parse(uri)?;

    let (target, anchor) = match target.split_once('#') {
        Some((target, anchor)) => (target, Some(parse_anchor(anchor)?)),
        None => (target, None),
    };
    if let Some(anchor) = anchor {
        if pattern.anchor().is_some() {
            return Err(GrammarFault::DuplicateAnchor);
        }
        pattern.set_anchor(anchor);
    }

    Ok(Route::new(method, pattern, parse_target(target)?))
}

fn parse_target(raw: &str) -> Result<Target, GrammarFault> {
    let pieces: Vec<&str> = raw.split(TARGET_SEPARATOR).collect();
    match pieces[..] {
        [controller, action] if is_type_identifier(controller) && is_identifier(action) => {
            Ok(Target::new(controller, action))
        }
        _ => Err(GrammarFault::Target(raw.to_string())),
    }
}

fn is_type_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
