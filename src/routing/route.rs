//! Compiled route values.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::routing::pattern::UriPattern;

/// Token joining the controller type and action in a route target.
pub const TARGET_SEPARATOR: &str = "->";

/// HTTP method a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodPattern {
    Get,
    Post,
    /// `*`, accepts every method.
    Any,
}

impl MethodPattern {
    /// Parse the method field of a route line. Case-sensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "*" => Some(Self::Any),
            _ => None,
        }
    }

    /// Returns true if a request with `method` is accepted.
    pub fn matches(&self, method: &str) -> bool {
        match self {
            Self::Any => true,
            other => other.as_str() == method,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Any => "*",
        }
    }
}

impl fmt::Display for MethodPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The controller type and action a route resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    controller: String,
    action: String,
}

impl Target {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// Controller type name as written in the route definition.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Action (method) name.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Controller name prefixed by `namespace`, joined with `::`.
    pub fn qualified(&self, namespace: &str) -> String {
        let namespace = namespace.trim_end_matches("::");
        if namespace.is_empty() {
            self.controller.clone()
        } else {
            format!("{}::{}", namespace, self.controller)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.controller, TARGET_SEPARATOR, self.action)
    }
}

/// A compiled route: method pattern, URI pattern and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    method: MethodPattern,
    pattern: UriPattern,
    target: Target,
}

impl Route {
    pub fn new(method: MethodPattern, pattern: UriPattern, target: Target) -> Self {
        Self {
            method,
            pattern,
            target,
        }
    }

    pub fn method(&self) -> MethodPattern {
        self.method
    }

    pub fn pattern(&self) -> &UriPattern {
        &self.pattern
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The `#anchor` given in the definition, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.pattern.anchor()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.pattern, self.target)
    }
}
