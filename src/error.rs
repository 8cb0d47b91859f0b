//! Error types shared by the routing engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::routing::grammar::GrammarError;

/// Result type for routing and dispatch operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors surfaced by compilation, lookup and dispatch.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route definition does not follow the `<METHOD> <URI> <Type->method>` grammar.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The route definition file is missing or unreadable.
    #[error("route source {} is unavailable: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No route structurally matches the request.
    #[error("no route matches {method} {uri}")]
    RouteNotFound { method: String, uri: String },

    /// The authorizer refused the resolved controller.
    #[error("access to {controller} rejected: {reason}")]
    AuthorizationRejected { controller: String, reason: String },

    /// The controller needs more dependencies than were configured.
    #[error("controller {controller} requires {required} dependencies, {provided} provided")]
    Construction {
        controller: String,
        required: usize,
        provided: usize,
    },

    /// A dependency at the given position has an unexpected type.
    #[error("dependency {position} of {controller} is not a {expected}")]
    DependencyType {
        controller: String,
        position: usize,
        expected: &'static str,
    },

    /// No factory is registered under the qualified controller name.
    #[error("controller {name} is not registered")]
    UnknownController { name: String },

    /// The controller has no action with this name.
    #[error("controller {controller} has no action {action}")]
    UnknownAction { controller: String, action: String },

    /// The action itself failed.
    #[error("handler failed: {message}")]
    Handler { message: String },
}

impl RouterError {
    /// Create a RouteNotFound error
    #[inline]
    pub fn not_found(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::RouteNotFound {
            method: method.into(),
            uri: uri.into(),
        }
    }

    /// Create an AuthorizationRejected error
    #[inline]
    pub fn rejected(controller: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AuthorizationRejected {
            controller: controller.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownAction error
    #[inline]
    pub fn unknown_action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::UnknownAction {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// Create a Handler error
    #[inline]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }

    /// True for the outcome the fallback route recovers from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }

    /// True for the outcome the login fallback recovers from.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::AuthorizationRejected { .. })
    }
}
