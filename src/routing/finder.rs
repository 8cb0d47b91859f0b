//! Route table and lookup.
//!
//! # Responsibilities
//! - Store compiled routes in definition order
//! - Look up the first route matching a method and URI
//! - Return the match with its captured parameters, or an explicit not-found
//!
//! # Design Decisions
//! - Immutable after the build phase (thread-safe without locks)
//! - O(n) linear scan; definition order is priority
//! - First match wins: a placeholder route declared before a literal route
//!   shadows it

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouterError};
use crate::routing::grammar::{self, GrammarError};
use crate::routing::route::Route;

/// A matched route with extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The matched route.
    pub route: &'a Route,
    captures: Vec<String>,
}

impl<'a> RouteMatch<'a> {
    /// Captured placeholder values, left to right.
    ///
    /// `None` when the route pattern has no placeholders.
    pub fn params(&self) -> Option<&[String]> {
        if self.route.pattern().has_placeholders() {
            Some(&self.captures)
        } else {
            None
        }
    }

    /// Owned copy of [`RouteMatch::params`].
    pub fn into_params(self) -> Option<Vec<String>> {
        if self.route.pattern().has_placeholders() {
            Some(self.captures)
        } else {
            None
        }
    }
}

/// Ordered collection of routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Duplicates are kept.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Replace every route.
    pub fn set_routes(&mut self, routes: Vec<Route>) {
        self.routes = routes;
    }

    /// Compile a route from its three fields and append it.
    pub fn define(&mut self, method: &str, uri: &str, target: &str) -> std::result::Result<(), GrammarError> {
        self.add_route(grammar::define(method, uri, target)?);
        Ok(())
    }

    /// Find the first route matching `method` and `uri`.
    pub fn find_route(&self, method: &str, uri: &str) -> Result<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method().matches(method))
            .find_map(|route| {
                route
                    .pattern()
                    .captures(uri)
                    .map(|captures| RouteMatch { route, captures })
            })
            .ok_or_else(|| RouterError::not_found(method, uri))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }
}

impl From<Vec<Route>> for RouteTable {
    fn from(routes: Vec<Route>) -> Self {
        Self { routes }
    }
}
