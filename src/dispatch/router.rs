//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve (method, uri) to a route, falling back to a default endpoint
//! - Construct the target controller from the dependency vector
//! - Challenge the controller with the authorizer, switching to the login
//!   endpoint on rejection
//! - Invoke the action with the captured parameters
//!
//! # Design Decisions
//! - Exactly one fallback attempt per failure kind, never a loop
//! - The login controller is not re-verified
//! - Immutable after construction; shared via Arc

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use serde_json::Value;

use crate::config::schema::{DispatchConfig, Endpoint};
use crate::dispatch::authorizer::Authorizer;
use crate::dispatch::controller::{
    Controller, ControllerFactory, ControllerInstance, ControllerRegistry, Dependencies, Injector,
};
use crate::error::{Result, RouterError};
use crate::observability::metrics;
use crate::routing::{self, Route, RouteLoader, RouteMatch, RouteTable};

/// A route resolved to a live controller, ready to invoke.
#[derive(Debug)]
pub struct Resolved<'r> {
    pub route: &'r Route,
    pub controller: ControllerInstance,
    pub action: String,
    pub params: Option<Vec<String>>,
}

impl Resolved<'_> {
    /// Call the action, passing parameters only if the route captured any.
    pub fn invoke(&self) -> Result<Value> {
        self.controller.call(&self.action, self.params.as_deref())
    }
}

/// Routes requests to controller actions.
#[derive(Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    controllers: Arc<ControllerRegistry>,
    dependencies: Arc<Dependencies>,
    authorizer: Option<Arc<dyn Authorizer>>,
    settings: DispatchConfig,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn settings(&self) -> &DispatchConfig {
        &self.settings
    }

    /// A router sharing everything but the route table.
    pub fn with_routes(&self, routes: Vec<Route>) -> Self {
        Self {
            table: Arc::new(RouteTable::from(routes)),
            ..self.clone()
        }
    }

    /// Resolve, authorize and invoke. The action's value is returned verbatim.
    pub fn execute(&self, method: &str, uri: &str) -> Result<Value> {
        let start = Instant::now();
        let result = self.dispatch(method, uri);
        let outcome = match &result {
            Ok(_) => "ok",
            Err(RouterError::RouteNotFound { .. }) => "not_found",
            Err(RouterError::AuthorizationRejected { .. }) => "rejected",
            Err(_) => "error",
        };
        metrics::record_dispatch(method, outcome, start);
        result
    }

    fn dispatch(&self, method: &str, uri: &str) -> Result<Value> {
        let mut resolved = self.resolve(method, uri)?;

        if let Some(authorizer) = &self.authorizer {
            if let Err(rejection) = authorizer.verify(&resolved.controller) {
                let Some(login) = &self.settings.login else {
                    return Err(rejection);
                };
                tracing::warn!(
                    controller = resolved.controller.type_name(),
                    error = %rejection,
                    login = %login,
                    "Authorization failed, dispatching to login route"
                );
                resolved = self.resolve(&login.method, &login.uri)?;
            }
        }

        tracing::debug!(
            route = %resolved.route,
            controller = resolved.controller.type_name(),
            action = %resolved.action,
            "Invoking action"
        );
        resolved.invoke()
    }

    /// Find the route for a request and build its controller.
    pub fn resolve(&self, method: &str, uri: &str) -> Result<Resolved<'_>> {
        let found = self.locate(method, uri)?;
        let route = found.route;
        let target = route.target();

        let name = target.qualified(&self.settings.namespace);
        let controller = self.controllers.construct(&name, &self.dependencies)?;

        Ok(Resolved {
            route,
            controller,
            action: target.action().to_string(),
            params: found.into_params(),
        })
    }

    /// Find the route for a request, retrying once with the fallback endpoint.
    pub fn locate(&self, method: &str, uri: &str) -> Result<RouteMatch<'_>> {
        let path = self.strip_base_path(uri);
        match self.table.find_route(method, path) {
            Err(e) if e.is_not_found() => {
                let fallback = &self.settings.fallback;
                tracing::debug!(method, uri, fallback = %fallback, "No route matched, trying fallback");
                self.table
                    .find_route(&fallback.method, &fallback.uri)
                    .map_err(|_| RouterError::not_found(method, uri))
            }
            other => other,
        }
    }

    fn strip_base_path<'u>(&self, uri: &'u str) -> &'u str {
        let base = self.settings.base_path.trim_end_matches('/');
        if base.is_empty() {
            return uri;
        }
        match uri.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with('#') => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => uri,
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("controllers", &self.controllers.len())
            .field("dependencies", &self.dependencies.len())
            .field("authorizer", &self.authorizer.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Collects configuration for a [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    table: RouteTable,
    controllers: ControllerRegistry,
    dependencies: Dependencies,
    authorizer: Option<Arc<dyn Authorizer>>,
    settings: DispatchConfig,
}

impl RouterBuilder {
    /// Append compiled routes.
    pub fn routes(mut self, routes: Vec<Route>) -> Self {
        for route in routes {
            self.table.add_route(route);
        }
        self
    }

    /// Compile and append a single route.
    pub fn route(mut self, method: &str, uri: &str, target: &str) -> Result<Self> {
        self.table.add_route(routing::define(method, uri, target)?);
        Ok(self)
    }

    /// Load and append the routes of a definition file.
    pub fn load_routes(self, loader: &RouteLoader, path: &Path) -> Result<Self> {
        let loaded = loader.load(path)?;
        Ok(self.routes(loaded.routes))
    }

    pub fn settings(mut self, settings: DispatchConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Prefix for controller names in route targets.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.settings.namespace = namespace.into();
        self
    }

    /// Path prefix removed from request URIs before matching.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.settings.base_path = base_path.into();
        self
    }

    pub fn fallback(mut self, endpoint: Endpoint) -> Self {
        self.settings.fallback = endpoint;
        self
    }

    pub fn login_fallback(mut self, endpoint: Endpoint) -> Self {
        self.settings.login = Some(endpoint);
        self
    }

    pub fn dependencies(mut self, dependencies: Dependencies) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Register a factory under a qualified controller name.
    pub fn register(mut self, name: impl Into<String>, factory: ControllerFactory) -> Self {
        self.controllers.register(name, factory);
        self
    }

    /// Register a constructor consuming `arity` dependency positions.
    pub fn controller<F>(self, name: impl Into<String>, arity: usize, build: F) -> Self
    where
        F: Fn(&Injector<'_>) -> Result<Box<dyn Controller>> + Send + Sync + 'static,
    {
        self.register(name, ControllerFactory::new(arity, build))
    }

    pub fn authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }

    pub fn build(self) -> Router {
        Router {
            table: Arc::new(self.table),
            controllers: Arc::new(self.controllers),
            dependencies: Arc::new(self.dependencies),
            authorizer: self.authorizer,
            settings: self.settings,
        }
    }
}
