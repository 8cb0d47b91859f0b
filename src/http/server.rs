//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all dispatch handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Hand (method, path) to the routing engine on the blocking pool
//! - Swap in reloaded route tables without dropping requests

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::loader::build_loader;
use crate::config::watcher::RoutesWatcher;
use crate::config::{RouterConfig, ServerConfig};
use crate::dispatch::Router as DispatchRouter;
use crate::http::request::{request_id, MakeRequestUuid};
use crate::http::response::{self, PostProcessor};
use crate::observability::metrics;
use crate::routing::Route;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ArcSwap<DispatchRouter>>,
    pub post_processor: Option<Arc<dyn PostProcessor>>,
}

/// HTTP front end for a dispatch router.
pub struct HttpServer {
    app: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server around `router`.
    pub fn new(router: DispatchRouter, config: &ServerConfig) -> Self {
        Self::with_post_processor(router, config, None)
    }

    /// Like [`HttpServer::new`], transforming every action value first.
    pub fn with_post_processor(
        router: DispatchRouter,
        config: &ServerConfig,
        post_processor: Option<Arc<dyn PostProcessor>>,
    ) -> Self {
        let state = AppState {
            router: Arc::new(ArcSwap::from_pointee(router)),
            post_processor,
        };
        let app = Self::build_router(config, state.clone());
        Self { app, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Handle to the active router, for swapping tables from outside.
    pub fn router_handle(&self) -> Arc<ArcSwap<DispatchRouter>> {
        self.state.router.clone()
    }

    /// Run the server until `shutdown` resolves.
    ///
    /// Route tables received on `route_updates` replace the active table.
    pub async fn run<F>(
        self,
        listener: TcpListener,
        mut route_updates: mpsc::UnboundedReceiver<Vec<Route>>,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let handle = self.state.router.clone();
        tokio::spawn(async move {
            while let Some(routes) = route_updates.recv().await {
                let count = routes.len();
                let next = handle.load().with_routes(routes);
                handle.store(Arc::new(next));
                tracing::info!(routes = count, "Route table swapped");
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serve `router` on `listener` as described by `config` until `shutdown` resolves.
///
/// Installs the metrics exporter and the route file watcher when enabled.
pub async fn serve<F>(
    listener: TcpListener,
    router: DispatchRouter,
    config: &RouterConfig,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher stops when dropped, so it lives until the server returns.
    let (route_updates, _watcher) = if config.server.watch_routes {
        let (watcher, updates) = RoutesWatcher::new(&config.routes.file, build_loader(&config.cache));
        let guard = watcher.run().map_err(std::io::Error::other)?;
        (updates, Some(guard))
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (updates, None)
    };

    HttpServer::new(router, &config.server)
        .run(listener, route_updates, shutdown)
        .await
}

/// Catch-all handler: dispatch the request path through the routing engine.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers).to_string();
    let router = state.router.load_full();
    let method = method.as_str().to_string();
    let path = uri.path().to_string();

    tracing::debug!(request_id = %request_id, method = %method, path = %path, "Dispatching request");

    let (m, p) = (method.clone(), path.clone());
    let outcome = tokio::task::spawn_blocking(move || router.execute(&m, &p)).await;

    match outcome {
        Ok(Ok(value)) => {
            let value = match &state.post_processor {
                Some(post) => post.process(value),
                None => value,
            };
            response::render(value)
        }
        Ok(Err(e)) => {
            if response::status_for(&e).is_server_error() {
                tracing::error!(request_id = %request_id, method = %method, path = %path, error = %e, "Dispatch failed");
            } else {
                tracing::warn!(request_id = %request_id, method = %method, path = %path, error = %e, "Dispatch refused");
            }
            response::render_error(&e)
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Action panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
