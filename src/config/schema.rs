//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Route definition source.
    pub routes: RoutesConfig,

    /// Controller resolution and fallback endpoints.
    pub dispatch: DispatchConfig,

    /// Compiled route cache.
    pub cache: CacheConfig,

    /// HTTP adapter settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Route definition source.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path to the route definition file.
    pub file: PathBuf,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("routes.txt"),
        }
    }
}

/// A method and URI pair used as a fixed dispatch target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Endpoint {
    pub method: String,
    pub uri: String,
}

impl Endpoint {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("GET", "/")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// Controller resolution and fallback endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Prefix joined to controller names with `::` (empty = none).
    pub namespace: String,

    /// Prefix stripped from request URIs before matching (empty = none).
    pub base_path: String,

    /// Endpoint tried when no route matches (default `GET /`).
    pub fallback: Endpoint,

    /// Endpoint dispatched to when authorization fails.
    pub login: Option<Endpoint>,
}

/// Which cache backend stores compiled routes.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    File,
    Memory,
}

/// Compiled route cache.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable caching.
    pub enabled: bool,

    /// Backing store.
    pub backend: CacheBackend,

    /// Cache file location for the file backend.
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: CacheBackend::File,
            path: PathBuf::from("routerunner-cache.json"),
        }
    }
}

/// HTTP adapter settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Reload routes when the definition file changes.
    pub watch_routes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            watch_routes: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
