//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check fallback and login endpoints are dispatchable
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{CacheBackend, Endpoint, RouterConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: method `{method}` is empty or contains whitespace")]
    Method { field: &'static str, method: String },

    #[error("{field}: URI `{uri}` must start with `/`")]
    Uri { field: &'static str, uri: String },

    #[error("dispatch.base_path `{0}` must be empty or start with `/`")]
    BasePath(String),

    #[error("routes.file must not be empty")]
    RoutesFile,

    #[error("cache.path must not be empty when the file cache is enabled")]
    CachePath,

    #[error("server.request_timeout_secs must be greater than 0")]
    Timeout,

    #[error("{field}: `{value}` is not a socket address")]
    Address { field: &'static str, value: String },
}

/// Check `config`, collecting every problem.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.file.as_os_str().is_empty() {
        errors.push(ValidationError::RoutesFile);
    }

    check_endpoint("dispatch.fallback", &config.dispatch.fallback, &mut errors);
    if let Some(login) = &config.dispatch.login {
        check_endpoint("dispatch.login", login, &mut errors);
    }

    let base_path = &config.dispatch.base_path;
    if !base_path.is_empty() && !base_path.starts_with('/') {
        errors.push(ValidationError::BasePath(base_path.clone()));
    }

    if config.cache.enabled
        && config.cache.backend == CacheBackend::File
        && config.cache.path.as_os_str().is_empty()
    {
        errors.push(ValidationError::CachePath);
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Timeout);
    }

    check_address("server.bind_address", &config.server.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(field: &'static str, endpoint: &Endpoint, errors: &mut Vec<ValidationError>) {
    if endpoint.method.is_empty() || endpoint.method.contains(char::is_whitespace) {
        errors.push(ValidationError::Method {
            field,
            method: endpoint.method.clone(),
        });
    }
    if !endpoint.uri.starts_with('/') {
        errors.push(ValidationError::Uri {
            field,
            uri: endpoint.uri.clone(),
        });
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field,
            value: value.to_string(),
        });
    }
}
