//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::cache::{FileCache, MemoryCache, RouteCache};
use crate::config::schema::{CacheBackend, CacheConfig, RouterConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::RouteLoader;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the cache backend described by `config`.
pub fn build_cache(config: &CacheConfig) -> Arc<dyn RouteCache> {
    match config.backend {
        CacheBackend::File => Arc::new(FileCache::new(config.path.clone())),
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
    }
}

/// Build a route loader honouring the cache settings.
pub fn build_loader(config: &CacheConfig) -> RouteLoader {
    let mut loader = RouteLoader::with_cache(build_cache(config));
    loader.set_caching(config.enabled);
    loader
}
