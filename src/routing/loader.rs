//! Route definition loading with cache staleness checks.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::cache::{CacheEntry, RouteCache};
use crate::error::{Result, RouterError};
use crate::observability::metrics;
use crate::routing::grammar::{self, GrammarError, GrammarFault};
use crate::routing::route::Route;

/// Where a loaded table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOrigin {
    /// Caching disabled or store unusable; parsed without touching the cache.
    Direct,
    /// Cache was empty; parsed and written.
    Parsed,
    /// Cache entry was current; served unchanged.
    Cache,
    /// Cache entry was stale or unreadable; parsed and overwritten.
    Refreshed,
}

impl RouteOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Parsed => "parsed",
            Self::Cache => "cache",
            Self::Refreshed => "refreshed",
        }
    }
}

/// Result of [`RouteLoader::load`].
#[derive(Debug, Clone)]
pub struct LoadedRoutes {
    pub routes: Vec<Route>,
    pub origin: RouteOrigin,
}

/// Loads route definition files, consulting a cache when enabled.
#[derive(Debug, Clone, Default)]
pub struct RouteLoader {
    cache: Option<Arc<dyn RouteCache>>,
    caching: bool,
}

impl RouteLoader {
    /// A loader that always parses.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader backed by `cache`, enabled.
    pub fn with_cache(cache: Arc<dyn RouteCache>) -> Self {
        Self {
            cache: Some(cache),
            caching: true,
        }
    }

    pub fn set_caching(&mut self, enabled: bool) {
        self.caching = enabled;
    }

    pub fn cache(&self) -> Option<&Arc<dyn RouteCache>> {
        self.cache.as_ref()
    }

    fn active_cache(&self) -> Option<&dyn RouteCache> {
        self.cache
            .as_deref()
            .filter(|cache| self.caching && cache.useable())
    }

    /// Load the routes defined in `path`.
    ///
    /// The source file is checked before anything else, so a missing file
    /// fails even when a cache entry exists.
    pub fn load(&self, path: &Path) -> Result<LoadedRoutes> {
        let modified = modified_at(path)?;

        let Some(cache) = self.active_cache() else {
            return Ok(self.finish(path, parse_file(path)?, RouteOrigin::Direct));
        };

        if !cache.filled() {
            let routes = parse_file(path)?;
            store(cache, modified, &routes);
            return Ok(self.finish(path, routes, RouteOrigin::Parsed));
        }

        match cache.read() {
            Ok(entry) if entry.is_fresh(modified) => {
                Ok(self.finish(path, entry.routes, RouteOrigin::Cache))
            }
            Ok(entry) => {
                tracing::info!(
                    path = %path.display(),
                    cached = ?entry.timestamp,
                    current = ?modified,
                    "Route cache is stale"
                );
                let routes = parse_file(path)?;
                store(cache, modified, &routes);
                Ok(self.finish(path, routes, RouteOrigin::Refreshed))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Route cache unreadable, parsing directly");
                let routes = parse_file(path)?;
                store(cache, modified, &routes);
                Ok(self.finish(path, routes, RouteOrigin::Refreshed))
            }
        }
    }

    fn finish(&self, path: &Path, routes: Vec<Route>, origin: RouteOrigin) -> LoadedRoutes {
        tracing::info!(
            path = %path.display(),
            routes = routes.len(),
            origin = origin.as_str(),
            "Routes loaded"
        );
        metrics::record_route_load(origin.as_str());
        LoadedRoutes { routes, origin }
    }
}

fn store(cache: &dyn RouteCache, modified: SystemTime, routes: &[Route]) {
    let entry = CacheEntry::new(modified, routes.to_vec());
    if let Err(e) = cache.write(&entry) {
        tracing::warn!(error = %e, "Failed to write route cache");
    }
}

/// Current modification time of `path`, queried from the filesystem.
///
/// Fails unless `path` is a regular file this process can open for reading.
pub fn modified_at(path: &Path) -> Result<SystemTime> {
    let unavailable = |source| RouterError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(unavailable)?;
    if !metadata.is_file() {
        return Err(unavailable(std::io::Error::new(
            ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    File::open(path).map_err(unavailable)?;
    metadata.modified().map_err(unavailable)
}

/// Read and compile every route in `path`, failing on the first bad line.
///
/// A file that is not UTF-8 is a malformed definition, not a missing one.
pub fn parse_file(path: &Path) -> Result<Vec<Route>> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::InvalidData => {
            RouterError::Grammar(GrammarError::new(GrammarFault::Encoding, path.display().to_string()))
        }
        _ => RouterError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_source(&content)
}

/// Compile route definitions from text.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_source(content: &str) -> Result<Vec<Route>> {
    let mut routes = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let route = grammar::compile(trimmed).map_err(|e| e.at_line(index + 1))?;
        routes.push(route);
    }
    Ok(routes)
}
