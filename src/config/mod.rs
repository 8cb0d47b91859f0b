//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → handed to the RouterBuilder, cache and server at startup
//!
//! On route file change:
//!     watcher.rs detects change
//!     → RouteLoader reloads (cache staleness check)
//!     → new route table sent to the server
//!     → atomic swap of Arc<Router>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::CacheBackend;
pub use schema::CacheConfig;
pub use schema::DispatchConfig;
pub use schema::Endpoint;
pub use schema::RouterConfig;
pub use schema::ServerConfig;
