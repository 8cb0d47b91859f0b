//! Route definition compiler, matcher and dispatcher.
//!
//! Route files contain one `<METHOD> <URI-PATTERN> <Type->method>` line per
//! route. They are compiled into a [`RouteTable`], optionally cached keyed by
//! the file's modification time, and dispatched to controllers by
//! [`Router`].

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use dispatch::{Controller, Dependencies, Router};
pub use error::{Result, RouterError};
pub use http::HttpServer;
pub use routing::{Route, RouteLoader, RouteTable};
