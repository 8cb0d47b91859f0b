//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     routes file
//!     → loader.rs (cache staleness check, line iteration)
//!     → grammar.rs (three-field grammar → Route)
//!     → pattern.rs (URI → typed segments)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (method, uri)
//!     → finder.rs (first matching route)
//!     → pattern.rs (segment matching, captures)
//!     → Return: RouteMatch or RouteNotFound
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (typed segment matcher)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by definition)

pub mod finder;
pub mod grammar;
pub mod loader;
pub mod pattern;
pub mod route;

pub use finder::{RouteMatch, RouteTable};
pub use grammar::{compile, define, GrammarError, GrammarFault};
pub use loader::{LoadedRoutes, RouteLoader, RouteOrigin};
pub use pattern::{Segment, UriPattern};
pub use route::{MethodPattern, Route, Target};
