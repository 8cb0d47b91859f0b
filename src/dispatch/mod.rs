//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! (method, uri)
//!     → router.rs (locate route, fallback endpoint on miss)
//!     → controller.rs (registry lookup, positional dependency injection)
//!     → authorizer.rs (verify; login endpoint on rejection)
//!     → Controller::call(action, params)
//!     → serde_json::Value returned verbatim
//! ```

pub mod authorizer;
pub mod controller;
pub mod router;

pub use authorizer::Authorizer;
pub use controller::{
    Controller, ControllerFactory, ControllerInstance, ControllerRegistry, Dependencies, Dependency,
    Injector,
};
pub use router::{Resolved, Router, RouterBuilder};
