//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use serde_json::{json, Value};

use routerunner::cache::{CacheEntry, CacheError, MemoryCache, RouteCache};
use routerunner::dispatch::{Controller, Injector};
use routerunner::RouterError;

/// A unique path under the system temp directory.
pub fn temp_path(extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("routerunner-{}.{}", uuid::Uuid::new_v4(), extension))
}

/// Write a route definition file and return its path.
pub fn write_routes(content: &str) -> PathBuf {
    let path = temp_path("routes");
    fs::write(&path, content).unwrap();
    path
}

pub const APP_ROUTES: &str = "\
# application routes
GET   /                       HomeController->index#landing
GET   /login                  SessionController->login
GET   /users/[numeric]        UserController->show
POST  /users                  UserController->create
*     /items/[string]         ItemController->find
GET   /admin                  AdminController->dashboard
";

/// In-memory user names, injected at position 0.
#[derive(Debug)]
pub struct UserStore {
    pub names: Vec<&'static str>,
}

/// Greeting injected at position 1.
#[derive(Debug)]
pub struct Greeting(pub &'static str);

pub struct HomeController {
    greeting: Arc<Greeting>,
}

impl HomeController {
    /// Needs both dependency positions; position 0 is unused.
    pub fn build(deps: &Injector<'_>) -> routerunner::Result<Box<dyn Controller>> {
        Ok(Box::new(Self {
            greeting: deps.get::<Greeting>(1)?,
        }))
    }
}

impl Controller for HomeController {
    fn call(&self, action: &str, _params: Option<&[String]>) -> routerunner::Result<Value> {
        match action {
            "index" => Ok(json!(self.greeting.0)),
            _ => Err(RouterError::unknown_action("HomeController", action)),
        }
    }
}

pub struct UserController {
    store: Arc<UserStore>,
}

impl UserController {
    pub fn build(deps: &Injector<'_>) -> routerunner::Result<Box<dyn Controller>> {
        Ok(Box::new(Self {
            store: deps.get::<UserStore>(0)?,
        }))
    }
}

impl Controller for UserController {
    fn call(&self, action: &str, params: Option<&[String]>) -> routerunner::Result<Value> {
        match (action, params) {
            ("show", Some([id])) => {
                let index: usize = id.parse().map_err(|_| RouterError::handler("bad id"))?;
                match self.store.names.get(index) {
                    Some(name) => Ok(json!({ "id": index, "name": name })),
                    None => Ok(Value::Null),
                }
            }
            ("create", None) => Ok(json!({ "created": self.store.names.len() })),
            _ => Err(RouterError::unknown_action("UserController", action)),
        }
    }
}

/// Echoes the action and parameters. Needs no dependencies.
pub struct EchoController;

impl EchoController {
    pub fn build(_: &Injector<'_>) -> routerunner::Result<Box<dyn Controller>> {
        Ok(Box::new(Self))
    }
}

impl Controller for EchoController {
    fn call(&self, action: &str, params: Option<&[String]>) -> routerunner::Result<Value> {
        Ok(json!({ "action": action, "params": params }))
    }
}

/// A memory cache that counts reads and writes.
#[derive(Debug, Default)]
pub struct CountingCache {
    inner: MemoryCache,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingCache {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl RouteCache for CountingCache {
    fn useable(&self) -> bool {
        self.inner.useable()
    }

    fn filled(&self) -> bool {
        self.inner.filled()
    }

    fn read(&self) -> Result<CacheEntry, CacheError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read()
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(entry)
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.inner.clear()
    }
}

/// A usable cache whose writes always fail, optionally holding a fixed entry.
#[derive(Debug, Default)]
pub struct ReadOnlyCache {
    pub entry: Option<CacheEntry>,
    pub writes: AtomicUsize,
}

impl RouteCache for ReadOnlyCache {
    fn useable(&self) -> bool {
        true
    }

    fn filled(&self) -> bool {
        self.entry.is_some()
    }

    fn read(&self) -> Result<CacheEntry, CacheError> {
        self.entry.clone().ok_or(CacheError::Empty)
    }

    fn write(&self, _entry: &CacheEntry) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unusable("read-only store".to_string()))
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
