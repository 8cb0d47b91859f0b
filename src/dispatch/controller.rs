//! Controllers, their factories and positional dependency injection.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use serde_json::Value;

use crate::error::{Result, RouterError};

/// A request handler type whose actions are named in route targets.
pub trait Controller: Send + Sync {
    /// Run `action`.
    ///
    /// `params` is `Some` when the matched route captured placeholders and
    /// `None` otherwise. Unknown actions should return
    /// [`RouterError::UnknownAction`].
    fn call(&self, action: &str, params: Option<&[String]>) -> Result<Value>;
}

/// One opaque entry of the dependency vector.
pub type Dependency = Arc<dyn Any + Send + Sync>;

/// Ordered values handed to controller factories by position.
#[derive(Clone, Default)]
pub struct Dependencies {
    values: Vec<Dependency>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return self.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// Append a value.
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(Arc::new(value));
    }

    /// Append an already shared value.
    pub fn push_shared(&mut self, value: Dependency) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The first `arity` entries for `controller`.
    fn inject<'a>(&'a self, controller: &'a str, arity: usize) -> Result<Injector<'a>> {
        if arity > self.values.len() {
            return Err(RouterError::Construction {
                controller: controller.to_string(),
                required: arity,
                provided: self.values.len(),
            });
        }
        Ok(Injector {
            controller,
            values: &self.values[..arity],
        })
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("len", &self.values.len())
            .finish()
    }
}

/// The slice of dependencies a factory is allowed to see.
pub struct Injector<'a> {
    controller: &'a str,
    values: &'a [Dependency],
}

impl<'a> Injector<'a> {
    /// Dependency at `position`, downcast to `T`.
    pub fn get<T: Any + Send + Sync>(&self, position: usize) -> Result<Arc<T>> {
        let mismatch = || RouterError::DependencyType {
            controller: self.controller.to_string(),
            position,
            expected: type_name::<T>(),
        };

        let value = self.values.get(position).ok_or_else(mismatch)?;
        Arc::clone(value).downcast::<T>().map_err(|_| mismatch())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

type BuildFn = dyn Fn(&Injector<'_>) -> Result<Box<dyn Controller>> + Send + Sync;

/// How to build one controller type.
#[derive(Clone)]
pub struct ControllerFactory {
    arity: usize,
    build: Arc<BuildFn>,
}

impl ControllerFactory {
    /// `arity` is the number of dependency positions the constructor consumes.
    pub fn new<F>(arity: usize, build: F) -> Self
    where
        F: Fn(&Injector<'_>) -> Result<Box<dyn Controller>> + Send + Sync + 'static,
    {
        Self {
            arity,
            build: Arc::new(build),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Debug for ControllerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerFactory")
            .field("arity", &self.arity)
            .finish()
    }
}

/// A constructed controller with the qualified name it was built for.
pub struct ControllerInstance {
    type_name: String,
    inner: Box<dyn Controller>,
}

impl ControllerInstance {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn controller(&self) -> &dyn Controller {
        self.inner.as_ref()
    }

    pub fn call(&self, action: &str, params: Option<&[String]>) -> Result<Value> {
        self.inner.call(action, params)
    }
}

impl fmt::Debug for ControllerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerInstance")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Maps qualified controller names to factories.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its qualified name, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, factory: ControllerFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the controller registered as `name`.
    pub fn construct(&self, name: &str, dependencies: &Dependencies) -> Result<ControllerInstance> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RouterError::UnknownController {
                name: name.to_string(),
            })?;

        let injector = dependencies.inject(name, factory.arity)?;
        let inner = (factory.build)(&injector)?;

        Ok(ControllerInstance {
            type_name: name.to_string(),
            inner,
        })
    }
}
