//! Named method registry.
//!
//! A [`MethodTable`] maps names such as `"Audit.Record"` to functions with a
//! fixed arity. A target resolves one name at configuration time into a
//! [`MethodInvoker`]; an unknown name or a parameter count that does not
//! match the arity is a [`ConfigError`] before any event is written.

use methodcall_core::{BoxError, ConfigError, Invoker, ParameterValue};
use std::{collections::HashMap, fmt, sync::Arc};

/// A registered method body.
pub type Method = Arc<dyn Fn(&[ParameterValue]) -> Result<(), BoxError> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    arity: usize,
    method: Method,
}

/// A table of callable methods, keyed by name.
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, Entry>,
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `method` under `name`, taking `arity` arguments.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        method: F,
    ) -> Result<&mut Self, ConfigError>
    where
        F: Fn(&[ParameterValue]) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.methods.contains_key(&name) {
            return Err(ConfigError::AlreadyExists(name));
        }
        self.methods.insert(
            name,
            Entry {
                arity,
                method: Arc::new(method),
            },
        );
        Ok(self)
    }

    /// Look up a method by name.
    pub fn resolve(&self, name: &str) -> Result<MethodInvoker, ConfigError> {
        let entry = self
            .methods
            .get(name)
            .ok_or_else(|| ConfigError::MethodNotFound(name.to_owned()))?;
        Ok(MethodInvoker {
            name: name.to_owned(),
            arity: entry.arity,
            method: entry.method.clone(),
        })
    }

    /// Returns `true` if a method is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if no method is registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.methods.keys().collect();
        names.sort();
        f.debug_struct("MethodTable").field("methods", &names).finish()
    }
}

/// A method resolved from a [`MethodTable`].
#[derive(Clone)]
pub struct MethodInvoker {
    name: String,
    arity: usize,
    method: Method,
}

impl MethodInvoker {
    /// The name the method was resolved under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments the method takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    fn check(&self, count: usize) -> Result<(), ConfigError> {
        if count == self.arity {
            Ok(())
        } else {
            Err(ConfigError::ArityMismatch {
                method: self.name.clone(),
                expected: self.arity,
                actual: count,
            })
        }
    }
}

impl Invoker for MethodInvoker {
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        self.check(arguments.len())?;
        (self.method)(&arguments)
    }

    fn validate(&self, parameter_count: usize) -> Result<(), ConfigError> {
        self.check(parameter_count)
    }
}

impl fmt::Debug for MethodInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvoker")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
