//! Named operation registry.

use crate::error::{OperationError, RegisterError};
use crate::operators;
use bind_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The signature every operation implements: already-evaluated parameters in,
/// one value out.
pub type OperationFn = Arc<dyn Fn(&[Value]) -> Result<Value, OperationError> + Send + Sync>;

/// Operation arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    /// No arity check; the operation validates its own parameters.
    Any,
    /// Exactly `n` parameters.
    Fixed(usize),
    /// Between `min` and `max` parameters. `None` for max = unlimited.
    Range(usize, Option<usize>),
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Any => f.write_str("any number of"),
            Arity::Fixed(n) => write!(f, "{n}"),
            Arity::Range(min, None) => write!(f, "at least {min}"),
            Arity::Range(min, Some(max)) => write!(f, "{min} to {max}"),
        }
    }
}

/// Checks the number of evaluated parameters against an operation's arity.
pub fn assert_arity(operation: &str, arity: &Arity, count: usize) -> Result<(), OperationError> {
    let ok = match arity {
        Arity::Any => true,
        Arity::Fixed(n) => count == *n,
        Arity::Range(min, max) => count >= *min && max.map_or(true, |max| count <= max),
    };
    if ok {
        Ok(())
    } else {
        Err(OperationError::Arity {
            operation: operation.to_string(),
            expected: arity.to_string(),
            actual: count,
        })
    }
}

/// A registered operation.
pub struct OperationDefinition {
    pub name: String,
    pub arity: Arity,
    pub eval_fn: OperationFn,
}

impl OperationDefinition {
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        eval_fn: impl Fn(&[Value]) -> Result<Value, OperationError> + Send + Sync + 'static,
    ) -> Self {
        OperationDefinition {
            name: name.into(),
            arity,
            eval_fn: Arc::new(eval_fn),
        }
    }

    /// Checks arity, then invokes the function.
    pub fn call(&self, parameters: &[Value]) -> Result<Value, OperationError> {
        assert_arity(&self.name, &self.arity, parameters.len())?;
        (self.eval_fn)(parameters)
    }
}

impl fmt::Debug for OperationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDefinition")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

fn operation_name_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^\w*[a-zA-Z_]+\w*$").unwrap())
}

/// Whether `name` is acceptable as an operation name.
pub fn is_valid_operation_name(name: &str) -> bool {
    operation_name_regex().is_match(name)
}

/// Map of operation name to definition.
///
/// [`OperationRegistry::default`] carries the built-in operations; hosts add
/// their own with [`OperationRegistry::register`].
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    operations: HashMap<String, Arc<OperationDefinition>>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        OperationRegistry::with_builtins()
    }
}

impl OperationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        OperationRegistry {
            operations: HashMap::new(),
        }
    }

    /// A registry holding every built-in operation.
    pub fn with_builtins() -> Self {
        let mut operations = HashMap::new();
        for definition in operators::all_operators() {
            operations.insert(definition.name.clone(), Arc::new(definition));
        }
        OperationRegistry { operations }
    }

    /// Registers a host-defined operation without arity checking.
    ///
    /// Names must match `^\w*[a-zA-Z_]+\w*$`. Registering an existing name
    /// replaces it (last writer wins) and logs a warning.
    ///
    /// # Example
    ///
    /// ```
    /// use bind_expression::OperationRegistry;
    /// use bind_value::Value;
    ///
    /// let mut registry = OperationRegistry::with_builtins();
    /// registry
    ///     .register("double_it", |params: &[Value]| {
    ///         Ok(params.first().and_then(Value::as_i64).map(|n| Value::Int(n * 2)).unwrap_or_default())
    ///     })
    ///     .unwrap();
    /// assert_eq!(registry.call("double_it", &[Value::Int(4)]), Ok(Value::Int(8)));
    /// assert!(registry.register("not valid!", |_: &[Value]| Ok(Value::Null)).is_err());
    /// ```
    pub fn register<F>(&mut self, name: &str, eval_fn: F) -> Result<(), RegisterError>
    where
        F: Fn(&[Value]) -> Result<Value, OperationError> + Send + Sync + 'static,
    {
        self.register_definition(OperationDefinition::new(name, Arity::Any, eval_fn))
    }

    /// Registers a full definition, including its arity.
    pub fn register_definition(&mut self, definition: OperationDefinition) -> Result<(), RegisterError> {
        if !is_valid_operation_name(&definition.name) {
            tracing::warn!(name = %definition.name, "invalid operation name, registration rejected");
            return Err(RegisterError::InvalidName(definition.name));
        }
        let name = definition.name.clone();
        if self
            .operations
            .insert(name.clone(), Arc::new(definition))
            .is_some()
        {
            tracing::warn!(name = %name, "operation re-registered, previous definition replaced");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<OperationDefinition>> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invokes `name` with already-evaluated parameters.
    pub fn call(&self, name: &str, parameters: &[Value]) -> Result<Value, OperationError> {
        match self.operations.get(name) {
            Some(definition) => definition.call(parameters),
            None => Err(OperationError::NotFound(name.to_string())),
        }
    }
}
