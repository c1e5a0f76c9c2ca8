use crate::registry::OperationRegistry;
use bind_value::Value;

/// Looks up context values by id.
///
/// Implemented by the scope tree for a fixed position in the hierarchy;
/// tests and simple hosts can use a plain map.
pub trait ContextResolver {
    /// The current value of `context_id`, or `None` when no such context is
    /// visible.
    fn context_value(&self, context_id: &str) -> Option<&Value>;
}

impl<S: std::hash::BuildHasher> ContextResolver for std::collections::HashMap<String, Value, S> {
    fn context_value(&self, context_id: &str) -> Option<&Value> {
        self.get(context_id)
    }
}

impl ContextResolver for bind_value::Object {
    fn context_value(&self, context_id: &str) -> Option<&Value> {
        self.get(context_id)
    }
}

/// Everything evaluation needs: where contexts come from and which
/// operations exist.
pub struct EvalCtx<'a> {
    pub resolver: &'a dyn ContextResolver,
    pub operations: &'a OperationRegistry,
}

impl<'a> EvalCtx<'a> {
    pub fn new(resolver: &'a dyn ContextResolver, operations: &'a OperationRegistry) -> Self {
        EvalCtx {
            resolver,
            operations,
        }
    }
}
