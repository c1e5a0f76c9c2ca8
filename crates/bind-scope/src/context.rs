//! Context values and the slots that hold them.

use crate::observer::ObserverId;
use bind_value::Value;

/// A named value scoped to a point in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub id: String,
    pub value: Value,
}

impl Context {
    pub fn new(id: impl Into<String>, value: impl Into<Value>) -> Self {
        Context {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Storage for one context plus the ids of the watches listening to it,
/// sorted by registration order.
#[derive(Debug)]
pub(crate) struct ContextSlot {
    pub(crate) context: Context,
    pub(crate) observers: Vec<ObserverId>,
}

impl ContextSlot {
    pub(crate) fn new(context: Context) -> Self {
        ContextSlot {
            context,
            observers: Vec::new(),
        }
    }
}

/// The single context visible from every node.
///
/// Built by the host and handed to [`ScopeTree::new`](crate::ScopeTree::new);
/// its id comes from [`ScopeConfig`](crate::ScopeConfig).
#[derive(Debug, Clone, Default)]
pub struct GlobalContext {
    pub(crate) initial: Value,
}

impl GlobalContext {
    pub fn new(value: impl Into<Value>) -> Self {
        GlobalContext {
            initial: value.into(),
        }
    }
}
