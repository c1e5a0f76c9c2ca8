//! Change observers and the handles used to remove them.

use crate::tree::{NodeId, ScopeTree};
use bind_value::Value;
use std::fmt;
use std::rc::Rc;

/// Invoked with the tree and the context's new value.
pub(crate) type ObserverFn = Rc<dyn Fn(&ScopeTree, &Value)>;

/// Identifies the observers created by one registration call. Ids grow
/// with registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Where a context lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextOwner {
    Global,
    Node(NodeId),
}

/// One registration: the context ids it depends on and where each of them
/// currently resolves from `subscriber`.
pub(crate) struct Watch {
    /// Node whose teardown removes this watch.
    pub(crate) subscriber: NodeId,
    /// Distinct context ids, resolved or not.
    pub(crate) contexts: Vec<String>,
    /// The resolved subset of `contexts`.
    pub(crate) targets: Vec<(ContextOwner, String)>,
    pub(crate) callback: ObserverFn,
}

impl fmt::Debug for Watch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("subscriber", &self.subscriber)
            .field("contexts", &self.contexts)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

/// Handle for the observers registered by one `observe` or
/// `observe_context` call.
///
/// Dropping the handle does not unsubscribe; observers live until
/// [`ScopeTree::unsubscribe`] is called or the subscribing node is removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub(crate) id: ObserverId,
}

impl Subscription {
    pub fn id(&self) -> ObserverId {
        self.id
    }
}
