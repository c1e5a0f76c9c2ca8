//! The scope tree: an arena of nodes, each holding named contexts.
//!
//! Lookup walks upward from a node. The global context id short-circuits to
//! the tree-wide [`GlobalContext`]; otherwise the node's own contexts are
//! checked, then its implicit scope (if any), then its structural parent.
//!
//! Node ids are generational, so an id kept after [`ScopeTree::remove_node`]
//! never resolves to a node created later in the same slot.

use crate::config::ScopeConfig;
use crate::context::{Context, ContextSlot, GlobalContext};
use crate::error::ScopeError;
use crate::observer::{ContextOwner, ObserverFn, ObserverId, Subscription, Watch};
use bind_expression::OperationRegistry;
use bind_value::{Path, Value};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::mem;
use std::rc::Rc;

/// Generational index of a scope node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    /// Synthetic scope consulted before `parent`. It shares `parent` as its
    /// own parent, so lookup continues upward from there.
    implicit: Option<NodeId>,
    children: Vec<NodeId>,
    contexts: IndexMap<String, ContextSlot>,
}

impl Node {
    fn new(parent: Option<NodeId>) -> Self {
        Node {
            parent,
            implicit: None,
            children: Vec::new(),
            contexts: IndexMap::new(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    generation: u32,
    node: Option<Node>,
}

/// Hierarchy of context scopes plus the operations used to evaluate
/// expressions against it.
///
/// Single-threaded: observers run synchronously inside the mutating call,
/// in registration order, and receive the tree by shared reference.
#[derive(Debug)]
pub struct ScopeTree {
    config: ScopeConfig,
    global: ContextSlot,
    pub(crate) operations: OperationRegistry,
    entries: Vec<Entry>,
    free_list: Vec<u32>,
    watches: IndexMap<ObserverId, Watch>,
    next_observer: u64,
}

impl ScopeTree {
    pub fn new(config: ScopeConfig, global: GlobalContext, operations: OperationRegistry) -> Self {
        let global = ContextSlot::new(Context::new(config.global_context_id.clone(), global.initial));
        ScopeTree {
            config,
            global,
            operations,
            entries: Vec::new(),
            free_list: Vec::new(),
            watches: IndexMap::new(),
            next_observer: 0,
        }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    /// Mutable access for registering host operations after construction.
    pub fn operations_mut(&mut self) -> &mut OperationRegistry {
        &mut self.operations
    }

    pub fn global_context(&self) -> &Context {
        &self.global.context
    }

    // ------------------------------------------------------------- Nodes

    pub fn create_root(&mut self) -> NodeId {
        self.alloc(Node::new(None))
    }

    pub fn create_child(&mut self, parent: NodeId) -> Result<NodeId, ScopeError> {
        self.node(parent)?;
        let child = self.alloc(Node::new(Some(parent)));
        self.node_mut(parent)?.children.push(child);
        Ok(child)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get_node(node).is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get_node(node).map_or(&[], |n| n.children.as_slice())
    }

    /// Removes `node`, its descendants and its implicit scope.
    ///
    /// Every observer that one of the removed nodes registered is dropped,
    /// wherever it listens. Observers of surviving nodes that listened to a
    /// removed context are re-resolved and called once with the value they
    /// now see.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), ScopeError> {
        let parent = self.node(node)?.parent;
        if let Some(parent) = parent.and_then(|p| self.get_node_mut(p)) {
            parent.children.retain(|child| *child != node);
        }

        let mut removed = HashSet::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(released) = self.release(id) {
                removed.insert(id);
                stack.extend(released.children);
                stack.extend(released.implicit);
            }
        }

        self.watches
            .retain(|_, watch| !removed.contains(&watch.subscriber));
        let watches = &self.watches;
        self.global.observers.retain(|id| watches.contains_key(id));
        for entry in &mut self.entries {
            if let Some(live) = entry.node.as_mut() {
                for slot in live.contexts.values_mut() {
                    slot.observers.retain(|id| watches.contains_key(id));
                }
            }
        }

        let moved = self.rebind(|watch| {
            watch
                .targets
                .iter()
                .any(|(owner, _)| matches!(owner, ContextOwner::Node(id) if removed.contains(id)))
        });
        tracing::debug!(%node, removed = removed.len(), rebound = moved.len(), "scope node removed");
        for id in moved {
            self.fire(id);
        }
        Ok(())
    }

    // ---------------------------------------------------------- Contexts

    /// Where `context_id` resolves when looked up from `node`.
    pub fn resolve_owner(&self, node: NodeId, context_id: &str) -> Option<ContextOwner> {
        if context_id == self.config.global_context_id {
            return Some(ContextOwner::Global);
        }
        let mut current = Some(node);
        while let Some(id) = current {
            let scope = self.get_node(id)?;
            if scope.contexts.contains_key(context_id) {
                return Some(ContextOwner::Node(id));
            }
            current = scope.implicit.or(scope.parent);
        }
        None
    }

    pub fn get_context(&self, node: NodeId, context_id: &str) -> Option<&Context> {
        let owner = self.resolve_owner(node, context_id)?;
        self.slot(owner, context_id).map(|slot| &slot.context)
    }

    pub fn get_context_value(&self, node: NodeId, context_id: &str) -> Option<&Value> {
        self.get_context(node, context_id).map(|context| &context.value)
    }

    /// Creates or replaces a context on `node` and notifies its observers.
    ///
    /// A context whose id is the global id replaces the global context
    /// instead, wherever `node` sits. Creating a context can change what
    /// observers below `node` resolve to (a new context shadows an ancestor's,
    /// or supplies one that was missing); those observers move to the new
    /// context before it notifies.
    pub fn set_context(&mut self, node: NodeId, context: Context) -> Result<(), ScopeError> {
        let context_id = context.id.clone();
        let mut created = false;
        let owner = if context_id == self.config.global_context_id {
            self.global.context.value = context.value;
            ContextOwner::Global
        } else {
            let scope = self.node_mut(node)?;
            match scope.contexts.get_mut(&context_id) {
                Some(slot) => slot.context.value = context.value,
                None => {
                    scope
                        .contexts
                        .insert(context_id.clone(), ContextSlot::new(context));
                    created = true;
                }
            }
            ContextOwner::Node(node)
        };
        if created {
            let moved = self.rebind(|watch| watch.contexts.contains(&context_id));
            if !moved.is_empty() {
                tracing::trace!(%node, context = %context_id, moved = moved.len(), "observers rebound to new context");
            }
        }
        self.notify(owner, &context_id);
        Ok(())
    }

    /// Writes `value` at `path` inside the context `context_id` visible from
    /// `node`, then notifies that context's observers.
    ///
    /// Unreachable paths leave the value unchanged (see [`Value::set`]);
    /// observers are still notified.
    pub fn set_context_at_path(
        &mut self,
        node: NodeId,
        context_id: &str,
        path: &Path,
        value: Value,
    ) -> Result<(), ScopeError> {
        self.node(node)?;
        let Some(owner) = self.resolve_owner(node, context_id) else {
            tracing::warn!(%node, context = context_id, "set at path on a context that is not visible");
            return Err(ScopeError::ContextNotFound {
                node,
                context: context_id.to_string(),
            });
        };
        if let Some(slot) = self.slot_mut(owner, context_id) {
            slot.context.value.set_in_place(path, value);
        }
        self.notify(owner, context_id);
        Ok(())
    }

    /// Stores `context` in the implicit scope of `node`, creating the scope
    /// on first use.
    ///
    /// The implicit scope is searched after the node's own contexts and
    /// before its parent. Repeated calls reuse the same scope, so observers
    /// of an implicit context survive a value update. A scope installed after
    /// a clear picks up the observers that still depend on its context.
    pub fn set_implicit_context(&mut self, node: NodeId, context: Context) -> Result<(), ScopeError> {
        let (parent, implicit) = {
            let scope = self.node(node)?;
            (scope.parent, scope.implicit)
        };
        let scope = match implicit.filter(|id| self.contains(*id)) {
            Some(scope) => scope,
            None => {
                let scope = self.alloc(Node::new(parent));
                self.node_mut(node)?.implicit = Some(scope);
                scope
            }
        };
        self.set_context(scope, context)
    }

    /// Drops the implicit scope of `node`. Observers that listened to it fall
    /// back to whatever their bindings now resolve to and are called once
    /// with the value they now see.
    pub fn clear_implicit_context(&mut self, node: NodeId) -> Result<(), ScopeError> {
        match self.node_mut(node)?.implicit.take() {
            Some(scope) if self.contains(scope) => self.remove_node(scope),
            _ => Ok(()),
        }
    }

    // --------------------------------------------------------- Observers

    /// Calls `callback` with the new value every time the context
    /// `context_id`, as resolved from `node`, is set.
    ///
    /// Unlike [`ScopeTree::observe`] there is no initial call.
    pub fn observe_context<F>(
        &mut self,
        node: NodeId,
        context_id: &str,
        callback: F,
    ) -> Result<Subscription, ScopeError>
    where
        F: Fn(&Value) + 'static,
    {
        self.node(node)?;
        let owner = self
            .resolve_owner(node, context_id)
            .ok_or_else(|| ScopeError::ContextNotFound {
                node,
                context: context_id.to_string(),
            })?;
        tracing::trace!(%node, context = context_id, ?owner, "context observed");
        let callback: ObserverFn = Rc::new(move |_: &ScopeTree, value: &Value| callback(value));
        Ok(self.register(node, vec![context_id.to_string()], callback))
    }

    /// Removes the observers registered by `subscription`. Unknown or
    /// already removed subscriptions are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        let Some(watch) = self.watches.shift_remove(&subscription.id) else {
            return;
        };
        for (owner, context_id) in &watch.targets {
            if let Some(slot) = self.slot_mut(*owner, context_id) {
                slot.observers.retain(|id| *id != subscription.id);
            }
        }
    }

    /// The contexts `subscription` currently listens to, one entry per owning
    /// context. Empty once unsubscribed.
    pub fn subscription_targets(&self, subscription: &Subscription) -> &[(ContextOwner, String)] {
        self.watches
            .get(&subscription.id)
            .map_or(&[], |watch| watch.targets.as_slice())
    }

    /// Number of observers currently registered on a context.
    pub fn observer_count(&self, owner: ContextOwner, context_id: &str) -> usize {
        self.slot(owner, context_id)
            .map_or(0, |slot| slot.observers.len())
    }

    /// Registers `callback` for `subscriber`, listening to each of
    /// `contexts` that currently resolves.
    pub(crate) fn register(
        &mut self,
        subscriber: NodeId,
        contexts: Vec<String>,
        callback: ObserverFn,
    ) -> Subscription {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        let targets = self.resolve_targets(subscriber, &contexts);
        for (owner, context_id) in &targets {
            self.attach(id, *owner, context_id);
        }
        self.watches.insert(
            id,
            Watch {
                subscriber,
                contexts,
                targets,
                callback,
            },
        );
        Subscription { id }
    }

    fn resolve_targets(&self, subscriber: NodeId, contexts: &[String]) -> Vec<(ContextOwner, String)> {
        contexts
            .iter()
            .filter_map(|context_id| Some((self.resolve_owner(subscriber, context_id)?, context_id.clone())))
            .collect()
    }

    fn attach(&mut self, id: ObserverId, owner: ContextOwner, context_id: &str) {
        if let Some(slot) = self.slot_mut(owner, context_id) {
            let at = slot.observers.partition_point(|other| *other < id);
            slot.observers.insert(at, id);
        }
    }

    fn detach(&mut self, id: ObserverId, owner: ContextOwner, context_id: &str) {
        if let Some(slot) = self.slot_mut(owner, context_id) {
            slot.observers.retain(|other| *other != id);
        }
    }

    /// Re-resolves the watches selected by `affected` and moves each one to
    /// the contexts it now resolves to. Returns the ids that moved.
    fn rebind(&mut self, affected: impl Fn(&Watch) -> bool) -> Vec<ObserverId> {
        let selected: Vec<ObserverId> = self
            .watches
            .iter()
            .filter(|(_, watch)| affected(watch))
            .map(|(id, _)| *id)
            .collect();

        let mut moved = Vec::new();
        for id in selected {
            let Some(watch) = self.watches.get(&id) else {
                continue;
            };
            let targets = self.resolve_targets(watch.subscriber, &watch.contexts);
            if targets == watch.targets {
                continue;
            }
            let Some(watch) = self.watches.get_mut(&id) else {
                continue;
            };
            let previous = mem::replace(&mut watch.targets, targets.clone());
            for (owner, context_id) in previous.iter().filter(|t| !targets.contains(t)) {
                self.detach(id, *owner, context_id);
            }
            for (owner, context_id) in targets.iter().filter(|t| !previous.contains(t)) {
                self.attach(id, *owner, context_id);
            }
            moved.push(id);
        }
        moved
    }

    /// Calls one watch with the current value of its first context.
    fn fire(&self, id: ObserverId) {
        let Some(watch) = self.watches.get(&id) else {
            return;
        };
        let null = Value::Null;
        let value = watch
            .contexts
            .first()
            .and_then(|context_id| self.get_context_value(watch.subscriber, context_id))
            .unwrap_or(&null);
        (watch.callback)(self, value);
    }

    fn notify(&self, owner: ContextOwner, context_id: &str) {
        let Some(slot) = self.slot(owner, context_id) else {
            return;
        };
        tracing::trace!(
            context = context_id,
            observers = slot.observers.len(),
            "notifying context observers"
        );
        for id in &slot.observers {
            if let Some(watch) = self.watches.get(id) {
                (watch.callback)(self, &slot.context.value);
            }
        }
    }

    // ----------------------------------------------------------- Storage

    fn node(&self, id: NodeId) -> Result<&Node, ScopeError> {
        self.get_node(id).ok_or(ScopeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, ScopeError> {
        self.get_node_mut(id).ok_or(ScopeError::NodeNotFound(id))
    }

    fn get_node(&self, id: NodeId) -> Option<&Node> {
        let entry = self.entries.get(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.node.as_ref()
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let entry = self.entries.get_mut(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.node.as_mut()
    }

    fn slot(&self, owner: ContextOwner, context_id: &str) -> Option<&ContextSlot> {
        match owner {
            ContextOwner::Global => Some(&self.global),
            ContextOwner::Node(id) => self.get_node(id)?.contexts.get(context_id),
        }
    }

    fn slot_mut(&mut self, owner: ContextOwner, context_id: &str) -> Option<&mut ContextSlot> {
        match owner {
            ContextOwner::Global => Some(&mut self.global),
            ContextOwner::Node(id) => self.get_node_mut(id)?.contexts.get_mut(context_id),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free_list.pop() {
            let entry = &mut self.entries[index as usize];
            entry.node = Some(node);
            return NodeId {
                index,
                generation: entry.generation,
            };
        }
        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let entry = self.entries.get_mut(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let node = entry.node.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(id.index);
        Some(node)
    }
}
