//! Evaluating and observing expressions at a point in the scope tree.

use crate::error::ScopeError;
use crate::observer::{ObserverFn, Subscription};
use crate::tree::{NodeId, ScopeTree};
use bind_expression::{evaluate, ContextResolver, EvalCtx, Expression};
use bind_value::{FromValue, Value};
use std::rc::Rc;

/// Resolves context ids as seen from one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeResolver<'a> {
    tree: &'a ScopeTree,
    node: NodeId,
}

impl ContextResolver for NodeResolver<'_> {
    fn context_value(&self, context_id: &str) -> Option<&Value> {
        self.tree.get_context_value(self.node, context_id)
    }
}

impl ScopeTree {
    pub fn resolver(&self, node: NodeId) -> NodeResolver<'_> {
        NodeResolver { tree: self, node }
    }

    /// Evaluates `expression` with bindings resolved from `node`.
    ///
    /// Bindings to contexts that are not visible from `node` evaluate to
    /// `Value::Null`, as do bindings evaluated at a removed node (apart from
    /// the global context).
    pub fn evaluate(&self, node: NodeId, expression: &Expression) -> Value {
        let resolver = self.resolver(node);
        let ctx = EvalCtx::new(&resolver, &self.operations);
        evaluate(expression, &ctx)
    }

    /// Evaluates and converts the result, `None` when the result has a
    /// different kind.
    pub fn evaluate_as<T: FromValue>(&self, node: NodeId, expression: &Expression) -> Option<T> {
        T::from_value(&self.evaluate(node, expression))
    }

    /// Calls `on_change` with the value of `expression` now and after every
    /// change to a context it depends on.
    ///
    /// Every binding in the expression, including those nested in operation
    /// parameters, is resolved from `node`. A context referenced several
    /// times is observed once, so a single mutation produces a single
    /// callback. Resolution follows the tree as it changes: a context created
    /// later on the way up (shadowing an ancestor's, or supplying one that
    /// did not exist yet) takes over, and clearing an implicit scope falls
    /// back to what the binding sees next.
    ///
    /// The observers belong to `node` and are removed with it.
    ///
    /// # Example
    ///
    /// ```
    /// use bind_expression::{Expression, OperationRegistry};
    /// use bind_scope::{Context, GlobalContext, ScopeConfig, ScopeTree};
    /// use bind_value::Value;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let mut tree = ScopeTree::new(
    ///     ScopeConfig::default(),
    ///     GlobalContext::default(),
    ///     OperationRegistry::with_builtins(),
    /// );
    /// let root = tree.create_root();
    /// tree.set_context(root, Context::new("count", 1)).unwrap();
    ///
    /// let seen = Rc::new(RefCell::new(Vec::new()));
    /// let sink = Rc::clone(&seen);
    /// let expr = Expression::parse("@{sum(count, count)}");
    /// tree.observe(root, &expr, move |v| sink.borrow_mut().push(v.clone()))
    ///     .unwrap();
    /// tree.set_context(root, Context::new("count", 5)).unwrap();
    ///
    /// assert_eq!(*seen.borrow(), vec![Value::Int(2), Value::Int(10)]);
    /// ```
    pub fn observe<F>(
        &mut self,
        node: NodeId,
        expression: &Expression,
        on_change: F,
    ) -> Result<Subscription, ScopeError>
    where
        F: Fn(&Value) + 'static,
    {
        if !self.contains(node) {
            return Err(ScopeError::NodeNotFound(node));
        }

        let mut contexts: Vec<String> = Vec::new();
        for binding in expression.bindings() {
            if contexts.contains(&binding.context) {
                continue;
            }
            if self.resolve_owner(node, &binding.context).is_none() {
                tracing::debug!(%node, context = %binding.context, "binding waits for its context");
            }
            contexts.push(binding.context.clone());
        }

        on_change(&self.evaluate(node, expression));

        let expression = Rc::new(expression.clone());
        let callback: ObserverFn = Rc::new(move |tree: &ScopeTree, _: &Value| {
            on_change(&tree.evaluate(node, &expression));
        });
        let subscription = self.register(node, contexts, callback);
        tracing::trace!(
            %node,
            targets = self.subscription_targets(&subscription).len(),
            "expression observed"
        );
        Ok(subscription)
    }
}
