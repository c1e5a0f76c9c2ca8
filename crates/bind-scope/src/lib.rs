//! Context scopes and reactive bindings.
//!
//! # Overview
//!
//! A [`ScopeTree`] mirrors the rendered component hierarchy. Each node may
//! hold named [`Context`]s; expressions evaluated at a node see the nearest
//! context of a given name on the way up, plus the tree-wide global context.
//! [`ScopeTree::observe`] keeps an expression live: whenever a context it
//! reads is set, the whole expression is re-evaluated and the callback
//! receives the fresh value.
//!
//! # Example
//!
//! ```
//! use bind_expression::{Expression, OperationRegistry};
//! use bind_scope::{Context, GlobalContext, ScopeConfig, ScopeTree};
//! use bind_value::Value;
//! use serde_json::json;
//!
//! let mut tree = ScopeTree::new(
//!     ScopeConfig::default(),
//!     GlobalContext::new(json!({"locale": "pt-BR"})),
//!     OperationRegistry::with_builtins(),
//! );
//! let screen = tree.create_root();
//! let label = tree.create_child(screen).unwrap();
//! tree.set_context(screen, Context::new("user", json!({"name": "Ana"}))).unwrap();
//!
//! let expr = Expression::parse("@{user.name} (@{global.locale})");
//! assert_eq!(tree.evaluate(label, &expr), Value::from("Ana (pt-BR)"));
//! ```

pub mod binding;
pub mod config;
pub mod context;
pub mod error;
pub mod observer;
pub mod tree;

pub use binding::NodeResolver;
pub use config::ScopeConfig;
pub use context::{Context, GlobalContext};
pub use error::ScopeError;
pub use observer::{ContextOwner, ObserverId, Subscription};
pub use tree::{NodeId, ScopeTree};
