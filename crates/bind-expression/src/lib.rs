//! `@{...}` expressions for server-driven UI properties.
//!
//! # Overview
//!
//! A raw property string is either a plain literal, a single interpolation
//! (`@{user.name}`, `@{sum(a, 1)}`), or a template mixing text with
//! interpolations (`"Hi @{user.name}!"`). [`Expression::parse`] turns the raw
//! string into a tree; [`evaluate`] walks that tree against whatever contexts
//! an [`EvalCtx`] can resolve, dispatching calls through an
//! [`OperationRegistry`].
//!
//! # Example
//!
//! ```
//! use bind_expression::{evaluate, EvalCtx, Expression, OperationRegistry};
//! use bind_value::{Object, Value};
//!
//! let mut contexts = Object::new();
//! contexts.insert("count".into(), Value::Int(4));
//!
//! let operations = OperationRegistry::with_builtins();
//! let ctx = EvalCtx::new(&contexts, &operations);
//!
//! let expr = Expression::parse("total: @{sum(count, 6)}");
//! assert_eq!(evaluate(&expr, &ctx), Value::from("total: 10"));
//! ```

pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod operators;
pub mod parser;
pub mod registry;
pub mod types;

pub use error::{OperationError, ParseError, RegisterError};
pub use eval_ctx::{ContextResolver, EvalCtx};
pub use evaluate::evaluate;
pub use registry::{Arity, OperationDefinition, OperationFn, OperationRegistry};
pub use types::{Binding, Expression, Operation, Parameter, SingleExpression, TemplateNode};
