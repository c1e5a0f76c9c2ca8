//! Dynamic value model for server-driven UI bindings.
//!
//! This crate holds the untyped, JSON-like [`Value`] that flows through
//! contexts and expressions, the [`Path`] algebra used to address into it,
//! and the numeric/string coercion helpers shared by every operation.
//!
//! # Example
//!
//! ```
//! use bind_value::{Path, Value};
//! use serde_json::json;
//!
//! let user = Value::from(json!({"name": "Ana", "tags": ["a", "b", "c"]}));
//!
//! let path = Path::parse("tags[2]").unwrap();
//! assert_eq!(user.value_at(&path), Value::from("c"));
//!
//! let renamed = user.set(&Path::parse("name").unwrap(), Value::from("Bea"));
//! assert_eq!(renamed.value_at(&Path::parse("name").unwrap()), Value::from("Bea"));
//! ```

pub mod access;
pub mod coerce;
pub mod error;
pub mod json;
pub mod path;
pub mod value;

pub use coerce::{parse_number, Number};
pub use error::PathError;
pub use path::{Path, PathNode};
pub use value::{format_double, FromValue, Object, Value, ValueKind};
