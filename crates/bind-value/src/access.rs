//! Reading and writing a [`Value`] at a [`Path`].
//!
//! Reads never fail: addressing through a missing key, an out-of-range
//! index or a kind mismatch yields absence. Writes create intermediate
//! objects when they pass through absence, but never grow arrays: an index
//! outside `0..len` makes the whole write a no-op.

use crate::path::{Path, PathNode};
use crate::value::{Object, Value};

impl Value {
    /// Returns a reference to the addressed value, or `None` for absence.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for node in path.nodes() {
            current = match (current, node) {
                (Value::Object(map), PathNode::Key(key)) => map.get(key)?,
                (Value::Array(arr), PathNode::Index(index)) => arr.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable counterpart of [`Value::get`].
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Value> {
        let mut current = self;
        for node in path.nodes() {
            current = match (current, node) {
                (Value::Object(map), PathNode::Key(key)) => map.get_mut(key)?,
                (Value::Array(arr), PathNode::Index(index)) => arr.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns the addressed value, or `Value::Null` ("empty") for absence.
    pub fn value_at(&self, path: &Path) -> Value {
        self.get(path).cloned().unwrap_or(Value::Null)
    }

    /// Returns a copy of `self` with the addressed location replaced.
    ///
    /// If the write is not possible (an index outside the array, a key on a
    /// non-object, an index through absence) the original value is returned
    /// unchanged.
    pub fn set(&self, path: &Path, new_value: Value) -> Value {
        let mut out = self.clone();
        out.set_in_place(path, new_value);
        out
    }

    /// In-place variant of [`Value::set`]. Returns `false` when the write was
    /// a no-op.
    pub fn set_in_place(&mut self, path: &Path, new_value: Value) -> bool {
        if !self.can_set(path.nodes()) {
            tracing::debug!(path = %path, "ignoring write to unreachable path");
            return false;
        }
        let mut current = self;
        for node in path.nodes() {
            if current.is_null() {
                *current = Value::Object(Object::new());
            }
            current = match (current, node) {
                (Value::Object(map), PathNode::Key(key)) => {
                    map.entry(key.clone()).or_insert(Value::Null)
                }
                (Value::Array(arr), PathNode::Index(index)) => match arr.get_mut(*index) {
                    Some(slot) => slot,
                    None => return false,
                },
                _ => return false,
            };
        }
        *current = new_value;
        true
    }

    /// Checks the write rules before anything is mutated, so a failing write
    /// leaves no partially-created objects behind.
    fn can_set(&self, nodes: &[PathNode]) -> bool {
        let Some((node, rest)) = nodes.split_first() else {
            return true;
        };
        match (self, node) {
            (Value::Object(map), PathNode::Key(key)) => match map.get(key) {
                Some(child) => child.can_set(rest),
                None => only_keys(rest),
            },
            (Value::Null, PathNode::Key(_)) => only_keys(rest),
            (Value::Array(arr), PathNode::Index(index)) => match arr.get(*index) {
                Some(child) => child.can_set(rest),
                None => false,
            },
            _ => false,
        }
    }
}

fn only_keys(nodes: &[PathNode]) -> bool {
    nodes.iter().all(|n| matches!(n, PathNode::Key(_)))
}
