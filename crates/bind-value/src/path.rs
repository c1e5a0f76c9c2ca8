//! Dotted/bracketed addresses such as `a.b[2].c`.

use crate::error::PathError;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// A single step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathNode {
    /// Object member access.
    Key(String),
    /// Array element access.
    Index(usize),
}

/// An ordered, immutable address into a nested [`Value`](crate::Value).
///
/// Grammar: `segment ('.' segment | '[' digits ']')*`, where the first
/// segment must be an identifier (letter or `_` followed by word
/// characters). The empty path is the root and addresses the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    nodes: Vec<PathNode>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Path { nodes: Vec::new() }
    }

    pub fn from_nodes(nodes: Vec<PathNode>) -> Self {
        Path { nodes }
    }

    /// Parses a path string.
    ///
    /// # Example
    ///
    /// ```
    /// use bind_value::{Path, PathNode};
    ///
    /// let path = Path::parse("a.b[2].c").unwrap();
    /// assert_eq!(path.nodes(), &[
    ///     PathNode::Key("a".into()),
    ///     PathNode::Key("b".into()),
    ///     PathNode::Index(2),
    ///     PathNode::Key("c".into()),
    /// ]);
    /// assert_eq!(path.to_string(), "a.b[2].c");
    /// assert!(Path::parse("a[2").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Path, PathError> {
        PathParser { input, pos: 0 }.parse()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<&PathNode> {
        self.nodes.first()
    }

    /// The path without its first node.
    pub fn tail(&self) -> Path {
        Path {
            nodes: self.nodes.iter().skip(1).cloned().collect(),
        }
    }

    /// The path without its last node, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, rest) = self.nodes.split_last()?;
        Some(Path {
            nodes: rest.to_vec(),
        })
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.nodes.push(PathNode::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.nodes.push(PathNode::Index(index));
    }

    /// Concatenates two paths.
    pub fn join(&self, other: &Path) -> Path {
        let mut nodes = self.nodes.clone();
        nodes.extend(other.nodes.iter().cloned());
        Path { nodes }
    }
}

impl Add for Path {
    type Output = Path;

    fn add(mut self, rhs: Path) -> Path {
        self.nodes.extend(rhs.nodes);
        self
    }
}

impl Add<&Path> for &Path {
    type Output = Path;

    fn add(self, rhs: &Path) -> Path {
        self.join(rhs)
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                PathNode::Key(key) if i == 0 => f.write_str(key)?,
                PathNode::Key(key) => write!(f, ".{key}")?,
                PathNode::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl PathParser<'_> {
    fn parse(mut self) -> Result<Path, PathError> {
        if self.input.is_empty() {
            return Err(PathError::Empty);
        }
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(PathError::ExpectedIdentifier(0)),
        }

        let mut nodes = vec![PathNode::Key(self.parse_segment()?)];
        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    nodes.push(PathNode::Key(self.parse_segment()?));
                }
                '[' => {
                    self.pos += 1;
                    nodes.push(PathNode::Index(self.parse_index()?));
                }
                other => return Err(PathError::UnexpectedChar(other, self.pos)),
            }
        }
        Ok(Path { nodes })
    }

    fn parse_segment(&mut self) -> Result<String, PathError> {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(PathError::EmptySegment(start));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_index(&mut self) -> Result<usize, PathError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.input[start..self.pos];
        match self.peek() {
            Some(']') => self.pos += 1,
            Some(other) => return Err(PathError::UnexpectedChar(other, self.pos)),
            None => return Err(PathError::UnclosedBracket(start - 1)),
        }
        if digits.is_empty() {
            return Err(PathError::EmptySegment(start));
        }
        digits.parse().map_err(|_| PathError::InvalidIndex(start))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_indices() {
        let path = Path::parse("a.b[2].c").unwrap();
        assert_eq!(
            path.nodes(),
            &[
                PathNode::Key("a".into()),
                PathNode::Key("b".into()),
                PathNode::Index(2),
                PathNode::Key("c".into()),
            ]
        );
    }

    #[test]
    fn test_parse_consecutive_indices() {
        let path = Path::parse("matrix[0][1]").unwrap();
        assert_eq!(
            path.nodes(),
            &[PathNode::Key("matrix".into()), PathNode::Index(0), PathNode::Index(1)]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Path::parse(""), Err(PathError::Empty));
        assert_eq!(Path::parse("[0]"), Err(PathError::ExpectedIdentifier(0)));
        assert_eq!(Path::parse("1abc"), Err(PathError::ExpectedIdentifier(0)));
        assert_eq!(Path::parse("a..b"), Err(PathError::EmptySegment(2)));
        assert_eq!(Path::parse("a."), Err(PathError::EmptySegment(2)));
        assert_eq!(Path::parse("a[2"), Err(PathError::UnclosedBracket(1)));
        assert_eq!(Path::parse("a[]"), Err(PathError::EmptySegment(2)));
        assert_eq!(Path::parse("a[x]"), Err(PathError::UnexpectedChar('x', 2)));
        assert_eq!(Path::parse("a b"), Err(PathError::UnexpectedChar(' ', 1)));
        assert!(matches!(
            Path::parse("a[99999999999999999999999]"),
            Err(PathError::InvalidIndex(2))
        ));
    }

    #[test]
    fn test_keys_may_start_with_digits_after_first() {
        let path = Path::parse("a.0").unwrap();
        assert_eq!(path.nodes(), &[PathNode::Key("a".into()), PathNode::Key("0".into())]);
    }

    #[test]
    fn test_display_of_tail_starting_with_index() {
        let path = Path::parse("items[0].name").unwrap().tail();
        assert_eq!(path.to_string(), "[0].name");
    }

    #[test]
    fn test_concatenation() {
        let a = Path::parse("list[1]").unwrap();
        let b = Path::parse("name").unwrap();
        assert_eq!((&a + &b).to_string(), "list[1].name");
        assert_eq!((a + b).len(), 3);
    }

    #[test]
    fn test_parent() {
        let path = Path::parse("a.b").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "a");
        assert_eq!(Path::root().parent(), None);
    }
}
