//! Raw-string parser for `@{...}` expressions.
//!
//! ```text
//! raw        := (text | '\\' | '\@{' | '@{' single '}')*
//! single     := operation | binding
//! operation  := name '(' (parameter (',' parameter)*)? ')'
//! parameter  := string | number | 'true' | 'false' | 'null' | operation | binding
//! binding    := identifier ('.' key | '[' digits ']')*
//! string     := '\'' (char | '\\\'' | '\\\\')* '\''
//! number     := '-'? digits ('.' digits)? (('e' | 'E') ('+' | '-')? digits)?
//! ```

use crate::error::ParseError;
use crate::registry::is_valid_operation_name;
use crate::types::{Binding, Expression, Operation, Parameter, SingleExpression, TemplateNode};
use bind_value::{Path, PathNode, Value};

impl Expression {
    /// Parses a raw property string, degrading instead of failing.
    ///
    /// Malformed interpolation syntax logs a warning and yields an empty
    /// template (`Expression::Template(vec![])`), which evaluates to
    /// `Value::Null`.
    ///
    /// # Example
    ///
    /// ```
    /// use bind_expression::{Expression, SingleExpression};
    ///
    /// assert!(matches!(
    ///     Expression::parse("@{user.name}"),
    ///     Expression::Single(SingleExpression::Binding(_))
    /// ));
    /// assert_eq!(Expression::parse("@{sum(1,"), Expression::Template(vec![]));
    /// ```
    pub fn parse(raw: &str) -> Expression {
        match Expression::try_parse(raw) {
            Ok(expression) => expression,
            Err(error) => {
                tracing::warn!(raw, %error, "empty expression: malformed interpolation");
                Expression::Template(Vec::new())
            }
        }
    }

    /// Strict variant of [`Expression::parse`].
    pub fn try_parse(raw: &str) -> Result<Expression, ParseError> {
        ExpressionParser { input: raw, pos: 0 }.parse_raw()
    }

    /// Builds an expression from a payload value: strings are parsed, every
    /// other kind is a literal.
    pub fn from_value(value: Value) -> Expression {
        match value {
            Value::String(raw) => Expression::parse(&raw),
            other => Expression::Literal(other),
        }
    }
}

struct ExpressionParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ExpressionParser<'a> {
    fn parse_raw(&mut self) -> Result<Expression, ParseError> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            let rest = &self.input[self.pos..];
            if rest.starts_with("\\\\") {
                text.push('\\');
                self.pos += 2;
            } else if rest.starts_with("\\@{") {
                text.push_str("@{");
                self.pos += 3;
            } else if rest.starts_with("@{") {
                let start = self.pos;
                self.pos += 2;
                let single = self.parse_single()?;
                self.skip_whitespace();
                match self.peek() {
                    Some('}') => self.pos += 1,
                    Some(other) => return Err(ParseError::UnexpectedChar(other, self.pos)),
                    None => return Err(ParseError::UnclosedInterpolation(start)),
                }
                if !text.is_empty() {
                    nodes.push(TemplateNode::Text(std::mem::take(&mut text)));
                }
                nodes.push(TemplateNode::Expression(single));
            } else {
                text.push(c);
                self.pos += c.len_utf8();
            }
        }
        if !text.is_empty() {
            nodes.push(TemplateNode::Text(text));
        }

        Ok(match nodes.len() {
            0 => Expression::Literal(Value::String(String::new())),
            1 => match nodes.pop() {
                Some(TemplateNode::Text(text)) => Expression::Literal(Value::String(text)),
                Some(TemplateNode::Expression(single)) => Expression::Single(single),
                None => Expression::Template(Vec::new()),
            },
            _ => Expression::Template(nodes),
        })
    }

    fn parse_single(&mut self) -> Result<SingleExpression, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let word = self.read_word();
        if word.is_empty() {
            return Err(self.unexpected());
        }
        if self.peek() == Some('(') {
            Ok(SingleExpression::Operation(self.parse_operation(word)?))
        } else {
            Ok(SingleExpression::Binding(self.parse_binding(start)?))
        }
    }

    fn parse_operation(&mut self, name: &str) -> Result<Operation, ParseError> {
        if !is_valid_operation_name(name) {
            return Err(ParseError::InvalidOperationName(name.to_string()));
        }
        let name = name.to_string();
        self.pos += 1; // '('
        let mut parameters = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(Operation { name, parameters });
        }
        loop {
            parameters.push(self.parse_parameter()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(Operation { name, parameters })
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some('\'') => Ok(Parameter::Literal(Value::String(self.parse_string()?))),
            Some(c) if c == '-' || c.is_ascii_digit() => Ok(Parameter::Literal(self.parse_number()?)),
            Some(c) if is_word_char(c) => {
                let start = self.pos;
                let word = self.read_word();
                match self.peek() {
                    Some('(') => Ok(Parameter::Operation(self.parse_operation(word)?)),
                    Some('.') | Some('[') => Ok(Parameter::Binding(self.parse_binding(start)?)),
                    _ => Ok(match word {
                        "true" => Parameter::Literal(Value::Bool(true)),
                        "false" => Parameter::Literal(Value::Bool(false)),
                        "null" => Parameter::Literal(Value::Null),
                        _ => Parameter::Binding(self.parse_binding(start)?),
                    }),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Consumes the remainder of a binding whose text begins at `start`.
    fn parse_binding(&mut self, start: usize) -> Result<Binding, ParseError> {
        while self
            .peek()
            .is_some_and(|c| is_word_char(c) || matches!(c, '.' | '[' | ']'))
        {
            self.pos += 1;
        }
        let text = &self.input[start..self.pos];
        let path = Path::parse(text).map_err(|source| ParseError::InvalidBinding {
            text: text.to_string(),
            source,
        })?;
        match path.first() {
            Some(PathNode::Key(context)) => Ok(Binding::new(context.clone(), path.tail())),
            _ => Err(ParseError::UnexpectedChar(
                text.chars().next().unwrap_or('\0'),
                start,
            )),
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut out = String::new();
        loop {
            let c = self.peek().ok_or(ParseError::UnclosedString(start))?;
            self.pos += c.len_utf8();
            match c {
                '\'' => return Ok(out),
                '\\' => match self.peek() {
                    Some(escaped @ ('\'' | '\\')) => {
                        out.push(escaped);
                        self.pos += 1;
                    }
                    _ => out.push('\\'),
                },
                other => out.push(other),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.input[start..self.pos];
        if self.peek().is_some_and(is_word_char) {
            return Err(ParseError::InvalidNumber(text.to_string()));
        }
        let invalid = || ParseError::InvalidNumber(text.to_string());
        if text.contains(['.', 'e', 'E']) {
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() && !text.ends_with(['.', 'e', 'E', '+', '-']) => {
                    Ok(Value::Double(n))
                }
                _ => Err(invalid()),
            }
        } else {
            text.parse::<i64>().map(Value::Int).map_err(|_| invalid())
        }
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        let input = self.input;
        &input[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(c) => ParseError::UnexpectedChar(c, self.pos),
            None => ParseError::UnexpectedEnd,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
