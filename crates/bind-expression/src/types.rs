use bind_value::value::format_double;
use bind_value::{Path, Value};
use std::fmt;

/// A parsed property expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A constant. Raw strings without interpolation parse to a string literal.
    Literal(Value),
    /// A raw string consisting of exactly one `@{...}`.
    Single(SingleExpression),
    /// Literal text interleaved with interpolations.
    ///
    /// A template with no nodes at all is the degraded form produced when
    /// parsing fails.
    Template(Vec<TemplateNode>),
}

/// The content of one `@{...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleExpression {
    Binding(Binding),
    Operation(Operation),
}

/// One piece of a template expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    Text(String),
    Expression(SingleExpression),
}

/// A reference to a context, optionally narrowed by a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub context: String,
    /// Path inside the context value; the root path means the whole value.
    pub path: Path,
}

/// A named function call.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

/// A single operation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Literal(Value),
    Binding(Binding),
    Operation(Operation),
}

impl Binding {
    pub fn new(context: impl Into<String>, path: Path) -> Self {
        Binding {
            context: context.into(),
            path,
        }
    }
}

impl Expression {
    /// Whether evaluation depends on any context.
    pub fn is_dynamic(&self) -> bool {
        !self.bindings().is_empty()
    }

    /// Every binding in the expression, including those nested in operation
    /// parameters, in source order.
    pub fn bindings(&self) -> Vec<&Binding> {
        let mut out = Vec::new();
        match self {
            Expression::Literal(_) => {}
            Expression::Single(single) => single.collect_bindings(&mut out),
            Expression::Template(nodes) => {
                for node in nodes {
                    if let TemplateNode::Expression(single) = node {
                        single.collect_bindings(&mut out);
                    }
                }
            }
        }
        out
    }
}

impl SingleExpression {
    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a Binding>) {
        match self {
            SingleExpression::Binding(binding) => out.push(binding),
            SingleExpression::Operation(operation) => operation.collect_bindings(out),
        }
    }
}

impl Operation {
    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a Binding>) {
        for parameter in &self.parameters {
            match parameter {
                Parameter::Literal(_) => {}
                Parameter::Binding(binding) => out.push(binding),
                Parameter::Operation(nested) => nested.collect_bindings(out),
            }
        }
    }
}

// ------------------------------------------------------------------ Display

/// Escapes literal template text so that it parses back to itself.
pub(crate) fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace("@{", "\\@{")
}

fn write_literal_parameter(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) => {
            f.write_str("'")?;
            f.write_str(&s.replace('\\', "\\\\").replace('\'', "\\'"))?;
            f.write_str("'")
        }
        Value::Double(n) => f.write_str(&format_double(*n)),
        other => write!(f, "{other}"),
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.context)?;
        match self.path.first() {
            None => Ok(()),
            Some(bind_value::PathNode::Index(_)) => write!(f, "{}", self.path),
            Some(bind_value::PathNode::Key(_)) => write!(f, ".{}", self.path),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Literal(value) => write_literal_parameter(f, value),
            Parameter::Binding(binding) => write!(f, "{binding}"),
            Parameter::Operation(operation) => write!(f, "{operation}"),
        }
    }
}

impl fmt::Display for SingleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingleExpression::Binding(binding) => write!(f, "{binding}"),
            SingleExpression::Operation(operation) => write!(f, "{operation}"),
        }
    }
}

impl fmt::Display for Expression {
    /// Renders the raw string this expression parses from.
    ///
    /// Non-string literals render as their JSON text, which
    /// [`Expression::from_value`] would not turn back into the same literal
    /// kind; use the value itself for those.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Value::String(s)) => f.write_str(&escape_text(s)),
            Expression::Literal(other) => write!(f, "{other}"),
            Expression::Single(single) => write!(f, "@{{{single}}}"),
            Expression::Template(nodes) => {
                for node in nodes {
                    match node {
                        TemplateNode::Text(text) => f.write_str(&escape_text(text))?,
                        TemplateNode::Expression(single) => write!(f, "@{{{single}}}")?,
                    }
                }
                Ok(())
            }
        }
    }
}
