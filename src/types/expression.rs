//! Filter expression trees and solution bindings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map};

use crate::error::{FilterError, Result};

use super::term::Term;

/// Sigil that starts every variable name.
pub const VARIABLE_SIGIL: char = '?';

/// Variable name (sigil included) to term, for one candidate solution.
///
/// Absence of a key means the variable is unbound.
pub type Bindings = HashMap<String, Term>;

/// Pre-parsed filter expression.
///
/// Trees are immutable once built and may be shared freely between compiled
/// evaluators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Expression {
    /// IRI or literal in its final surface encoding.
    Constant(Term),

    /// Reference to a binding, named with its `?` sigil.
    Variable(String),

    /// Operator applied to ordered arguments.
    Operation {
        operator: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// Creates a constant term expression.
    #[must_use]
    pub fn constant(term: impl Into<Term>) -> Self {
        Expression::Constant(term.into())
    }

    /// Creates a variable reference, adding the sigil if it is missing.
    #[must_use]
    pub fn variable(name: &str) -> Self {
        if name.starts_with(VARIABLE_SIGIL) {
            Expression::Variable(name.to_string())
        } else {
            Expression::Variable(format!("{VARIABLE_SIGIL}{name}"))
        }
    }

    /// Creates an operation expression.
    #[must_use]
    pub fn operation(operator: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Operation {
            operator: operator.into(),
            args,
        }
    }

    /// Classifies a bare string node: variables start with the sigil,
    /// everything else is a constant term.
    #[must_use]
    pub fn from_node_text(text: &str) -> Self {
        if text.starts_with(VARIABLE_SIGIL) {
            Expression::Variable(text.to_string())
        } else {
            Expression::Constant(text.to_string())
        }
    }

    /// Returns the operator name if this is an operation.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        match self {
            Expression::Operation { operator, .. } => Some(operator),
            _ => None,
        }
    }

    /// Returns the nesting depth of this tree (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Variable(_) => 1,
            Expression::Operation { args, .. } => {
                1 + args.iter().map(Expression::depth).max().unwrap_or(0)
            }
        }
    }

    /// Returns every variable name referenced in this tree, in first-seen order.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Variable(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expression::Constant(_) => {}
            Expression::Operation { args, .. } => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    /// Decodes the external tree form.
    ///
    /// A JSON string is a variable if it starts with `?` and a constant
    /// otherwise; an object `{"operator": name, "args": [...]}` is an operation.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedExpressionType` for any other JSON shape.
    pub fn from_json(node: &serde_json::Value) -> Result<Self> {
        match node {
            serde_json::Value::String(text) => Ok(Expression::from_node_text(text)),
            serde_json::Value::Object(map) => {
                let operator = map.get("operator").and_then(serde_json::Value::as_str);
                let args = map.get("args").and_then(serde_json::Value::as_array);
                match (operator, args) {
                    (Some(operator), Some(args)) => Ok(Expression::Operation {
                        operator: operator.to_string(),
                        args: args.iter().map(Expression::from_json).collect::<Result<_>>()?,
                    }),
                    _ => Err(FilterError::UnsupportedExpressionType(node.to_string())),
                }
            }
            other => Err(FilterError::UnsupportedExpressionType(other.to_string())),
        }
    }

    /// Encodes this tree in the external form read by [`Expression::from_json`].
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Expression::Constant(text) | Expression::Variable(text) => {
                serde_json::Value::String(text.clone())
            }
            Expression::Operation { operator, args } => {
                let mut map = Map::new();
                map.insert("operator".into(), json!(operator));
                map.insert(
                    "args".into(),
                    serde_json::Value::Array(args.iter().map(Expression::to_json).collect()),
                );
                serde_json::Value::Object(map)
            }
        }
    }
}

impl TryFrom<serde_json::Value> for Expression {
    type Error = FilterError;

    fn try_from(node: serde_json::Value) -> Result<Self> {
        Expression::from_json(&node)
    }
}

impl From<Expression> for serde_json::Value {
    fn from(expr: Expression) -> Self {
        expr.to_json()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(text) | Expression::Variable(text) => f.write_str(text),
            Expression::Operation { operator, args } => {
                write!(f, "{operator}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
