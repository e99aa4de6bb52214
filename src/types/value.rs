//! Coerced argument values handed to operator implementations.

use crate::error::{FilterError, Result};

use super::term::{self, Term};

/// Runtime value passed into and out of operator implementations.
///
/// Argument coercion decides which variant an implementation receives:
/// `Numeric` yields [`Value::Number`], `Boolean` yields [`Value::Boolean`],
/// and no coercion passes the [`Value::Term`] through.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Uncoerced RDF term.
    Term(Term),
    /// Floating point number parsed from a literal.
    Number(f64),
    /// Effective boolean value.
    Boolean(bool),
}

impl Value {
    /// Attempts to extract a term reference.
    #[must_use]
    pub fn as_term(&self) -> Option<&str> {
        match self {
            Value::Term(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts a term, failing on behalf of `operator` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not a term.
    pub fn term(&self, operator: &str) -> Result<&str> {
        self.as_term()
            .ok_or_else(|| FilterError::invalid_argument(operator, format!("expected a term, got {self:?}")))
    }

    /// Extracts a number, failing on behalf of `operator` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not a number.
    pub fn number(&self, operator: &str) -> Result<f64> {
        self.as_number().ok_or_else(|| {
            FilterError::invalid_argument(operator, format!("expected a number, got {self:?}"))
        })
    }

    /// Extracts a bool, failing on behalf of `operator` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not a boolean.
    pub fn boolean(&self, operator: &str) -> Result<bool> {
        self.as_bool().ok_or_else(|| {
            FilterError::invalid_argument(operator, format!("expected a boolean, got {self:?}"))
        })
    }

    /// Returns the truthiness of this value.
    ///
    /// Numbers are true unless zero or NaN; terms use the effective boolean value.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Term(t) => term::effective_boolean_value(t),
        }
    }
}

impl From<Term> for Value {
    fn from(t: Term) -> Self {
        Value::Term(t)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Number(1.5).as_number(), Some(1.5));
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Term("\"a\"".into()).as_term(), Some("\"a\""));
        assert_eq!(Value::Number(1.5).as_bool(), None);
    }

    #[test]
    fn test_checked_accessor_names_operator() {
        let err = Value::Boolean(true).number("abs").unwrap_err();
        assert_eq!(err.operator(), Some("abs"));
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Number(2.0).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::Term(term::FALSE.to_string()).is_truthy());
        assert!(Value::Term("\"x\"".into()).is_truthy());
    }
}
