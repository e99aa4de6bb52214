//! Error types for filter expression compilation and evaluation.

use thiserror::Error;

/// Result type alias using [`FilterError`].
pub type Result<T> = std::result::Result<T, FilterError>;

/// Error types for filter expression compilation and evaluation.
///
/// Every failure is surfaced to the caller; the evaluator never decides
/// whether a failing row is dropped or the whole query is aborted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Expression node matches none of constant, variable or operation.
    #[error("Unsupported expression type: {0}")]
    UnsupportedExpressionType(String),

    /// Variable has no entry in the supplied bindings.
    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    /// Operator is unknown, or declared but not implemented.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Argument count disagrees with the operator's declared arity.
    #[error("Arity mismatch: {operator} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        operator: String,
        expected: usize,
        actual: usize,
    },

    /// String function given literals with incompatible language tags.
    #[error("Incompatible arguments for {operator}: {left} and {right}")]
    ArgumentCompatibilityViolation {
        operator: String,
        left: String,
        right: String,
    },

    /// Argument has the wrong kind of term for the operator.
    #[error("Invalid argument for {operator}: {message}")]
    InvalidArgument { operator: String, message: String },

    /// Expression nesting exceeds the configured compile-time bound.
    #[error("Expression nesting exceeds maximum depth of {max_depth}")]
    ExpressionTooDeep { max_depth: usize },
}

impl FilterError {
    /// Creates an [`FilterError::InvalidArgument`] for the given operator.
    pub fn invalid_argument(operator: &str, message: impl Into<String>) -> Self {
        FilterError::InvalidArgument {
            operator: operator.to_string(),
            message: message.into(),
        }
    }

    /// Returns the operator name this error refers to, if any.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        match self {
            FilterError::UnsupportedOperator(operator)
            | FilterError::ArityMismatch { operator, .. }
            | FilterError::ArgumentCompatibilityViolation { operator, .. }
            | FilterError::InvalidArgument { operator, .. } => Some(operator),
            FilterError::UnsupportedExpressionType(_)
            | FilterError::UnboundVariable(_)
            | FilterError::ExpressionTooDeep { .. } => None,
        }
    }

    /// Returns true if this error was raised before any bindings were seen.
    #[must_use]
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            FilterError::UnsupportedExpressionType(_)
                | FilterError::UnsupportedOperator(_)
                | FilterError::ArityMismatch { .. }
                | FilterError::ExpressionTooDeep { .. }
        )
    }
}
