//! Operator registry.
//!
//! The registry maps each [`Operator`] to its calling metadata: arity,
//! argument coercion, result coercion, whether it receives raw
//! sub-expressions, and its implementation. It is assembled once by a
//! [`RegistryBuilder`] and is read-only afterwards, so a single instance is
//! shared by every compiled evaluator without locking.

mod operator;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::compiler::RawContext;
use crate::error::{FilterError, Result};
use crate::random::RandomSource;
use crate::types::term::{self, Term};
use crate::types::{Expression, Value};

pub use operator::Operator;

/// Process-wide registry holding the standard catalogue.
static STANDARD_REGISTRY: Lazy<Arc<OperatorRegistry>> =
    Lazy::new(|| Arc::new(crate::functions::standard_registry()));

/// Conversion applied to operator arguments before, or results after, the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    /// Pass terms through unchanged.
    None,
    /// Parse literal lexical forms as floats; retag numeric results.
    Numeric,
    /// Reduce arguments to their effective boolean value; map results onto
    /// the boolean sentinels.
    Boolean,
}

impl Coercion {
    /// Converts an evaluated argument term into the value handed to the
    /// implementation.
    ///
    /// # Errors
    ///
    /// `Numeric` fails with `InvalidArgument` if the term is not a literal or
    /// its lexical form is not a number.
    pub fn coerce_argument(self, operator: &str, arg: &str) -> Result<Value> {
        match self {
            Coercion::None => Ok(Value::Term(arg.to_string())),
            Coercion::Boolean => Ok(Value::Boolean(term::effective_boolean_value(arg))),
            Coercion::Numeric => {
                let lexical = term::literal_value(arg).ok_or_else(|| {
                    FilterError::invalid_argument(operator, format!("{arg} is not a literal"))
                })?;
                term::parse_number(lexical).map(Value::Number).ok_or_else(|| {
                    FilterError::invalid_argument(operator, format!("{arg} is not numeric"))
                })
            }
        }
    }

    /// Converts an implementation's return value into the result term.
    ///
    /// `Numeric` tags a number with the datatype of `first_arg` (the first
    /// argument before coercion), or `xsd:integer` if it carries none. No
    /// datatype promotion is applied.
    #[must_use]
    pub fn coerce_result(self, value: Value, first_arg: Option<&str>) -> Term {
        match (self, value) {
            (Coercion::Numeric, Value::Number(n)) => {
                let datatype = first_arg
                    .and_then(term::literal_datatype)
                    .unwrap_or(term::XSD_INTEGER);
                term::typed_literal(&term::format_number(n), datatype)
            }
            (Coercion::Boolean, value) if !matches!(value, Value::Term(_)) => {
                term::boolean_literal(value.is_truthy())
            }
            (_, Value::Term(t)) => t,
            (_, Value::Number(n)) => term::typed_literal(&term::format_number(n), term::XSD_DOUBLE),
            (_, Value::Boolean(b)) => term::boolean_literal(b),
        }
    }
}

/// Signature of operators that receive uncompiled sub-expressions.
pub type RawFn = fn(&[Expression], &RawContext<'_>) -> Result<Term>;

/// Operator implementation, shaped by the number of arguments it takes.
///
/// The declared arity of a descriptor is read off this shape.
#[derive(Clone, Copy)]
pub enum Implementation {
    /// No arguments; may draw from the random source.
    Nullary(fn(&dyn RandomSource) -> Result<Value>),
    /// One coerced argument.
    Unary(fn(Value) -> Result<Value>),
    /// Two coerced arguments.
    Binary(fn(Value, Value) -> Result<Value>),
    /// Three coerced arguments.
    Ternary(fn(Value, Value, Value) -> Result<Value>),
    /// Uncompiled arguments plus the binding context.
    Raw { arity: usize, call: RawFn },
    /// Declared in the catalogue but not implemented.
    Unsupported { arity: usize },
}

impl Implementation {
    /// Returns the number of arguments this implementation takes.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Implementation::Nullary(_) => 0,
            Implementation::Unary(_) => 1,
            Implementation::Binary(_) => 2,
            Implementation::Ternary(_) => 3,
            Implementation::Raw { arity, .. } | Implementation::Unsupported { arity } => *arity,
        }
    }

    /// Returns true if this entry is an unimplemented stub.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Implementation::Unsupported { .. })
    }

    /// Calls a value-level implementation with already-coerced arguments.
    ///
    /// The compiler checks arity before building a call, so a length
    /// mismatch here only comes from callers invoking an implementation
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns the implementation's error, `ArityMismatch` if `args` has the
    /// wrong length, or `UnsupportedOperator` for stubs and raw operators,
    /// which are never invoked with values.
    pub fn invoke(
        &self,
        operator: Operator,
        args: Vec<Value>,
        random: &dyn RandomSource,
    ) -> Result<Value> {
        let actual = args.len();
        let mismatch = |_| FilterError::ArityMismatch {
            operator: operator.name().to_string(),
            expected: self.arity(),
            actual,
        };
        match self {
            Implementation::Nullary(f) => {
                let [] = <[Value; 0]>::try_from(args).map_err(mismatch)?;
                f(random)
            }
            Implementation::Unary(f) => {
                let [a] = <[Value; 1]>::try_from(args).map_err(mismatch)?;
                f(a)
            }
            Implementation::Binary(f) => {
                let [a, b] = <[Value; 2]>::try_from(args).map_err(mismatch)?;
                f(a, b)
            }
            Implementation::Ternary(f) => {
                let [a, b, c] = <[Value; 3]>::try_from(args).map_err(mismatch)?;
                f(a, b, c)
            }
            Implementation::Raw { .. } | Implementation::Unsupported { .. } => {
                Err(FilterError::UnsupportedOperator(operator.name().to_string()))
            }
        }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::Nullary(_) => f.write_str("Nullary"),
            Implementation::Unary(_) => f.write_str("Unary"),
            Implementation::Binary(_) => f.write_str("Binary"),
            Implementation::Ternary(_) => f.write_str("Ternary"),
            Implementation::Raw { arity, .. } => write!(f, "Raw({arity})"),
            Implementation::Unsupported { arity } => write!(f, "Unsupported({arity})"),
        }
    }
}

/// Calling metadata for one operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorDescriptor {
    /// Operator identifier.
    pub operator: Operator,
    /// Number of arguments, inferred from the implementation.
    pub arity: usize,
    /// Conversion applied to each evaluated argument.
    pub argument_coercion: Coercion,
    /// Conversion applied to the implementation's return value.
    pub result_coercion: Coercion,
    /// Receives uncompiled sub-expressions and the bindings.
    pub raw_expression: bool,
    /// The implementation itself.
    pub implementation: Implementation,
}

impl OperatorDescriptor {
    /// Returns the registry key of the described operator.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.operator.name()
    }
}

/// Immutable catalogue of operator descriptors.
#[derive(Debug)]
pub struct OperatorRegistry {
    descriptors: HashMap<Operator, OperatorDescriptor>,
}

impl OperatorRegistry {
    /// Starts assembling a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the shared registry holding the standard catalogue.
    #[must_use]
    pub fn standard() -> Arc<OperatorRegistry> {
        Arc::clone(&STANDARD_REGISTRY)
    }

    /// Looks up the descriptor of an operator.
    #[must_use]
    pub fn get(&self, operator: Operator) -> Option<&OperatorDescriptor> {
        self.descriptors.get(&operator)
    }

    /// Resolves an operator name to its descriptor.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperator` if the name is unknown or not registered.
    pub fn resolve(&self, name: &str) -> Result<&OperatorDescriptor> {
        Operator::from_name(name)
            .and_then(|op| self.get(op))
            .ok_or_else(|| FilterError::UnsupportedOperator(name.to_string()))
    }

    /// Returns the number of registered operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no operators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns the registered descriptors in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &OperatorDescriptor> {
        Operator::ALL.iter().filter_map(|op| self.descriptors.get(op))
    }
}

/// Assembles an [`OperatorRegistry`] in one construction step.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: HashMap<Operator, OperatorDescriptor>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a value-level operator.
    pub fn register(
        &mut self,
        operator: Operator,
        argument_coercion: Coercion,
        result_coercion: Coercion,
        implementation: Implementation,
    ) -> &mut Self {
        self.insert(operator, argument_coercion, result_coercion, false, implementation)
    }

    /// Registers an operator that receives uncompiled sub-expressions.
    pub fn register_raw(&mut self, operator: Operator, implementation: Implementation) -> &mut Self {
        self.insert(operator, Coercion::None, Coercion::None, true, implementation)
    }

    /// Declares an operator that is part of the catalogue but not implemented.
    pub fn unsupported(&mut self, operator: Operator, arity: usize) -> &mut Self {
        self.insert(
            operator,
            Coercion::None,
            Coercion::None,
            false,
            Implementation::Unsupported { arity },
        )
    }

    fn insert(
        &mut self,
        operator: Operator,
        argument_coercion: Coercion,
        result_coercion: Coercion,
        raw_expression: bool,
        implementation: Implementation,
    ) -> &mut Self {
        self.descriptors.insert(
            operator,
            OperatorDescriptor {
                operator,
                arity: implementation.arity(),
                argument_coercion,
                result_coercion,
                raw_expression,
                implementation,
            },
        );
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> OperatorRegistry {
        tracing::debug!(operators = self.descriptors.len(), "operator registry built");
        OperatorRegistry {
            descriptors: self.descriptors,
        }
    }
}
