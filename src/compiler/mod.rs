//! Expression compiler.
//!
//! Turns an [`Expression`] into a [`CompiledEvaluator`]: a tree of closures
//! built once per expression and invoked once per solution row. Operator
//! lookup and arity checks happen here, before any bindings arrive.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{FilterError, Result};
use crate::random::RandomSource;
use crate::registry::{Implementation, Operator, OperatorDescriptor, OperatorRegistry};
use crate::types::term::{self, Term};
use crate::types::{Bindings, Expression};

/// Compiled node: evaluates against one set of bindings.
type EvalFn = Arc<dyn Fn(&Bindings) -> Result<Term> + Send + Sync>;

/// Builds evaluation closures against one registry and random source.
#[derive(Clone)]
pub struct Compiler {
    registry: Arc<OperatorRegistry>,
    random: Arc<dyn RandomSource>,
    max_depth: usize,
}

impl Compiler {
    /// Creates a compiler.
    #[must_use]
    pub fn new(
        registry: Arc<OperatorRegistry>,
        random: Arc<dyn RandomSource>,
        max_depth: usize,
    ) -> Self {
        Self {
            registry,
            random,
            max_depth,
        }
    }

    /// Returns the registry operators are resolved against.
    #[must_use]
    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Compiles an expression.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperator` for unknown or stub operators,
    /// `ArityMismatch` if an operation has the wrong number of arguments, and
    /// `ExpressionTooDeep` if the tree is nested beyond the configured bound.
    pub fn compile(&self, expr: &Expression) -> Result<CompiledEvaluator> {
        let root = self.compile_node(expr, 1)?;
        Ok(CompiledEvaluator {
            root: Some(root),
            expression: Some(Arc::new(expr.clone())),
        })
    }

    /// Compiles an expression that may be absent.
    ///
    /// An absent expression yields the no-op evaluator.
    ///
    /// # Errors
    ///
    /// See [`Compiler::compile`].
    pub fn compile_optional(&self, expr: Option<&Expression>) -> Result<CompiledEvaluator> {
        match expr {
            Some(expr) => self.compile(expr),
            None => Ok(CompiledEvaluator::noop()),
        }
    }

    fn compile_node(&self, expr: &Expression, depth: usize) -> Result<EvalFn> {
        if depth > self.max_depth {
            return Err(FilterError::ExpressionTooDeep {
                max_depth: self.max_depth,
            });
        }
        match expr {
            Expression::Constant(text) => {
                let text = text.clone();
                Ok(Arc::new(move |_: &Bindings| Ok(text.clone())))
            }
            Expression::Variable(name) => {
                let name = name.clone();
                Ok(Arc::new(move |bindings: &Bindings| {
                    bindings
                        .get(&name)
                        .cloned()
                        .ok_or_else(|| FilterError::UnboundVariable(name.clone()))
                }))
            }
            Expression::Operation { operator, args } => {
                self.compile_operation(operator, args, depth)
            }
        }
    }

    fn compile_operation(&self, name: &str, args: &[Expression], depth: usize) -> Result<EvalFn> {
        let descriptor = self.check_operation(name, args.len())?;

        tracing::debug!(
            operator = name,
            arity = descriptor.arity,
            raw = descriptor.raw_expression,
            "compiled operation"
        );

        if descriptor.raw_expression {
            for arg in args {
                self.validate(arg, depth + 1)?;
            }
            return Ok(self.compile_raw(descriptor, args, depth));
        }

        let children = args
            .iter()
            .map(|arg| self.compile_node(arg, depth + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.compile_call(descriptor, children))
    }

    /// Resolves an operator and checks that it is implemented and called
    /// with its declared arity.
    fn check_operation(&self, name: &str, actual: usize) -> Result<OperatorDescriptor> {
        let descriptor = match self.registry.resolve(name) {
            Ok(descriptor) => *descriptor,
            Err(err) => {
                tracing::debug!(operator = name, "unknown operator rejected");
                return Err(err);
            }
        };

        if descriptor.implementation.is_unsupported() {
            tracing::debug!(operator = name, "unimplemented operator rejected");
            return Err(FilterError::UnsupportedOperator(name.to_string()));
        }
        if actual != descriptor.arity {
            tracing::debug!(
                operator = name,
                expected = descriptor.arity,
                actual,
                "arity mismatch"
            );
            return Err(FilterError::ArityMismatch {
                operator: name.to_string(),
                expected: descriptor.arity,
                actual,
            });
        }
        Ok(descriptor)
    }

    /// Applies the compile-time checks to a subtree without building it.
    ///
    /// Arguments of raw operators are compiled lazily, but an untaken
    /// branch must still be a well-formed expression.
    fn validate(&self, expr: &Expression, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(FilterError::ExpressionTooDeep {
                max_depth: self.max_depth,
            });
        }
        match expr {
            Expression::Constant(_) | Expression::Variable(_) => Ok(()),
            Expression::Operation { operator, args } => {
                self.check_operation(operator, args.len())?;
                args.iter().try_for_each(|arg| self.validate(arg, depth + 1))
            }
        }
    }

    /// Raw operators keep their arguments uncompiled and evaluate them on
    /// demand, so they control evaluation order themselves.
    fn compile_raw(&self, descriptor: OperatorDescriptor, args: &[Expression], depth: usize) -> EvalFn {
        let Implementation::Raw { call, .. } = descriptor.implementation else {
            let operator = descriptor.name();
            return Arc::new(move |_: &Bindings| Err(FilterError::UnsupportedOperator(operator.to_string())));
        };
        let args: Arc<[Expression]> = args.into();
        let compiler = self.clone();
        let operator = descriptor.operator;
        Arc::new(move |bindings: &Bindings| {
            tracing::trace!(operator = operator.name(), "evaluating raw operator");
            let ctx = RawContext {
                bindings,
                compiler: &compiler,
                operator,
                depth,
            };
            call(&args, &ctx)
        })
    }

    fn compile_call(&self, descriptor: OperatorDescriptor, children: Vec<EvalFn>) -> EvalFn {
        let random = Arc::clone(&self.random);
        let operator = descriptor.operator;
        Arc::new(move |bindings: &Bindings| {
            let terms = children
                .iter()
                .map(|child| child(bindings))
                .collect::<Result<Vec<Term>>>()?;
            let values = terms
                .iter()
                .map(|t| descriptor.argument_coercion.coerce_argument(operator.name(), t))
                .collect::<Result<Vec<_>>>()?;
            let result = descriptor
                .implementation
                .invoke(operator, values, random.as_ref())?;
            Ok(descriptor
                .result_coercion
                .coerce_result(result, terms.first().map(String::as_str)))
        })
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("operators", &self.registry.len())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/// Call context handed to raw-expression operators.
pub struct RawContext<'a> {
    bindings: &'a Bindings,
    compiler: &'a Compiler,
    operator: Operator,
    depth: usize,
}

impl RawContext<'_> {
    /// Returns the bindings of the current solution.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        self.bindings
    }

    /// Returns the operator being evaluated.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Compiles and evaluates one sub-expression against the current bindings.
    ///
    /// # Errors
    ///
    /// Returns any compile or evaluation error of the sub-expression.
    pub fn evaluate(&self, expr: &Expression) -> Result<Term> {
        let eval = self.compiler.compile_node(expr, self.depth + 1)?;
        eval(self.bindings)
    }
}

/// Reusable evaluator for one expression.
///
/// Stateless with respect to bindings: it may be invoked repeatedly and
/// from several threads at once.
#[derive(Clone)]
pub struct CompiledEvaluator {
    root: Option<EvalFn>,
    expression: Option<Arc<Expression>>,
}

impl CompiledEvaluator {
    /// Creates the evaluator of an absent expression, which returns nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            root: None,
            expression: None,
        }
    }

    /// Returns true if this is the no-op evaluator.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the expression this evaluator was compiled from.
    #[must_use]
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_deref()
    }

    /// Evaluates against one set of bindings.
    ///
    /// Returns `Ok(None)` only for the no-op evaluator.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while evaluating the tree.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<Option<Term>> {
        self.root.as_ref().map(|root| root(bindings)).transpose()
    }

    /// Evaluates and reduces the result to its effective boolean value.
    ///
    /// The no-op evaluator is vacuously true.
    ///
    /// # Errors
    ///
    /// See [`CompiledEvaluator::evaluate`].
    pub fn evaluate_ebv(&self, bindings: &Bindings) -> Result<bool> {
        Ok(self
            .evaluate(bindings)?
            .map_or(true, |t| term::effective_boolean_value(&t)))
    }

    /// Evaluates every row in parallel, keeping input order.
    #[must_use]
    pub fn evaluate_all(&self, rows: &[Bindings]) -> Vec<Result<Option<Term>>> {
        rows.par_iter().map(|row| self.evaluate(row)).collect()
    }
}

impl fmt::Debug for CompiledEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            Some(expr) => write!(f, "CompiledEvaluator({expr})"),
            None => f.write_str("CompiledEvaluator(noop)"),
        }
    }
}
