//! Evaluator facade.
//!
//! [`FilterEvaluator`] ties a registry, a random source and an
//! [`EvaluatorConfig`] together. Callers compile an expression once and
//! invoke the resulting [`CompiledEvaluator`] per solution row, or use
//! [`FilterEvaluator::evaluate`] for one-shot evaluation.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::compiler::{CompiledEvaluator, Compiler};
use crate::error::Result;
use crate::random::{RandomSource, SharedRng};
use crate::registry::OperatorRegistry;
use crate::types::{Bindings, Expression, Term};

/// Default maximum expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

static DEFAULT_EVALUATOR: Lazy<FilterEvaluator> = Lazy::new(FilterEvaluator::default);

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Maximum nesting depth accepted by the compiler.
    pub max_depth: usize,
    /// Seed for the random source (`None` = OS entropy).
    pub rng_seed: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            rng_seed: None,
        }
    }
}

impl EvaluatorConfig {
    /// Creates a new evaluator configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Seeds the random source.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Compiles and evaluates filter expressions.
#[derive(Debug, Clone)]
pub struct FilterEvaluator {
    config: EvaluatorConfig,
    compiler: Compiler,
}

impl FilterEvaluator {
    /// Creates an evaluator over the standard registry.
    #[must_use]
    pub fn new(config: EvaluatorConfig) -> Self {
        let random = seeded_source(&config);
        Self::with_parts(config, OperatorRegistry::standard(), random)
    }

    /// Creates an evaluator over a custom registry.
    #[must_use]
    pub fn with_registry(config: EvaluatorConfig, registry: Arc<OperatorRegistry>) -> Self {
        let random = seeded_source(&config);
        Self::with_parts(config, registry, random)
    }

    /// Creates an evaluator over the standard registry drawing randomness
    /// from `random`. The configured seed is ignored.
    #[must_use]
    pub fn with_random_source(config: EvaluatorConfig, random: Arc<dyn RandomSource>) -> Self {
        Self::with_parts(config, OperatorRegistry::standard(), random)
    }

    fn with_parts(
        config: EvaluatorConfig,
        registry: Arc<OperatorRegistry>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let compiler = Compiler::new(registry, random, config.max_depth);
        Self { config, compiler }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Returns the registry operators are resolved against.
    #[must_use]
    pub fn registry(&self) -> &OperatorRegistry {
        self.compiler.registry()
    }

    /// Compiles an expression into a reusable evaluator.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperator`, `ArityMismatch` or `ExpressionTooDeep`.
    pub fn compile(&self, expr: &Expression) -> Result<CompiledEvaluator> {
        self.compiler.compile(expr)
    }

    /// Compiles an expression that may be absent; `None` yields the no-op
    /// evaluator.
    ///
    /// # Errors
    ///
    /// See [`FilterEvaluator::compile`].
    pub fn compile_optional(&self, expr: Option<&Expression>) -> Result<CompiledEvaluator> {
        self.compiler.compile_optional(expr)
    }

    /// Compiles and evaluates an expression against one set of bindings.
    ///
    /// # Errors
    ///
    /// Returns any compile or evaluation error.
    pub fn evaluate(&self, expr: &Expression, bindings: &Bindings) -> Result<Term> {
        let compiled = self.compile(expr)?;
        // A compiled expression always has a root.
        Ok(compiled.evaluate(bindings)?.unwrap_or_default())
    }
}

fn seeded_source(config: &EvaluatorConfig) -> Arc<dyn RandomSource> {
    match config.rng_seed {
        Some(seed) => Arc::new(SharedRng::seeded(seed)),
        None => Arc::new(SharedRng::from_entropy()),
    }
}

impl Default for FilterEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

/// Compiles an expression with the default evaluator.
///
/// # Errors
///
/// See [`FilterEvaluator::compile`].
pub fn compile(expr: &Expression) -> Result<CompiledEvaluator> {
    DEFAULT_EVALUATOR.compile(expr)
}

/// Evaluates an expression once with the default evaluator.
///
/// # Errors
///
/// See [`FilterEvaluator::evaluate`].
pub fn evaluate(expr: &Expression, bindings: &Bindings) -> Result<Term> {
    DEFAULT_EVALUATOR.evaluate(expr, bindings)
}
