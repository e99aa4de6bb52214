//! ruzu-sparql - SPARQL filter-expression evaluator
//!
//! Evaluates the `FILTER`/`BIND` expression sublanguage of a SPARQL query
//! engine. A parsed [`Expression`] tree is compiled once against the
//! operator registry into a [`CompiledEvaluator`], which is then invoked per
//! solution row with that row's [`Bindings`] and returns the RDF term the
//! expression denotes.
//!
//! ```
//! use ruzu_sparql::{Bindings, Expression, FilterEvaluator};
//!
//! let expr = Expression::operation(
//!     ">",
//!     vec![
//!         Expression::variable("?age"),
//!         Expression::constant("\"18\"^^<http://www.w3.org/2001/XMLSchema#integer>"),
//!     ],
//! );
//! let filter = FilterEvaluator::default().compile(&expr).unwrap();
//!
//! let mut row = Bindings::new();
//! row.insert("?age".into(), "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>".into());
//! assert!(filter.evaluate_ebv(&row).unwrap());
//! ```

pub mod compiler;
pub mod error;
pub mod evaluator;
mod functions;
pub mod random;
pub mod registry;
pub mod types;

pub use compiler::{CompiledEvaluator, Compiler, RawContext};
pub use error::{FilterError, Result};
pub use evaluator::{compile, evaluate, EvaluatorConfig, FilterEvaluator};
pub use random::{RandomSource, SharedRng};
pub use registry::{Coercion, Operator, OperatorRegistry};
pub use types::{Bindings, Expression, Term, Value};
