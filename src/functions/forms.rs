//! Functional forms: arithmetic, comparison, logical connectives, `BOUND`,
//! `IF`, `COALESCE`, `EXISTS`, `SAMETERM` and `IN`.

use crate::compiler::RawContext;
use crate::error::{FilterError, Result};
use crate::registry::{Coercion, Implementation, Operator, RegistryBuilder};
use crate::types::term::{self, Term};
use crate::types::{Expression, Value};

pub(crate) fn register(builder: &mut RegistryBuilder) {
    use Coercion::{Boolean, Numeric};
    use Implementation::{Binary, Raw, Unary, Unsupported};

    builder
        .register(Operator::Add, Numeric, Numeric, Binary(add))
        .register(Operator::Subtract, Numeric, Numeric, Binary(subtract))
        .register(Operator::Multiply, Numeric, Numeric, Binary(multiply))
        .register(Operator::Divide, Numeric, Numeric, Binary(divide))
        .register(Operator::Equal, Numeric, Boolean, Binary(equal))
        .register(Operator::NotEqual, Numeric, Boolean, Binary(not_equal))
        .register(Operator::Less, Numeric, Boolean, Binary(less))
        .register(Operator::LessOrEqual, Numeric, Boolean, Binary(less_or_equal))
        .register(Operator::Greater, Numeric, Boolean, Binary(greater))
        .register(Operator::GreaterOrEqual, Numeric, Boolean, Binary(greater_or_equal))
        .register(Operator::Not, Boolean, Boolean, Unary(not))
        .register(Operator::And, Boolean, Boolean, Binary(and))
        .register(Operator::Or, Boolean, Boolean, Binary(or))
        .register_raw(Operator::Bound, Raw { arity: 1, call: bound })
        .register_raw(Operator::If, Raw { arity: 3, call: if_then_else })
        .register_raw(Operator::Coalesce, Raw { arity: 2, call: coalesce })
        .register_raw(Operator::Exists, Unsupported { arity: 1 })
        .register_raw(Operator::NotExists, Unsupported { arity: 1 })
        .register(Operator::SameTerm, Coercion::None, Boolean, Binary(same_term))
        .unsupported(Operator::In, 2)
        .unsupported(Operator::NotIn, 2);
}

fn numbers(operator: Operator, a: &Value, b: &Value) -> Result<(f64, f64)> {
    Ok((a.number(operator.name())?, b.number(operator.name())?))
}

fn add(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::Add, &a, &b)?;
    Ok(Value::Number(a + b))
}

fn subtract(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::Subtract, &a, &b)?;
    Ok(Value::Number(a - b))
}

fn multiply(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::Multiply, &a, &b)?;
    Ok(Value::Number(a * b))
}

/// IEEE division: a zero divisor yields `INF`, `-INF` or `NaN`.
fn divide(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::Divide, &a, &b)?;
    Ok(Value::Number(a / b))
}

#[allow(clippy::float_cmp)]
fn equal(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::Equal, &a, &b)?;
    Ok(Value::Boolean(a == b))
}

#[allow(clippy::float_cmp)]
fn not_equal(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::NotEqual, &a, &b)?;
    Ok(Value::Boolean(a != b))
}

fn less(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::Less, &a, &b)?;
    Ok(Value::Boolean(a < b))
}

fn less_or_equal(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::LessOrEqual, &a, &b)?;
    Ok(Value::Boolean(a <= b))
}

fn greater(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::Greater, &a, &b)?;
    Ok(Value::Boolean(a > b))
}

fn greater_or_equal(a: Value, b: Value) -> Result<Value> {
    let (a, b) = numbers(Operator::GreaterOrEqual, &a, &b)?;
    Ok(Value::Boolean(a >= b))
}

fn not(a: Value) -> Result<Value> {
    Ok(Value::Boolean(!a.boolean(Operator::Not.name())?))
}

// Both operands are evaluated before the call; only IF and COALESCE
// control their own evaluation order.
fn and(a: Value, b: Value) -> Result<Value> {
    let name = Operator::And.name();
    Ok(Value::Boolean(a.boolean(name)? && b.boolean(name)?))
}

fn or(a: Value, b: Value) -> Result<Value> {
    let name = Operator::Or.name();
    Ok(Value::Boolean(a.boolean(name)? || b.boolean(name)?))
}

fn same_term(a: Value, b: Value) -> Result<Value> {
    let name = Operator::SameTerm.name();
    Ok(Value::Boolean(a.term(name)? == b.term(name)?))
}

fn arity_error(ctx: &RawContext<'_>, expected: usize, actual: usize) -> FilterError {
    FilterError::ArityMismatch {
        operator: ctx.operator().name().to_string(),
        expected,
        actual,
    }
}

/// Tests key presence; the argument must be a variable, never a value.
fn bound(args: &[Expression], ctx: &RawContext<'_>) -> Result<Term> {
    match args {
        [Expression::Variable(name)] => Ok(term::boolean_literal(ctx.bindings().contains_key(name))),
        [other] => Err(FilterError::invalid_argument(
            Operator::Bound.name(),
            format!("{other} is not a variable"),
        )),
        _ => Err(arity_error(ctx, 1, args.len())),
    }
}

fn if_then_else(args: &[Expression], ctx: &RawContext<'_>) -> Result<Term> {
    let [condition, then, otherwise] = args else {
        return Err(arity_error(ctx, 3, args.len()));
    };
    let condition = ctx.evaluate(condition)?;
    if term::effective_boolean_value(&condition) {
        ctx.evaluate(then)
    } else {
        ctx.evaluate(otherwise)
    }
}

/// First argument that evaluates without error.
///
/// Nested operators were checked when the enclosing expression compiled,
/// so only evaluation errors reach this point.
fn coalesce(args: &[Expression], ctx: &RawContext<'_>) -> Result<Term> {
    let mut last_error = None;
    for arg in args {
        match ctx.evaluate(arg) {
            Ok(value) => return Ok(value),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| arity_error(ctx, 2, args.len())))
}
