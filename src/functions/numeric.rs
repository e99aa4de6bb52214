//! Functions on numerics and the XSD constructor functions.

use crate::error::Result;
use crate::random::RandomSource;
use crate::registry::{Coercion, Implementation, Operator, RegistryBuilder};
use crate::types::term;
use crate::types::Value;

pub(crate) fn register(builder: &mut RegistryBuilder) {
    use Coercion::Numeric;
    use Implementation::{Nullary, Unary};

    builder
        .register(Operator::Abs, Numeric, Numeric, Unary(abs))
        .register(Operator::Round, Numeric, Numeric, Unary(round))
        .register(Operator::Ceil, Numeric, Numeric, Unary(ceil))
        .register(Operator::Floor, Numeric, Numeric, Unary(floor))
        .register(Operator::Rand, Coercion::None, Coercion::None, Nullary(rand))
        .register(Operator::XsdDouble, Numeric, Coercion::None, Unary(xsd_double));

    for op in [
        Operator::XsdBoolean,
        Operator::XsdInteger,
        Operator::XsdDecimal,
        Operator::XsdFloat,
        Operator::XsdString,
        Operator::XsdDateTime,
    ] {
        builder.unsupported(op, 1);
    }
}

fn abs(n: Value) -> Result<Value> {
    Ok(Value::Number(n.number(Operator::Abs.name())?.abs()))
}

/// Rounds half toward positive infinity: `round(-2.5)` is `-2`.
fn round(n: Value) -> Result<Value> {
    Ok(Value::Number((n.number(Operator::Round.name())? + 0.5).floor()))
}

fn ceil(n: Value) -> Result<Value> {
    Ok(Value::Number(n.number(Operator::Ceil.name())?.ceil()))
}

fn floor(n: Value) -> Result<Value> {
    Ok(Value::Number(n.number(Operator::Floor.name())?.floor()))
}

fn rand(random: &dyn RandomSource) -> Result<Value> {
    let r = random.next_f64();
    Ok(Value::Term(term::typed_literal(&term::format_number(r), term::XSD_DOUBLE)))
}

fn xsd_double(n: Value) -> Result<Value> {
    let n = n.number(Operator::XsdDouble.name())?;
    Ok(Value::Term(term::typed_literal(&term::format_number(n), term::XSD_DOUBLE)))
}
