//! Functions on RDF terms.

use crate::error::{FilterError, Result};
use crate::random::RandomSource;
use crate::registry::{Coercion, Implementation, Operator, RegistryBuilder};
use crate::types::term::{self, LiteralParts};
use crate::types::Value;

pub(crate) fn register(builder: &mut RegistryBuilder) {
    use Coercion::Boolean;
    use Implementation::{Binary, Nullary, Unary};

    builder
        .register(Operator::IsIri, Coercion::None, Boolean, Unary(is_iri))
        .register(Operator::IsUri, Coercion::None, Boolean, Unary(is_iri))
        .register(Operator::IsBlank, Coercion::None, Boolean, Unary(is_blank))
        .register(Operator::IsLiteral, Coercion::None, Boolean, Unary(is_literal))
        .register(Operator::IsNumeric, Coercion::None, Boolean, Unary(is_numeric))
        .register(Operator::Str, Coercion::None, Coercion::None, Unary(to_str))
        .register(Operator::Lang, Coercion::None, Coercion::None, Unary(lang))
        .register(Operator::Datatype, Coercion::None, Coercion::None, Unary(datatype))
        .register(Operator::Iri, Coercion::None, Coercion::None, Unary(iri))
        .register(Operator::Uri, Coercion::None, Coercion::None, Unary(uri))
        .unsupported(Operator::Bnode, 1)
        .register(Operator::StrDt, Coercion::None, Coercion::None, Binary(str_dt))
        .register(Operator::StrLang, Coercion::None, Coercion::None, Binary(str_lang))
        .register(Operator::Uuid, Coercion::None, Coercion::None, Nullary(uuid))
        .register(Operator::StrUuid, Coercion::None, Coercion::None, Nullary(str_uuid));
}

fn is_iri(t: Value) -> Result<Value> {
    Ok(Value::Boolean(term::is_iri(t.term(Operator::IsIri.name())?)))
}

fn is_blank(t: Value) -> Result<Value> {
    Ok(Value::Boolean(term::is_blank(t.term(Operator::IsBlank.name())?)))
}

fn is_literal(t: Value) -> Result<Value> {
    Ok(Value::Boolean(term::is_literal(t.term(Operator::IsLiteral.name())?)))
}

fn is_numeric(t: Value) -> Result<Value> {
    Ok(Value::Boolean(term::is_numeric_literal(t.term(Operator::IsNumeric.name())?)))
}

fn literal<'a>(operator: Operator, t: &'a str) -> Result<LiteralParts<'a>> {
    term::literal_parts(t)
        .ok_or_else(|| FilterError::invalid_argument(operator.name(), format!("{t} is not a literal")))
}

/// Lexical form of a literal, or the text of an IRI, as a simple literal.
fn to_str(t: Value) -> Result<Value> {
    let name = Operator::Str.name();
    let t = t.term(name)?;
    if term::is_iri(t) {
        return Ok(Value::Term(term::simple_literal(t)));
    }
    let parts = literal(Operator::Str, t)?;
    Ok(Value::Term(term::simple_literal(parts.lexical)))
}

fn lang(t: Value) -> Result<Value> {
    let parts = literal(Operator::Lang, t.term(Operator::Lang.name())?)?;
    Ok(Value::Term(term::simple_literal(parts.language.unwrap_or(""))))
}

fn datatype(t: Value) -> Result<Value> {
    let t = t.term(Operator::Datatype.name())?;
    term::effective_datatype(t)
        .map(|dt| Value::Term(dt.to_string()))
        .ok_or_else(|| {
            FilterError::invalid_argument(Operator::Datatype.name(), format!("{t} is not a literal"))
        })
}

fn to_iri(operator: Operator, t: &str) -> Result<Value> {
    if term::is_iri(t) {
        return Ok(Value::Term(t.to_string()));
    }
    if term::is_simple_or_plain_literal(t) {
        if let Some(lexical) = term::literal_value(t) {
            return Ok(Value::Term(lexical.to_string()));
        }
    }
    Err(FilterError::invalid_argument(
        operator.name(),
        format!("{t} is neither an IRI nor a simple literal"),
    ))
}

fn iri(t: Value) -> Result<Value> {
    to_iri(Operator::Iri, t.term(Operator::Iri.name())?)
}

fn uri(t: Value) -> Result<Value> {
    to_iri(Operator::Uri, t.term(Operator::Uri.name())?)
}

fn str_dt(lexical: Value, datatype: Value) -> Result<Value> {
    let name = Operator::StrDt.name();
    let (lexical, datatype) = (lexical.term(name)?, datatype.term(name)?);
    if !term::is_simple_or_plain_literal(lexical) {
        return Err(FilterError::invalid_argument(
            name,
            format!("{lexical} is not a simple literal"),
        ));
    }
    if !term::is_iri(datatype) {
        return Err(FilterError::invalid_argument(name, format!("{datatype} is not an IRI")));
    }
    let parts = literal(Operator::StrDt, lexical)?;
    Ok(Value::Term(term::typed_literal(parts.lexical, datatype)))
}

fn str_lang(lexical: Value, language: Value) -> Result<Value> {
    let name = Operator::StrLang.name();
    let (lexical, language) = (lexical.term(name)?, language.term(name)?);
    if !term::is_simple_or_plain_literal(lexical) {
        return Err(FilterError::invalid_argument(
            name,
            format!("{lexical} is not a simple literal"),
        ));
    }
    let tag = literal(Operator::StrLang, language)?.lexical;
    if tag.is_empty() {
        return Err(FilterError::invalid_argument(name, "language tag is empty"));
    }
    let parts = literal(Operator::StrLang, lexical)?;
    Ok(Value::Term(term::lang_literal(parts.lexical, tag)))
}

fn uuid(random: &dyn RandomSource) -> Result<Value> {
    Ok(Value::Term(format!("urn:uuid:{}", random.uuid_v4())))
}

fn str_uuid(random: &dyn RandomSource) -> Result<Value> {
    Ok(Value::Term(term::simple_literal(&random.uuid_v4().to_string())))
}
