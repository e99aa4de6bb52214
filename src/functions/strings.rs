//! Functions on strings.
//!
//! Functions deriving a new lexical form from a literal keep that literal's
//! kind (language tag or datatype) through [`term::construct_literal`].
//! Two-argument matching functions enforce argument compatibility first.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use lru::LruCache;
use regex::Regex;

use crate::error::{FilterError, Result};
use crate::registry::{Coercion, Implementation, Operator, RegistryBuilder};
use crate::types::term::{self, LiteralParts};
use crate::types::Value;

const REGEX_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

// REGEX patterns are usually constant across a query; keep the compiled
// form per thread instead of rebuilding it for every row.
thread_local! {
    static REGEX_CACHE: RefCell<LruCache<String, Regex>> =
        RefCell::new(LruCache::new(REGEX_CACHE_SIZE));
}

pub(crate) fn register(builder: &mut RegistryBuilder) {
    use Coercion::Boolean;
    use Implementation::{Binary, Ternary, Unary};

    builder
        .register(Operator::StrLen, Coercion::None, Coercion::None, Unary(str_len))
        .register(Operator::Substr, Coercion::None, Coercion::None, Ternary(substr))
        .register(Operator::Ucase, Coercion::None, Coercion::None, Unary(ucase))
        .register(Operator::Lcase, Coercion::None, Coercion::None, Unary(lcase))
        .register(Operator::StrStarts, Coercion::None, Boolean, Binary(str_starts))
        .register(Operator::StrEnds, Coercion::None, Boolean, Binary(str_ends))
        .register(Operator::Contains, Coercion::None, Boolean, Binary(contains))
        .register(Operator::StrBefore, Coercion::None, Coercion::None, Binary(str_before))
        .register(Operator::StrAfter, Coercion::None, Coercion::None, Binary(str_after))
        .unsupported(Operator::EncodeForUri, 1)
        .register(Operator::Concat, Coercion::None, Coercion::None, Binary(concat))
        .register(Operator::LangMatches, Coercion::None, Boolean, Binary(lang_matches))
        .register(Operator::Regex, Coercion::None, Boolean, Binary(regex))
        .unsupported(Operator::Replace, 3);
}

fn literal(operator: Operator, value: &Value) -> Result<LiteralParts<'_>> {
    let t = value.term(operator.name())?;
    term::literal_parts(t)
        .ok_or_else(|| FilterError::invalid_argument(operator.name(), format!("{t} is not a literal")))
}

/// Lexical forms of two compatible literals.
fn compatible<'a>(operator: Operator, left: &'a Value, right: &'a Value) -> Result<(&'a str, &'a str)> {
    let (l, r) = (left.term(operator.name())?, right.term(operator.name())?);
    if !term::compatible_arguments(l, r) {
        return Err(FilterError::ArgumentCompatibilityViolation {
            operator: operator.name().to_string(),
            left: l.to_string(),
            right: r.to_string(),
        });
    }
    Ok((literal(operator, left)?.lexical, literal(operator, right)?.lexical))
}

fn str_len(s: Value) -> Result<Value> {
    let parts = literal(Operator::StrLen, &s)?;
    let len = parts.lexical.chars().count();
    Ok(Value::Term(term::typed_literal(&len.to_string(), term::XSD_INTEGER)))
}

/// Characters at 1-based positions `p` with `round(start) <= p < round(start) + round(length)`.
#[allow(clippy::cast_precision_loss)]
fn substr(s: Value, start: Value, length: Value) -> Result<Value> {
    let op = Operator::Substr;
    let source = s.term(op.name())?;
    let lexical = literal(op, &s)?.lexical;
    let number = |v: &Value| -> Result<f64> {
        let lex = literal(op, v)?.lexical;
        term::parse_number(lex)
            .ok_or_else(|| FilterError::invalid_argument(op.name(), format!("{lex} is not numeric")))
    };
    let first = xpath_round(number(&start)?);
    let end = first + xpath_round(number(&length)?);
    let out: String = lexical
        .chars()
        .enumerate()
        .filter(|(i, _)| {
            let position = (*i + 1) as f64;
            position >= first && position < end
        })
        .map(|(_, c)| c)
        .collect();
    Ok(Value::Term(term::construct_literal(&out, source)))
}

/// Rounds half toward positive infinity, as `fn:round` does.
fn xpath_round(n: f64) -> f64 {
    (n + 0.5).floor()
}

fn ucase(s: Value) -> Result<Value> {
    let lexical = literal(Operator::Ucase, &s)?.lexical.to_uppercase();
    Ok(Value::Term(term::construct_literal(&lexical, s.term(Operator::Ucase.name())?)))
}

fn lcase(s: Value) -> Result<Value> {
    let lexical = literal(Operator::Lcase, &s)?.lexical.to_lowercase();
    Ok(Value::Term(term::construct_literal(&lexical, s.term(Operator::Lcase.name())?)))
}

fn str_starts(s: Value, prefix: Value) -> Result<Value> {
    let (s, prefix) = compatible(Operator::StrStarts, &s, &prefix)?;
    Ok(Value::Boolean(s.starts_with(prefix)))
}

fn str_ends(s: Value, suffix: Value) -> Result<Value> {
    let (s, suffix) = compatible(Operator::StrEnds, &s, &suffix)?;
    Ok(Value::Boolean(s.ends_with(suffix)))
}

fn contains(s: Value, needle: Value) -> Result<Value> {
    let (s, needle) = compatible(Operator::Contains, &s, &needle)?;
    Ok(Value::Boolean(s.contains(needle)))
}

// A missing needle yields the empty simple literal, whatever the source kind.
fn str_before(s: Value, needle: Value) -> Result<Value> {
    let (lexical, n) = compatible(Operator::StrBefore, &s, &needle)?;
    let out = match lexical.find(n) {
        Some(at) => term::construct_literal(&lexical[..at], s.term(Operator::StrBefore.name())?),
        None => term::simple_literal(""),
    };
    Ok(Value::Term(out))
}

fn str_after(s: Value, needle: Value) -> Result<Value> {
    let (lexical, n) = compatible(Operator::StrAfter, &s, &needle)?;
    let out = match lexical.find(n) {
        Some(at) => {
            term::construct_literal(&lexical[at + n.len()..], s.term(Operator::StrAfter.name())?)
        }
        None => term::simple_literal(""),
    };
    Ok(Value::Term(out))
}

fn concat(a: Value, b: Value) -> Result<Value> {
    let joined = format!(
        "{}{}",
        literal(Operator::Concat, &a)?.lexical,
        literal(Operator::Concat, &b)?.lexical
    );
    Ok(Value::Term(term::construct_literal(&joined, a.term(Operator::Concat.name())?)))
}

/// Basic language range matching: `*` matches any non-empty tag, otherwise
/// the range must equal the tag or be a `-`-delimited prefix of it, ignoring case.
fn lang_matches(tag: Value, range: Value) -> Result<Value> {
    let tag = literal(Operator::LangMatches, &tag)?.lexical.to_lowercase();
    let range = literal(Operator::LangMatches, &range)?.lexical.to_lowercase();
    let matched = if range == "*" {
        !tag.is_empty()
    } else {
        tag == range
            || tag
                .strip_prefix(&range)
                .is_some_and(|rest| rest.starts_with('-'))
    };
    Ok(Value::Boolean(matched))
}

fn regex(text: Value, pattern: Value) -> Result<Value> {
    let text = literal(Operator::Regex, &text)?.lexical;
    let pattern = literal(Operator::Regex, &pattern)?.lexical;
    let matched = REGEX_CACHE.with(|cache| -> Result<bool> {
        let mut cache = cache.borrow_mut();
        if let Some(re) = cache.get(pattern) {
            return Ok(re.is_match(text));
        }
        let re = Regex::new(pattern).map_err(|e| {
            FilterError::invalid_argument(Operator::Regex.name(), format!("invalid pattern: {e}"))
        })?;
        let matched = re.is_match(text);
        cache.put(pattern.to_string(), re);
        Ok(matched)
    })?;
    Ok(Value::Boolean(matched))
}
