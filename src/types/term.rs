//! RDF term model and argument coercion helpers.
//!
//! Terms are carried as their surface encoding:
//! - bare IRI text: `http://example.org/alice`
//! - blank node: `_:b0`
//! - simple literal: `"lex"`
//! - typed literal: `"lex"^^<iri>` (the unbracketed `"lex"^^iri` form is also read)
//! - language-tagged literal: `"lex"@tag`
//!
//! Nothing here escapes or unescapes lexical forms; they are kept verbatim.

/// A string-encoded RDF term.
pub type Term = String;

/// XML Schema namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// `xsd:string`.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:boolean`.
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
/// `xsd:integer`.
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
/// `xsd:decimal`.
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
/// `xsd:float`.
pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
/// `xsd:double`.
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
/// `xsd:dateTime`.
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
/// `rdf:langString`.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Canonical true result of boolean-typed operators.
pub const TRUE: &str = "\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>";
/// Canonical false result of boolean-typed operators.
pub const FALSE: &str = "\"false\"^^<http://www.w3.org/2001/XMLSchema#boolean>";

/// Numeric XSD datatypes recognised by `ISNUMERIC`.
const NUMERIC_DATATYPES: &[&str] = &[
    "integer",
    "decimal",
    "float",
    "double",
    "nonPositiveInteger",
    "negativeInteger",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "positiveInteger",
];

/// Components of a literal term, borrowed from its encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralParts<'a> {
    /// Lexical form between the quotes.
    pub lexical: &'a str,
    /// Language tag, without the `@`.
    pub language: Option<&'a str>,
    /// Explicit datatype IRI, without angle brackets.
    pub datatype: Option<&'a str>,
}

/// Splits a literal into its lexical form, language tag and datatype.
///
/// Returns None if the term is not a literal.
#[must_use]
pub fn literal_parts(term: &str) -> Option<LiteralParts<'_>> {
    let body = term.strip_prefix('"')?;
    let close = body.rfind('"')?;
    let lexical = &body[..close];
    let suffix = &body[close + 1..];

    if suffix.is_empty() {
        return Some(LiteralParts {
            lexical,
            language: None,
            datatype: None,
        });
    }
    if let Some(tag) = suffix.strip_prefix('@') {
        return Some(LiteralParts {
            lexical,
            language: Some(tag),
            datatype: None,
        });
    }
    let iri = suffix.strip_prefix("^^")?;
    let iri = iri
        .strip_prefix('<')
        .and_then(|i| i.strip_suffix('>'))
        .unwrap_or(iri);
    Some(LiteralParts {
        lexical,
        language: None,
        datatype: Some(iri),
    })
}

/// Returns true if the term is a literal.
#[must_use]
pub fn is_literal(term: &str) -> bool {
    literal_parts(term).is_some()
}

/// Returns true if the term is a blank node.
#[must_use]
pub fn is_blank(term: &str) -> bool {
    term.starts_with("_:")
}

/// Returns true if the term is an IRI.
#[must_use]
pub fn is_iri(term: &str) -> bool {
    !term.is_empty() && !term.starts_with('"') && !is_blank(term)
}

/// Returns the lexical form of a literal.
#[must_use]
pub fn literal_value(term: &str) -> Option<&str> {
    literal_parts(term).map(|p| p.lexical)
}

/// Returns the explicit datatype IRI of a literal, if it carries one.
#[must_use]
pub fn literal_datatype(term: &str) -> Option<&str> {
    literal_parts(term).and_then(|p| p.datatype)
}

/// Returns the language tag of a literal, if it carries one.
#[must_use]
pub fn literal_language(term: &str) -> Option<&str> {
    literal_parts(term).and_then(|p| p.language)
}

/// Returns the datatype a literal denotes, including the implicit ones:
/// `xsd:string` for simple literals and `rdf:langString` for tagged ones.
#[must_use]
pub fn effective_datatype(term: &str) -> Option<&str> {
    let parts = literal_parts(term)?;
    Some(match (parts.datatype, parts.language) {
        (Some(dt), _) => dt,
        (None, Some(_)) => RDF_LANG_STRING,
        (None, None) => XSD_STRING,
    })
}

/// Returns true if the term is a literal with no datatype or with `xsd:string`.
///
/// Language-tagged literals are not plain in this sense.
#[must_use]
pub fn is_simple_or_plain_literal(term: &str) -> bool {
    matches!(
        literal_parts(term),
        Some(LiteralParts {
            language: None,
            datatype: None | Some(XSD_STRING),
            ..
        })
    )
}

/// Returns true if the term is a literal with a numeric XSD datatype.
#[must_use]
pub fn is_numeric_literal(term: &str) -> bool {
    literal_datatype(term)
        .and_then(|dt| dt.strip_prefix(XSD))
        .is_some_and(|local| NUMERIC_DATATYPES.contains(&local))
}

/// Builds a simple literal `"lex"`.
#[must_use]
pub fn simple_literal(lexical: &str) -> Term {
    format!("\"{lexical}\"")
}

/// Builds a typed literal `"lex"^^<datatype>`.
#[must_use]
pub fn typed_literal(lexical: &str, datatype: &str) -> Term {
    format!("\"{lexical}\"^^<{datatype}>")
}

/// Builds a language-tagged literal `"lex"@tag`.
#[must_use]
pub fn lang_literal(lexical: &str, language: &str) -> Term {
    format!("\"{lexical}\"@{language}")
}

/// Builds a literal with a new lexical form, keeping the kind of `source`:
/// its language tag if it has one, else its datatype, else a simple literal.
#[must_use]
pub fn construct_literal(lexical: &str, source: &str) -> Term {
    match literal_parts(source) {
        Some(LiteralParts {
            language: Some(tag),
            ..
        }) => lang_literal(lexical, tag),
        Some(LiteralParts {
            datatype: Some(dt), ..
        }) => typed_literal(lexical, dt),
        _ => simple_literal(lexical),
    }
}

/// Maps a boolean onto one of the two sentinel literals.
#[must_use]
pub fn boolean_literal(value: bool) -> Term {
    let sentinel = if value { TRUE } else { FALSE };
    sentinel.to_string()
}

/// Argument compatibility for two-argument string functions.
///
/// Both terms must be literals, and either both carry no language tag or
/// both carry the same one.
#[must_use]
pub fn compatible_arguments(left: &str, right: &str) -> bool {
    match (literal_parts(left), literal_parts(right)) {
        (Some(l), Some(r)) => l.language == r.language,
        _ => false,
    }
}

/// Effective boolean value as applied to operator arguments.
///
/// False iff the term is the false sentinel (in either datatype spelling) or
/// a literal whose lexical form is exactly `0`; true for everything else,
/// IRIs and blank nodes included. This is narrower than the standard rule,
/// which also treats empty strings and NaN as false.
#[must_use]
pub fn effective_boolean_value(term: &str) -> bool {
    if term == FALSE {
        return false;
    }
    match literal_parts(term) {
        Some(LiteralParts {
            lexical: "false",
            datatype: Some(XSD_BOOLEAN),
            ..
        })
        | Some(LiteralParts { lexical: "0", .. }) => false,
        _ => true,
    }
}

/// Formats a float as a literal lexical form.
///
/// Whole numbers print without a fractional part; infinities use the XSD
/// spellings `INF` and `-INF`. Negative zero prints as `0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

/// Parses a numeric lexical form the way XSD reads it.
///
/// Only `INF`, `+INF`, `-INF` and `NaN` name special values; other
/// spellings such as `inf` or `infinity` are rejected.
#[must_use]
pub fn parse_number(lexical: &str) -> Option<f64> {
    match lexical.trim() {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other if other.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => None,
        other => other.parse::<f64>().ok(),
    }
}
