//! Closed set of operator identifiers.

use std::fmt;

use crate::types::term::XSD;

macro_rules! operators {
    ($($(#[$doc:meta])* $variant:ident => $name:expr,)+) => {
        /// Operator identifier.
        ///
        /// Names are the case-sensitive keys produced by the query parser;
        /// multi-word operators such as `not exists` are single keys.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Operator {
            $($(#[$doc])* $variant,)+
        }

        impl Operator {
            /// Every operator in the catalogue, in declaration order.
            pub const ALL: &'static [Operator] = &[$(Operator::$variant,)+];

            /// Returns the registry key of this operator.
            #[must_use]
            pub fn name(&self) -> &'static str {
                match self {
                    $(Operator::$variant => $name,)+
                }
            }

            fn from_exact_name(name: &str) -> Option<Self> {
                $(if name == $name {
                    return Some(Operator::$variant);
                })+
                None
            }
        }
    };
}

operators! {
    // Functional forms
    Add => "+",
    Subtract => "-",
    Multiply => "*",
    Divide => "/",
    Equal => "=",
    NotEqual => "!=",
    Less => "<",
    LessOrEqual => "<=",
    Greater => ">",
    GreaterOrEqual => ">=",
    Not => "!",
    And => "&&",
    Or => "||",
    Bound => "bound",
    If => "if",
    Coalesce => "coalesce",
    Exists => "exists",
    NotExists => "not exists",
    SameTerm => "sameterm",
    In => "in",
    NotIn => "not in",

    // Functions on RDF terms
    IsIri => "isiri",
    /// Synonym of `isiri`.
    IsUri => "isuri",
    IsBlank => "isblank",
    IsLiteral => "isliteral",
    IsNumeric => "isnumeric",
    Str => "str",
    Lang => "lang",
    Datatype => "datatype",
    Iri => "iri",
    Uri => "uri",
    Bnode => "bnode",
    StrDt => "strdt",
    StrLang => "strlang",
    Uuid => "uuid",
    StrUuid => "struuid",

    // Functions on strings
    StrLen => "strlen",
    Substr => "substr",
    Ucase => "ucase",
    Lcase => "lcase",
    StrStarts => "strstarts",
    StrEnds => "strends",
    Contains => "contains",
    StrBefore => "strbefore",
    StrAfter => "strafter",
    EncodeForUri => "encode_for_uri",
    Concat => "concat",
    LangMatches => "langmatches",
    Regex => "regex",
    Replace => "replace",

    // Functions on numerics
    Abs => "abs",
    Round => "round",
    Ceil => "ceil",
    Floor => "floor",
    Rand => "rand",

    // Functions on dates and times
    Now => "now",
    Year => "year",
    Month => "month",
    Day => "day",
    Hours => "hours",
    Minutes => "minutes",
    Seconds => "seconds",
    Timezone => "timezone",
    Tz => "tz",

    // Hash functions
    Md5 => "md5",
    Sha1 => "sha1",
    Sha256 => "sha256",
    Sha384 => "sha384",
    Sha512 => "sha512",

    // XSD constructor functions
    XsdBoolean => "http://www.w3.org/2001/XMLSchema#boolean",
    XsdInteger => "http://www.w3.org/2001/XMLSchema#integer",
    XsdDecimal => "http://www.w3.org/2001/XMLSchema#decimal",
    XsdFloat => "http://www.w3.org/2001/XMLSchema#float",
    XsdDouble => "http://www.w3.org/2001/XMLSchema#double",
    XsdString => "http://www.w3.org/2001/XMLSchema#string",
    XsdDateTime => "http://www.w3.org/2001/XMLSchema#dateTime",
}

impl Operator {
    /// Resolves a registry key to an operator.
    ///
    /// XSD constructors also resolve from their `xsd:` prefixed form.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(local) = name.strip_prefix("xsd:") {
            return Self::from_exact_name(&format!("{XSD}{local}"));
        }
        Self::from_exact_name(name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_name(op.name()), Some(*op));
        }
    }

    #[test]
    fn test_multi_word_keys() {
        assert_eq!(Operator::from_name("not exists"), Some(Operator::NotExists));
        assert_eq!(Operator::from_name("not in"), Some(Operator::NotIn));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(Operator::from_name("STRLEN"), None);
        assert_eq!(Operator::from_name("strlen"), Some(Operator::StrLen));
    }

    #[test]
    fn test_xsd_prefixed_alias() {
        assert_eq!(Operator::from_name("xsd:double"), Some(Operator::XsdDouble));
        assert_eq!(Operator::from_name("xsd:nonsense"), None);
    }
}
