//! Operator implementations and the standard catalogue.

mod forms;
mod numeric;
mod strings;
mod terms;

use crate::registry::{Operator, OperatorRegistry};

/// Builds the registry holding every catalogue entry.
///
/// Date/time and hash functions are declared with their arity but have no
/// implementation; compiling a call to one fails with `UnsupportedOperator`.
pub(crate) fn standard_registry() -> OperatorRegistry {
    let mut builder = OperatorRegistry::builder();
    forms::register(&mut builder);
    terms::register(&mut builder);
    strings::register(&mut builder);
    numeric::register(&mut builder);

    builder.unsupported(Operator::Now, 0);
    for op in [
        Operator::Year,
        Operator::Month,
        Operator::Day,
        Operator::Hours,
        Operator::Minutes,
        Operator::Seconds,
        Operator::Timezone,
        Operator::Tz,
        Operator::Md5,
        Operator::Sha1,
        Operator::Sha256,
        Operator::Sha384,
        Operator::Sha512,
    ] {
        builder.unsupported(op, 1);
    }

    builder.build()
}
