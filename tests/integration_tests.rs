//! Integration tests for the compile-once, evaluate-per-row workflow.

use ruzu_sparql::types::term::{self, FALSE, TRUE, XSD_DOUBLE, XSD_INTEGER};
use ruzu_sparql::{Bindings, Expression, FilterError, FilterEvaluator};

fn row(pairs: &[(&str, &str)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn int(n: i64) -> String {
    term::typed_literal(&n.to_string(), XSD_INTEGER)
}

// =============================================================================
// Filter Scenarios
// =============================================================================

mod filter_scenarios {
    use super::*;

    /// FILTER(?age >= 18 && LANGMATCHES(LANG(?name), "en"))
    fn adult_english_names() -> Expression {
        Expression::operation(
            "&&",
            vec![
                Expression::operation(
                    ">=",
                    vec![Expression::variable("?age"), Expression::constant(int(18))],
                ),
                Expression::operation(
                    "langmatches",
                    vec![
                        Expression::operation("lang", vec![Expression::variable("?name")]),
                        Expression::constant("\"en\""),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_filter_rows() {
        let filter = FilterEvaluator::default().compile(&adult_english_names()).unwrap();
        let rows = [
            row(&[("?age", int(30).as_str()), ("?name", "\"Alice\"@en-GB")]),
            row(&[("?age", int(12).as_str()), ("?name", "\"Bob\"@en")]),
            row(&[("?age", int(40).as_str()), ("?name", "\"Chloé\"@fr")]),
            row(&[("?age", int(50).as_str()), ("?name", "\"Dan\"")]),
        ];
        let kept: Vec<bool> = rows.iter().map(|r| filter.evaluate_ebv(r).unwrap()).collect();
        assert_eq!(kept, vec![true, false, false, false]);
    }

    #[test]
    fn test_unbound_variable_is_reported() {
        let filter = FilterEvaluator::default().compile(&adult_english_names()).unwrap();
        let err = filter.evaluate(&row(&[("?age", int(30).as_str())])).unwrap_err();
        assert_eq!(err, FilterError::UnboundVariable("?name".into()));
    }

    #[test]
    fn test_optional_guard_with_if_and_bound() {
        // BIND(IF(BOUND(?nick), ?nick, ?name) AS ?label)
        let expr = Expression::operation(
            "if",
            vec![
                Expression::operation("bound", vec![Expression::variable("?nick")]),
                Expression::variable("?nick"),
                Expression::variable("?name"),
            ],
        );
        let label = FilterEvaluator::default().compile(&expr).unwrap();
        assert_eq!(
            label.evaluate(&row(&[("?name", "\"Robert\"")])).unwrap().as_deref(),
            Some("\"Robert\"")
        );
        assert_eq!(
            label
                .evaluate(&row(&[("?name", "\"Robert\""), ("?nick", "\"Bob\"")]))
                .unwrap()
                .as_deref(),
            Some("\"Bob\"")
        );
    }

    #[test]
    fn test_string_pipeline() {
        // UCASE(SUBSTR(STRAFTER(?mail, "@"), 1, 7))
        let expr = Expression::operation(
            "ucase",
            vec![Expression::operation(
                "substr",
                vec![
                    Expression::operation(
                        "strafter",
                        vec![Expression::variable("?mail"), Expression::constant("\"@\"")],
                    ),
                    Expression::constant(int(1)),
                    Expression::constant(int(7)),
                ],
            )],
        );
        let result = FilterEvaluator::default()
            .evaluate(&expr, &row(&[("?mail", "\"alice@example.org\"")]))
            .unwrap();
        assert_eq!(result, "\"EXAMPLE\"");
    }

    #[test]
    fn test_term_inspection() {
        let evaluator = FilterEvaluator::default();
        let r = row(&[("?o", int(7).as_str()), ("?s", "http://example.org/s"), ("?b", "_:n1")]);
        let cases = [
            ("isnumeric", "?o", TRUE),
            ("isliteral", "?o", TRUE),
            ("isiri", "?s", TRUE),
            ("isblank", "?b", TRUE),
            ("isliteral", "?s", FALSE),
        ];
        for (name, var, expected) in cases {
            let expr = Expression::operation(name, vec![Expression::variable(var)]);
            assert_eq!(evaluator.evaluate(&expr, &r).unwrap(), expected, "{name}({var})");
        }
        let datatype = Expression::operation("datatype", vec![Expression::variable("?o")]);
        assert_eq!(evaluator.evaluate(&datatype, &r).unwrap(), XSD_INTEGER);
        let text = Expression::operation("str", vec![Expression::variable("?s")]);
        assert_eq!(evaluator.evaluate(&text, &r).unwrap(), "\"http://example.org/s\"");
    }

    #[test]
    fn test_regex_filter() {
        let expr = Expression::operation(
            "regex",
            vec![Expression::variable("?title"), Expression::constant("\"^SPARQL\"")],
        );
        let filter = FilterEvaluator::default().compile(&expr).unwrap();
        assert!(filter.evaluate_ebv(&row(&[("?title", "\"SPARQL Tutorial\"")])).unwrap());
        assert!(!filter.evaluate_ebv(&row(&[("?title", "\"The Semantic Web\"")])).unwrap());
    }

    #[test]
    fn test_xsd_double_constructor_by_prefix_and_iri() {
        let evaluator = FilterEvaluator::default();
        for name in ["xsd:double", XSD_DOUBLE] {
            let expr = Expression::operation(name, vec![Expression::constant(int(3))]);
            assert_eq!(
                evaluator.evaluate(&expr, &Bindings::new()).unwrap(),
                term::typed_literal("3", XSD_DOUBLE)
            );
        }
    }

    #[test]
    fn test_empty_filter_is_vacuously_true() {
        let filter = FilterEvaluator::default().compile_optional(None).unwrap();
        assert!(filter.evaluate_ebv(&Bindings::new()).unwrap());
        assert!(filter.expression().is_none());
    }
}

// =============================================================================
// JSON Tree Form
// =============================================================================

mod json_tree {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_and_evaluate() {
        let node = json!({
            "operator": "+",
            "args": ["?x", int(1)]
        });
        let expr = Expression::from_json(&node).unwrap();
        assert_eq!(
            expr,
            Expression::operation(
                "+",
                vec![Expression::variable("?x"), Expression::constant(int(1))]
            )
        );
        let result = FilterEvaluator::default()
            .evaluate(&expr, &row(&[("?x", int(41).as_str())]))
            .unwrap();
        assert_eq!(result, int(42));
    }

    #[test]
    fn test_multi_word_operator_key() {
        let node = json!({ "operator": "not exists", "args": ["?x"] });
        let expr = Expression::from_json(&node).unwrap();
        assert_eq!(
            FilterEvaluator::default().compile(&expr).unwrap_err(),
            FilterError::UnsupportedOperator("not exists".into())
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        for node in [json!(42), json!(null), json!(["?x"]), json!({ "operator": "+" })] {
            assert!(matches!(
                Expression::from_json(&node).unwrap_err(),
                FilterError::UnsupportedExpressionType(_)
            ));
        }
        let nested = json!({ "operator": "!", "args": [true] });
        assert!(Expression::from_json(&nested).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let expr = Expression::operation(
            "strlang",
            vec![Expression::variable("?label"), Expression::constant("\"en\"")],
        );
        let text = serde_json::to_string(&expr).unwrap();
        let back: Expression = serde_json::from_str(&text).unwrap();
        assert_eq!(back, expr);
        assert_eq!(expr.to_json(), json!({ "operator": "strlang", "args": ["?label", "\"en\""] }));
    }
}

// =============================================================================
// Concurrency
// =============================================================================

mod concurrency {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_compiled_evaluator_across_threads() {
        let expr = Expression::operation(
            "*",
            vec![Expression::variable("?n"), Expression::constant(int(2))],
        );
        let compiled = Arc::new(FilterEvaluator::default().compile(&expr).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let compiled = Arc::clone(&compiled);
                thread::spawn(move || {
                    (0..100)
                        .map(|i| {
                            let n = t * 100 + i;
                            let out = compiled.evaluate(&row(&[("?n", int(n).as_str())])).unwrap();
                            (n, out)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for (n, out) in handle.join().unwrap() {
                assert_eq!(out, Some(int(n * 2)));
            }
        }
    }

    #[test]
    fn test_uuids_unique_under_contention() {
        let compiled = Arc::new(
            FilterEvaluator::default()
                .compile(&Expression::operation("uuid", vec![]))
                .unwrap(),
        );
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let compiled = Arc::clone(&compiled);
                thread::spawn(move || {
                    (0..250)
                        .map(|_| compiled.evaluate(&Bindings::new()).unwrap().unwrap_or_default())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(id.starts_with("urn:uuid:"));
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_evaluate_all_reports_errors_per_row() {
        let expr = Expression::operation(
            "/",
            vec![Expression::constant(int(10)), Expression::variable("?d")],
        );
        let compiled = FilterEvaluator::default().compile(&expr).unwrap();
        let rows = vec![
            row(&[("?d", int(2).as_str())]),
            row(&[("?d", int(0).as_str())]),
            row(&[("?d", "\"two\"")]),
            Bindings::new(),
        ];
        let results = compiled.evaluate_all(&rows);
        assert_eq!(results[0], Ok(Some(int(5))));
        assert_eq!(results[1], Ok(Some(term::typed_literal("INF", XSD_INTEGER))));
        assert!(matches!(results[2], Err(FilterError::InvalidArgument { .. })));
        assert_eq!(results[3], Err(FilterError::UnboundVariable("?d".into())));
    }
}

// =============================================================================
// Property Tests
// =============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arith(name: &str, a: i64, b: i64) -> Expression {
        Expression::operation(
            name,
            vec![Expression::constant(int(a)), Expression::constant(int(b))],
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: integer arithmetic keeps the first operand's datatype
        /// and matches float arithmetic.
        #[test]
        fn prop_arithmetic_matches_f64(a in -10_000i64..10_000, b in -10_000i64..10_000) {
            let evaluator = FilterEvaluator::default();
            #[allow(clippy::cast_precision_loss)]
            let (fa, fb) = (a as f64, b as f64);
            for (name, expected) in [("+", fa + fb), ("-", fa - fb), ("*", fa * fb)] {
                let out = evaluator.evaluate(&arith(name, a, b), &Bindings::new()).unwrap();
                prop_assert_eq!(out, term::typed_literal(&term::format_number(expected), XSD_INTEGER));
            }
        }

        /// Property: comparisons agree with integer ordering.
        #[test]
        fn prop_comparisons_agree_with_ordering(a in any::<i32>(), b in any::<i32>()) {
            let evaluator = FilterEvaluator::default();
            let (a, b) = (i64::from(a), i64::from(b));
            let cases = [("<", a < b), ("<=", a <= b), (">", a > b), (">=", a >= b), ("=", a == b), ("!=", a != b)];
            for (name, expected) in cases {
                let out = evaluator.evaluate(&arith(name, a, b), &Bindings::new()).unwrap();
                prop_assert_eq!(out, term::boolean_literal(expected));
            }
        }

        /// Property: a rebuilt literal keeps its source's language tag.
        #[test]
        fn prop_construct_literal_keeps_language(lex in "[a-z ]{0,12}", tag in "[a-z]{2}(-[A-Z]{2})?") {
            let source = term::lang_literal("source", &tag);
            let built = term::construct_literal(&lex, &source);
            prop_assert_eq!(term::literal_language(&built), Some(tag.as_str()));
            prop_assert_eq!(term::literal_value(&built), Some(lex.as_str()));
        }

        /// Property: STRLEN of CONCAT is the sum of the lengths.
        #[test]
        fn prop_concat_length(a in "\\PC{0,10}", b in "\\PC{0,10}") {
            prop_assume!(!a.contains('"') && !b.contains('"'));
            let expr = Expression::operation(
                "strlen",
                vec![Expression::operation(
                    "concat",
                    vec![
                        Expression::constant(term::simple_literal(&a)),
                        Expression::constant(term::simple_literal(&b)),
                    ],
                )],
            );
            let out = FilterEvaluator::default().evaluate(&expr, &Bindings::new()).unwrap();
            let len = a.chars().count() + b.chars().count();
            prop_assert_eq!(out, term::typed_literal(&len.to_string(), XSD_INTEGER));
        }
    }
}
