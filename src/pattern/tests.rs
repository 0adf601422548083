use super::*;
use crate::api::{any, capture, exact, rest};
use crate::value::{Value, ValueKind, ValueMap};
use pretty_assertions::assert_eq;

#[test]
fn build_returns_patterns_unchanged() {
    let pat = build(capture(3)).unwrap();
    assert!(matches!(pat, Pattern::Named(Key::Index(3))));
}

#[test]
fn build_wraps_scalars_as_literals() {
    for plain in [Plain::from(1), Plain::from("a"), Plain::from(true), Plain::from(2.5)] {
        assert!(matches!(build(plain).unwrap(), Pattern::Literal(Literal::Value(_))));
    }
}

#[test]
fn build_splits_sequence_around_rest() {
    let pat = build(seq![0, 1, rest().named("mid"), 2, 3]).unwrap();
    let Pattern::Seq(seq) = pat else { panic!("expected a sequence pattern") };
    assert_eq!(seq.head().len(), 2);
    assert_eq!(seq.tail().len(), 2);
    assert!(seq.rest().is_some_and(Pattern::is_rest));
    assert_eq!(seq.size_min(), 4);
}

#[test]
fn build_sequence_without_rest_is_exact() {
    let Pattern::Seq(seq) = build(seq![1, 2]).unwrap() else { panic!("expected a sequence pattern") };
    assert_eq!(seq.head().len(), 2);
    assert!(seq.rest().is_none());
    assert!(seq.tail().is_empty());
}

#[test]
fn build_rejects_second_rest() {
    let err = build(seq![rest(), 1, rest().named(1)]).unwrap_err();
    assert!(matches!(err, PatternError::MultipleRest { count: 2 }));
}

#[test]
fn nested_rest_does_not_count_for_outer_sequence() {
    let pat = build(seq![seq![1, rest()], rest()]).unwrap();
    let Pattern::Seq(seq) = pat else { panic!("expected a sequence pattern") };
    assert_eq!(seq.head().len(), 1);
    assert!(seq.rest().is_some());
}

#[test]
fn seq_pattern_new_validates_rest_slots() {
    assert!(matches!(
        SeqPattern::new(vec![Pattern::Rest], None, vec![]),
        Err(PatternError::MisplacedRest)
    ));
    assert!(matches!(
        SeqPattern::new(vec![], Some(Pattern::Any), vec![]),
        Err(PatternError::MisplacedRest)
    ));
    assert!(SeqPattern::new(vec![Pattern::Any], Some(rest().named(1)), vec![Pattern::Any]).is_ok());
}

#[test]
fn build_map_reads_exact_sentinel() {
    let Pattern::Map(plain) = build(map! { "a" => 1 }).unwrap() else { panic!("expected a map pattern") };
    assert!(!plain.is_exact());

    let Pattern::Map(strict) = build(map! { "a" => 1, exact() => true }).unwrap() else {
        panic!("expected a map pattern")
    };
    assert!(strict.is_exact());
    assert_eq!(strict.entries().len(), 1);

    let Pattern::Map(off) = build(map! { exact() => Value::Nil, "a" => 1 }).unwrap() else {
        panic!("expected a map pattern")
    };
    assert!(!off.is_exact());
}

#[test]
fn map_counts_required_entries() {
    let pat = build(map! {
        "a" => 1,
        "b" => capture("b").opt(),
        "c" => (Pattern::Any.opt() | Pattern::Any),
        "d" => any(),
    })
    .unwrap();
    let Pattern::Map(map) = pat else { panic!("expected a map pattern") };
    assert_eq!(map.entries().len(), 4);
    assert_eq!(map.non_opt_count(), 2);
}

#[test]
fn map_duplicate_keys_keep_last() {
    let map = MapPattern::new([(Value::from("a"), Pattern::Any), (Value::from("a"), Pattern::Rest.opt())], false);
    assert_eq!(map.entries().len(), 1);
    assert_eq!(map.non_opt_count(), 0);
}

#[test]
fn plain_values_lift_structurally() {
    let subject: ValueMap = [("k", vals![1, 2])].into_iter().collect();
    let pat = build(Value::Map(subject)).unwrap();
    let Pattern::Map(map) = pat else { panic!("expected a map pattern") };
    assert!(matches!(map.entries()[0].1, Pattern::Seq(_)));
}

#[test]
fn flags_propagate_through_logical_ops() {
    assert_eq!(Pattern::Rest.flags(), PatternFlags::REST);
    assert_eq!(Pattern::Any.opt().flags(), PatternFlags::OPT);
    assert!(rest().named(1).is_rest());
    assert!((Pattern::Any | Pattern::Rest.opt()).flags().contains(PatternFlags::OPT));
    assert!(!build(seq![rest()]).unwrap().is_rest());
    assert!(Pattern::Named(Key::Index(0)).flags().is_empty());
}

#[test]
fn capture_keys_from_values() {
    assert_eq!(Key::try_from(Value::Int(4)).unwrap(), Key::Index(4));
    assert_eq!(Key::try_from(Value::Int(-1)).unwrap(), Key::Index(-1));
    assert_eq!(Key::try_from(Value::sym("x")).unwrap(), Key::name("x"));
    assert!(matches!(Key::try_from(Value::from("x")), Err(PatternError::InvalidCaptureKey(_))));
    assert!(matches!(Key::try_from(Value::Float(1.0)), Err(PatternError::InvalidCaptureKey(_))));
}

#[test]
fn display_forms() {
    let cases: Vec<(Pattern, &str)> = vec![
        (build(1).unwrap(), "OBJ(1)"),
        (any(), "ANY"),
        (capture(1), "NAMED(1)"),
        (capture("x"), "NAMED(:x)"),
        (rest(), "..."),
        (build(seq![1, rest(), 2]).unwrap(), "[OBJ(1), ..., OBJ(2)]"),
        (build(map! { "a" => capture(1).opt() }).unwrap(), "{\"a\" => ?NAMED(1)}"),
        (build(map! { exact() => true }).unwrap(), "{EXACT}"),
        (rest().named(2), "AND(...,NAMED(2))"),
        (Pattern::literal(Literal::Kind(ValueKind::Int)) | build("s").unwrap(), "OR(OBJ(Int),OBJ(\"s\"))"),
        (Pattern::literal(NumRange::from(1..5)), "OBJ(1...5)"),
    ];
    for (pat, expected) in cases {
        assert_eq!(pat.to_string(), expected);
    }
}

// --- Literals ----------------------------------------------------------------

#[test]
fn literal_value_compares_numbers_loosely() {
    let one = Literal::Value(Value::Int(1));
    assert!(one.accepts(&Value::Int(1)));
    assert!(one.accepts(&Value::Float(1.0)));
    assert!(!one.accepts(&Value::Int(2)));
    assert!(!one.accepts(&Value::from("1")));

    let seq = Literal::Value(vals![1, 2]);
    assert!(seq.accepts(&vals![1.0, 2]));
    assert!(!seq.accepts(&vals![1, 2, 3]));
}

#[test]
fn large_integers_compare_exactly() {
    const TWO_53: i64 = 9_007_199_254_740_992;

    let pat = build(TWO_53 + 1).unwrap();
    assert!(pat.matches(&Value::Int(TWO_53 + 1)).is_some());
    assert!(pat.matches(&Value::Int(TWO_53)).is_none());

    let two_53 = Literal::Value(Value::Int(TWO_53));
    assert!(two_53.accepts(&Value::Float(TWO_53 as f64)));
    assert!(!Literal::Value(Value::Int(TWO_53 + 1)).accepts(&Value::Float(TWO_53 as f64)));
    assert!(!Literal::Value(Value::Int(1)).accepts(&Value::Float(1.5)));
    assert!(!Literal::Value(Value::Int(i64::MAX)).accepts(&Value::Float(i64::MAX as f64)));

    let upto = Literal::Range(NumRange::from(0..=TWO_53));
    assert!(upto.accepts(&Value::Int(TWO_53)));
    assert!(!upto.accepts(&Value::Int(TWO_53 + 1)));
    assert!(!Literal::Range(NumRange::from(0..TWO_53)).accepts(&Value::Int(TWO_53)));

    let half_open = Literal::Range(NumRange::from(-1.5..2.5));
    assert!(half_open.accepts(&Value::Int(-1)));
    assert!(half_open.accepts(&Value::Int(2)));
    assert!(!half_open.accepts(&Value::Int(-2)));
    assert!(!half_open.accepts(&Value::Float(f64::NAN)));
}

#[test]
fn literal_kind_range_regex_predicate() {
    let int = Literal::Kind(ValueKind::Int);
    assert!(int.accepts(&Value::Int(7)));
    assert!(!int.accepts(&Value::Float(7.0)));

    let inclusive = Literal::Range(NumRange::from(1..=3));
    assert!(inclusive.accepts(&Value::Int(3)));
    assert!(inclusive.accepts(&Value::Float(2.5)));
    assert!(!inclusive.accepts(&Value::Int(4)));
    assert!(!inclusive.accepts(&Value::from("2")));

    let exclusive = Literal::Range(NumRange::from(0.0..1.0));
    assert!(exclusive.accepts(&Value::Int(0)));
    assert!(!exclusive.accepts(&Value::Float(1.0)));

    let re = Literal::regex("^ab+c$").unwrap();
    assert!(re.accepts(&Value::from("abbbc")));
    assert!(re.accepts(&Value::sym("abc")));
    assert!(!re.accepts(&Value::from("ac")));
    assert!(!re.accepts(&Value::Int(1)));
    assert!(matches!(Literal::regex("("), Err(PatternError::InvalidRegex(_))));

    let even = Literal::predicate("even", |v| matches!(v, Value::Int(i) if i % 2 == 0));
    assert!(even.accepts(&Value::Int(4)));
    assert!(!even.accepts(&Value::Int(5)));
    assert_eq!(even.to_string(), "PRED(even)");
}

#[test]
fn regex_macro_builds_literal_patterns() {
    let pat = build(seq![crate::regex!("^[a-z]+$"), any()]).unwrap();
    assert!(pat.matches(&vals!["abc", 1]).is_some());
    assert!(pat.matches(&vals!["ABC", 1]).is_none());
}
