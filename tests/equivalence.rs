//! Property tests for the specializer.
//!
//! Random patterns are run against random subjects, interpreted and
//! specialized, and must agree on:
//! 1. the boolean result;
//! 2. the captures left in the match environment, including the ones written
//!    by branches that failed.

use patm::{Key, Literal, MapPattern, Match, Pattern, SeqPattern, Value, ValueKind, build};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// -- Strategies --

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![(0i64..3).prop_map(Key::Index), prop::sample::select(vec!["x", "y"]).prop_map(Key::name)]
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        (-2i64..3).prop_map(Value::Int),
        prop::sample::select(vec!["a", "b"]).prop_map(Value::from),
    ]
}

fn subject_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Seq),
            prop::collection::vec((prop::sample::select(vec!["a", "b", "c"]), inner), 0..3)
                .prop_map(|pairs| Value::Map(pairs.into_iter().collect())),
        ]
    })
}

fn leaf_pattern_strategy() -> impl Strategy<Value = Pattern> {
    prop_oneof![
        scalar_strategy().prop_map(|v| Pattern::Literal(Literal::Value(v))),
        Just(Pattern::Any),
        key_strategy().prop_map(Pattern::Named),
        prop::sample::select(vec![ValueKind::Int, ValueKind::Str, ValueKind::Seq])
            .prop_map(|k| Pattern::Literal(Literal::Kind(k))),
    ]
}

fn rest_slot_strategy() -> impl Strategy<Value = Option<Pattern>> {
    prop_oneof![Just(None), Just(Some(Pattern::Rest)), key_strategy().prop_map(|k| Some(Pattern::Rest.named(k))),]
}

fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    leaf_pattern_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (prop::collection::vec(inner.clone(), 0..3), rest_slot_strategy(), prop::collection::vec(inner.clone(), 0..2))
                .prop_map(|(head, rest, tail)| Pattern::Seq(SeqPattern::new(head, rest, tail).unwrap())),
            (prop::collection::vec((prop::sample::select(vec!["a", "b", "c"]), inner.clone(), any::<bool>()), 0..3), any::<bool>())
                .prop_map(|(entries, exact)| {
                    let entries = entries
                        .into_iter()
                        .map(|(k, p, opt)| (Value::from(k), if opt { p.opt() } else { p }));
                    Pattern::Map(MapPattern::new(entries, exact))
                }),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Pattern::And),
            prop::collection::vec(inner, 0..3).prop_map(Pattern::Or),
        ]
    })
}

fn run(pat: &Pattern, subject: &Value) -> (bool, Match) {
    let mut m = Match::new();
    let ok = pat.execute(&mut m, subject);
    (ok, m)
}

// -- Properties --

proptest! {
    #[test]
    fn specialized_agrees_with_interpreter(pat in pattern_strategy(), subject in subject_strategy()) {
        let compiled = pat.specialize().unwrap();
        let (slow_ok, slow) = run(&pat, &subject);
        let (fast_ok, fast) = run(&compiled, &subject);
        prop_assert_eq!(slow_ok, fast_ok);
        prop_assert_eq!(slow, fast);
    }

    #[test]
    fn execution_is_deterministic(pat in pattern_strategy(), subject in subject_strategy()) {
        prop_assert_eq!(run(&pat, &subject), run(&pat, &subject));
    }

    #[test]
    fn plain_data_matches_itself(subject in subject_strategy()) {
        let pat = build(subject.clone()).unwrap();
        prop_assert!(pat.matches(&subject).is_some());
        prop_assert!(pat.specialize().unwrap().matches(&subject).is_some());
    }
}

#[test]
fn specialized_captures_for_the_documented_examples() {
    let pat = build(patm::seq![0, patm::capture(1), patm::capture(2)]).unwrap();
    let compiled = pat.specialize().unwrap();
    let subject = patm::vals![0, 9, 8];
    assert_eq!(run(&pat, &subject), run(&compiled, &subject));
    assert_eq!(run(&compiled, &subject).1[1], Value::Int(9));
}
