use super::*;
use pretty_assertions::assert_eq;

fn with_env(value: Option<&str>) -> bool {
    // SAFETY: no other test in this crate reads or writes this variable.
    unsafe {
        match value {
            Some(v) => std::env::set_var(SPECIALIZE_ENV, v),
            None => std::env::remove_var(SPECIALIZE_ENV),
        }
    }
    Options::from_env().specialize
}

#[test]
fn from_env_reads_the_specialize_switch() {
    let saved = std::env::var(SPECIALIZE_ENV).ok();

    let cases: Vec<(Option<&str>, bool)> = vec![
        (None, true),
        (Some("0"), false),
        (Some("off"), false),
        (Some(" FALSE "), false),
        (Some("no"), false),
        (Some("1"), true),
        (Some("yes"), true),
    ];
    let got: Vec<(Option<&str>, bool)> = cases.iter().map(|(v, _)| (*v, with_env(*v))).collect();

    with_env(saved.as_deref());
    assert_eq!(got, cases);
}

#[test]
fn interpreted_options_turn_specialization_off() {
    assert!(Options::default().specialize);
    assert!(!Options::interpreted().specialize);
}
