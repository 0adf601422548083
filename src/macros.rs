/// A `&'static Regex` compiled once, on first use.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: $crate::__private::Lazy<$crate::__private::Regex> =
            $crate::__private::Lazy::new(|| $crate::__private::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// A plain sequence: `seq![1, capture(1), rest()]`.
#[macro_export]
macro_rules! seq {
    ($($item:expr),* $(,)?) => {
        $crate::Plain::Seq(vec![ $($crate::Plain::from($item)),* ])
    };
}

/// A plain map: `map!{ "a" => 1, "b" => capture("b").opt() }`.
#[macro_export]
macro_rules! map {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::Plain::Map(vec![ $(($crate::PlainKey::from($key), $crate::Plain::from($value))),* ])
    };
}

/// A sequence value for subjects: `vals![0, "x", vals![1.5]]`.
#[macro_export]
macro_rules! vals {
    ($($item:expr),* $(,)?) => {
        $crate::Value::Seq(vec![ $($crate::Value::from($item)),* ])
    };
}
