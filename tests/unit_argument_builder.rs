use dockwrap::{build_params, flag_token, OptionValue, Options};
use proptest::prelude::*;

/// A scalar as a caller would write it, before conversion.
#[derive(Debug, Clone)]
enum Scalar {
    Text(String),
    Bool(bool),
    Num(u32),
    Absent,
}

impl Scalar {
    fn is_falsy(&self) -> bool {
        match self {
            Scalar::Text(s) => s.is_empty(),
            Scalar::Bool(b) => !b,
            Scalar::Num(n) => *n == 0,
            Scalar::Absent => true,
        }
    }

    fn into_value(self) -> OptionValue {
        match self {
            Scalar::Text(s) => s.into(),
            Scalar::Bool(b) => b.into(),
            Scalar::Num(n) => n.into(),
            Scalar::Absent => None::<String>.into(),
        }
    }
}

fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        ".{0,12}".prop_map(Scalar::Text),
        Just(Scalar::Text(String::new())),
        any::<bool>().prop_map(Scalar::Bool),
        prop_oneof![Just(0u32), any::<u32>()].prop_map(Scalar::Num),
        Just(Scalar::Absent),
    ]
}

/// Keys of one or more arbitrary characters, multibyte included.
fn key() -> impl Strategy<Value = String> {
    prop_oneof![any::<char>().prop_map(String::from), ".{2,16}"]
}

proptest! {
    #[test]
    fn unit_scalar_only_length_formula(
        pairs in prop::collection::vec((key(), scalar()), 0..12)
    ) {
        let mut opts = Options::new();
        let mut falsy_by_key: Vec<(String, bool)> = Vec::new();
        for (k, v) in pairs {
            let falsy = v.is_falsy();
            opts.insert(k.clone(), v.into_value());
            match falsy_by_key.iter_mut().find(|(seen, _)| *seen == k) {
                Some(slot) => slot.1 = falsy,
                None => falsy_by_key.push((k, falsy)),
            }
        }

        let falsy = falsy_by_key.iter().filter(|(_, f)| *f).count();
        let truthy = falsy_by_key.len() - falsy;
        prop_assert_eq!(opts.len(), falsy_by_key.len());
        prop_assert_eq!(build_params(Some(&opts)).len(), 2 * truthy + falsy);
    }

    #[test]
    fn unit_list_repeats_flag_per_element(
        k in key(),
        items in prop::collection::vec(prop_oneof![Just(String::new()), ".{1,10}"], 0..8)
    ) {
        let opts = Options::new().with(k.clone(), OptionValue::list(items.clone()));
        let args = build_params(Some(&opts));
        let flag = flag_token(&k);

        let non_empty: Vec<&String> = items.iter().filter(|i| !i.is_empty()).collect();
        prop_assert_eq!(args.len(), items.len() + non_empty.len());

        let mut expected = Vec::new();
        for item in &items {
            expected.push(flag.clone());
            if !item.is_empty() {
                expected.push(item.clone());
            }
        }
        prop_assert_eq!(args, expected);
    }

    #[test]
    fn unit_dash_count_follows_key_length(c in any::<char>(), long in ".{2,16}") {
        let short = c.to_string();
        prop_assert_eq!(
            build_params(Some(&Options::new().flag(short.clone()))),
            vec![format!("-{short}")]
        );
        prop_assert_eq!(
            build_params(Some(&Options::new().flag(long.clone()))),
            vec![format!("--{long}")]
        );
    }
}

#[test]
fn unit_multibyte_single_char_keys_get_one_dash() {
    for key in ["é", "ß", "日", "🐳"] {
        let args = build_params(Some(&Options::new().with(key, "v")));
        assert_eq!(args, vec![format!("-{key}"), "v".to_string()]);
    }
}

#[test]
fn unit_primary_options_example() {
    let opts = Options::new()
        .with("f", ["a.yml", "b.yml"])
        .with("p", "proj");
    assert_eq!(
        build_params(Some(&opts)),
        vec!["-f", "a.yml", "-f", "b.yml", "-p", "proj"]
    );
}

#[test]
fn unit_iteration_order_is_insertion_order() {
    let opts: Options = vec![
        ("zeta", OptionValue::from("1")),
        ("alpha", OptionValue::Flag),
        ("m", OptionValue::from("x")),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        build_params(Some(&opts)),
        vec!["--zeta", "1", "--alpha", "-m", "x"]
    );
}

#[test]
fn unit_values_are_passed_verbatim() {
    let opts = Options::new()
        .with("label", "a b;c=$(d)")
        .with("--weird", "x");
    assert_eq!(
        build_params(Some(&opts)),
        vec!["--label", "a b;c=$(d)", "----weird", "x"]
    );
}

#[test]
fn unit_absent_options_build_nothing() {
    assert!(build_params(None).is_empty());
}
