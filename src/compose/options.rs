#![allow(clippy::module_name_repetitions)]
//! Flag mappings and positional targets for compose invocations.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde_yaml::Value;

/// Value attached to a single flag name.
///
/// Falsy inputs (absent, `false`, zero, empty string) collapse to [`OptionValue::Flag`]
/// at construction time so the argument builder only has to look at the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Flag emitted without a value token.
    Flag,
    /// Flag followed by one value token.
    Value(String),
    /// Flag repeated once per element; empty elements emit the flag alone.
    List(Vec<String>),
}

impl OptionValue {
    pub fn value(v: impl Into<String>) -> Self {
        let v = v.into();
        if v.is_empty() {
            OptionValue::Flag
        } else {
            OptionValue::Value(v)
        }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, OptionValue::Flag)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::value(v)
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::value(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        if v {
            OptionValue::Value("true".to_string())
        } else {
            OptionValue::Flag
        }
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        if v == 0 {
            OptionValue::Flag
        } else {
            OptionValue::Value(v.to_string())
        }
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(OptionValue::Flag)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        OptionValue::List(v)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(v: Vec<&str>) -> Self {
        OptionValue::list(v)
    }
}

impl<const N: usize> From<[&str; N]> for OptionValue {
    fn from(v: [&str; N]) -> Self {
        OptionValue::list(v)
    }
}

/// Ordered flag-name to value mapping.
///
/// Insertion order is the emission order. Re-inserting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, OptionValue)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a value-less flag.
    pub fn flag(self, key: impl Into<String>) -> Self {
        self.with(key, OptionValue::Flag)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render into argv tokens. See [`crate::compose::args::build_params`].
    pub fn to_args(&self) -> Vec<String> {
        super::args::build_params(Some(self))
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut opts = Options::new();
        for (k, v) in iter {
            opts.insert(k, v);
        }
        opts
    }
}

/// Scalar from a config document, rendered with the same truthiness rules as
/// the CLI flags it stands for.
fn scalar_to_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::Bool(false) => Some(None),
        Value::Bool(true) => Some(Some("true".to_string())),
        Value::Number(n) => {
            let zero = n.as_f64().map(|f| f == 0.0).unwrap_or(false);
            Some(if zero { None } else { Some(n.to_string()) })
        }
        Value::String(s) if s.is_empty() => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

fn option_value_from_yaml(key: &str, value: Value) -> Result<OptionValue, String> {
    if let Value::Sequence(items) = value {
        let mut out = Vec::with_capacity(items.len());
        for item in &items {
            match scalar_to_string(item) {
                Some(v) => out.push(v.unwrap_or_default()),
                None => return Err(format!("option `{key}`: list elements must be scalars")),
            }
        }
        return Ok(OptionValue::List(out));
    }
    match scalar_to_string(&value) {
        Some(Some(s)) => Ok(OptionValue::Value(s)),
        Some(None) => Ok(OptionValue::Flag),
        None => Err(format!(
            "option `{key}`: expected a scalar or a list of scalars"
        )),
    }
}

impl<'de> Deserialize<'de> for Options {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = Options;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of flag names to values")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Options, E> {
                Ok(Options::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Options, A::Error> {
                let mut opts = Options::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    let v = option_value_from_yaml(&key, value).map_err(de::Error::custom)?;
                    opts.insert(key, v);
                }
                Ok(opts)
            }
        }

        deserializer.deserialize_any(OptionsVisitor)
    }
}

/// Positional arguments naming the entities an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    One(String),
    Many(Vec<String>),
}

impl Targets {
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Targets::One(t) => vec![t.clone()],
            Targets::Many(ts) => ts.clone(),
        }
    }
}

impl From<&str> for Targets {
    fn from(t: &str) -> Self {
        Targets::One(t.to_string())
    }
}

impl From<String> for Targets {
    fn from(t: String) -> Self {
        Targets::One(t)
    }
}

impl From<Vec<String>> for Targets {
    fn from(ts: Vec<String>) -> Self {
        Targets::Many(ts)
    }
}

impl From<Vec<&str>> for Targets {
    fn from(ts: Vec<&str>) -> Self {
        Targets::Many(ts.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(ts: [&str; N]) -> Self {
        Targets::Many(ts.iter().map(|t| t.to_string()).collect())
    }
}
