#![allow(clippy::module_name_repetitions)]
//! Flag formatting: option mappings to argv tokens.
//!
//! Rules:
//! - keys with exactly one character become `-k`, everything else `--key`
//! - a truthy value follows its flag as a separate token
//! - list values repeat the flag once per element, in list order
//! - nothing is validated; the compose tool is the source of truth for rejection

use super::options::{OptionValue, Options};

/// Dash-prefixed flag token for a key.
pub fn flag_token(key: &str) -> String {
    if key.chars().count() == 1 {
        format!("-{key}")
    } else {
        format!("--{key}")
    }
}

/// Append the tokens for one key/value pair.
pub(crate) fn push_option(args: &mut Vec<String>, key: &str, value: &OptionValue) {
    match value {
        OptionValue::Flag => args.push(flag_token(key)),
        OptionValue::Value(v) => {
            args.push(flag_token(key));
            args.push(v.clone());
        }
        OptionValue::List(items) => {
            for item in items {
                args.push(flag_token(key));
                if !item.is_empty() {
                    args.push(item.clone());
                }
            }
        }
    }
}

/// Convert an option mapping into a flat token sequence. `None` behaves like an
/// empty mapping.
pub fn build_params(options: Option<&Options>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(opts) = options {
        for (key, value) in opts.iter() {
            push_option(&mut args, key, value);
        }
    }
    args
}
