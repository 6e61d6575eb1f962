#![allow(clippy::module_name_repetitions)]
//! Environment overlay applied on top of the inherited environment for one call.

use std::path::Path;

/// Ordered `NAME=value` overlay. Later inserts of the same name replace the
/// earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: Vec<(String, String)>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.vars.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`; entries from `other` win.
    pub fn extend_from(&mut self, other: &EnvOverlay) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    /// Parse a `KEY=VALUE` pair as given on a command line.
    pub fn parse_pair(s: &str) -> Result<(String, String), String> {
        match s.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
            _ => Err(format!("expected KEY=VALUE, got `{s}`")),
        }
    }

    /// Load an overlay from a dotenv-style file without touching the current
    /// process environment.
    pub fn from_dotenv_file(path: &Path) -> Result<Self, dotenvy::Error> {
        let mut overlay = EnvOverlay::new();
        for item in dotenvy::from_path_iter(path)? {
            let (k, v) = item?;
            overlay.insert(k, v);
        }
        Ok(overlay)
    }
}

impl<K, V> FromIterator<(K, V)> for EnvOverlay
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overlay = EnvOverlay::new();
        for (k, v) in iter {
            overlay.insert(k, v);
        }
        overlay
    }
}
