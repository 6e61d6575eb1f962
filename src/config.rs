//! `dockwrap.yml` loading and environment overrides.
//!
//! Precedence, lowest first:
//! - built-in defaults
//! - the config file (explicit path, else `dockwrap.yml` in the working directory)
//! - `DOCKWRAP_COMPOSE_BIN` / `DOCKWRAP_PROJECT_DIR`
//! - command-line flags (applied by the caller)

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

use crate::compose::{Compose, ComposeProgram, ComposeRunner, EnvOverlay, Options};

pub const DEFAULT_CONFIG_FILE: &str = "dockwrap.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to load env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("env `{0}`: value must be a scalar")]
    EnvValue(String),

    #[error(transparent)]
    Program(#[from] io::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Compose executable; `docker` selects the plugin form.
    pub program: Option<PathBuf>,
    /// Working directory for the compose process.
    pub project_dir: Option<PathBuf>,
    /// Primary options.
    pub options: Options,
    env: Mapping,
    /// Dotenv file merged under `env`.
    pub env_file: Option<PathBuf>,
}

impl ComposeConfig {
    pub fn from_yaml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file. Relative `project_dir`/`env_file` are resolved
    /// against the file's directory, and so is a relative `program` path with
    /// more than one component. Bare program names are left for PATH lookup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg = Self::from_yaml_str(&raw, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.program = cfg.program.map(|p| {
            if p.is_relative() && p.components().count() > 1 {
                base.join(p)
            } else {
                p
            }
        });
        cfg.project_dir = cfg.project_dir.map(|p| base.join(p));
        cfg.env_file = cfg.env_file.map(|p| base.join(p));
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Explicit path if given, else `dockwrap.yml` under `dir` when present,
    /// else defaults. Environment overrides are applied in every case.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let mut cfg = match explicit {
            Some(p) => Self::load(p)?,
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::load(&candidate)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(bin) = non_empty_env("DOCKWRAP_COMPOSE_BIN") {
            self.program = Some(PathBuf::from(bin));
        }
        if let Some(dir) = non_empty_env("DOCKWRAP_PROJECT_DIR") {
            self.project_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn set_env_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env
            .insert(Value::String(key.into()), Value::String(value.into()));
    }

    /// Overlay for the next call: `env_file` entries first, `env` on top.
    pub fn env_overlay(&self) -> Result<EnvOverlay, ConfigError> {
        let mut overlay = match self.env_file {
            Some(ref path) => {
                EnvOverlay::from_dotenv_file(path).map_err(|source| ConfigError::EnvFile {
                    path: path.clone(),
                    source,
                })?
            }
            None => EnvOverlay::new(),
        };
        for (k, v) in &self.env {
            let key = scalar_string(k).ok_or_else(|| ConfigError::EnvValue(format!("{k:?}")))?;
            let value = scalar_string(v).ok_or_else(|| ConfigError::EnvValue(key.clone()))?;
            overlay.insert(key, value);
        }
        Ok(overlay)
    }

    pub fn runner(&self) -> Result<ComposeRunner, ConfigError> {
        let program = match self.program {
            Some(ref p) => ComposeProgram::resolve(p)?,
            None => ComposeProgram::discover()?,
        };
        let mut runner = ComposeRunner::new(program);
        if let Some(ref dir) = self.project_dir {
            runner = runner.with_cwd(dir);
        }
        Ok(runner)
    }

    /// A `Compose` with primary options and the first overlay already set.
    pub fn into_compose(self) -> Result<Compose, ConfigError> {
        let overlay = self.env_overlay()?;
        let mut compose = Compose::new(self.runner()?);
        compose.set_options(self.options).set_env(overlay);
        Ok(compose)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn scalar_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
