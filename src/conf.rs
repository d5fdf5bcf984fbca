//! Job configuration: a flat string-to-string store.
//!
//! Keys are dotted names such as `docinput.prepend.key`. Values stay strings
//! until a consumer asks for a typed view, and the typed getters are
//! forgiving: an unparsable value reads as absent.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Value prepended (with the path) to each document; see [`crate::io::document`].
pub const PREPEND_KEY: &str = "docinput.prepend.key";

/// Upper bound, in bytes, for splits cut by the default planner.
pub const SPLIT_MAX_SIZE: &str = "docinput.split.maxsize";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobConf {
    entries: BTreeMap<String, String>,
}

impl JobConf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// `true`/`yes`/`on`/`1` and their negatives, case-insensitive.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key)?.trim().parse().ok()
    }

    /// Parse a JSON object of string values.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an object of strings.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse job configuration")
    }

    /// Load a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Overlay environment variables named `<PREFIX>_<KEY>`.
    ///
    /// `DOCINPUT_PREPEND_KEY` becomes `docinput.prepend.key` for prefix
    /// `DOCINPUT`: the prefix is kept and every `_` turns into `.`.
    #[must_use]
    pub fn merge_env(mut self, prefix: &str) -> Self {
        self.merge_vars(std::env::vars(), prefix);
        self
    }

    fn merge_vars(&mut self, vars: impl IntoIterator<Item = (String, String)>, prefix: &str) {
        let wanted = format!("{}_", prefix.to_ascii_uppercase());
        for (name, value) in vars {
            if name.to_ascii_uppercase().starts_with(&wanted) {
                let key = name.to_ascii_lowercase().replace('_', ".");
                self.set(key, value);
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for JobConf {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conf = Self::new();
        for (k, v) in iter {
            conf.set(k, v);
        }
        conf
    }
}
