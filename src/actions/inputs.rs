//! Workflow inputs

use super::RunnerEnv;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Environment variable the runner uses for an input
///
/// Spaces become underscores and the name is upper-cased; hyphens are kept,
/// so `previous-version` is read from `INPUT_PREVIOUS-VERSION`.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Source of named workflow inputs
pub trait InputSource {
    /// Raw value of an input, if supplied
    fn raw(&self, name: &str) -> Option<String>;

    /// Trimmed value; empty counts as absent
    fn get(&self, name: &str) -> Option<String> {
        self.raw(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Value that must be present
    fn get_required(&self, name: &str) -> Result<String> {
        self.get(name)
            .ok_or_else(|| Error::MissingInput(name.to_string()))
    }

    /// Boolean input: only a case-insensitive `true` is true
    fn get_bool(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|v| v.to_uppercase() == "TRUE")
    }

    /// Integer input; absent is `Ok(None)`, malformed is an error
    fn get_int(&self, name: &str) -> Result<Option<i64>> {
        self.get(name)
            .map(|v| {
                v.parse::<i64>().map_err(|_| {
                    Error::Config(format!("input `{name}` must be an integer, got `{v}`"))
                })
            })
            .transpose()
    }
}

impl InputSource for RunnerEnv {
    fn raw(&self, name: &str) -> Option<String> {
        self.var(&input_env_name(name)).map(ToString::to_string)
    }
}

/// In-memory inputs keyed by input name
#[derive(Debug, Clone, Default)]
pub struct MapInputs(HashMap<String, String>);

impl MapInputs {
    /// Empty input set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

impl InputSource for MapInputs {
    fn raw(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}
