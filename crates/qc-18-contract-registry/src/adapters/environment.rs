//! # Environment Adapters
//!
//! Process environment, and a fixed map for tests.

use crate::ports::outbound::Environment;
use std::collections::HashMap;

/// Reads the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables.
#[derive(Debug, Default, Clone)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    /// Empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl Environment for StaticEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_environment() {
        let env = StaticEnvironment::new().with("QC_REGISTRY_ADDR", "0xC");
        assert_eq!(env.var("QC_REGISTRY_ADDR").as_deref(), Some("0xC"));
        assert_eq!(env.var("HOME_OF_NOTHING"), None);
    }
}
