#[cfg(test)]
use std::collections::HashMap;

/// Name of the variable holding the Jenkins URL
pub const URL_VAR: &str = "JENKINS_URL";
/// Name of the variable holding the API token
pub const TOKEN_VAR: &str = "JENKINS_TOKEN";
/// Name of the variable holding the Jenkins username
pub const USER_VAR: &str = "JENKINS_USER";
/// Overrides the directory holding `config.json`
pub const CONFIG_DIR_VAR: &str = "JENKINS_CLI_CONFIG_DIR";

/// Abstraction for environment variable lookups
pub trait Environment: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Production environment implementation
pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Test environment implementation
#[cfg(test)]
#[derive(Default, Clone)]
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl TestEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
impl Environment for TestEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
