pub mod build_job;
pub mod configure;
pub mod get_build;
pub mod get_build_log;
pub mod get_job;
pub mod get_last_build;
pub mod list_jobs;
pub mod mcp;

use crate::config::ConfigStore;
use crate::environment::RealEnvironment;
use crate::jenkins::JenkinsClient;
use crate::secrets::KeyringStore;
use crate::session::{self, Overrides, Session};

/// Resolve the session for this invocation from flags, the process
/// environment, the config file and the OS keyring.
pub fn resolve_session(overrides: &Overrides) -> Result<Session, String> {
    let env = RealEnvironment;
    let config = ConfigStore::default_location(&env).map_err(|e| e.to_string())?;
    session::resolve(overrides, &env, &config, &KeyringStore::new()).map_err(|e| e.to_string())
}

/// Resolve the session and build a client for it.
pub fn connect(overrides: &Overrides) -> Result<JenkinsClient, String> {
    let session = resolve_session(overrides)?;
    JenkinsClient::new(&session).map_err(|e| e.to_string())
}
