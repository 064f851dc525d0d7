//! Resolution of the effective URL, username and token for one invocation.
//!
//! Each value is looked up through an ordered list of providers, highest
//! precedence first: command-line flag, environment variable, persisted
//! config or keyring, built-in default. The first provider yielding a
//! non-empty value wins.

use crate::config::{ConfigError, ConfigStore};
use crate::environment::{Environment, TOKEN_VAR, URL_VAR, USER_VAR};
use crate::normalize::normalize_url;
use crate::secrets::{SecretError, SecretStore, Token};
use thiserror::Error;

pub const DEFAULT_USERNAME: &str = "admin";

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    Env,
    Config,
    Keyring,
    Default,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub username: Option<String>,
}

/// Fully resolved credentials, built fresh for every invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub url: String,
    pub username: String,
    pub token: Token,
    pub url_source: Source,
    pub username_source: Source,
    pub token_source: Source,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "Jenkins URL must be configured, please run 'jenkins configure <url>' first or set JENKINS_URL"
    )]
    MissingUrl,

    #[error("token not found, please run 'jenkins configure <url>' first")]
    TokenNotFound {
        url: String,
        #[source]
        source: SecretError,
    },

    #[error("token is required, please run 'jenkins configure <url>' first or set JENKINS_TOKEN")]
    MissingToken,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

type Provider<'a> = Box<dyn FnOnce() -> Result<Option<String>, ResolveError> + 'a>;

fn provider<'a>(f: impl FnOnce() -> Result<Option<String>, ResolveError> + 'a) -> Provider<'a> {
    Box::new(f)
}

/// Fold providers left to right, returning the first non-empty value.
fn first_present(
    providers: Vec<(Source, Provider<'_>)>,
) -> Result<Option<(String, Source)>, ResolveError> {
    for (source, lookup) in providers {
        if let Some(value) = lookup()?.filter(|value| !value.is_empty()) {
            return Ok(Some((value, source)));
        }
    }
    Ok(None)
}

/// Build the session for this invocation.
///
/// The URL is resolved first. When it comes from the config file, the stored
/// username becomes a candidate below flags and environment. The token has
/// no command-line flag; it is looked up in the keyring under the resolved
/// URL only when the environment does not supply one.
pub fn resolve(
    overrides: &Overrides,
    env: &dyn Environment,
    config: &ConfigStore,
    secrets: &dyn SecretStore,
) -> Result<Session, ResolveError> {
    let mut config_username = None;

    let (url, url_source) = first_present(vec![
        (Source::Flag, provider(|| Ok(overrides.url.clone()))),
        (Source::Env, provider(|| Ok(env.var(URL_VAR)))),
        (
            Source::Config,
            provider(|| match config.load() {
                Ok(stored) => {
                    config_username = stored.username;
                    Ok(Some(stored.url))
                }
                Err(ConfigError::NotFound(path)) => {
                    tracing::debug!(path = %path.display(), "no config file");
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }),
        ),
    ])?
    .ok_or(ResolveError::MissingUrl)?;
    let url = normalize_url(&url);

    let (token, token_source) = first_present(vec![
        (Source::Env, provider(|| Ok(env.var(TOKEN_VAR)))),
        (
            Source::Keyring,
            provider(|| match secrets.get_token(&url) {
                Ok(token) => Ok(Some(token.expose().to_string())),
                Err(source) => Err(ResolveError::TokenNotFound {
                    url: url.clone(),
                    source,
                }),
            }),
        ),
    ])?
    .ok_or(ResolveError::MissingToken)?;

    let (username, username_source) = first_present(vec![
        (Source::Flag, provider(|| Ok(overrides.username.clone()))),
        (Source::Env, provider(|| Ok(env.var(USER_VAR)))),
        (Source::Config, provider(|| Ok(config_username))),
        (Source::Default, provider(|| Ok(Some(DEFAULT_USERNAME.to_string())))),
    ])?
    .unwrap_or_else(|| (DEFAULT_USERNAME.to_string(), Source::Default));

    tracing::info!(
        url = %url,
        username = %username,
        ?url_source,
        ?username_source,
        ?token_source,
        "resolved session"
    );

    Ok(Session {
        url,
        username,
        token: Token::new(token),
        url_source,
        username_source,
        token_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::TestEnvironment;
    use crate::secrets::MemoryStore;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG_URL: &str = "https://config.example.com";
    const ENV_URL: &str = "https://env.example.com";

    fn configured_store(temp_dir: &TempDir, username: Option<&str>) -> ConfigStore {
        let store = ConfigStore::at(temp_dir.path());
        store.save(CONFIG_URL, username).unwrap();
        store
    }

    #[test]
    fn test_config_tier_when_nothing_else_set() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, Some("configured"));
        let secrets = MemoryStore::new().with_token(CONFIG_URL, "keyring-token");

        let session =
            resolve(&Overrides::default(), &TestEnvironment::new(), &store, &secrets).unwrap();

        assert_eq!(session.url, CONFIG_URL);
        assert_eq!(session.url_source, Source::Config);
        assert_eq!(session.token.expose(), "keyring-token");
        assert_eq!(session.token_source, Source::Keyring);
        assert_eq!(session.username, "configured");
        assert_eq!(session.username_source, Source::Config);
    }

    #[test]
    fn test_env_url_beats_config() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, Some("configured"));
        let secrets = MemoryStore::new().with_token(ENV_URL, "env-url-token");
        let env = TestEnvironment::new().with_var(URL_VAR, ENV_URL);

        let session = resolve(&Overrides::default(), &env, &store, &secrets).unwrap();

        assert_eq!(session.url, ENV_URL);
        assert_eq!(session.url_source, Source::Env);
        // Keyring lookup follows the resolved URL
        assert_eq!(session.token.expose(), "env-url-token");
        // Stored username only applies when the URL came from the config file
        assert_eq!(session.username, DEFAULT_USERNAME);
        assert_eq!(session.username_source, Source::Default);
    }

    #[test]
    fn test_flag_url_beats_env() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, None);
        let env = TestEnvironment::new()
            .with_var(URL_VAR, ENV_URL)
            .with_var(TOKEN_VAR, "env-token");
        let overrides = Overrides {
            url: Some("flag.example.com/".to_string()),
            ..Default::default()
        };

        let session = resolve(&overrides, &env, &store, &MemoryStore::new()).unwrap();

        assert_eq!(session.url, "https://flag.example.com");
        assert_eq!(session.url_source, Source::Flag);
    }

    #[test]
    fn test_token_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, None);
        let secrets = MemoryStore::new().with_token(CONFIG_URL, "keyring-token");
        let env = TestEnvironment::new().with_var(TOKEN_VAR, "env-token");

        let session = resolve(&Overrides::default(), &env, &store, &secrets).unwrap();
        assert_eq!(session.token.expose(), "env-token");
        assert_eq!(session.token_source, Source::Env);

        let session =
            resolve(&Overrides::default(), &TestEnvironment::new(), &store, &secrets).unwrap();
        assert_eq!(session.token.expose(), "keyring-token");
        assert_eq!(session.token_source, Source::Keyring);
    }

    #[test]
    fn test_username_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, Some("configured"));
        let secrets = MemoryStore::new().with_token(CONFIG_URL, "token");
        let env = TestEnvironment::new().with_var(USER_VAR, "env-user");

        let session = resolve(&Overrides::default(), &env, &store, &secrets).unwrap();
        assert_eq!(session.username, "env-user");
        assert_eq!(session.username_source, Source::Env);

        let overrides = Overrides {
            username: Some("flag-user".to_string()),
            ..Default::default()
        };
        let session = resolve(&overrides, &env, &store, &secrets).unwrap();
        assert_eq!(session.username, "flag-user");
        assert_eq!(session.username_source, Source::Flag);
    }

    #[test]
    fn test_default_username() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, None);
        let secrets = MemoryStore::new().with_token(CONFIG_URL, "token");

        let session =
            resolve(&Overrides::default(), &TestEnvironment::new(), &store, &secrets).unwrap();
        assert_eq!(session.username, "admin");
        assert_eq!(session.username_source, Source::Default);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, None);
        let secrets = MemoryStore::new().with_token(CONFIG_URL, "token");
        let env = TestEnvironment::new()
            .with_var(URL_VAR, "")
            .with_var(USER_VAR, "");

        let session = resolve(&Overrides::default(), &env, &store, &secrets).unwrap();
        assert_eq!(session.url_source, Source::Config);
        assert_eq!(session.username_source, Source::Default);
    }

    #[test]
    fn test_missing_url() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path());

        let err = resolve(
            &Overrides::default(),
            &TestEnvironment::new(),
            &store,
            &MemoryStore::new(),
        )
        .unwrap_err();

        assert!(matches!(err, ResolveError::MissingUrl));
        assert!(err.to_string().contains("jenkins configure <url>"));
    }

    #[test]
    fn test_keyring_miss_does_not_fall_back() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, None);

        let err = resolve(
            &Overrides::default(),
            &TestEnvironment::new(),
            &store,
            &MemoryStore::new(),
        )
        .unwrap_err();

        assert!(matches!(err, ResolveError::TokenNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "token not found, please run 'jenkins configure <url>' first"
        );
    }

    #[test]
    fn test_corrupt_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path());
        fs::write(store.path(), "not json").unwrap();

        let err = resolve(
            &Overrides::default(),
            &TestEnvironment::new(),
            &store,
            &MemoryStore::new(),
        )
        .unwrap_err();

        assert!(matches!(err, ResolveError::Config(ConfigError::Corrupt { .. })));
    }

    #[test]
    fn test_env_url_skips_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path());
        // A broken config file is never read when the environment supplies the URL
        fs::write(store.path(), "not json").unwrap();
        let env = TestEnvironment::new()
            .with_var(URL_VAR, ENV_URL)
            .with_var(TOKEN_VAR, "env-token");

        let session = resolve(&Overrides::default(), &env, &store, &MemoryStore::new()).unwrap();
        assert_eq!(session.url, ENV_URL);
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let temp_dir = TempDir::new().unwrap();
        let store = configured_store(&temp_dir, None);
        let secrets = MemoryStore::new().with_token(CONFIG_URL, "very-secret");

        let session =
            resolve(&Overrides::default(), &TestEnvironment::new(), &store, &secrets).unwrap();
        assert!(!format!("{:?}", session).contains("very-secret"));
    }
}
