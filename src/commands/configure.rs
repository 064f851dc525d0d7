use crate::colors;
use crate::config::{ConfigStore, ConnectionConfig};
use crate::environment::RealEnvironment;
use crate::normalize::{format_host_url, normalize_url};
use crate::secrets::{KeyringStore, SecretStore, Token};
use crate::session::DEFAULT_USERNAME;
use dialoguer::{Password, theme::ColorfulTheme};
use std::io::{self, BufRead, IsTerminal};

/// Save the Jenkins URL and username, then prompt for an API token and
/// store it in the OS keyring.
pub async fn execute(
    url: &str,
    username: Option<&str>,
    context_path: Option<&str>,
) -> Result<(), String> {
    let url = url.trim();
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }
    let url = target_url(url, context_path);
    let url = url.as_str();
    let username = username.map(str::trim).filter(|u| !u.is_empty());

    eprint!("{}", guidance(url, username.unwrap_or(DEFAULT_USERNAME)));

    let token = tokio::task::spawn_blocking(read_token)
        .await
        .map_err(|e| format!("failed to read token: {}", e))??;

    let env = RealEnvironment;
    let config = ConfigStore::default_location(&env).map_err(|e| e.to_string())?;
    let saved = save(&config, &KeyringStore::new(), url, username, &token)?;

    eprintln!(
        "{}",
        colors::success(&format!("Configuration saved successfully for {}", saved.url))
    );
    match &saved.username {
        Some(username) => eprintln!("Username: {}", username),
        None => eprintln!(
            "Username will default to '{}' (override with --user or JENKINS_USER)",
            DEFAULT_USERNAME
        ),
    }
    Ok(())
}

/// Combine a host with a separately given context path.
///
/// Without a path the argument is taken as a full URL and only normalized
/// later when saved. With one, the argument is a host and the result always
/// uses `https://`.
pub fn target_url(url: &str, context_path: Option<&str>) -> String {
    match context_path {
        Some(path) => format_host_url(url, path),
        None => url.to_string(),
    }
}

/// Instructions for creating an API token, printed before the prompt.
pub fn guidance(url: &str, username: &str) -> String {
    let lines = [
        "To create an API token in Jenkins:".to_string(),
        format!("1. Go to: {}/user/{}/configure", normalize_url(url), username),
        "2. Click 'Add new Token' under API Token section".to_string(),
        "3. Copy the generated token".to_string(),
        String::new(),
        "The token will be stored securely in your system's keyring.".to_string(),
        String::new(),
    ];
    lines
        .iter()
        .map(|line| format!("{}\n", colors::hint(line)))
        .collect()
}

/// Persist the config record, then the token under the normalized URL.
///
/// An empty token is rejected before anything is written.
pub fn save(
    config: &ConfigStore,
    secrets: &dyn SecretStore,
    url: &str,
    username: Option<&str>,
    token: &Token,
) -> Result<ConnectionConfig, String> {
    if token.is_empty() {
        return Err("token cannot be empty".to_string());
    }

    let saved = config.save(url, username).map_err(|e| e.to_string())?;
    secrets
        .set_token(&saved.url, token)
        .map_err(|e| e.to_string())?;

    tracing::info!(url = %saved.url, "stored API token");
    Ok(saved)
}

/// Read the token without echo from a terminal, or as one line from piped
/// stdin.
fn read_token() -> Result<Token, String> {
    let stdin = io::stdin();
    let raw = if stdin.is_terminal() {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter Jenkins API token")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| format!("failed to read token: {}", e))?
    } else {
        let mut line = String::new();
        stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| format!("failed to read token: {}", e))?;
        line
    };
    Ok(Token::new(raw.trim()))
}
