//! Thin async client for the Jenkins JSON API.
//!
//! Every public method issues exactly one HTTP request. Nothing is retried;
//! transport failures, non-2xx responses and undecodable bodies come back as
//! distinct [`JenkinsError`] variants.

use crate::format::{JobPath, parse_job_path};
use crate::secrets::Token;
use crate::session::Session;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const JOBS_TREE: &str = "jobs[name,url,color]";
const JOB_TREE: &str = "name,url,description,color,\
    lastBuild[number,url,result],\
    lastSuccessfulBuild[number,url],\
    lastFailedBuild[number,url],\
    jobs[name,url,color]";

/// Entry of a job listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Folders and other non-buildable items carry no color
    #[serde(default)]
    pub color: Option<String>,
}

impl Job {
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or("")
    }

    pub fn is_disabled(&self) -> bool {
        self.color().starts_with("disabled")
    }
}

#[derive(Debug, Deserialize)]
struct JobList {
    #[serde(default)]
    jobs: Vec<Job>,
}

/// Reference to a build embedded in a job response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildRef {
    pub number: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub last_build: Option<BuildRef>,
    #[serde(default)]
    pub last_successful_build: Option<BuildRef>,
    #[serde(default)]
    pub last_failed_build: Option<BuildRef>,
    /// Children of folders and multibranch pipelines
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildDetail {
    pub number: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub result: Option<String>,
    /// Start time in epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
    /// Duration in milliseconds, zero while the build is running
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum JenkinsError {
    #[error("invalid Jenkins URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: {status} - {body}")]
    Status {
        context: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Parse a build number given on the command line or to an MCP tool.
///
/// Only positive integers are accepted.
pub fn parse_build_number(raw: &str) -> Result<u64, String> {
    match raw.trim().parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(format!("Invalid build number: {}", raw)),
    }
}

/// Parse a job name given on the command line.
///
/// Surrounding whitespace is dropped; a blank name is rejected.
pub fn parse_job_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("job name cannot be empty".to_string());
    }
    Ok(name.to_string())
}

#[derive(Clone)]
pub struct JenkinsClient {
    base: Url,
    username: String,
    token: Token,
    http: Client,
}

impl JenkinsClient {
    /// Create a client for the session's Jenkins instance.
    pub fn new(session: &Session) -> Result<Self, JenkinsError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("jenkins-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(JenkinsError::Client)?;

        let base = Url::parse(&session.url).map_err(|e| JenkinsError::InvalidUrl {
            url: session.url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(JenkinsError::InvalidUrl {
                url: session.url.clone(),
                reason: "URL cannot hold a path".to_string(),
            });
        }

        Ok(Self {
            base,
            username: session.username.clone(),
            token: session.token.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build `{base}/job/{folder}/job/{name}/{tail...}` with every segment
    /// percent-encoded.
    fn endpoint(&self, job: Option<&JobPath>, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            if let Some(job) = job {
                for name in job.segments() {
                    segments.push("job").push(name);
                }
            }
            segments.extend(tail);
        }
        url
    }

    fn job_endpoint(&self, job_name: &str, tail: &[&str]) -> Url {
        self.endpoint(Some(&parse_job_path(job_name)), tail)
    }

    async fn send(&self, method: Method, url: Url, context: &str) -> Result<Response, JenkinsError> {
        tracing::debug!(%method, %url, "jenkins request");

        let response = self
            .http
            .request(method, url)
            .basic_auth(&self.username, Some(self.token.expose()))
            .send()
            .await
            .map_err(|source| JenkinsError::Transport {
                context: context.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(%status, "jenkins response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JenkinsError::Status {
                context: context.to_string(),
                status,
                body,
            });
        }
        Ok(response)
    }

    async fn read_text(response: Response, context: &str) -> Result<String, JenkinsError> {
        response
            .text()
            .await
            .map_err(|source| JenkinsError::Transport {
                context: context.to_string(),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, JenkinsError> {
        let response = self.send(Method::GET, url, context).await?;
        let body = Self::read_text(response, context).await?;
        serde_json::from_str(&body).map_err(JenkinsError::Decode)
    }

    /// List top-level jobs.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, JenkinsError> {
        let mut url = self.endpoint(None, &["api", "json"]);
        url.query_pairs_mut().append_pair("tree", JOBS_TREE);

        let list: JobList = self.get_json(url, "failed to list jobs").await?;
        Ok(list.jobs)
    }

    /// Get a job, including its last builds and any child jobs.
    pub async fn get_job(&self, job_name: &str) -> Result<JobDetail, JenkinsError> {
        let mut url = self.job_endpoint(job_name, &["api", "json"]);
        url.query_pairs_mut().append_pair("tree", JOB_TREE);

        self.get_json(url, "failed to get job").await
    }

    /// Queue a new build of a job.
    pub async fn build_job(&self, job_name: &str) -> Result<(), JenkinsError> {
        let url = self.job_endpoint(job_name, &["build"]);
        self.send(Method::POST, url, "failed to trigger build").await?;
        Ok(())
    }

    pub async fn get_build(&self, job_name: &str, number: u64) -> Result<BuildDetail, JenkinsError> {
        let number = number.to_string();
        let url = self.job_endpoint(job_name, &[&number, "api", "json"]);
        self.get_json(url, "failed to get build").await
    }

    pub async fn get_last_build(&self, job_name: &str) -> Result<BuildDetail, JenkinsError> {
        let url = self.job_endpoint(job_name, &["lastBuild", "api", "json"]);
        self.get_json(url, "failed to get last build").await
    }

    /// Fetch the full console output of a build as one body.
    ///
    /// The bytes are returned as sent; console logs are not always UTF-8.
    pub async fn get_build_log(&self, job_name: &str, number: u64) -> Result<Vec<u8>, JenkinsError> {
        let number = number.to_string();
        let url = self.job_endpoint(job_name, &[&number, "consoleText"]);
        let context = "failed to get build log";

        let response = self.send(Method::GET, url, context).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| JenkinsError::Transport {
                context: context.to_string(),
                source,
            })?;
        Ok(body.to_vec())
    }
}
