use crate::jenkins::JenkinsError;
use reqwest::StatusCode;
use rmcp::model::{CallToolResult, Content};
use thiserror::Error;

/// Per-call failures of a tool.
///
/// These never stop the server: each one is turned into an error tool
/// result, optionally followed by a hint for the calling agent.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required string argument was absent or blank
    #[error("Missing or invalid '{0}' argument")]
    MissingArgument(&'static str),

    /// The build number was not a positive integer
    #[error("Invalid build number: {0}")]
    InvalidBuildNumber(String),

    /// The Jenkins request failed
    #[error("{0}")]
    Jenkins(#[from] JenkinsError),
}

impl ToolError {
    /// Follow-up advice for the caller, when there is something useful to say
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ToolError::MissingArgument("job_name") => {
                Some("Use 'list_jobs' to see available job names")
            }
            ToolError::MissingArgument(_) | ToolError::InvalidBuildNumber(_) => {
                Some("Build numbers are positive integers such as '42'; 'get_job' shows recent builds")
            }
            ToolError::Jenkins(JenkinsError::Status { status, .. }) => {
                if *status == StatusCode::NOT_FOUND {
                    Some(
                        "Use 'list_jobs' to see available jobs; jobs inside folders are addressed as 'folder/job/name'",
                    )
                } else if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN {
                    Some(
                        "Check the Jenkins username and API token; run 'jenkins configure <url>' to store a new token",
                    )
                } else {
                    None
                }
            }
            ToolError::Jenkins(JenkinsError::Transport { .. }) => {
                Some("Check that the Jenkins URL is reachable from this machine")
            }
            ToolError::Jenkins(_) => None,
        }
    }

    /// Convert into an error tool result for the MCP client
    pub fn into_call_result(self) -> CallToolResult {
        let mut message = self.to_string();
        if let Some(hint) = self.hint() {
            message.push_str("\nHint: ");
            message.push_str(hint);
        }
        CallToolResult::error(vec![Content::text(message)])
    }
}
