use crate::jenkins::parse_build_number;
use crate::mcp::errors::ToolError;
use schemars::JsonSchema;
use serde::Deserialize;

/// Arguments of tools that address a single job
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct JobRequest {
    /// Jenkins job name; jobs inside folders are written as `folder/job/name`
    #[serde(default)]
    pub job_name: Option<String>,
}

impl JobRequest {
    pub fn job_name(&self) -> Result<&str, ToolError> {
        required(self.job_name.as_deref(), "job_name")
    }
}

/// Arguments of tools that address a single build of a job
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct BuildRequest {
    /// Jenkins job name; jobs inside folders are written as `folder/job/name`
    #[serde(default)]
    pub job_name: Option<String>,

    /// Build number (e.g., '42')
    #[serde(default)]
    pub build_number: Option<String>,
}

impl BuildRequest {
    pub fn job_name(&self) -> Result<&str, ToolError> {
        required(self.job_name.as_deref(), "job_name")
    }

    pub fn build_number(&self) -> Result<u64, ToolError> {
        let raw = required(self.build_number.as_deref(), "build_number")?;
        parse_build_number(raw).map_err(|_| ToolError::InvalidBuildNumber(raw.to_string()))
    }
}

/// Arguments are optional in the schema so that a missing one reaches the
/// tool and comes back as an error result rather than a protocol error.
fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ToolError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ToolError::MissingArgument(name))
}
