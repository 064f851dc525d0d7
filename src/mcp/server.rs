use crate::format::{build_status, format_duration, format_timestamp, status_from_color};
use crate::jenkins::{BuildDetail, JenkinsClient, Job, JobDetail};
use crate::mcp::dto::{BuildRequest, JobRequest};
use crate::mcp::errors::ToolError;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
    transport::stdio,
};

pub const SERVER_NAME: &str = "jenkins-cli-mcp-server";

/// MCP server exposing read-only Jenkins operations as tools
#[derive(Clone)]
pub struct JenkinsMcpServer {
    client: JenkinsClient,
    tool_router: ToolRouter<JenkinsMcpServer>,
}

impl JenkinsMcpServer {
    pub fn new(client: JenkinsClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    async fn list_jobs_text(&self) -> Result<String, ToolError> {
        let jobs = self.client.list_jobs().await?;
        Ok(render_job_list(&jobs))
    }

    async fn get_job_text(&self, request: &JobRequest) -> Result<String, ToolError> {
        let job = self.client.get_job(request.job_name()?).await?;
        Ok(render_job(&job))
    }

    async fn get_build_text(&self, request: &BuildRequest) -> Result<String, ToolError> {
        let job_name = request.job_name()?;
        let number = request.build_number()?;
        let build = self.client.get_build(job_name, number).await?;
        Ok(render_build(&build))
    }

    async fn get_build_log_text(&self, request: &BuildRequest) -> Result<String, ToolError> {
        let job_name = request.job_name()?;
        let number = request.build_number()?;
        let log = self.client.get_build_log(job_name, number).await?;
        Ok(String::from_utf8_lossy(&log).into_owned())
    }
}

#[tool_router]
impl JenkinsMcpServer {
    #[tool(description = "List all Jenkins jobs with their status and URL")]
    pub async fn list_jobs(&self) -> Result<CallToolResult, McpError> {
        Ok(to_call_result("list_jobs", self.list_jobs_text().await))
    }

    #[tool(
        description = "Get details of a specific Jenkins job including status, description, and build history"
    )]
    pub async fn get_job(
        &self,
        Parameters(request): Parameters<JobRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result("get_job", self.get_job_text(&request).await))
    }

    #[tool(description = "Get details of a specific build including status, duration, and timestamp")]
    pub async fn get_build(
        &self,
        Parameters(request): Parameters<BuildRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result("get_build", self.get_build_text(&request).await))
    }

    #[tool(description = "Get the console output of a specific build")]
    pub async fn get_build_log(
        &self,
        Parameters(request): Parameters<BuildRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result(
            "get_build_log",
            self.get_build_log_text(&request).await,
        ))
    }
}

#[tool_handler]
impl ServerHandler for JenkinsMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = SERVER_NAME.to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(
            "Read-only access to a Jenkins server: list jobs, inspect a job or build, and fetch build console output. Jobs inside folders are addressed as 'folder/job/name'."
                .to_string(),
        );
        info
    }
}

/// Serve the tools over stdin/stdout until the client disconnects.
pub async fn run_stdio_server(client: JenkinsClient) -> Result<(), String> {
    tracing::info!(url = %client.base_url(), "starting MCP server on stdio");

    let service = JenkinsMcpServer::new(client)
        .serve(stdio())
        .await
        .map_err(|e| format!("failed to start MCP server: {}", e))?;
    let reason = service
        .waiting()
        .await
        .map_err(|e| format!("MCP server stopped unexpectedly: {}", e))?;

    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}

fn to_call_result(tool: &str, result: Result<String, ToolError>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(error) => {
            tracing::warn!(tool, %error, "tool call failed");
            error.into_call_result()
        }
    }
}

/// Folders are listed, disabled jobs are not.
fn enabled(jobs: &[Job]) -> Vec<&Job> {
    jobs.iter().filter(|job| !job.is_disabled()).collect()
}

fn render_job_list(jobs: &[Job]) -> String {
    let jobs = enabled(jobs);
    if jobs.is_empty() {
        return "No jobs found".to_string();
    }

    let mut out = format!("Found {} job(s):\n\n", jobs.len());
    for job in jobs {
        out.push_str(&format!(
            "{:<40} {:<15} {}\n",
            job.name,
            status_from_color(job.color()),
            job.url
        ));
    }
    out
}

fn render_job(job: &JobDetail) -> String {
    let mut out = format!("Job Name: {}\nURL: {}", job.name, job.url);

    let status = status_from_color(job.color.as_deref().unwrap_or_default());
    if !status.is_empty() {
        out.push_str(&format!("\nStatus: {}", status));
    }
    if let Some(description) = job.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("\nDescription: {}", description));
    }
    if let Some(build) = &job.last_build {
        out.push_str(&format!(
            "\nLast Build: #{} - {}",
            build.number,
            build.result.as_deref().unwrap_or_default()
        ));
    }
    if let Some(build) = &job.last_successful_build {
        out.push_str(&format!("\nLast Success: #{}", build.number));
    }
    if let Some(build) = &job.last_failed_build {
        out.push_str(&format!("\nLast Failed: #{}", build.number));
    }

    let inner = enabled(&job.jobs);
    if !inner.is_empty() {
        out.push_str(&format!("\n\nInner Jobs ({}):", inner.len()));
        for job in inner {
            out.push_str(&format!(
                "\n  {:<38} {:<15} {}",
                job.name,
                status_from_color(job.color()),
                job.url
            ));
        }
    }
    out
}

fn render_build(build: &BuildDetail) -> String {
    let mut out = format!(
        "Build Number: {}\nURL: {}\nStatus: {}",
        build.number,
        build.url,
        build_status(build.result.as_deref(), build.building)
    );

    if let Some(description) = build.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("\nDescription: {}", description));
    }
    if let Some(started) = format_timestamp(build.timestamp) {
        out.push_str(&format!("\nStarted: {}", started));
    }
    if build.duration > 0 {
        out.push_str(&format!("\nDuration: {}", format_duration(build.duration as u64)));
    }
    out
}
