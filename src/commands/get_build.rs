use crate::format::{build_status, format_duration, format_field, format_timestamp};
use crate::jenkins::{BuildDetail, JenkinsClient};

pub async fn execute(client: &JenkinsClient, job_name: &str, number: u64) -> Result<(), String> {
    let build = client
        .get_build(job_name, number)
        .await
        .map_err(|e| e.to_string())?;
    print!("{}", render(&build));
    Ok(())
}

/// Field listing for a single build, shared with `get-last-build`.
pub fn render(build: &BuildDetail) -> String {
    let mut fields = vec![
        format_field("Build Number", &build.number.to_string()),
        format_field("URL", &build.url),
        format_field("Status", &build_status(build.result.as_deref(), build.building)),
    ];

    if let Some(description) = build.description.as_deref().filter(|d| !d.is_empty()) {
        fields.push(format_field("Description", description));
    }
    if let Some(started) = format_timestamp(build.timestamp) {
        fields.push(format_field("Started", &started));
    }
    if build.duration > 0 {
        fields.push(format_field("Duration", &format_duration(build.duration as u64)));
    }

    let mut out = fields.join("\n");
    out.push('\n');
    out
}
