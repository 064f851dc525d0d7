use crate::format::{format_field, status_from_color};
use crate::jenkins::{JenkinsClient, JobDetail};

pub async fn execute(client: &JenkinsClient, job_name: &str) -> Result<(), String> {
    let job = client.get_job(job_name).await.map_err(|e| e.to_string())?;
    print!("{}", render(&job));
    Ok(())
}

pub fn render(job: &JobDetail) -> String {
    let mut fields = vec![
        format_field("Job Name", &job.name),
        format_field("URL", &job.url),
        format_field(
            "Status",
            &status_from_color(job.color.as_deref().unwrap_or_default()),
        ),
    ];

    if let Some(description) = job.description.as_deref().filter(|d| !d.is_empty()) {
        fields.push(format_field("Description", description));
    }
    if let Some(build) = &job.last_build {
        let result = build.result.as_deref().unwrap_or_default();
        fields.push(format_field("Last Build", &format!("#{} - {}", build.number, result)));
    }
    if let Some(build) = &job.last_successful_build {
        fields.push(format_field("Last Success", &format!("#{}", build.number)));
    }
    if let Some(build) = &job.last_failed_build {
        fields.push(format_field("Last Failed", &format!("#{}", build.number)));
    }
    if !job.jobs.is_empty() {
        let names: Vec<&str> = job.jobs.iter().map(|inner| inner.name.as_str()).collect();
        fields.push(format_field("Jobs", &names.join("\n")));
    }

    let mut out = fields.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jenkins::{BuildRef, Job};
    use crate::test_support::{client, request_line, serve_once};

    fn detail() -> JobDetail {
        JobDetail {
            name: "api".to_string(),
            url: "https://ci/job/api/".to_string(),
            description: None,
            color: Some("blue".to_string()),
            last_build: None,
            last_successful_build: None,
            last_failed_build: None,
            jobs: Vec::new(),
        }
    }

    #[test]
    fn test_render_minimal_job() {
        let output = render(&detail());

        assert_eq!(
            output,
            format!(
                "{:<20} api\n{:<20} https://ci/job/api/\n{:<20} SUCCESS\n",
                "Job Name:", "URL:", "Status:"
            )
        );
    }

    #[test]
    fn test_render_full_job() {
        let job = JobDetail {
            description: Some("Builds the API".to_string()),
            last_build: Some(BuildRef {
                number: 12,
                url: String::new(),
                result: Some("FAILURE".to_string()),
            }),
            last_successful_build: Some(BuildRef {
                number: 10,
                url: String::new(),
                result: None,
            }),
            last_failed_build: Some(BuildRef {
                number: 12,
                url: String::new(),
                result: None,
            }),
            ..detail()
        };
        let output = render(&job);

        assert!(output.contains(&format!("{:<20} Builds the API", "Description:")));
        assert!(output.contains(&format!("{:<20} #12 - FAILURE", "Last Build:")));
        assert!(output.contains(&format!("{:<20} #10", "Last Success:")));
        assert!(output.contains(&format!("{:<20} #12", "Last Failed:")));
    }

    #[test]
    fn test_render_folder_lists_children() {
        let job = JobDetail {
            color: None,
            jobs: vec![
                Job {
                    name: "main".to_string(),
                    url: String::new(),
                    color: Some("blue".to_string()),
                },
                Job {
                    name: "feature-x".to_string(),
                    url: String::new(),
                    color: None,
                },
            ],
            ..detail()
        };
        let output = render(&job);

        assert!(output.contains(&format!("{:<20} \n", "Status:")));
        assert!(output.contains("Jobs:"));
        assert!(output.contains("main"));
        assert!(output.contains("feature-x"));
    }

    #[tokio::test]
    async fn test_execute_nested_job() {
        let (base, server) = serve_once("200 OK", r#"{"name":"master","url":"u"}"#).await;

        execute(&client(&base), "team/job/master").await.unwrap();
        let request = server.await.unwrap();

        assert!(request_line(&request).starts_with("GET /job/team/job/master/api/json"));
    }
}
