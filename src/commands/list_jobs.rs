use crate::colors;
use crate::format::status_from_color;
use crate::jenkins::{JenkinsClient, Job};

pub async fn execute(client: &JenkinsClient) -> Result<(), String> {
    let jobs = client.list_jobs().await.map_err(|e| e.to_string())?;
    print!("{}", render(&jobs));
    Ok(())
}

/// One line per job: name, status and URL in fixed-width columns.
pub fn render(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs found\n".to_string();
    }

    let mut out = format!(
        "{}\n\n",
        colors::section_header(&format!("Found {} job(s):", jobs.len()))
    );
    for job in jobs {
        let status = status_from_color(job.color());
        let column = format!("{:<15}", status);
        out.push_str(&format!(
            "{:<40} {} {}\n",
            job.name,
            colors::status(&status, &column),
            job.url
        ));
    }
    out
}
