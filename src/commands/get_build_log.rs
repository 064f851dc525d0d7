use crate::jenkins::JenkinsClient;
use std::io::Write;

pub async fn execute(client: &JenkinsClient, job_name: &str, number: u64) -> Result<(), String> {
    let log = client
        .get_build_log(job_name, number)
        .await
        .map_err(|e| e.to_string())?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&log)
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("failed to write build log: {}", e))
}
