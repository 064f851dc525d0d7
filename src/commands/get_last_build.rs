use crate::commands::get_build;
use crate::jenkins::JenkinsClient;

pub async fn execute(client: &JenkinsClient, job_name: &str) -> Result<(), String> {
    let build = client
        .get_last_build(job_name)
        .await
        .map_err(|e| e.to_string())?;
    print!("{}", get_build::render(&build));
    Ok(())
}
