use crate::colors;
use crate::jenkins::JenkinsClient;

pub async fn execute(client: &JenkinsClient, job_name: &str) -> Result<(), String> {
    client.build_job(job_name).await.map_err(|e| e.to_string())?;
    println!(
        "{}",
        colors::success(&format!("Successfully triggered build for job: {}", job_name))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, request_line, serve_once};

    #[tokio::test]
    async fn test_execute_triggers_build() {
        let (base, server) = serve_once("201 Created", "").await;

        execute(&client(&base), "deploy").await.unwrap();
        let request = server.await.unwrap();

        assert!(request_line(&request).starts_with("POST /job/deploy/build "));
    }

    #[tokio::test]
    async fn test_execute_accepts_ok() {
        let (base, _server) = serve_once("200 OK", "").await;
        assert!(execute(&client(&base), "deploy").await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_forbidden() {
        let (base, _server) = serve_once("403 Forbidden", "No Build permission").await;

        let err = execute(&client(&base), "deploy").await.unwrap_err();
        assert_eq!(
            err,
            "failed to trigger build: 403 Forbidden - No Build permission"
        );
    }
}
