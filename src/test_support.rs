//! Helpers shared by tests that talk to a fake Jenkins.

use crate::jenkins::JenkinsClient;
use crate::secrets::Token;
use crate::session::{Session, Source};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub fn session(url: &str) -> Session {
    Session {
        url: url.to_string(),
        username: "admin".to_string(),
        token: Token::new("secret"),
        url_source: Source::Flag,
        username_source: Source::Default,
        token_source: Source::Env,
    }
}

pub fn client(url: &str) -> JenkinsClient {
    JenkinsClient::new(&session(url)).unwrap()
}

/// Serve one canned HTTP response on a random local port.
///
/// Returns the base URL and a handle resolving to the raw request head.
pub async fn serve_once(status: &'static str, body: &str) -> (String, JoinHandle<String>) {
    serve_bytes_once(status, body.as_bytes()).await
}

/// Like [`serve_once`], for bodies that are not valid UTF-8.
pub async fn serve_bytes_once(status: &'static str, body: &[u8]) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_vec();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{}", addr), handle)
}

/// First line of a raw HTTP request, e.g. `GET /api/json HTTP/1.1`
pub fn request_line(request: &str) -> &str {
    request.lines().next().unwrap_or_default()
}
