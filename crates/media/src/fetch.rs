//! Bounded download of remote media files.

use std::time::Duration;

use {anyhow::Context, tracing::debug};

/// HTTP fetcher for remote media with a request timeout and a size cap.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    max_bytes: usize,
}

impl Fetcher {
    /// Build a fetcher. `timeout` bounds the whole request, connect included;
    /// `max_bytes` bounds the downloaded body.
    pub fn new(timeout: Duration, max_bytes: usize) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { http, max_bytes })
    }

    /// Download `url` into memory.
    ///
    /// Fails on connection errors, non-success status, timeout, or a body
    /// larger than the configured cap.
    pub async fn download(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let mut resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("{url} answered {status}");
        }

        // Trust Content-Length only to fail fast; the read loop enforces the
        // cap regardless of what the server advertises.
        if let Some(len) = resp.content_length()
            && len > self.max_bytes as u64
        {
            anyhow::bail!("remote file is {len} bytes, limit is {}", self.max_bytes);
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.context("read response body")? {
            if body.len() + chunk.len() > self.max_bytes {
                anyhow::bail!("remote file exceeds the {} byte limit", self.max_bytes);
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url, bytes = body.len(), "downloaded remote file");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(max_bytes: usize) -> Fetcher {
        match Fetcher::new(Duration::from_secs(5), max_bytes) {
            Ok(f) => f,
            Err(e) => panic!("build fetcher: {e}"),
        }
    }

    #[tokio::test]
    async fn downloads_small_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/file.png")
            .with_status(200)
            .with_body(b"fake png bytes")
            .create_async()
            .await;

        let url = format!("{}/file.png", server.url());
        let body = match fetcher(1024).download(&url).await {
            Ok(b) => b,
            Err(e) => panic!("download failed: {e}"),
        };
        assert_eq!(body, b"fake png bytes");
    }

    #[tokio::test]
    async fn rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.pdf")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/missing.pdf", server.url());
        assert!(fetcher(1024).download(&url).await.is_err());
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/big.bin")
            .with_status(200)
            .with_body(vec![0u8; 64])
            .create_async()
            .await;

        let url = format!("{}/big.bin", server.url());
        let err = match fetcher(16).download(&url).await {
            Ok(_) => panic!("oversized download should fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("limit"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn rejects_unreachable_host() {
        // Port 1 on localhost is never listening.
        assert!(
            fetcher(1024)
                .download("http://127.0.0.1:1/file.bin")
                .await
                .is_err()
        );
    }
}
