use reqwest::Client;
use serde::Deserialize;

use crate::types::{Error, Result};

pub const DEFAULT_PROXY: &str = "https://api.allorigins.win/get";

#[derive(Deserialize, Debug)]
struct ProxyResponse {
    contents: Option<String>,
}

/// Fetches page markup through a CORS proxy that wraps the page body in
/// `{"contents": "..."}`.
#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: Client,
    proxy: String,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self::with_proxy(client, DEFAULT_PROXY)
    }

    pub fn with_proxy(client: Client, proxy: &str) -> Self {
        Self {
            client,
            proxy: proxy.trim_end_matches('?').to_owned(),
        }
    }

    fn proxy_url(&self, page_url: &str) -> String {
        format!("{}?url={}", self.proxy, urlencoding::encode(page_url))
    }

    pub async fn fetch_page(&self, page_url: &str) -> Result<String> {
        let url = self.proxy_url(page_url);
        log::info!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_else(|_| "empty".to_owned());
            log::error!(
                "proxy request not successful, status code: {}, body: {}",
                status,
                body
            );
            return Err(Error::RequestNotOk(page_url.to_owned()));
        }
        let body: ProxyResponse = resp.json().await?;
        match body.contents {
            Some(contents) if !contents.trim().is_empty() => {
                log::debug!("fetched {} bytes of markup for {}", contents.len(), page_url);
                Ok(contents)
            }
            _ => Err(Error::ContentNotFound(page_url.to_owned())),
        }
    }
}

#[cfg(test)]
mod test {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves exactly one canned HTTP response, returns the proxy base url.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/get", addr)
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_proxy_url_encodes_page_url() {
        let fetcher = PageFetcher::new(Client::new());
        assert_eq!(
            fetcher.proxy_url("https://example.org/jobs?page=2&x=a b"),
            "https://api.allorigins.win/get?url=https%3A%2F%2Fexample.org%2Fjobs%3Fpage%3D2%26x%3Da%20b"
        );
    }

    #[tokio::test]
    async fn test_fetch_page_returns_contents() {
        let proxy = serve_once("200 OK", r#"{"contents":"<h3>Hi</h3>","status":{"http_code":200}}"#).await;
        let fetcher = PageFetcher::with_proxy(local_client(), &proxy);
        let html = fetcher
            .fetch_page("https://example.org/jobs")
            .await
            .expect("Fetch failed");
        assert_eq!(html, "<h3>Hi</h3>");
    }

    #[tokio::test]
    async fn test_fetch_page_empty_contents() {
        let proxy = serve_once("200 OK", r#"{"contents":null}"#).await;
        let fetcher = PageFetcher::with_proxy(local_client(), &proxy);
        let result = fetcher.fetch_page("https://example.org/jobs").await;
        assert!(matches!(result, Err(Error::ContentNotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_proxy_failure() {
        let proxy = serve_once("502 Bad Gateway", r#"{"error":"upstream"}"#).await;
        let fetcher = PageFetcher::with_proxy(local_client(), &proxy);
        let result = fetcher.fetch_page("https://example.org/jobs").await;
        assert!(matches!(result, Err(Error::RequestNotOk(_))));
    }
}
