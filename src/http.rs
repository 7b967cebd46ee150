use std::future::Future;

use wreq::{Client, header};

use crate::config::ClientConfig;
use crate::error::TrackingError;

const API_KEY_HEADER: &str = "Tracking-Api-Key";

/// The HTTP collaborator behind [`TrackingClient`](crate::TrackingClient).
///
/// Implementations own connection setup, authentication and timeouts, and
/// return the raw response body. A non-2xx status is a transport error.
pub trait HttpExecutor: Send + Sync {
    /// `PUT` a JSON body to `path`.
    fn put_json(
        &self,
        path: &str,
        body: String,
    ) -> impl Future<Output = Result<String, TrackingError>> + Send;

    /// `GET` `path` with the given query pairs.
    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<String, TrackingError>> + Send;
}

/// [`HttpExecutor`] backed by a `wreq` client
pub struct WreqExecutor {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl WreqExecutor {
    pub fn new(config: &ClientConfig) -> Result<Self, TrackingError> {
        if config.api_key.is_empty() {
            return Err(TrackingError::Config("api key is empty".to_string()));
        }

        let mut http_builder = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .zstd(true);

        if let Some(ref proxy_url) = config.proxy {
            let proxy = wreq::Proxy::all(proxy_url)
                .map_err(|e| TrackingError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
            http_builder = http_builder.proxy(proxy);
        }

        let http_client = http_builder
            .build()
            .map_err(|e| TrackingError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: wreq::RequestBuilder) -> Result<String, TrackingError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(TrackingError::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(TrackingError::transport)?;

        if !status.is_success() {
            tracing::debug!(%status, "request rejected");
            return Err(TrackingError::transport(format!(
                "API request failed: {} {}",
                status, body
            )));
        }

        Ok(body)
    }
}

impl HttpExecutor for WreqExecutor {
    async fn put_json(&self, path: &str, body: String) -> Result<String, TrackingError> {
        let url = self.url(path);
        tracing::debug!(%url, "PUT");
        let request = self
            .http_client
            .put(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request).await
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, TrackingError> {
        let url = with_query(&self.url(path), query)?;
        tracing::debug!(%url, "GET");
        let request = self.http_client.get(&url);
        self.send(request).await
    }
}

/// Append url-encoded `query` to `url`.
fn with_query(url: &str, query: &[(&str, String)]) -> Result<String, TrackingError> {
    if query.is_empty() {
        return Ok(url.to_string());
    }
    let encoded = serde_urlencoded::to_string(query).map_err(TrackingError::encode)?;
    Ok(format!("{}?{}", url, encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_encodes_pairs() {
        let query = vec![
            ("tracking_numbers", "1Z999,1Z998".to_string()),
            ("items_amount", "40".to_string()),
        ];
        assert_eq!(
            with_query("https://api.example.com/v3/trackings/get", &query).unwrap(),
            "https://api.example.com/v3/trackings/get?tracking_numbers=1Z999%2C1Z998&items_amount=40"
        );
        assert_eq!(with_query("https://x/get", &[]).unwrap(), "https://x/get");
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig {
            base_url: "https://api.example.com/v3/trackings/".to_string(),
            ..ClientConfig::new("secret")
        };
        let executor = WreqExecutor::new(&config).unwrap();
        assert_eq!(executor.url("/create"), "https://api.example.com/v3/trackings/create");
        assert_eq!(executor.url("get"), "https://api.example.com/v3/trackings/get");
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(matches!(
            WreqExecutor::new(&ClientConfig::default()),
            Err(TrackingError::Config(_))
        ));
    }
}
