//! Native HTTP transport
//!
//! `reqwest` client with a per-process cookie jar, so a session established by
//! `/login` carries over to later requests exactly as it would in a browser.

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::{ClientError, ClientResult};
use crate::ports::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Reqwest-backed transport used by the CLI and the integration tests
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client; the timeout is applied only when configured
    pub fn new(config: &ServerConfig) -> ClientResult<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url` and return the raw body, for file downloads such as exports
    pub async fn fetch_bytes(&self, url: &str) -> ClientResult<Vec<u8>> {
        let response = self.client.get(parse_url(url)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!("{} returned {}", url, status)));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

fn parse_url(url: &str) -> ClientResult<Url> {
    Url::parse(url).map_err(|e| ClientError::Transport(format!("Invalid URL '{}': {}", url, e)))
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let url = parse_url(&request.url)?;

        let builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self
                .client
                .post(url.clone())
                .header(header::CONTENT_TYPE, "application/json"),
        };
        let builder = match &request.body {
            Some(body) => builder.body(serde_json::to_vec(body)?),
            None => builder,
        };

        tracing::debug!(method = ?request.method, url = %url, "Sending request");
        let response = builder.send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let redirected = final_url != url;
        let body = response.text().await?;

        tracing::debug!(status, redirected, "Response received");
        Ok(HttpResponse {
            status,
            redirected,
            url: final_url.to_string(),
            body,
        })
    }
}
