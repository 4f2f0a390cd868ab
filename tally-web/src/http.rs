//! Fetch transport for the browser, through `gloo-net`.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use tally::{ClientError, ClientResult, HttpRequest, HttpResponse, HttpTransport, Method};

/// Same-origin fetch; the browser carries the session cookie
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn network_error(e: gloo_net::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let builder: RequestBuilder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url).header("Content-Type", "application/json"),
        };

        let prepared = match &request.body {
            Some(body) => builder.body(serde_json::to_string(body)?),
            None => builder.build(),
        }
        .map_err(network_error)?;

        let response = prepared.send().await.map_err(network_error)?;

        Ok(HttpResponse {
            status: response.status(),
            redirected: response.redirected(),
            url: response.url(),
            body: response.text().await.map_err(network_error)?,
        })
    }
}
