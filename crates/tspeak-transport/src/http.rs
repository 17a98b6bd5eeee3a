use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::request::{decode_body, GetRequest, PostRequest};
use crate::traits::{HttpTransport, TransportFuture};

/// reqwest-backed transport.
///
/// Bodies are returned for every HTTP status, the way the platform signals
/// most failures (for example a bare `-1` for an unauthorized private feed
/// or `0` for a rejected update).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest defaults.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn do_get(&self, request: GetRequest) -> Result<Value> {
        let mut builder = self.client.get(&request.uri);
        if let Some(qs) = &request.qs {
            builder = builder.query(qs);
        }
        if request.json {
            builder = builder.header(reqwest::header::ACCEPT, "application/json");
        }

        let response = builder
            .send()
            .await
            .map_err(|err| request_error(&request.uri, err))?;
        debug!(uri = %request.uri, status = %response.status(), "GET completed");

        let text = response
            .text()
            .await
            .map_err(|err| request_error(&request.uri, err))?;

        if request.json {
            Ok(decode_body(&text))
        } else {
            Ok(Value::String(text))
        }
    }

    async fn do_post(&self, request: PostRequest) -> Result<Value> {
        let mut builder = self.client.post(&request.url).form(&request.form);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| request_error(&request.url, err))?;
        debug!(url = %request.url, status = %response.status(), "POST completed");

        let text = response
            .text()
            .await
            .map_err(|err| request_error(&request.url, err))?;
        Ok(decode_body(&text))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, request: GetRequest) -> TransportFuture<'_> {
        Box::pin(self.do_get(request))
    }

    fn post(&self, request: PostRequest) -> TransportFuture<'_> {
        Box::pin(self.do_post(request))
    }
}

fn request_error(url: &str, err: reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        message: err.to_string(),
    }
}
