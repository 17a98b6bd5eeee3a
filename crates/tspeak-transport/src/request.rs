use std::collections::BTreeMap;

use serde_json::Value;

/// Query-string parameters for a GET request.
pub type Query = BTreeMap<String, String>;

/// Urlencoded form body for a POST request.
pub type Form = BTreeMap<String, String>;

/// Extra request headers.
pub type Headers = BTreeMap<String, String>;

/// A GET against a feed or listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    /// Fully built target URL, without query string.
    pub uri: String,
    /// Query parameters, `None` when the caller supplied none and no read
    /// key was injected.
    pub qs: Option<Query>,
    /// Decode the response body as JSON.
    pub json: bool,
}

impl GetRequest {
    /// Create a JSON-decoded GET request.
    pub fn json(uri: impl Into<String>, qs: Option<Query>) -> Self {
        Self {
            uri: uri.into(),
            qs,
            json: true,
        }
    }
}

/// A form-encoded POST carrying a channel update.
#[derive(Clone, PartialEq, Eq)]
pub struct PostRequest {
    /// Fully built target URL.
    pub url: String,
    /// Form fields sent as the request body.
    pub form: Form,
    /// Request headers. May carry credential material.
    pub headers: Headers,
}

impl std::fmt::Debug for PostRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: BTreeMap<&str, String> = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str(),
                    format!("<redacted:{} bytes>", value.len()),
                )
            })
            .collect();
        f.debug_struct("PostRequest")
            .field("url", &self.url)
            .field("form", &self.form)
            .field("headers", &headers)
            .finish()
    }
}

/// Decode a raw response body.
///
/// JSON bodies become their decoded value. Anything that is not valid
/// JSON (including an empty body) is passed through as a string, so the
/// caller always sees the platform's answer verbatim.
pub fn decode_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
