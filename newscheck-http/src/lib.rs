//! JSON-over-HTTP transport for the remote analysis endpoints.
//!
//! One call shape is supported: POST a JSON body, decode a JSON reply. Each
//! request carries its own timeout and an [`Auth`] mode. Secrets never reach
//! the logs; the key query parameter and the bearer token are replaced by
//! `<redacted>` in every event. Setting `NEWSCHECK_HTTP_RAW=1` additionally
//! logs a curl-equivalent command and the raw reply under the `http.raw` target.
//!
//! No request is retried. A failed endpoint is abandoned and the caller moves
//! on to the next one.
//!
//! ```no_run
//! # async fn run() -> Result<(), newscheck_http::HttpError> {
//! use newscheck_http::{HttpClient, RequestOpts};
//!
//! let client = HttpClient::new("https://api.example.com/")?;
//! let reply: serde_json::Value = client
//!     .post_json_opts("v1/generate", &serde_json::json!({ "prompt": "hi" }), RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::{Duration, Instant};
use thiserror::Error;

const RAW_ENV: &str = "NEWSCHECK_HTTP_RAW";
const RAW_BODY_LIMIT: usize = 64 * 1024;
const SNIPPET_LIMIT: usize = 500;
const REDACTED: &str = "<redacted>";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("bad url: {0}")]
    Url(String),
    #[error("could not build request: {0}")]
    Build(String),
    #[error("transport failure: {0}")]
    Network(String),
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    #[error("undecodable reply ({0}): {1}")]
    Decode(String, String),
    #[error("HTTP {status}: {message} (request id {request_id})")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

/// How a request proves who it is.
///
/// ```
/// use newscheck_http::Auth;
/// use std::borrow::Cow;
///
/// let auth = Auth::Query { name: "key", value: Cow::Borrowed("secret") };
/// assert_eq!(auth.kind(), "query");
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
    /// Key sent as a query parameter, as Gemini's `?key=` expects.
    Query { name: &'a str, value: Cow<'a, str> },
    None,
}

impl Auth<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::Query { .. } => "query",
            Auth::None => "none",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    /// Overrides [`HttpClient::default_timeout`] for this request.
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Paths passed to [`post_json_opts`](Self::post_json_opts) are joined onto
    /// `base`, so a directory-like base needs a trailing slash. An empty path
    /// targets `base` itself.
    ///
    /// ```
    /// use newscheck_http::{HttpClient, HttpError, DEFAULT_TIMEOUT};
    ///
    /// let client = HttpClient::new("https://api.example.com/")?;
    /// assert_eq!(client.default_timeout, DEFAULT_TIMEOUT);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(format!("{base}: {e}")))?;
        let inner = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn target(&self, path: &str) -> Result<Url, HttpError> {
        match path {
            "" => Ok(self.base.clone()),
            rel => self
                .base
                .join(rel)
                .map_err(|e| HttpError::Url(format!("{rel}: {e}"))),
        }
    }

    pub async fn post_json_opts<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut url = self.target(path)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let auth = opts.auth.unwrap_or(Auth::None);
        let payload = serde_json::to_vec(body).map_err(|e| HttpError::Build(e.to_string()))?;

        if let Auth::Query { name, value } = &auth {
            url.query_pairs_mut().append_pair(name, value);
        }
        let mut builder = self
            .inner
            .post(url.clone())
            .timeout(timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.clone());
        if let Auth::Bearer(token) = &auth {
            builder = builder.bearer_auth(clean_token(token)?);
        }

        let req_id = uuid::Uuid::new_v4().simple().to_string();
        let shown_url = redact_url(&url);
        tracing::debug!(
            %req_id,
            url = %shown_url,
            auth = auth.kind(),
            timeout_ms = timeout.as_millis() as u64,
            body_len = payload.len(),
            "http.post"
        );
        if raw_logging() {
            tracing::debug!(
                target: "http.raw",
                %req_id,
                curl = %curl_line(&shown_url, auth.kind(), &payload),
                "request"
            );
        }

        let started = Instant::now();
        let resp = builder
            .send()
            .await
            .map_err(|e| transport_failure(&req_id, e, timeout))?;
        let status = resp.status();
        let request_id = provider_request_id(resp.headers());
        let headers = raw_logging().then(|| shown_headers(resp.headers()));
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| transport_failure(&req_id, e, timeout))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(%req_id, %status, elapsed_ms, body_len = bytes.len(), %request_id, "http.reply");
        if let Some(headers) = headers {
            let cut = bytes.len().min(RAW_BODY_LIMIT);
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                ?headers,
                body = %String::from_utf8_lossy(&bytes[..cut]),
                truncated = bytes.len() > cut,
                "reply"
            );
        }

        if !status.is_success() {
            let message = error_message(&bytes);
            tracing::warn!(%req_id, %status, %message, %request_id, "http.status");
            return Err(HttpError::Api {
                status,
                message,
                request_id,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            let snippet = snippet(&bytes);
            tracing::warn!(%req_id, error = %e, body = %snippet, "http.decode");
            HttpError::Decode(e.to_string(), snippet)
        })
    }
}

fn raw_logging() -> bool {
    std::env::var(RAW_ENV)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// The URL is dropped from the error because it may carry the API key.
fn transport_failure(req_id: &str, err: reqwest::Error, timeout: Duration) -> HttpError {
    let err = err.without_url();
    if err.is_timeout() {
        tracing::warn!(%req_id, timeout_ms = timeout.as_millis() as u64, "http.timeout");
        HttpError::Timeout(timeout)
    } else {
        tracing::warn!(%req_id, error = %err, "http.transport");
        HttpError::Network(err.to_string())
    }
}

fn provider_request_id(headers: &HeaderMap) -> String {
    ["x-request-id", "x-goog-request-id"]
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        .unwrap_or("-")
        .to_string()
}

fn is_secret(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.ends_with("key") || name.contains("token") || name.contains("secret") || name.contains("auth")
}

/// Copy of `url` with secret-looking query values masked.
fn redact_url(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret(&k) { REDACTED.into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    let mut shown = url.clone();
    shown.set_query(None);
    if !pairs.is_empty() {
        shown.query_pairs_mut().extend_pairs(pairs);
    }
    shown
}

fn shown_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if is_secret(name.as_str()) || name.as_str() == "set-cookie" {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), value)
        })
        .collect()
}

/// curl command reproducing a request. `url` must already be redacted.
fn curl_line(url: &Url, auth_kind: &str, body: &[u8]) -> String {
    let quote = |s: &str| format!("'{}'", s.replace('\'', r"'\''"));
    let mut line = String::from("curl -X POST -H 'Content-Type: application/json'");
    if auth_kind == "bearer" {
        line.push_str(" -H 'Authorization: Bearer <redacted>'");
    }
    let body = String::from_utf8_lossy(body);
    line.push_str(" -d ");
    line.push_str(&quote(&truncate(&body, RAW_BODY_LIMIT, "…")));
    line.push(' ');
    line.push_str(&quote(url.as_str()));
    line
}

/// Best human-readable message in an error reply.
fn error_message(body: &[u8]) -> String {
    // {"error": {"message": ..., "status": ...}} as sent by Google APIs
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
        status: Option<String>,
    }

    if let Ok(Nested { error }) = serde_json::from_slice::<Nested>(body) {
        return match error.status {
            Some(status) => format!("{} ({status})", error.message),
            None => error.message,
        };
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body) {
        let found = ["message", "detail", "error"]
            .iter()
            .find_map(|k| map.get(*k).and_then(|v| v.as_str()).filter(|s| !s.is_empty()));
        if let Some(msg) = found {
            return msg.to_string();
        }
    }
    snippet(body)
}

fn snippet(body: &[u8]) -> String {
    truncate(&String::from_utf8_lossy(body), SNIPPET_LIMIT, "...").into_owned()
}

fn truncate<'a>(s: &'a str, max: usize, marker: &str) -> Cow<'a, str> {
    if s.len() <= max {
        return Cow::Borrowed(s);
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}{marker}", &s[..end]))
}

/// Bearer tokens pasted from env files often carry quotes or stray whitespace.
fn clean_token(raw: &str) -> Result<String, HttpError> {
    let token: String = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if !token.is_ascii() || token.bytes().any(|b| b.is_ascii_control()) {
        return Err(HttpError::Build(
            "API key must be printable ASCII".to_string(),
        ));
    }
    HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| HttpError::Build(format!("API key rejected as header value: {e}")))?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_unquoted_and_compacted() {
        assert_eq!(clean_token("  \"ab c\n\"  ").unwrap(), "abc");
    }

    #[test]
    fn token_must_be_ascii() {
        assert!(matches!(clean_token("kéy"), Err(HttpError::Build(_))));
    }

    #[test]
    fn google_error_envelope_is_unwrapped() {
        let body = br#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid (INVALID_ARGUMENT)");
    }

    #[test]
    fn flat_error_message_is_used() {
        assert_eq!(error_message(br#"{"detail":"nope"}"#), "nope");
    }

    #[test]
    fn non_json_error_falls_back_to_snippet() {
        let body = "x".repeat(SNIPPET_LIMIT + 10);
        let msg = error_message(body.as_bytes());
        assert!(msg.ends_with("..."));
        assert_eq!(msg.len(), SNIPPET_LIMIT + 3);
    }

    #[test]
    fn key_query_param_is_masked() {
        let url = Url::parse("https://example.com/v1/m:generateContent?key=s3cret&alt=json").unwrap();
        let shown = redact_url(&url);
        assert!(!shown.as_str().contains("s3cret"));
        assert!(shown.as_str().contains("alt=json"));
    }

    #[test]
    fn curl_never_contains_the_key() {
        let url = Url::parse("https://example.com/v1/generate?key=s3cret").unwrap();
        let curl = curl_line(&redact_url(&url), "query", br#"{"prompt":"it's"}"#);
        assert!(!curl.contains("s3cret"));
        assert!(curl.contains(r"it'\''s"));
    }

    #[test]
    fn empty_path_targets_base() {
        let client = HttpClient::new("https://ai.example.com/api/generate").unwrap();
        assert_eq!(
            client.target("").unwrap().as_str(),
            "https://ai.example.com/api/generate"
        );
    }

    #[test]
    fn relative_path_joins_directory_base() {
        let client = HttpClient::new("https://example.com/v1beta/").unwrap();
        assert_eq!(
            client
                .target("models/gemini-1.5-flash:generateContent")
                .unwrap()
                .as_str(),
            "https://example.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
