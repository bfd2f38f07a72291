//! Blocking HTTP executor
//!
//! [`Transport`] knows the base URL and nothing about sessions: callers pass
//! the cookie header they want attached, and get back the status, any cookies
//! the server set, and the full body.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE};
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::{Error, Result};

/// Content type sent with every JSON body
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Raw reply of one HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    /// Cookies set by the server, joined as a `Cookie` header value
    pub cookies: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpReply {
    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP executor bound to one server
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    /// Create a transport for `base_url`
    ///
    /// The URL must be absolute http(s); a trailing slash is dropped so that
    /// endpoint paths can be appended verbatim.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(Error::config("url can't be empty"));
        }
        let parsed =
            Url::parse(base_url).map_err(|e| Error::config(format!("invalid url {base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported url scheme: {}",
                parsed.scheme()
            )));
        }

        // Redirects surface as non-success replies.
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::network(base_url, e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path (which may carry a query string)
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Execute a GET request
    pub fn get(&self, path: &str, cookies: Option<&str>) -> Result<HttpReply> {
        let request = self.client.get(self.url(path));
        self.execute(path, request, cookies)
    }

    /// Execute a POST request with `body` serialized as JSON
    pub fn post_json<B>(&self, path: &str, body: &B, cookies: Option<&str>) -> Result<HttpReply>
    where
        B: Serialize + ?Sized,
    {
        let json = serde_json::to_string(body).map_err(|e| {
            Error::validation(path, format!("request body cannot be serialized: {e}"))
        })?;
        let request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(json);
        self.execute(path, request, cookies)
    }

    fn execute(
        &self,
        path: &str,
        mut request: RequestBuilder,
        cookies: Option<&str>,
    ) -> Result<HttpReply> {
        if let Some(cookies) = cookies {
            request = request.header(COOKIE, cookies);
        }

        debug!("Sending request to {}", path);
        let response = request.send().map_err(|e| Error::network(path, e))?;

        let status = response.status();
        let cookies = collect_cookies(response.headers());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // Read the body regardless of status; error replies carry the message.
        let body = response
            .bytes()
            .map_err(|e| Error::network(path, e))?
            .to_vec();

        debug!("{} replied {} ({} bytes)", path, status, body.len());
        trace!("Set-Cookie present: {}", cookies.is_some());

        Ok(HttpReply {
            status,
            cookies,
            content_type,
            body,
        })
    }
}

/// Join the `name=value` pairs of every `Set-Cookie` header into one
/// `Cookie` header value. Attributes and cookies being cleared are dropped.
pub fn collect_cookies(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| match pair.split_once('=') {
            Some((name, value)) => !name.trim().is_empty() && !value.trim().is_empty(),
            None => false,
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
