//! Rap2 reply envelope interpretation
//!
//! Rap2 answers `{"data": ...}` on success and reports failures inside the
//! body, usually with status 200: `{"isOk": false, "errMsg": "..."}` for
//! rejected requests and `{"data": {"errMsg": "..."}}` for rejected logins.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::client::HttpReply;
use crate::{Error, Result};

/// Text Rap2 puts in `errMsg` when the session is missing or revoked
pub const AUTH_DENIED_MARKER: &str = "没有访问权限";

/// Maximum length for reply bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Interpreted reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The `data` payload as JSON text
    Data(String),
    /// The server refused the request for lack of authentication
    Denied(String),
}

/// Whether a failed reply means "log in again"
pub fn is_auth_denied(status: StatusCode, message: &str) -> bool {
    status == StatusCode::UNAUTHORIZED || message.contains(AUTH_DENIED_MARKER)
}

/// Whether the body is a Rap2 rejection (`isOk: false` or an `errMsg`)
///
/// Proxy error pages and unknown routes are not rejections even though their
/// status is a failure.
pub fn is_rejection_envelope(reply: &HttpReply) -> bool {
    let Ok(value) = serde_json::from_slice::<Value>(&reply.body) else {
        return false;
    };
    let has_err_msg = |v: &Value| v.get("errMsg").is_some_and(Value::is_string);
    value.get("isOk").and_then(Value::as_bool) == Some(false)
        || has_err_msg(&value)
        || value.get("data").is_some_and(has_err_msg)
}

/// Classify one HTTP reply from `path`
pub fn interpret(path: &str, reply: &HttpReply) -> Result<Reply> {
    let text = String::from_utf8(reply.body.clone())
        .map_err(|e| Error::decode(path, format!("reply is not UTF-8: {e}")))?;

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            let quoted = truncate_body(&text);
            if is_auth_denied(reply.status, &text) {
                return Ok(Reply::Denied(quoted));
            }
            if !reply.status.is_success() {
                return Err(Error::response(path, reply.status.as_u16(), quoted));
            }
            return Err(Error::decode(path, format!("reply is not JSON ({e}): {quoted}")));
        }
    };

    if let Some(message) = failure_message(reply.status, &value, &text) {
        if is_auth_denied(reply.status, &message) {
            warn!("{} was refused: {}", path, message);
            return Ok(Reply::Denied(message));
        }
        return Err(Error::response(path, reply.status.as_u16(), message));
    }

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or_default(),
        other => other,
    };
    Ok(Reply::Data(payload.to_string()))
}

/// Decode a `data` payload, naming the offending field on failure
pub fn decode<T: DeserializeOwned>(path: &str, data: &str) -> Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(data);
    serde_path_to_error::deserialize(deserializer).map_err(|e| Error::decode(path, e.to_string()))
}

fn failure_message(status: StatusCode, value: &Value, text: &str) -> Option<String> {
    let err_msg = |v: &Value| v.get("errMsg").and_then(Value::as_str).map(str::to_string);

    if value.get("isOk").and_then(Value::as_bool) == Some(false) {
        return Some(err_msg(value).unwrap_or_else(|| "request failed".to_string()));
    }
    if let Some(message) = value.get("data").and_then(err_msg) {
        return Some(message);
    }
    if !status.is_success() {
        return Some(err_msg(value).unwrap_or_else(|| truncate_body(text)));
    }
    None
}

/// Truncate a reply body to avoid quoting excessive data
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
