//! Captcha challenge handling
//!
//! Rap2 asks for a captcha on every login. The image comes with its own
//! short-lived cookie that must accompany the login request it is solved for.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::Result;

/// A fetched captcha image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captcha {
    /// Raw image bytes (usually SVG)
    pub image: Vec<u8>,
    /// `Content-Type` reported by the server
    pub content_type: String,
}

impl Captcha {
    /// Create a captcha from image bytes
    pub fn new(image: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            image,
            content_type: content_type.into(),
        }
    }

    /// Media type without parameters
    pub fn mime(&self) -> &str {
        self.content_type.split(';').next().unwrap_or_default().trim()
    }

    /// Encode the image as a `data:` URI for embedding in a UI
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime(), STANDARD.encode(&self.image))
    }

    /// File extension matching the content type
    pub fn extension(&self) -> &'static str {
        match self.mime() {
            "image/svg+xml" => "svg",
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

/// Something that can turn a captcha image into its solution
///
/// Configured on a client so that automatic re-authentication can fetch and
/// solve a fresh captcha instead of failing. Implementations usually show the
/// image to a human and wait for input.
///
/// `solve` runs while the client holds its session lock. An implementation
/// must not call back into the same client or it will deadlock.
pub trait CaptchaSolver: Send + Sync {
    /// Return the text shown in the captcha image
    fn solve(&self, captcha: &Captcha) -> Result<String>;
}

impl<F> CaptchaSolver for F
where
    F: Fn(&Captcha) -> Result<String> + Send + Sync,
{
    fn solve(&self, captcha: &Captcha) -> Result<String> {
        self(captcha)
    }
}
