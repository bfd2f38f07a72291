//! Request type definitions
//!
//! Bodies the client submits to the Rap2 server.

use serde::{Deserialize, Serialize};

use super::model::Rap2Property;

/// Body of `POST /account/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub captcha: String,
}

impl LoginRequest {
    /// Create a login request
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        captcha: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            captcha: captcha.into(),
        }
    }
}

/// Input for creating a module
///
/// The server assigns the id and priority; the creator is stamped from the
/// logged-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleRequest {
    pub repository_id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateModuleRequest {
    /// Create a request for a module in the given repository
    pub fn new(repository_id: i64, name: impl Into<String>) -> Self {
        Self {
            repository_id: Some(repository_id),
            name: name.into(),
            description: None,
        }
    }

    /// Set the module description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Replacement property tree for one interface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertiesRequest {
    /// Target interface, sent as the `itf` query parameter
    #[serde(skip_serializing)]
    pub interface_id: Option<i64>,
    pub properties: Vec<Rap2Property>,
    #[serde(default)]
    pub summary: PropertiesSummary,
}

impl UpdatePropertiesRequest {
    /// Create a request replacing the properties of `interface_id`
    pub fn new(interface_id: i64, properties: Vec<Rap2Property>) -> Self {
        Self {
            interface_id: Some(interface_id),
            properties,
            summary: PropertiesSummary::default(),
        }
    }

    /// Set the request body format recorded in the summary
    pub fn with_body_option(mut self, body_option: impl Into<String>) -> Self {
        self.summary.body_option = Some(body_option.into());
        self
    }
}

/// Interface-level metadata sent alongside a property update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesSummary {
    /// `FORM_DATA`, `FORM_URLENCODED`, `RAW` or `BINARY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_option: Option<String>,
    /// Property position filter (1 header, 2 query, 3 body)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_filter: Option<i64>,
}
