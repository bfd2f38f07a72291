//! Rap2 entity definitions
//!
//! Wire shapes of the entities the client reads and writes. The client only
//! looks at identifying fields; everything else passes through untouched, so
//! every field is optional and missing values are skipped on serialization.

use serde::{Deserialize, Serialize};

use super::serde_helpers::{deserialize_flexible_bool, deserialize_flexible_id};

/// The logged-in account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rap2User {
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emp_id: Option<String>,
}

/// A repository together with its modules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rap2Repository {
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub visibility: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub organization_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub creator_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub locker_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<Rap2Module>>,
}

/// A module (category) inside a repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rap2Module {
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub creator_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<Rap2Interface>>,
}

/// Interface fields without the property tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rap2InterfaceBase {
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub creator_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub locker_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub module_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_id: Option<i64>,
}

/// A full interface, including its request/response properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rap2Interface {
    #[serde(flatten)]
    pub base: Rap2InterfaceBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Rap2Property>>,
}

impl From<Rap2InterfaceBase> for Rap2Interface {
    fn from(base: Rap2InterfaceBase) -> Self {
        Self {
            base,
            properties: None,
        }
    }
}

/// One node of an interface's request or response schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rap2Property {
    /// Server id, or a client-side placeholder such as `"memory-1"` for new nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    /// `request` or `response`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Request parameter position (1 header, 2 query, 3 body)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub interface_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub creator_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub module_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_flexible_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub required: Option<bool>,
}
