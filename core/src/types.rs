//! Result DTOs and the response envelope.
//!
//! # Design
//! These mirror the objects the Telegraph API returns. Every field the service
//! may leave out (depending on the requested fields or `return_content`) is an
//! `Option` or carries `#[serde(default)]`, so a sparse result still decodes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TelegraphError};
use crate::node::Node;

/// A Telegraph account. Which fields are present depends on the call that
/// produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    /// Only returned by `createAccount` and `revokeAccessToken`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// URL that authorizes a browser on telegra.ph to edit this account's pages.
    #[serde(rename = "auth_url", default, skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
}

/// A Telegraph page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Present only when the request asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub can_edit: bool,
}

/// Pages of an account, most recently created first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageList {
    pub total_count: u64,
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageViews {
    pub views: u64,
}

/// The `{ ok, result, error }` wrapper around every response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// `result` when `ok`, otherwise an `Api` error with the service's
    /// message.
    pub fn into_result(self) -> Result<T> {
        if !self.ok {
            return Err(TelegraphError::Api(self.error.unwrap_or_default()));
        }
        self.result.ok_or_else(|| {
            TelegraphError::Deserialization("envelope has ok=true but no result".to_string())
        })
    }
}
