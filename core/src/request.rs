//! Request payloads for each Telegraph method.
//!
//! # Design
//! Field names are the API's snake_case parameter names, so serde writes them
//! unchanged. Optional parameters are skipped when absent and zero-valued
//! numbers are skipped as well, letting the server apply its own default.
//! `return_content` is the exception: it is always sent.
//!
//! The access token is not part of these types; `TelegraphClient` adds it to
//! the form for token-scoped methods.

use std::ops::BitOr;

use serde::Serialize;

use crate::codec;
use crate::error::{Result, TelegraphError};
use crate::node::Node;

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Parameters for `createAccount`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CreateAccount {
    pub short_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
}

impl CreateAccount {
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            ..Self::default()
        }
    }

    pub fn author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    pub fn author_url(mut self, url: impl Into<String>) -> Self {
        self.author_url = Some(url.into());
        self
    }
}

/// Parameters for `editAccountInfo`. Only the fields that are set are changed.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AccountProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
}

/// Parameters for `getPage`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GetPage {
    pub path: String,
    pub return_content: bool,
}

/// Parameters for `getViews`. Each finer period needs the coarser ones:
/// `hour` needs `day`, `day` needs `month`, `month` needs `year`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GetViews {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
}

impl GetViews {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    /// Check the period cascade. Runs before any request is built.
    pub fn validate(&self) -> Result<()> {
        if self.hour.is_some() && self.day.is_none() {
            return Err(TelegraphError::InvalidArgument(
                "day must be specified when hour is".to_string(),
            ));
        }
        if self.day.is_some() && self.month.is_none() {
            return Err(TelegraphError::InvalidArgument(
                "month must be specified when day is".to_string(),
            ));
        }
        if self.month.is_some() && self.year.is_none() {
            return Err(TelegraphError::InvalidArgument(
                "year must be specified when month is".to_string(),
            ));
        }
        Ok(())
    }
}

/// Page fields for `createPage` and `editPage`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct NewPage {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(serialize_with = "codec::serialize_nodes")]
    pub content: Vec<Node>,
    pub return_content: bool,
}

impl NewPage {
    pub fn new(title: impl Into<String>, content: Vec<Node>) -> Self {
        Self {
            title: title.into(),
            content,
            ..Self::default()
        }
    }

    pub fn author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    pub fn author_url(mut self, url: impl Into<String>) -> Self {
        self.author_url = Some(url.into());
        self
    }

    pub fn return_content(mut self, return_content: bool) -> Self {
        self.return_content = return_content;
        self
    }
}

/// Parameters for `getPageList`.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PageListQuery {
    #[serde(skip_serializing_if = "is_zero")]
    pub offset: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,
}

/// One selectable account field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    ShortName,
    AuthorName,
    AuthorUrl,
    AuthorizationUrl,
    PageCount,
}

/// Wire name of every account field, in the order they are sent.
const ACCOUNT_FIELD_NAMES: [(AccountField, &str); 5] = [
    (AccountField::ShortName, "short_name"),
    (AccountField::AuthorName, "author_name"),
    (AccountField::AuthorUrl, "author_url"),
    (AccountField::AuthorizationUrl, "auth_url"),
    (AccountField::PageCount, "page_count"),
];

impl AccountField {
    pub fn wire_name(self) -> &'static str {
        ACCOUNT_FIELD_NAMES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }
}

/// A set of account fields, combined with `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFields {
    fields: Vec<AccountField>,
}

impl AccountFields {
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn all() -> Self {
        Self {
            fields: ACCOUNT_FIELD_NAMES
                .iter()
                .map(|(field, _)| *field)
                .collect(),
        }
    }

    pub fn with(mut self, field: AccountField) -> Self {
        if !self.contains(field) {
            self.fields.push(field);
        }
        self
    }

    pub fn contains(&self, field: AccountField) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire names of the selected fields, in table order.
    pub fn wire_names(&self) -> Vec<&'static str> {
        ACCOUNT_FIELD_NAMES
            .iter()
            .filter(|(field, _)| self.contains(*field))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// The service default: short name, author name and author URL.
impl Default for AccountFields {
    fn default() -> Self {
        AccountField::ShortName | AccountField::AuthorName | AccountField::AuthorUrl
    }
}

impl From<AccountField> for AccountFields {
    fn from(field: AccountField) -> Self {
        AccountFields::empty().with(field)
    }
}

impl BitOr for AccountField {
    type Output = AccountFields;

    fn bitor(self, rhs: AccountField) -> AccountFields {
        AccountFields::from(self).with(rhs)
    }
}

impl BitOr<AccountField> for AccountFields {
    type Output = AccountFields;

    fn bitor(self, rhs: AccountField) -> AccountFields {
        self.with(rhs)
    }
}

/// Which account fields `getAccountInfo` should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    Fields(AccountFields),
    /// Raw wire names, sent as given.
    Names(Vec<String>),
}

impl FieldSelector {
    pub fn wire_names(&self) -> Vec<String> {
        match self {
            FieldSelector::Fields(fields) => fields
                .wire_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            FieldSelector::Names(names) => names.clone(),
        }
    }
}

impl Default for FieldSelector {
    fn default() -> Self {
        FieldSelector::Fields(AccountFields::default())
    }
}

impl From<AccountFields> for FieldSelector {
    fn from(fields: AccountFields) -> Self {
        FieldSelector::Fields(fields)
    }
}

impl From<AccountField> for FieldSelector {
    fn from(field: AccountField) -> Self {
        FieldSelector::Fields(field.into())
    }
}

impl From<Vec<String>> for FieldSelector {
    fn from(names: Vec<String>) -> Self {
        FieldSelector::Names(names)
    }
}

impl From<&[&str]> for FieldSelector {
    fn from(names: &[&str]) -> Self {
        FieldSelector::Names(names.iter().map(|n| n.to_string()).collect())
    }
}
