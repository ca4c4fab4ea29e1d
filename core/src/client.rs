//! Stateless request builder and response parser for the Telegraph API.
//!
//! # Design
//! `TelegraphClient` holds only a `base_url` and carries no mutable state
//! between calls. Each Telegraph method has a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method (one per result type) that consumes
//! an `HttpResponse`. The caller, or `Telegraph`, executes the round-trip in
//! between.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, TelegraphError};
use crate::form;
use crate::http::{HttpRequest, HttpResponse, FORM_CONTENT_TYPE};
use crate::request::{
    AccountProfile, CreateAccount, FieldSelector, GetPage, GetViews, NewPage, PageListQuery,
};
use crate::types::{Account, Envelope, Page, PageList, PageViews};

pub const DEFAULT_BASE_URL: &str = "https://api.telegra.ph";

/// Synchronous, stateless client for the Telegraph API.
#[derive(Debug, Clone)]
pub struct TelegraphClient {
    base_url: String,
}

#[derive(Serialize)]
struct AccountInfoParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<String>,
}

impl TelegraphClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_account(&self, input: &CreateAccount) -> Result<HttpRequest> {
        self.build("createAccount", None, input)
    }

    pub fn build_get_page(&self, input: &GetPage) -> Result<HttpRequest> {
        self.build("getPage", None, input)
    }

    /// Fails with `InvalidArgument` if the period cascade is broken.
    pub fn build_get_views(&self, input: &GetViews) -> Result<HttpRequest> {
        input.validate()?;
        self.build("getViews", None, input)
    }

    pub fn build_revoke_access_token(&self, access_token: &str) -> Result<HttpRequest> {
        self.build("revokeAccessToken", Some(access_token), &())
    }

    /// An empty selection leaves `fields` out so the service default applies.
    pub fn build_get_account_info(
        &self,
        access_token: &str,
        selector: &FieldSelector,
    ) -> Result<HttpRequest> {
        let params = AccountInfoParams {
            fields: selector.wire_names(),
        };
        self.build("getAccountInfo", Some(access_token), &params)
    }

    pub fn build_edit_account_info(
        &self,
        access_token: &str,
        input: &AccountProfile,
    ) -> Result<HttpRequest> {
        self.build("editAccountInfo", Some(access_token), input)
    }

    pub fn build_create_page(&self, access_token: &str, input: &NewPage) -> Result<HttpRequest> {
        self.build("createPage", Some(access_token), input)
    }

    pub fn build_edit_page(
        &self,
        access_token: &str,
        path: &str,
        input: &NewPage,
    ) -> Result<HttpRequest> {
        if path.is_empty() {
            return Err(TelegraphError::InvalidArgument(
                "page path must not be empty".to_string(),
            ));
        }
        let method = format!("editPage/{}", form::encode_path_segment(path));
        self.build(&method, Some(access_token), input)
    }

    pub fn build_get_page_list(
        &self,
        access_token: &str,
        query: &PageListQuery,
    ) -> Result<HttpRequest> {
        self.build("getPageList", Some(access_token), query)
    }

    pub fn parse_account(&self, response: HttpResponse) -> Result<Account> {
        parse_envelope(response)
    }

    pub fn parse_page(&self, response: HttpResponse) -> Result<Page> {
        parse_envelope(response)
    }

    pub fn parse_page_views(&self, response: HttpResponse) -> Result<PageViews> {
        parse_envelope(response)
    }

    pub fn parse_page_list(&self, response: HttpResponse) -> Result<PageList> {
        parse_envelope(response)
    }

    fn build<T: Serialize + ?Sized>(
        &self,
        method: &str,
        access_token: Option<&str>,
        payload: &T,
    ) -> Result<HttpRequest> {
        let mut fields = Vec::new();
        if let Some(token) = access_token {
            fields.push(("access_token".to_string(), token.to_string()));
        }
        fields.extend(form::to_form_fields(payload)?);
        Ok(HttpRequest {
            method: method.to_string(),
            url: format!("{}/{method}", self.base_url),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            form: fields,
        })
    }
}

impl Default for TelegraphClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Unwrap the `{ ok, result, error }` envelope of a response.
///
/// A body that is not an envelope becomes `Http` for non-200 statuses and
/// `Deserialization` otherwise.
pub fn parse_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    let envelope: Envelope<T> = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if response.status != 200 => {
            return Err(TelegraphError::Http {
                status: response.status,
                body: response.body,
            })
        }
        Err(e) => return Err(TelegraphError::Deserialization(e.to_string())),
    };
    envelope.into_result()
}
