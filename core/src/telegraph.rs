//! Blocking Telegraph client: build, send once, parse.
//!
//! # Design
//! `Telegraph` pairs the stateless `TelegraphClient` with a `Transport`. Every
//! operation performs exactly one exchange; there is no retry, batching or
//! caching. `TokenClient` borrows a `Telegraph` and captures one access token
//! for the methods that need authorization.

use crate::client::TelegraphClient;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::request::{
    AccountProfile, CreateAccount, FieldSelector, GetPage, GetViews, NewPage, PageListQuery,
};
use crate::types::{Account, Page, PageList, PageViews};

/// Telegraph API client over a transport `T`.
#[derive(Debug, Clone)]
pub struct Telegraph<T> {
    client: TelegraphClient,
    transport: T,
}

impl<T: Transport> Telegraph<T> {
    /// Client for `https://api.telegra.ph`.
    pub fn new(transport: T) -> Self {
        Self::with_client(TelegraphClient::default(), transport)
    }

    pub fn with_client(client: TelegraphClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TelegraphClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create an account. The returned `Account` carries its `access_token`.
    pub fn create_account(&self, input: &CreateAccount) -> Result<Account> {
        let request = self.client.build_create_account(input)?;
        self.client.parse_account(self.execute(&request)?)
    }

    /// Fetch a page. `content` is populated only if `return_content` is set.
    pub fn get_page(&self, path: &str, return_content: bool) -> Result<Page> {
        let request = self.client.build_get_page(&GetPage {
            path: path.to_string(),
            return_content,
        })?;
        self.client.parse_page(self.execute(&request)?)
    }

    /// Views of a page, in total or for the given period.
    pub fn get_views(&self, query: &GetViews) -> Result<PageViews> {
        let request = self.client.build_get_views(query)?;
        self.client.parse_page_views(self.execute(&request)?)
    }

    /// Client bound to `access_token`.
    pub fn token_client(&self, access_token: impl Into<String>) -> TokenClient<'_, T> {
        TokenClient {
            telegraph: self,
            access_token: access_token.into(),
        }
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, "sending telegraph request");
        let response = self.transport.send(request)?;
        tracing::trace!(
            method = %request.method,
            status = response.status,
            "received telegraph response"
        );
        Ok(response)
    }
}

#[cfg(feature = "ureq")]
impl Default for Telegraph<crate::transport::UreqTransport> {
    fn default() -> Self {
        Self::new(crate::transport::UreqTransport::new())
    }
}

/// Token-scoped client for account and page management.
///
/// The token is fixed at construction. After `revoke_access_token` it is no
/// longer valid; build a new `TokenClient` from the returned account.
#[derive(Debug, Clone)]
pub struct TokenClient<'a, T> {
    telegraph: &'a Telegraph<T>,
    access_token: String,
}

impl<T: Transport> TokenClient<'_, T> {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Revoke the token and get a new one. The returned account carries the
    /// new `access_token` and `auth_url`.
    pub fn revoke_access_token(&self) -> Result<Account> {
        let client = &self.telegraph.client;
        let request = client.build_revoke_access_token(&self.access_token)?;
        client.parse_account(self.telegraph.execute(&request)?)
    }

    /// Account information limited to the selected fields.
    pub fn get_account_info(&self, selector: impl Into<FieldSelector>) -> Result<Account> {
        let client = &self.telegraph.client;
        let request = client.build_get_account_info(&self.access_token, &selector.into())?;
        client.parse_account(self.telegraph.execute(&request)?)
    }

    pub fn edit_account_info(&self, profile: &AccountProfile) -> Result<Account> {
        let client = &self.telegraph.client;
        let request = client.build_edit_account_info(&self.access_token, profile)?;
        client.parse_account(self.telegraph.execute(&request)?)
    }

    pub fn create_page(&self, page: &NewPage) -> Result<Page> {
        let client = &self.telegraph.client;
        let request = client.build_create_page(&self.access_token, page)?;
        client.parse_page(self.telegraph.execute(&request)?)
    }

    pub fn edit_page(&self, path: &str, page: &NewPage) -> Result<Page> {
        let client = &self.telegraph.client;
        let request = client.build_edit_page(&self.access_token, path, page)?;
        client.parse_page(self.telegraph.execute(&request)?)
    }

    /// Pages of the account, most recently created first.
    pub fn get_page_list(&self, offset: u32, limit: u32) -> Result<PageList> {
        let client = &self.telegraph.client;
        let request =
            client.build_get_page_list(&self.access_token, &PageListQuery { offset, limit })?;
        client.parse_page_list(self.telegraph.execute(&request)?)
    }
}
