//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe a Telegraph call as plain data. `TelegraphClient`
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; something implementing `Transport` performs the
//! exchange in between.
//!
//! Every Telegraph method is a POST of form fields, so a request carries the
//! fields themselves and `body()` renders them on demand.

use crate::error::Result;
use crate::form;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A Telegraph call described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method path, e.g. `createAccount` or `editPage/Sample-Page-12-15`.
    pub method: String,
    /// Full URL: base URL plus `method`.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    /// The form-encoded request body.
    pub fn body(&self) -> String {
        form::encode(&self.form)
    }

    /// Value of the first form field named `name`.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Performs one request/response exchange.
///
/// Implementations return non-success statuses as data; only failures to
/// complete the exchange are errors.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}
