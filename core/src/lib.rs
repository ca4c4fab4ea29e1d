//! Synchronous client core for the Telegraph publishing API.
//!
//! # Overview
//! Creates accounts, manages access tokens, creates, edits and fetches pages,
//! and reads view statistics. Page content is a tree of `Node`s that
//! converts to and from the API's JSON shape through `codec`.
//!
//! # Design
//! - `TelegraphClient` is stateless and does no IO: `build_*` methods produce
//!   `HttpRequest` values, `parse_*` methods consume `HttpResponse` values.
//! - `Telegraph` runs one build/send/parse cycle per operation over any
//!   `Transport`. `UreqTransport` (feature `ureq`) is the default blocking
//!   transport.
//! - Every response is an `{ ok, result, error }` envelope; `ok: false`
//!   surfaces as `TelegraphError::Api` with the service's message.

pub mod client;
pub mod codec;
pub mod error;
pub mod form;
pub mod http;
pub mod node;
pub mod request;
pub mod telegraph;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::{parse_envelope, TelegraphClient, DEFAULT_BASE_URL};
pub use codec::{from_wire, nodes_from_wire, nodes_to_wire, to_wire};
pub use error::{Result, TelegraphError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use node::{Element, Node};
pub use request::{
    AccountField, AccountFields, AccountProfile, CreateAccount, FieldSelector, GetPage, GetViews,
    NewPage, PageListQuery,
};
pub use telegraph::{Telegraph, TokenClient};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Account, Envelope, Page, PageList, PageViews};
