//! Blocking `Transport` over ureq.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, TelegraphError};
use crate::http::{HttpRequest, HttpResponse, Transport, FORM_CONTENT_TYPE};

/// Sends requests with a shared `ureq::Agent`.
///
/// The agent pools connections and may be used from several threads at once.
/// Status codes are returned as data so the client can read error envelopes.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Transport whose calls fail once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut response = self
            .agent
            .post(&request.url)
            .content_type(FORM_CONTENT_TYPE)
            .send(request.body().as_bytes())
            .map_err(|e| TelegraphError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TelegraphError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}
