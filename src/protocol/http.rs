// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for Yeti devices.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, HeaderMap,
    HeaderValue, USER_AGENT,
};
use serde_json::{Map, Value};

use crate::error::{ConnectSource, Result, json_kind};
use crate::protocol::{Endpoint, Method, RequestGate};

/// User agent of the vendor's iOS app; the firmware rejects POSTs without it.
pub const YETI_APP_USER_AGENT: &str = "YetiApp/1340 CFNetwork/1125.2 Darwin/19.4.0";

// ============================================================================
// HttpConfig - Connection parameters for one device
// ============================================================================

/// Configuration for an HTTP connection to a Yeti.
///
/// # Examples
///
/// ```
/// use goalzero_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.50");
/// assert_eq!(config.base_url(), "http://192.168.1.50");
/// assert_eq!(config.timeout(), Duration::from_secs(10));
///
/// let config = HttpConfig::new("192.168.1.50:8080").with_timeout(Duration::from_secs(3));
/// assert_eq!(config.base_url(), "http://192.168.1.50:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    timeout: Duration,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname or IP address, optionally followed by `:port`
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    ///
    /// A host that already carries an `http://` scheme is used as is.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") {
            host.to_string()
        } else {
            format!("http://{host}")
        }
    }
}

// ============================================================================
// HttpTransport - Gated request executor
// ============================================================================

/// Executes Yeti requests one at a time through a shared [`RequestGate`].
///
/// The transport returns the parsed JSON object and leaves validation to the
/// caller. It never retries.
///
/// # Outcomes
///
/// | Situation | Result |
/// |---|---|
/// | JSON object received | `Ok(Some(map))` |
/// | Refused connection, DNS failure, timeout | `Err(Error::Connect)` |
/// | Body is not JSON, or not an object | `Err(Error::Connect)` |
/// | Server closed the connection while answering | `Ok(None)` |
///
/// The last row is a silent no-op: the caller cannot tell it apart from a
/// device with nothing new to report.
///
/// [`Error::Connect`]: crate::Error::Connect
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    gate: RequestGate,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport from an injected client and gate.
    #[must_use]
    pub fn new(client: Client, gate: RequestGate, config: &HttpConfig) -> Self {
        Self {
            client,
            gate,
            base_url: config.base_url(),
            timeout: config.timeout(),
        }
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the gate this transport serializes through.
    #[must_use]
    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Builds the URL for an endpoint.
    fn build_url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Sends a GET request to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`](crate::Error::Connect) on transport failure
    /// or an undecodable body.
    pub async fn get(&self, endpoint: &Endpoint) -> Result<Option<Map<String, Value>>> {
        self.execute(endpoint, None).await
    }

    /// Sends `payload` as a JSON POST to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`](crate::Error::Connect) on transport failure
    /// or an undecodable body.
    pub async fn post(
        &self,
        endpoint: &Endpoint,
        payload: &Value,
    ) -> Result<Option<Map<String, Value>>> {
        self.execute(endpoint, Some(payload)).await
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        payload: Option<&Value>,
    ) -> Result<Option<Map<String, Value>>> {
        let url = self.build_url(endpoint);

        let _permit = self.gate.acquire().await;

        let request = match (endpoint.method(), payload) {
            (Method::Get, _) => self.client.get(&url),
            (Method::Post, payload) => self
                .client
                .post(&url)
                .headers(yeti_app_headers())
                .json(payload.unwrap_or(&Value::Object(Map::new()))),
        };

        tracing::debug!(url = %url, method = %endpoint.method(), "Sending HTTP request");

        let body = match send(request.timeout(self.timeout)).await {
            Ok(body) => body,
            Err(err) if is_server_disconnect(&err) => {
                tracing::warn!(
                    url = %url,
                    error = %err,
                    "Device closed the connection, ignoring response"
                );
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(body = %String::from_utf8_lossy(&body), "Received HTTP response");

        parse_object(&body).map(Some)
    }
}

async fn send(request: reqwest::RequestBuilder) -> reqwest::Result<Vec<u8>> {
    let response = request.send().await?;

    if !response.status().is_success() {
        tracing::warn!(
            status = response.status().as_u16(),
            "Device answered with a non-success status"
        );
    }

    Ok(response.bytes().await?.to_vec())
}

/// Decodes a response body that must be a JSON object.
fn parse_object(body: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(ConnectSource::NotAnObject(json_kind(&other)).into()),
    }
}

/// Header set the vendor app sends with every POST.
fn yeti_app_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(7);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(YETI_APP_USER_AGENT));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-us"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

/// Returns `true` if the server dropped an established connection before the
/// response was complete.
///
/// Failures to connect in the first place, and timeouts, are not disconnects.
fn is_server_disconnect(err: &reqwest::Error) -> bool {
    if err.is_connect() || err.is_timeout() {
        return false;
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>()
            && hyper_err.is_incomplete_message()
        {
            return true;
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>()
            && matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::BrokenPipe
            )
        {
            return true;
        }
        source = cause.source();
    }
    false
}
