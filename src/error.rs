// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `goalzero_lib` library.
//!
//! A Yeti either answers with something usable or it does not. Callers only
//! need to tell two situations apart:
//!
//! - [`Error::Connect`]: the request never produced a usable JSON object
//!   (refused connection, OS-level socket error, timeout, undecodable body).
//! - [`Error::InvalidHost`]: the device answered, but the answer lacks the
//!   field that identifies a Yeti, so the configured host is probably
//!   something else.
//!
//! A server closing the connection mid-exchange is deliberately *not* an
//! error; see [`HttpTransport`](crate::protocol::HttpTransport).

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport failed outright.
    #[error("cannot connect to device: {source}")]
    Connect {
        /// The underlying cause.
        #[source]
        source: ConnectSource,
    },

    /// The device answered without the field that identifies a Yeti.
    #[error("invalid host: response from {endpoint} has no `{missing_key}` field")]
    InvalidHost {
        /// Path of the endpoint that was queried.
        endpoint: &'static str,
        /// The required key that was absent.
        missing_key: &'static str,
    },
}

impl Error {
    /// Returns `true` if this is a transport failure.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// Returns `true` if the device answered with an unexpected payload.
    #[must_use]
    pub fn is_invalid_host(&self) -> bool {
        matches!(self, Self::InvalidHost { .. })
    }
}

/// Low-level cause wrapped by [`Error::Connect`].
#[derive(Debug, Error)]
pub enum ConnectSource {
    /// HTTP request failed (connect, DNS, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not valid JSON.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body is valid JSON but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// `socPercent` is present but cannot be compared against 100.
    #[error("expected a numeric socPercent, got {0}")]
    InvalidSocPercent(&'static str),
}

/// Describes the kind of a JSON value for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<ConnectSource> for Error {
    fn from(source: ConnectSource) -> Self {
        Self::Connect { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        ConnectSource::Http(err).into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        ConnectSource::Decode(err).into()
    }
}

/// Errors raised when building typed values from user input.
///
/// These never come from the device; they are returned by `FromStr`
/// implementations before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An unknown output port name was provided.
    #[error("unknown output: {0}")]
    UnknownOutput(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
