// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Yeti session builder.

use std::time::Duration;

use reqwest::Client;

use crate::device::Yeti;
use crate::error::Error;
use crate::protocol::{HttpConfig, HttpTransport, RequestGate};

/// Builder for creating a [`Yeti`] session.
///
/// Created with [`Yeti::builder`]. The HTTP client and the request gate are
/// both optional; sessions that must not talk concurrently (including
/// sessions for different devices) have to be given clones of the same
/// gate, either here or through [`DeviceManager`](crate::manager::DeviceManager).
///
/// # Examples
///
/// ```no_run
/// use goalzero_lib::Yeti;
/// use goalzero_lib::protocol::RequestGate;
///
/// # async fn example() -> goalzero_lib::Result<()> {
/// let gate = RequestGate::new();
///
/// // Fetches sysinfo and state before returning
/// let garage = Yeti::builder("192.168.1.50")
///     .with_gate(gate.clone())
///     .build()
///     .await?;
///
/// // No network access
/// let cabin = Yeti::builder("192.168.1.51")
///     .with_gate(gate)
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct YetiBuilder {
    config: HttpConfig,
    client: Option<Client>,
    gate: Option<RequestGate>,
}

impl YetiBuilder {
    /// Creates a new builder with the specified HTTP configuration.
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self {
            config,
            client: None,
            gate: None,
        }
    }

    /// Uses an existing HTTP client instead of creating one.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Serializes requests through `gate`.
    ///
    /// Without this, the session gets a gate of its own.
    #[must_use]
    pub fn with_gate(mut self, gate: RequestGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the session and runs [`Yeti::init_connect`].
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the HTTP client cannot be created
    /// - the device cannot be reached
    /// - the device does not answer like a Yeti
    pub async fn build(self) -> Result<Yeti, Error> {
        let yeti = self.build_without_probe()?;
        yeti.init_connect().await?;
        Ok(yeti)
    }

    /// Builds the session without contacting the device.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build_without_probe(self) -> Result<Yeti, Error> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().build()?,
        };
        let gate = self.gate.unwrap_or_default();
        let transport = HttpTransport::new(client, gate, &self.config);
        Ok(Yeti::from_transport(self.config.host(), transport))
    }
}
