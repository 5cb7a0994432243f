// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared client and gate for several Yeti sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;

use crate::device::Yeti;
use crate::error::Error;
use crate::protocol::{HttpConfig, RequestGate};

/// Hands out [`Yeti`] sessions that share one HTTP client and one
/// [`RequestGate`].
///
/// Every session created by the same manager waits for the others: at most
/// one request is in flight across all of them. Sessions are registered by
/// host, so asking twice for the same host returns the same session.
///
/// # Examples
///
/// ```no_run
/// use goalzero_lib::manager::DeviceManager;
///
/// #[tokio::main]
/// async fn main() -> goalzero_lib::Result<()> {
///     let manager = DeviceManager::new()?;
///
///     let garage = manager.connect("192.168.1.50").await?;
///     let cabin = manager.connect("192.168.1.51").await?;
///
///     // Never overlap on the wire
///     let (a, b) = tokio::join!(garage.fetch_state(), cabin.fetch_state());
///     a?;
///     b?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct DeviceManager {
    client: Client,
    gate: RequestGate,
    timeout: Duration,
    /// Registered sessions, keyed by host.
    devices: RwLock<HashMap<String, Arc<Yeti>>>,
}

impl DeviceManager {
    /// Creates a manager with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::with_client(Client::builder().build()?))
    }

    /// Creates a manager around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            gate: RequestGate::new(),
            timeout: HttpConfig::DEFAULT_TIMEOUT,
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the per-request timeout for sessions created afterwards.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the gate shared by all sessions of this manager.
    #[must_use]
    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Returns the session for `host`, creating it without network access if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be created.
    pub fn add_device(&self, host: &str) -> Result<Arc<Yeti>, Error> {
        if let Some(existing) = self.devices.read().get(host) {
            return Ok(Arc::clone(existing));
        }

        let yeti = Arc::new(
            Yeti::builder(host)
                .with_client(self.client.clone())
                .with_gate(self.gate.clone())
                .with_timeout(self.timeout)
                .build_without_probe()?,
        );

        let mut devices = self.devices.write();
        let entry = devices
            .entry(host.to_string())
            .or_insert_with(|| Arc::clone(&yeti));
        tracing::debug!(host = %host, "Registered device");
        Ok(Arc::clone(entry))
    }

    /// Registers `host` and runs [`Yeti::init_connect`] on it.
    ///
    /// The session stays registered even if the initial fetch fails.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be reached or does not answer like
    /// a Yeti.
    pub async fn connect(&self, host: &str) -> Result<Arc<Yeti>, Error> {
        let yeti = self.add_device(host)?;
        yeti.init_connect().await?;
        Ok(yeti)
    }

    /// Returns the registered session for `host`.
    #[must_use]
    pub fn device(&self, host: &str) -> Option<Arc<Yeti>> {
        self.devices.read().get(host).cloned()
    }

    /// Unregisters `host`.
    ///
    /// Returns `true` if the device was registered.
    pub fn remove_device(&self, host: &str) -> bool {
        self.devices.write().remove(host).is_some()
    }

    /// Returns the registered hosts.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        self.devices.read().keys().cloned().collect()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }
}
