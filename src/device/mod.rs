// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session with a single Yeti power station.
//!
//! A [`Yeti`] exposes one method per device capability. Each method sends one
//! request (two for [`Yeti::init_connect`]) and stores the parsed answer in
//! the session; read it back with [`Yeti::state`] or [`Yeti::sysinfo`].
//!
//! ```no_run
//! use goalzero_lib::Yeti;
//! use goalzero_lib::types::{Output, PowerState};
//!
//! # async fn example() -> goalzero_lib::Result<()> {
//! let yeti = Yeti::builder("192.168.1.50").build().await?;
//!
//! yeti.set_output(Output::Ac, PowerState::On).await?;
//! println!("battery at {:?}%", yeti.state().soc_percent());
//! # Ok(())
//! # }
//! ```

mod http_builder;

pub use http_builder::YetiBuilder;

use parking_lot::RwLock;
use reqwest::Client;
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};
use crate::protocol::{Endpoint, HttpConfig, HttpTransport, Method, RequestGate, Target};
use crate::state::{DeviceState, SysInfo};
use crate::types::{Output, PowerState};

/// A Goal Zero Yeti reachable over its local HTTP API.
///
/// Operations take `&self` and may run concurrently; the session's
/// [`RequestGate`] makes sure only one request is on the wire at a time.
/// The stored state and sysinfo are each replaced wholesale by a successful
/// response and left untouched by a failed one.
#[derive(Debug)]
pub struct Yeti {
    host: String,
    transport: HttpTransport,
    state: RwLock<DeviceState>,
    sysinfo: RwLock<SysInfo>,
}

impl Yeti {
    /// Returns a builder for a session with the device at `host`.
    ///
    /// `host` is an IP address or hostname, optionally with `:port`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> YetiBuilder {
        YetiBuilder::new(HttpConfig::new(host))
    }

    /// Creates a session from an injected client and a shared gate.
    #[must_use]
    pub fn new(host: impl Into<String>, client: Client, gate: RequestGate) -> Self {
        let config = HttpConfig::new(host);
        let transport = HttpTransport::new(client, gate, &config);
        Self::from_transport(config.host(), transport)
    }

    pub(crate) fn from_transport(host: &str, transport: HttpTransport) -> Self {
        Self {
            host: host.to_string(),
            transport,
            state: RwLock::new(DeviceState::default()),
            sysinfo: RwLock::new(SysInfo::default()),
        }
    }

    /// Returns the host this session talks to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Returns the gate requests are serialized through.
    #[must_use]
    pub fn gate(&self) -> &RequestGate {
        self.transport.gate()
    }

    /// Returns a snapshot of the last stored state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Returns a snapshot of the last stored sysinfo.
    #[must_use]
    pub fn sysinfo(&self) -> SysInfo {
        self.sysinfo.read().clone()
    }

    // ========== Queries ==========

    /// Fetches `/sysinfo`, then `/state`.
    ///
    /// Stops at the first failure; a successful sysinfo fetch is kept even if
    /// the state fetch fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure, or
    /// [`Error::InvalidHost`] if `/state` has no `thingName`.
    pub async fn init_connect(&self) -> Result<()> {
        self.call(&Endpoint::SYSINFO, None).await?;
        self.call(&Endpoint::STATE, None).await
    }

    /// Fetches `/sysinfo` into [`Yeti::sysinfo`].
    ///
    /// The response is stored without validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn fetch_sysinfo(&self) -> Result<()> {
        self.call(&Endpoint::SYSINFO, None).await
    }

    /// Fetches `/state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure, or
    /// [`Error::InvalidHost`] if the response has no `thingName`.
    pub async fn fetch_state(&self) -> Result<()> {
        self.call(&Endpoint::STATE, None).await
    }

    /// Fetches the firmware log levels from `/loglevel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure, or
    /// [`Error::InvalidHost`] if the response has no `app` entry.
    pub async fn fetch_log_level(&self) -> Result<()> {
        self.call(&Endpoint::LOG_LEVEL, None).await
    }

    /// Fetches the Wi-Fi networks visible to the device from `/wifi`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure, or
    /// [`Error::InvalidHost`] if the response has no `thingName`.
    pub async fn wifi(&self) -> Result<()> {
        self.call(&Endpoint::WIFI, None).await
    }

    // ========== Maintenance ==========

    /// Restores factory settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure, or
    /// [`Error::InvalidHost`] if the response has no `thingName`.
    pub async fn factory_reset(&self) -> Result<()> {
        self.call(&Endpoint::FACTORY_RESET, None).await
    }

    /// Reboots the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure, or
    /// [`Error::InvalidHost`] if the response has no `thingName`.
    pub async fn reboot(&self) -> Result<()> {
        self.call(&Endpoint::REBOOT, None).await
    }

    // ========== Settings ==========

    /// Posts new settings to `/state`, e.g. `{"acPortStatus": 1}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn update_state(&self, settings: &Value) -> Result<()> {
        self.call(&Endpoint::UPDATE_STATE, Some(settings)).await
    }

    /// Switches an output bank on or off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn set_output(&self, output: Output, state: PowerState) -> Result<()> {
        self.update_state(&json!({ output.state_key(): state.as_num() }))
            .await
    }

    /// Switches the display backlight on or off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn set_backlight(&self, state: PowerState) -> Result<()> {
        self.update_state(&json!({ "backlight": state.as_num() }))
            .await
    }

    /// Posts new firmware log levels to `/loglevel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn update_log_level(&self, levels: &Value) -> Result<()> {
        self.call(&Endpoint::UPDATE_LOG_LEVEL, Some(levels)).await
    }

    // ========== Network & pairing ==========

    /// Posts network credentials to `/join`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn join(&self, credentials: &Value) -> Result<()> {
        self.call(&Endpoint::JOIN, Some(credentials)).await
    }

    /// Sets a new device password.
    ///
    /// Sends `{"new_password": password}` to `/password-set`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn set_password(&self, password: &str) -> Result<()> {
        self.call(
            &Endpoint::PASSWORD_SET,
            Some(&json!({ "new_password": password })),
        )
        .await
    }

    /// Asks the device to join its own access point directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn join_direct(&self) -> Result<()> {
        self.call(&Endpoint::JOIN_DIRECT, None).await
    }

    /// Starts pairing mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on transport failure.
    pub async fn start_pair(&self) -> Result<()> {
        self.call(&Endpoint::START_PAIR, None).await
    }

    // ========== Request lifecycle ==========

    /// Sends one request and stores its answer.
    ///
    /// POSTs without a payload send an empty object.
    async fn call(&self, endpoint: &Endpoint, payload: Option<&Value>) -> Result<()> {
        let body = match endpoint.method() {
            Method::Get => self.transport.get(endpoint).await?,
            Method::Post => {
                let empty = Value::Object(Map::new());
                self.transport
                    .post(endpoint, payload.unwrap_or(&empty))
                    .await?
            }
        };

        // Server hung up: nothing to store.
        let Some(body) = body else {
            return Ok(());
        };

        self.store(endpoint, body)
    }

    fn store(&self, endpoint: &Endpoint, body: Map<String, Value>) -> Result<()> {
        match endpoint.target() {
            Target::SysInfo => *self.sysinfo.write() = SysInfo::from(body),
            Target::State => {
                if let Some(key) = endpoint.required_key()
                    && !body.contains_key(key)
                {
                    tracing::warn!(
                        host = %self.host,
                        endpoint = endpoint.path(),
                        missing = key,
                        "Response does not look like a Yeti"
                    );
                    return Err(Error::InvalidHost {
                        endpoint: endpoint.path(),
                        missing_key: key,
                    });
                }
                let state = DeviceState::from_map(body).inspect_err(|err| {
                    tracing::warn!(
                        host = %self.host,
                        endpoint = endpoint.path(),
                        error = %err,
                        "Rejected state response"
                    );
                })?;
                *self.state.write() = state;
            }
        }
        Ok(())
    }
}
