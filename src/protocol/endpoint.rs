// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Yeti HTTP endpoint table.
//!
//! Every device call is described by an [`Endpoint`] constant: the path, the
//! HTTP method, where the parsed response is stored and which key must be
//! present for the response to be accepted. The session and the transport
//! stay uniform; adding an endpoint means adding a row here.

use std::fmt;

/// Key identifying a Yeti in `/state`-style responses.
pub const THING_NAME: &str = "thingName";

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Plain GET, no custom headers.
    Get,
    /// JSON POST with the Yeti app header set.
    Post,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session field that receives a parsed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The device state mapping.
    State,
    /// The system information mapping.
    SysInfo,
}

/// Static description of one device endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    path: &'static str,
    method: Method,
    target: Target,
    required_key: Option<&'static str>,
}

impl Endpoint {
    /// `GET /sysinfo`: device name, model and network identity.
    pub const SYSINFO: Self = Self::new("/sysinfo", Method::Get, Target::SysInfo, None);
    /// `GET /state`: full device state.
    pub const STATE: Self = Self::get_state("/state", THING_NAME);
    /// `POST /state`: change device settings.
    pub const UPDATE_STATE: Self = Self::post("/state");
    /// `GET /factory-reset`.
    pub const FACTORY_RESET: Self = Self::get_state("/factory-reset", THING_NAME);
    /// `GET /rpc/Sys.Reboot`.
    pub const REBOOT: Self = Self::get_state("/rpc/Sys.Reboot", THING_NAME);
    /// `GET /loglevel`: firmware log levels, keyed by component.
    pub const LOG_LEVEL: Self = Self::get_state("/loglevel", "app");
    /// `POST /loglevel`.
    pub const UPDATE_LOG_LEVEL: Self = Self::post("/loglevel");
    /// `POST /join`: join a Wi-Fi network.
    pub const JOIN: Self = Self::post("/join");
    /// `GET /wifi`: networks visible to the device.
    pub const WIFI: Self = Self::get_state("/wifi", THING_NAME);
    /// `POST /password-set`.
    pub const PASSWORD_SET: Self = Self::post("/password-set");
    /// `POST /join-direct`: join the device's own access point.
    pub const JOIN_DIRECT: Self = Self::post("/join-direct");
    /// `POST /start-pair`.
    pub const START_PAIR: Self = Self::post("/start-pair");

    /// Every endpoint the client knows about.
    pub const ALL: [Self; 12] = [
        Self::SYSINFO,
        Self::STATE,
        Self::UPDATE_STATE,
        Self::FACTORY_RESET,
        Self::REBOOT,
        Self::LOG_LEVEL,
        Self::UPDATE_LOG_LEVEL,
        Self::JOIN,
        Self::WIFI,
        Self::PASSWORD_SET,
        Self::JOIN_DIRECT,
        Self::START_PAIR,
    ];

    const fn new(
        path: &'static str,
        method: Method,
        target: Target,
        required_key: Option<&'static str>,
    ) -> Self {
        Self {
            path,
            method,
            target,
            required_key,
        }
    }

    const fn get_state(path: &'static str, required_key: &'static str) -> Self {
        Self::new(path, Method::Get, Target::State, Some(required_key))
    }

    const fn post(path: &'static str) -> Self {
        Self::new(path, Method::Post, Target::State, None)
    }

    /// Returns the request path, starting with `/`.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Returns the session field the response is stored into.
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// Returns the key a response must contain to be accepted, if any.
    ///
    /// POST endpoints and `/sysinfo` accept any JSON object.
    #[must_use]
    pub const fn required_key(&self) -> Option<&'static str> {
        self.required_key
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
