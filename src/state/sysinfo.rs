// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known `/sysinfo` response.

use serde::Serialize;
use serde_json::{Map, Value};

/// System information reported by `/sysinfo`.
///
/// Stored as received; no normalization is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SysInfo {
    raw: Map<String, Value>,
}

impl SysInfo {
    /// Returns `true` if sysinfo has not been fetched yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the raw mapping.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Device name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str("name")
    }

    /// Model, e.g. `Yeti 1400`.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.str("model")
    }

    /// MAC address of the Wi-Fi module.
    #[must_use]
    pub fn mac_address(&self) -> Option<&str> {
        self.str("macAddress")
    }

    fn str(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for SysInfo {
    fn from(raw: Map<String, Value>) -> Self {
        Self { raw }
    }
}
