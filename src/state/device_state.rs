// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known device state.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{ConnectSource, Result, json_kind};
use crate::types::{Output, PowerState};

/// Key of the state-of-charge percentage.
pub const SOC_PERCENT: &str = "socPercent";

/// Upper bound for `socPercent`.
pub const MAX_SOC_PERCENT: u64 = 100;

/// Last parsed response from a state-bearing endpoint.
///
/// The mapping is replaced wholesale after every successful call; it is never
/// merged. Depending on the last operation it may hold the full `/state`
/// document, a `/loglevel` answer or a `/wifi` scan, so every accessor
/// returns an `Option`.
///
/// # Examples
///
/// ```
/// use goalzero_lib::state::DeviceState;
/// use serde_json::json;
///
/// let state = DeviceState::from_value(json!({"thingName": "yeti123", "socPercent": 87}))?;
/// assert_eq!(state.thing_name(), Some("yeti123"));
/// assert_eq!(state.soc_percent(), Some(87.0));
/// # Ok::<(), goalzero_lib::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceState {
    raw: Map<String, Value>,
}

impl DeviceState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from a JSON value, normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`](crate::Error::Connect) if `value` is not an
    /// object, or under the same conditions as [`from_map`](Self::from_map).
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(ConnectSource::NotAnObject(json_kind(&other)).into()),
        }
    }

    /// Builds a state from a parsed JSON object, normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`](crate::Error::Connect) if `socPercent` is
    /// present but not a number.
    pub fn from_map(mut raw: Map<String, Value>) -> Result<Self> {
        clamp_soc_percent(&mut raw)?;
        Ok(Self { raw })
    }

    /// Returns `true` if no response has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the raw mapping.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Consumes the state and returns the raw mapping.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.raw
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    // ========== Identity ==========

    /// Device identifier, e.g. `yeti123456789`.
    #[must_use]
    pub fn thing_name(&self) -> Option<&str> {
        self.raw.get("thingName").and_then(Value::as_str)
    }

    /// Firmware version string.
    #[must_use]
    pub fn firmware_version(&self) -> Option<&str> {
        self.raw.get("firmwareVersion").and_then(Value::as_str)
    }

    // ========== Battery ==========

    /// State of charge in percent, never above 100.
    #[must_use]
    pub fn soc_percent(&self) -> Option<f64> {
        self.number(SOC_PERCENT)
    }

    /// Energy stored in watt-hours.
    #[must_use]
    pub fn wh_stored(&self) -> Option<f64> {
        self.number("whStored")
    }

    /// Minutes until empty (negative) or full (positive).
    #[must_use]
    pub fn time_to_empty_full(&self) -> Option<f64> {
        self.number("timeToEmptyFull")
    }

    /// Battery temperature in degrees Celsius.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.number("temperature")
    }

    /// Returns `true` while charging.
    #[must_use]
    pub fn is_charging(&self) -> Option<bool> {
        self.flag("isCharging").map(PowerState::is_on)
    }

    // ========== Power flow ==========

    /// Input power in watts.
    #[must_use]
    pub fn watts_in(&self) -> Option<f64> {
        self.number("wattsIn")
    }

    /// Output power in watts.
    #[must_use]
    pub fn watts_out(&self) -> Option<f64> {
        self.number("wattsOut")
    }

    // ========== Switches ==========

    /// Status of an output bank.
    #[must_use]
    pub fn output(&self, output: Output) -> Option<PowerState> {
        self.flag(output.state_key())
    }

    /// Status of the display backlight.
    #[must_use]
    pub fn backlight(&self) -> Option<PowerState> {
        self.flag("backlight")
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.raw.get(key).and_then(Value::as_f64)
    }

    fn flag(&self, key: &str) -> Option<PowerState> {
        match self.raw.get(key)? {
            Value::Bool(b) => Some(PowerState::from(*b)),
            value => value.as_u64().and_then(PowerState::from_num),
        }
    }
}

impl TryFrom<Map<String, Value>> for DeviceState {
    type Error = crate::Error;

    fn try_from(raw: Map<String, Value>) -> Result<Self> {
        Self::from_map(raw)
    }
}

/// Caps `socPercent` at 100.
///
/// Firmware rounding can report values slightly above 100. A missing value is
/// left alone; anything other than a number cannot be compared and is
/// rejected.
fn clamp_soc_percent(raw: &mut Map<String, Value>) -> Result<()> {
    let Some(value) = raw.get_mut(SOC_PERCENT) else {
        return Ok(());
    };
    let over = match value {
        Value::Number(n) if n.is_f64() => n.as_f64().is_some_and(|v| v > 100.0),
        Value::Number(n) => n.as_u64().is_some_and(|v| v > MAX_SOC_PERCENT),
        other => return Err(ConnectSource::InvalidSocPercent(json_kind(other)).into()),
    };
    if over {
        *value = Value::Number(Number::from(MAX_SOC_PERCENT));
    }
    Ok(())
}
