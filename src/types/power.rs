// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off state of a Yeti output.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the power state of an output port or the backlight.
///
/// The Yeti reports and accepts these as `0` / `1` integers.
///
/// # Examples
///
/// ```
/// use goalzero_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.as_num(), 1);
/// assert_eq!(PowerState::from_num(0), Some(PowerState::Off));
/// assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Output is off.
    Off,
    /// Output is on.
    On,
}

impl PowerState {
    /// Returns the display string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns the numeric value used by the firmware.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Converts a firmware value back into a state.
    #[must_use]
    pub const fn from_num(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            _ => None,
        }
    }

    /// Returns `true` if the state is `On`.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
