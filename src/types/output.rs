// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switchable output ports.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A switchable output bank on a Yeti.
///
/// # Examples
///
/// ```
/// use goalzero_lib::types::Output;
///
/// assert_eq!(Output::Ac.state_key(), "acPortStatus");
/// assert_eq!("12v".parse::<Output>().unwrap(), Output::V12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    /// AC inverter outlets.
    Ac,
    /// USB ports.
    Usb,
    /// 12V car port and barrel jacks.
    V12,
}

impl Output {
    /// All outputs.
    pub const ALL: [Self; 3] = [Self::Ac, Self::Usb, Self::V12];

    /// Returns the `/state` key holding this output's status.
    #[must_use]
    pub const fn state_key(&self) -> &'static str {
        match self {
            Self::Ac => "acPortStatus",
            Self::Usb => "usbPortStatus",
            Self::V12 => "v12PortStatus",
        }
    }

    /// Returns a short name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ac => "ac",
            Self::Usb => "usb",
            Self::V12 => "12v",
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Output {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ac" => Ok(Self::Ac),
            "usb" => Ok(Self::Usb),
            "12v" | "v12" => Ok(Self::V12),
            _ => Err(ValueError::UnknownOutput(s.to_string())),
        }
    }
}
