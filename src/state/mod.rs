// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshots of what a Yeti last reported.
//!
//! [`DeviceState`] holds the last response of a state-bearing endpoint, with
//! `socPercent` capped at 100. [`SysInfo`] holds the last `/sysinfo`
//! response verbatim. Both keep the raw JSON object and add typed accessors
//! for well-known fields.
//!
//! # Examples
//!
//! ```
//! use goalzero_lib::state::DeviceState;
//! use goalzero_lib::types::{Output, PowerState};
//! use serde_json::json;
//!
//! let state = DeviceState::from_value(json!({
//!     "thingName": "yeti123",
//!     "socPercent": 105,
//!     "acPortStatus": 1
//! }))?;
//!
//! assert_eq!(state.soc_percent(), Some(100.0));
//! assert_eq!(state.output(Output::Ac), Some(PowerState::On));
//! # Ok::<(), goalzero_lib::Error>(())
//! ```

mod device_state;
mod sysinfo;

pub use device_state::{DeviceState, MAX_SOC_PERCENT, SOC_PERCENT};
pub use sysinfo::SysInfo;
