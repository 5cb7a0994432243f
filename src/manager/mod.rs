// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Managing several Yeti devices from one process.
//!
//! [`DeviceManager`] owns the HTTP client and the [`RequestGate`] that all of
//! its sessions share, so the sharing is visible where sessions are created.
//!
//! [`RequestGate`]: crate::protocol::RequestGate

mod device_manager;

pub use device_manager::DeviceManager;
