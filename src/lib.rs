// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `goalzero_lib` - A Rust library to control Goal Zero Yeti power stations.
//!
//! This library provides an async API to the Yeti's local HTTP interface.
//!
//! # Supported Features
//!
//! - **State**: battery charge, power flow, port status (`/state`)
//! - **System info**: name, model, MAC address (`/sysinfo`)
//! - **Output control**: AC, USB and 12V banks, display backlight
//! - **Network**: Wi-Fi scan, join, direct join, pairing, password
//! - **Maintenance**: reboot, factory reset, firmware log levels
//!
//! # Request Serialization
//!
//! The Yeti's embedded web server handles one connection at a time. Every
//! request goes through a [`RequestGate`](protocol::RequestGate); sessions
//! sharing a gate never have two requests in flight, even for different
//! devices. Share a gate explicitly, or let a
//! [`DeviceManager`](manager::DeviceManager) do it.
//!
//! # Quick Start
//!
//! ```no_run
//! use goalzero_lib::Yeti;
//! use goalzero_lib::types::{Output, PowerState};
//!
//! #[tokio::main]
//! async fn main() -> goalzero_lib::Result<()> {
//!     // Fetches /sysinfo and /state before returning
//!     let yeti = Yeti::builder("192.168.1.50").build().await?;
//!
//!     println!("{:?} at {:?}%", yeti.sysinfo().model(), yeti.state().soc_percent());
//!
//!     yeti.set_output(Output::Usb, PowerState::Off).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Operations fail with [`Error::Connect`] when the device cannot be reached
//! and [`Error::InvalidHost`] when something other than a Yeti answers. If the
//! device drops the connection while answering, the operation succeeds and
//! the stored state is left as it was.

mod device;
pub mod error;
pub mod manager;
pub mod protocol;
pub mod state;
pub mod types;

pub use device::{Yeti, YetiBuilder};
pub use error::{ConnectSource, Error, Result, ValueError};
pub use manager::DeviceManager;
pub use protocol::{Endpoint, HttpConfig, RequestGate};
pub use state::{DeviceState, SysInfo};
pub use types::{Output, PowerState};
