// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol layer for communicating with Yeti devices.
//!
//! - [`Endpoint`]: static table of the device's HTTP endpoints
//! - [`RequestGate`]: serializes requests so that at most one is in flight
//! - [`HttpTransport`]: performs a single gated GET or POST
//!
//! # Request Serialization
//!
//! The Yeti firmware handles one connection at a time. Every transport built
//! from clones of the same [`RequestGate`] waits for the previous request to
//! finish, even when the transports talk to different devices.

mod endpoint;
mod gate;
mod http;

pub use endpoint::{Endpoint, Method, THING_NAME, Target};
pub use gate::{GatePermit, RequestGate};
pub use http::{HttpConfig, HttpTransport, YETI_APP_USER_AGENT};
