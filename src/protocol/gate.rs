// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request serialization across devices.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Binary gate allowing a single in-flight HTTP request.
///
/// The Yeti's embedded web server does not cope with concurrent connections,
/// so every request made through sessions sharing a gate is serialized.
/// Cloning a `RequestGate` yields a handle to the *same* gate; create a new
/// one with [`RequestGate::new`] to get an independent gate.
///
/// Waiters are granted access in arrival order. Access is released when the
/// returned [`GatePermit`] is dropped, including when the owning future is
/// cancelled.
///
/// # Examples
///
/// ```
/// use goalzero_lib::protocol::RequestGate;
///
/// # async fn example() {
/// let gate = RequestGate::new();
/// let shared = gate.clone();
///
/// let permit = gate.acquire().await;
/// assert!(shared.is_busy());
/// drop(permit);
/// assert!(!shared.is_busy());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestGate {
    semaphore: Arc<Semaphore>,
}

/// Exclusive access to the network, held for the duration of one request.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the permit is dropped"]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl RequestGate {
    /// Creates a new, open gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    /// Waits until no other request holds the gate, then takes it.
    ///
    /// There is no timeout; the wait is bounded by the current holder's
    /// request timeout.
    ///
    /// # Panics
    ///
    /// Never in practice: the semaphore is private and never closed.
    pub async fn acquire(&self) -> GatePermit {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("request gate semaphore is never closed");
        tracing::trace!("Acquired request gate");
        GatePermit { _permit: permit }
    }

    /// Returns `true` if a request currently holds the gate.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.semaphore.available_permits() == 0
    }

    /// Returns `true` if both handles refer to the same gate.
    #[must_use]
    pub fn same_gate(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.semaphore, &other.semaphore)
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new()
    }
}
