// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary to the device gateway.
//!
//! The gateway fetches telemetry and programs from the controller and
//! transmits encoded commands. Session handling, transport and retries live
//! behind this trait. [`MemoryGateway`] is an in-process implementation for
//! tests and offline use.

mod memory;

pub use memory::MemoryGateway;

use crate::command::WireTuple;
use crate::error::GatewayError;
use crate::program::ProgramGraph;
use crate::telemetry::TelemetrySnapshot;

/// Source of zone data and sink for zone commands.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Fetches the current telemetry snapshot of a zone.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the zone is unknown or the fetch fails.
    async fn telemetry(&self, zone: &str) -> Result<TelemetrySnapshot, GatewayError>;

    /// Fetches a program graph, or `None` if the zone has no such program.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the zone is unknown or the fetch fails.
    async fn program(
        &self,
        zone: &str,
        program_id: &str,
    ) -> Result<Option<ProgramGraph>, GatewayError>;

    /// Transmits one wire tuple to a zone.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the zone is unknown or transmission fails.
    async fn send(&self, zone: &str, wire: &WireTuple) -> Result<(), GatewayError>;
}
