// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory gateway.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::command::WireTuple;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::program::ProgramGraph;
use crate::telemetry::TelemetrySnapshot;

/// Gateway backed by in-process maps.
///
/// A zone exists once telemetry has been stored for it. Sent tuples are
/// recorded in order and can be inspected with [`MemoryGateway::sent`].
///
/// # Examples
///
/// ```
/// use ember_lib::gateway::{Gateway, MemoryGateway};
/// use ember_lib::telemetry::TelemetrySnapshot;
/// use ember_lib::types::PointIndex;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gateway = MemoryGateway::new();
/// gateway.set_telemetry(
///     "hall",
///     TelemetrySnapshot::new("Hall").with_point(PointIndex::CurrentTemp, 190),
/// );
///
/// let snapshot = gateway.telemetry("hall").await.unwrap();
/// assert_eq!(snapshot.lookup(PointIndex::CurrentTemp), Some(190));
/// assert!(gateway.telemetry("attic").await.is_err());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryGateway {
    telemetry: RwLock<HashMap<String, TelemetrySnapshot>>,
    programs: RwLock<HashMap<(String, String), ProgramGraph>>,
    sent: Mutex<Vec<(String, WireTuple)>>,
    send_failure: Mutex<Option<GatewayError>>,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the telemetry snapshot returned for a zone.
    pub fn set_telemetry(&self, zone: impl Into<String>, snapshot: TelemetrySnapshot) {
        let zone = zone.into();
        tracing::debug!(zone = %zone, points = snapshot.points().len(), "Storing telemetry");
        self.telemetry.write().insert(zone, snapshot);
    }

    /// Stores a program graph for a zone.
    pub fn set_program(
        &self,
        zone: impl Into<String>,
        program_id: impl Into<String>,
        graph: ProgramGraph,
    ) {
        self.programs
            .write()
            .insert((zone.into(), program_id.into()), graph);
    }

    /// Makes every following send fail with `error` until cleared with `None`.
    pub fn set_send_failure(&self, error: Option<GatewayError>) {
        *self.send_failure.lock() = error;
    }

    /// Returns every tuple sent so far, with its zone, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, WireTuple)> {
        self.sent.lock().clone()
    }

    /// Returns the tuples sent to one zone, in order.
    #[must_use]
    pub fn sent_to(&self, zone: &str) -> Vec<WireTuple> {
        self.sent
            .lock()
            .iter()
            .filter(|(z, _)| z == zone)
            .map(|(_, wire)| wire.clone())
            .collect()
    }

    fn ensure_zone(&self, zone: &str) -> Result<(), GatewayError> {
        if self.telemetry.read().contains_key(zone) {
            Ok(())
        } else {
            Err(GatewayError::ZoneNotFound(zone.to_string()))
        }
    }
}

impl Gateway for MemoryGateway {
    async fn telemetry(&self, zone: &str) -> Result<TelemetrySnapshot, GatewayError> {
        self.telemetry
            .read()
            .get(zone)
            .cloned()
            .ok_or_else(|| GatewayError::ZoneNotFound(zone.to_string()))
    }

    async fn program(
        &self,
        zone: &str,
        program_id: &str,
    ) -> Result<Option<ProgramGraph>, GatewayError> {
        self.ensure_zone(zone)?;
        Ok(self
            .programs
            .read()
            .get(&(zone.to_string(), program_id.to_string()))
            .cloned())
    }

    async fn send(&self, zone: &str, wire: &WireTuple) -> Result<(), GatewayError> {
        self.ensure_zone(zone)?;
        if let Some(error) = self.send_failure.lock().clone() {
            tracing::debug!(zone = %zone, %wire, "Simulated send failure");
            return Err(error);
        }
        tracing::debug!(zone = %zone, %wire, "Recorded command");
        self.sent.lock().push((zone.to_string(), wire.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ZoneCommand;
    use crate::program::ProgramNode;
    use crate::types::PointIndex;

    fn gateway_with_zone() -> MemoryGateway {
        let gateway = MemoryGateway::new();
        gateway.set_telemetry(
            "zone-1",
            TelemetrySnapshot::new("Kitchen").with_point(PointIndex::CurrentTemp, 195),
        );
        gateway
    }

    #[tokio::test]
    async fn returns_stored_telemetry() {
        let gateway = gateway_with_zone();
        let snapshot = gateway.telemetry("zone-1").await.unwrap();
        assert_eq!(snapshot.name(), "Kitchen");
        assert_eq!(snapshot.lookup(PointIndex::CurrentTemp), Some(195));
    }

    #[tokio::test]
    async fn unknown_zone_is_not_found() {
        let gateway = MemoryGateway::new();
        let wire = ZoneCommand::advance(true).encode().unwrap();

        assert_eq!(
            gateway.telemetry("nowhere").await,
            Err(GatewayError::ZoneNotFound("nowhere".to_string()))
        );
        assert!(gateway.program("nowhere", "1").await.is_err());
        assert!(gateway.send("nowhere", &wire).await.is_err());
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn programs_are_keyed_by_zone_and_id() {
        let gateway = gateway_with_zone();
        let mut graph = ProgramGraph::new();
        graph.add(ProgramNode::new("a"));
        gateway.set_program("zone-1", "1", graph.clone());

        assert_eq!(gateway.program("zone-1", "1").await.unwrap(), Some(graph));
        assert_eq!(gateway.program("zone-1", "2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn records_sent_tuples_in_order() {
        let gateway = gateway_with_zone();
        let first = ZoneCommand::advance(true).encode().unwrap();
        let second = ZoneCommand::target_temperature(21.5).encode().unwrap();

        gateway.send("zone-1", &first).await.unwrap();
        gateway.send("zone-1", &second).await.unwrap();

        assert_eq!(gateway.sent_to("zone-1"), vec![first, second]);
        assert_eq!(gateway.sent()[0].0, "zone-1");
    }

    #[tokio::test]
    async fn simulated_failure_is_returned() {
        let gateway = gateway_with_zone();
        let wire = ZoneCommand::advance(false).encode().unwrap();
        gateway.set_send_failure(Some(GatewayError::Transport("link down".into())));

        assert_eq!(
            gateway.send("zone-1", &wire).await,
            Err(GatewayError::Transport("link down".into()))
        );
        assert!(gateway.sent().is_empty());

        gateway.set_send_failure(None);
        gateway.send("zone-1", &wire).await.unwrap();
        assert_eq!(gateway.sent().len(), 1);
    }
}
