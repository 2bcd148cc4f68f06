// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level handle to one heating zone.
//!
//! [`Zone`] ties a [`Gateway`] to a zone reference. Each read fetches a fresh
//! snapshot and decodes it; each write encodes a [`ZoneCommand`] and hands
//! the tuple to the gateway. Nothing is cached between calls.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use ember_lib::gateway::MemoryGateway;
//! use ember_lib::telemetry::{FixedSchedule, TelemetrySnapshot};
//! use ember_lib::types::{Mode, PointIndex};
//! use ember_lib::zone::Zone;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ember_lib::Result<()> {
//! let gateway = Arc::new(MemoryGateway::new());
//! gateway.set_telemetry(
//!     "zone-1",
//!     TelemetrySnapshot::new("Living Room")
//!         .with_point(PointIndex::CurrentTemp, 195)
//!         .with_point(PointIndex::TargetTemp, 210)
//!         .with_point(PointIndex::Mode, 2)
//!         .with_point(PointIndex::AdvanceActive, 0)
//!         .with_point(PointIndex::BoostHours, 0)
//!         .with_point(PointIndex::BoilerState, 2),
//! );
//!
//! let zone = Zone::new(Arc::clone(&gateway), "zone-1");
//! let state = zone.state(&FixedSchedule(true)).await?;
//! assert_eq!(state.mode, Mode::On);
//! assert!(zone.is_boiler_on().await?);
//!
//! zone.set_target_temperature(21.5).await?;
//! assert_eq!(gateway.sent_to("zone-1")[0], [0, 6, 4, 0, 215]);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::command::{WireTuple, ZoneCommand};
use crate::error::Result;
use crate::gateway::Gateway;
use crate::program::{
    HeatingCycle, ProgramAnalysis, ProgramGraph, ProgramStep, ProgramSummary, SequencerConfig,
    analyze, detect_cycles, extract_program, summarize_with_preview,
};
use crate::telemetry::{
    self, BOILER_ON, Schedule, TelemetrySnapshot, ZoneState, decode_zone_state,
};
use crate::types::{Mode, PointIndex, Temperature};

/// A heating zone reached through a gateway.
#[derive(Debug)]
pub struct Zone<G: Gateway> {
    gateway: Arc<G>,
    zone: String,
    config: SequencerConfig,
}

impl<G: Gateway> Clone for Zone<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            zone: self.zone.clone(),
            config: self.config,
        }
    }
}

impl<G: Gateway> Zone<G> {
    /// Creates a handle for the zone known to the gateway as `zone`.
    #[must_use]
    pub fn new(gateway: Arc<G>, zone: impl Into<String>) -> Self {
        Self {
            gateway,
            zone: zone.into(),
            config: SequencerConfig::default(),
        }
    }

    /// Sets the configuration used for program analysis.
    #[must_use]
    pub fn with_config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the zone reference.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns the program analysis configuration.
    #[must_use]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Returns the gateway.
    #[must_use]
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    // ========== Telemetry ==========

    /// Fetches the raw telemetry snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if the gateway fetch fails.
    pub async fn snapshot(&self) -> Result<TelemetrySnapshot> {
        Ok(self.gateway.telemetry(&self.zone).await?)
    }

    /// Fetches and decodes the full zone state.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or a required point is missing.
    pub async fn state<S>(&self, schedule: &S) -> Result<ZoneState>
    where
        S: Schedule + ?Sized,
    {
        let snapshot = self.snapshot().await?;
        Ok(decode_zone_state(&snapshot, schedule)?)
    }

    /// Fetches the measured temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or `CURRENT_TEMP` is missing.
    pub async fn current_temperature(&self) -> Result<Temperature> {
        let snapshot = self.snapshot().await?;
        Ok(telemetry::temperature(&snapshot, PointIndex::CurrentTemp)?)
    }

    /// Fetches the setpoint in force.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or `TARGET_TEMP` is missing.
    pub async fn target_temperature(&self) -> Result<Temperature> {
        let snapshot = self.snapshot().await?;
        Ok(telemetry::temperature(&snapshot, PointIndex::TargetTemp)?)
    }

    /// Fetches the operating mode.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or `MODE` is missing or invalid.
    pub async fn mode(&self) -> Result<Mode> {
        let snapshot = self.snapshot().await?;
        Ok(telemetry::mode(&snapshot)?)
    }

    /// Returns `true` if the zone is calling for heat.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or an input point is missing.
    pub async fn is_active<S>(&self, schedule: &S) -> Result<bool>
    where
        S: Schedule + ?Sized,
    {
        let snapshot = self.snapshot().await?;
        Ok(telemetry::is_active(&snapshot, schedule)?)
    }

    /// Returns `true` if the boiler is firing for this zone.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or `BOILER_STATE` is missing.
    pub async fn is_boiler_on(&self) -> Result<bool> {
        let snapshot = self.snapshot().await?;
        Ok(telemetry::boiler_state(&snapshot)? == BOILER_ON)
    }

    // ========== Commands ==========

    /// Encodes a command and sends it, returning the transmitted tuple.
    ///
    /// Nothing is sent if encoding fails.
    ///
    /// # Errors
    ///
    /// Returns error if encoding or transmission fails.
    pub async fn send(&self, command: &ZoneCommand) -> Result<WireTuple> {
        let wire = command.encode()?;
        tracing::debug!(zone = %self.zone, point = %command.point(), %wire, "Sending zone command");
        self.gateway.send(&self.zone, &wire).await?;
        Ok(wire)
    }

    /// Sets the zone setpoint in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be encoded or sending fails.
    pub async fn set_target_temperature(&self, celsius: f64) -> Result<()> {
        self.send(&ZoneCommand::target_temperature(celsius))
            .await
            .map(drop)
    }

    /// Sets the operating mode.
    ///
    /// # Errors
    ///
    /// Returns error if sending fails.
    pub async fn set_mode(&self, mode: Mode) -> Result<()> {
        self.send(&ZoneCommand::mode(mode)).await.map(drop)
    }

    /// Starts or cancels a manual advance.
    ///
    /// # Errors
    ///
    /// Returns error if sending fails.
    pub async fn set_advance(&self, active: bool) -> Result<()> {
        self.send(&ZoneCommand::advance(active)).await.map(drop)
    }

    /// Sets the boost setpoint in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be encoded or sending fails.
    pub async fn set_boost_temperature(&self, celsius: f64) -> Result<()> {
        self.send(&ZoneCommand::boost_temperature(celsius))
            .await
            .map(drop)
    }

    /// Sets the number of boost hours; zero cancels the boost.
    ///
    /// # Errors
    ///
    /// Returns error if sending fails.
    pub async fn set_boost_hours(&self, hours: u8) -> Result<()> {
        self.send(&ZoneCommand::boost_hours(hours)).await.map(drop)
    }

    /// Sets the boost expiry.
    ///
    /// # Errors
    ///
    /// Returns error if the timestamp does not fit the wire field or sending
    /// fails.
    pub async fn set_boost_expiry(&self, at: DateTime<Utc>) -> Result<()> {
        self.send(&ZoneCommand::boost_expiry(at)).await.map(drop)
    }

    /// Starts a boost: setpoint, duration and expiry, sent in that order.
    ///
    /// Stops at the first failed command.
    ///
    /// # Errors
    ///
    /// Returns error if any command cannot be encoded or sent.
    pub async fn activate_boost(
        &self,
        celsius: f64,
        hours: u8,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let commands = [
            ZoneCommand::boost_temperature(celsius),
            ZoneCommand::boost_hours(hours),
            ZoneCommand::boost_expiry(expires_at),
        ];
        // Encode everything first so a bad value sends nothing.
        let wires = commands
            .iter()
            .map(ZoneCommand::encode)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for wire in &wires {
            self.gateway.send(&self.zone, wire).await?;
        }
        tracing::debug!(zone = %self.zone, hours, "Boost activated");
        Ok(())
    }

    /// Cancels a running boost.
    ///
    /// # Errors
    ///
    /// Returns error if sending fails.
    pub async fn deactivate_boost(&self) -> Result<()> {
        self.set_boost_hours(0).await
    }

    // ========== Programs ==========

    async fn program_graph(&self, program_id: &str) -> Result<Option<ProgramGraph>> {
        Ok(self.gateway.program(&self.zone, program_id).await?)
    }

    /// Fetches a program and linearizes it.
    ///
    /// A missing program yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or the program has a node without an
    /// id.
    pub async fn program(&self, program_id: &str) -> Result<Vec<ProgramStep>> {
        let Some(graph) = self.program_graph(program_id).await? else {
            tracing::debug!(zone = %self.zone, program_id, "No program configured");
            return Ok(Vec::new());
        };
        Ok(extract_program(&graph, self.config.max_steps())?)
    }

    /// Fetches a program and summarizes it.
    ///
    /// # Errors
    ///
    /// See [`Zone::program`].
    pub async fn program_summary(&self, program_id: &str) -> Result<ProgramSummary> {
        let steps = self.program(program_id).await?;
        Ok(summarize_with_preview(&steps, self.config.preview_len()))
    }

    /// Fetches a program and splits it into heating cycles.
    ///
    /// # Errors
    ///
    /// See [`Zone::program`].
    pub async fn heating_cycles(&self, program_id: &str) -> Result<Vec<HeatingCycle>> {
        let steps = self.program(program_id).await?;
        Ok(detect_cycles(&steps, self.config.cycle_threshold()))
    }

    /// Fetches a program and derives steps, summary and cycles at once.
    ///
    /// # Errors
    ///
    /// See [`Zone::program`].
    pub async fn analyze_program(&self, program_id: &str) -> Result<ProgramAnalysis> {
        let graph = self.program_graph(program_id).await?.unwrap_or_default();
        Ok(analyze(&graph, &self.config)?)
    }

    /// Analyzes several programs, keyed by program id.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`Zone::analyze_program`].
    pub async fn analyze_programs<I, S>(
        &self,
        program_ids: I,
    ) -> Result<BTreeMap<String, ProgramAnalysis>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut analyses = BTreeMap::new();
        for id in program_ids {
            let id = id.as_ref();
            let analysis = self.analyze_program(id).await?;
            analyses.insert(id.to_string(), analysis);
        }
        Ok(analyses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, EncodeError, Error, GatewayError};
    use crate::gateway::MemoryGateway;
    use crate::program::ProgramNode;
    use crate::telemetry::FixedSchedule;

    fn kitchen() -> TelemetrySnapshot {
        TelemetrySnapshot::new("Kitchen")
            .with_point(PointIndex::CurrentTemp, 188)
            .with_point(PointIndex::TargetTemp, 200)
            .with_point(PointIndex::Mode, 0)
            .with_point(PointIndex::AdvanceActive, 1)
            .with_point(PointIndex::BoostHours, 0)
            .with_point(PointIndex::BoilerState, 1)
    }

    fn zone() -> (Arc<MemoryGateway>, Zone<MemoryGateway>) {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.set_telemetry("z1", kitchen());
        let zone = Zone::new(Arc::clone(&gateway), "z1");
        (gateway, zone)
    }

    #[tokio::test]
    async fn reads_decoded_values() {
        let (_, zone) = zone();

        assert_eq!(zone.current_temperature().await.unwrap().tenths(), 188);
        assert_eq!(zone.target_temperature().await.unwrap().tenths(), 200);
        assert_eq!(zone.mode().await.unwrap(), Mode::Auto);
        assert!(zone.is_active(&FixedSchedule(false)).await.unwrap());
        assert!(!zone.is_boiler_on().await.unwrap());

        let state = zone.state(&FixedSchedule(false)).await.unwrap();
        assert_eq!(state.name, "Kitchen");
        assert!(state.advance_active);
    }

    #[tokio::test]
    async fn missing_point_surfaces_as_decode_error() {
        let (gateway, zone) = zone();
        gateway.set_telemetry("z1", TelemetrySnapshot::new("Kitchen"));

        let err = zone.current_temperature().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::AttributeUnavailable(PointIndex::CurrentTemp))
        ));
    }

    #[tokio::test]
    async fn setters_send_encoded_tuples() {
        let (gateway, zone) = zone();

        zone.set_target_temperature(21.5).await.unwrap();
        zone.set_mode(Mode::AllDay).await.unwrap();
        zone.set_advance(false).await.unwrap();
        zone.set_boost_hours(3).await.unwrap();

        let sent = gateway.sent_to("z1");
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], [0, 6, 4, 0, 215]);
        assert_eq!(sent[1], [0, 7, 1, 1]);
        assert_eq!(sent[2], [0, 4, 1, 0]);
        assert_eq!(sent[3], [0, 8, 1, 3]);
    }

    #[tokio::test]
    async fn rejected_command_sends_nothing() {
        let (gateway, zone) = zone();

        let err = zone
            .send(&ZoneCommand::new(PointIndex::CurrentTemp, 20.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Encode(EncodeError::ReadOnlyAttribute(PointIndex::CurrentTemp))
        ));
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn boost_sends_three_commands() {
        let (gateway, zone) = zone();
        let expiry = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        zone.activate_boost(22.0, 2, expiry).await.unwrap();
        let sent = gateway.sent_to("z1");
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], [0, 14, 4, 0, 220]);
        assert_eq!(sent[1], [0, 8, 1, 2]);
        assert_eq!(sent[2], [0, 9, 5, 0x65, 0x53, 0xF1, 0x00]);

        zone.deactivate_boost().await.unwrap();
        assert_eq!(gateway.sent_to("z1")[3], [0, 8, 1, 0]);
    }

    #[tokio::test]
    async fn invalid_boost_sends_nothing() {
        let (gateway, zone) = zone();
        let expiry = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert!(zone.activate_boost(f64::NAN, 2, expiry).await.is_err());
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let (gateway, zone) = zone();
        gateway.set_send_failure(Some(GatewayError::Transport("timeout".into())));

        let err = zone.set_mode(Mode::Off).await.unwrap_err();
        assert!(matches!(err, Error::Gateway(GatewayError::Transport(_))));
    }

    #[tokio::test]
    async fn unknown_zone_fails() {
        let gateway = Arc::new(MemoryGateway::new());
        let zone = Zone::new(gateway, "ghost");
        assert!(matches!(
            zone.snapshot().await,
            Err(Error::Gateway(GatewayError::ZoneNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn program_analysis() {
        let (gateway, zone) = zone();
        let mut graph = ProgramGraph::new();
        let a = graph.add(ProgramNode::new("a").with_temperature(175).with_duration(60));
        let b = graph.add(ProgramNode::new("b").with_temperature(185).with_duration(120));
        let c = graph.add(ProgramNode::new("c").with_temperature(300).with_duration(30));
        graph.link(a, b);
        graph.link(b, c);
        graph.link(c, a);
        gateway.set_program("z1", "1", graph);

        let steps = zone.program("1").await.unwrap();
        assert_eq!(steps.len(), 3);

        let summary = zone.program_summary("1").await.unwrap();
        assert_eq!(summary.duration.total, Some(210));

        let cycles = zone.heating_cycles("1").await.unwrap();
        assert_eq!(cycles.len(), 2);

        let analysis = zone.analyze_program("1").await.unwrap();
        assert_eq!(analysis.steps, steps);
        assert_eq!(analysis.summary, summary);
        assert_eq!(analysis.cycles, cycles);
    }

    #[tokio::test]
    async fn analyzes_several_programs() {
        let (gateway, zone) = zone();
        let mut weekday = ProgramGraph::new();
        let a = weekday.add(ProgramNode::new("a").with_temperature(180).with_duration(90));
        weekday.link(a, a);
        gateway.set_program("z1", "1", weekday);

        let mut broken = ProgramGraph::new();
        let b = broken.add(ProgramNode::new("b"));
        let anon = broken.add(ProgramNode::anonymous());
        broken.link(b, anon);

        let analyses = zone.analyze_programs(["1", "2"]).await.unwrap();
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses["1"].summary.duration.total, Some(90));
        assert!(analyses["2"].steps.is_empty());

        gateway.set_program("z1", "3", broken);
        let err = zone.analyze_programs(vec!["1".to_string(), "3".to_string()]).await;
        assert!(matches!(err, Err(Error::Program(_))));
    }

    #[tokio::test]
    async fn missing_program_is_empty() {
        let (_, zone) = zone();
        assert!(zone.program("9").await.unwrap().is_empty());
        assert_eq!(zone.program_summary("9").await.unwrap().step_count, 0);
        assert!(zone.analyze_program("9").await.unwrap().steps.is_empty());
    }

    #[tokio::test]
    async fn config_bounds_traversal() {
        let (gateway, zone) = zone();
        let zone = zone.with_config(SequencerConfig::new().with_max_steps(2));
        let mut graph = ProgramGraph::new();
        let refs: Vec<_> = (0..5)
            .map(|i| graph.add(ProgramNode::new(format!("n{i}"))))
            .collect();
        for pair in refs.windows(2) {
            graph.link(pair[0], pair[1]);
        }
        gateway.set_program("z1", "1", graph);

        assert_eq!(zone.program("1").await.unwrap().len(), 2);
    }
}
