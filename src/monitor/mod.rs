// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Counting of heating and boiler switch-on events.
//!
//! [`TransitionCounter`] remembers the last seen `(active, boiler_on)` pair
//! for each zone and counts OFF→ON edges of both signals. Its state
//! serializes to JSON so counts survive restarts.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use ember_lib::monitor::{TransitionCounter, TransitionKind};
//!
//! let mut counter = TransitionCounter::new();
//! let now = Utc::now();
//!
//! // First sighting only seeds state.
//! assert!(counter.observe_signals("hall", false, false, now).is_empty());
//!
//! let fired = counter.observe_signals("hall", true, true, now);
//! assert_eq!(fired.len(), 2);
//! assert_eq!(fired[0].kind, TransitionKind::Heating);
//! assert_eq!(counter.counts("hall").unwrap().boiler_cycles, 1);
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::gateway::Gateway;
use crate::telemetry::{Schedule, ZoneState};
use crate::zone::Zone;

/// Polling period used by [`TransitionCounter::run`] by default.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest polling period [`TransitionCounter::run`] accepts.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Which signal switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// The zone started calling for heat.
    Heating,
    /// The boiler started firing.
    Boiler,
}

/// One OFF→ON edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Zone the edge was seen on.
    pub zone: String,
    /// Signal that switched on.
    pub kind: TransitionKind,
    /// Running count for this zone and kind, including this edge.
    pub count: u64,
    /// Observation time of the edge.
    pub at: DateTime<Utc>,
}

/// Per-zone counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCounts {
    /// Times the zone started calling for heat.
    pub heating_cycles: u64,
    /// Times the boiler started firing.
    pub boiler_cycles: u64,
    /// Time of the latest heating edge.
    pub last_heating_on: Option<DateTime<Utc>>,
    /// Time of the latest boiler edge.
    pub last_boiler_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Signals {
    active: bool,
    boiler_on: bool,
}

/// Counts OFF→ON transitions per zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCounter {
    #[serde(default)]
    previous: BTreeMap<String, Signals>,
    #[serde(default)]
    counts: BTreeMap<String, TransitionCounts>,
}

impl TransitionCounter {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a decoded zone state under the zone reference `zone`.
    ///
    /// The state's display name is not used as the key, since two zones may
    /// share a name.
    pub fn observe(&mut self, zone: &str, state: &ZoneState, at: DateTime<Utc>) -> Vec<Transition> {
        self.observe_signals(zone, state.is_active, state.boiler_on(), at)
    }

    /// Records the two signals of a zone and returns the edges that fired.
    ///
    /// The first observation of a zone only seeds its state.
    pub fn observe_signals(
        &mut self,
        zone: &str,
        active: bool,
        boiler_on: bool,
        at: DateTime<Utc>,
    ) -> Vec<Transition> {
        let current = Signals { active, boiler_on };
        let counts = self.counts.entry(zone.to_string()).or_default();

        let Some(previous) = self.previous.insert(zone.to_string(), current) else {
            tracing::debug!(zone, active, boiler_on, "Seeded zone signals");
            return Vec::new();
        };

        let mut fired = Vec::new();
        if !previous.active && active {
            counts.heating_cycles += 1;
            counts.last_heating_on = Some(at);
            fired.push(Transition {
                zone: zone.to_string(),
                kind: TransitionKind::Heating,
                count: counts.heating_cycles,
                at,
            });
        }
        if !previous.boiler_on && boiler_on {
            counts.boiler_cycles += 1;
            counts.last_boiler_on = Some(at);
            fired.push(Transition {
                zone: zone.to_string(),
                kind: TransitionKind::Boiler,
                count: counts.boiler_cycles,
                at,
            });
        }

        for t in &fired {
            tracing::info!(zone, kind = ?t.kind, count = t.count, "Zone switched on");
        }
        fired
    }

    /// Fetches every zone and records its state.
    ///
    /// Zones whose fetch or decode fails are logged and skipped.
    pub async fn check_zones<G, S>(&mut self, zones: &[Zone<G>], schedule: &S) -> Vec<Transition>
    where
        G: Gateway,
        S: Schedule + ?Sized,
    {
        let mut fired = Vec::new();
        for zone in zones {
            match zone.state(schedule).await {
                Ok(state) => fired.extend(self.observe(zone.zone(), &state, Utc::now())),
                Err(e) => tracing::warn!(zone = %zone.zone(), error = %e, "Skipping zone"),
            }
        }
        fired
    }

    /// Polls `zones` every `period` until `shutdown` resolves.
    ///
    /// The first poll happens immediately unless `shutdown` is already
    /// ready. Returns every transition seen while running. A zero `period`
    /// is raised to one millisecond.
    pub async fn run<G, S, F>(
        &mut self,
        zones: &[Zone<G>],
        schedule: &S,
        period: Duration,
        shutdown: F,
    ) -> Vec<Transition>
    where
        G: Gateway,
        S: Schedule + ?Sized,
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(period.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut shutdown = std::pin::pin!(shutdown);
        let mut fired = Vec::new();
        let mut polls: u64 = 0;

        tracing::info!(zones = zones.len(), ?period, "Starting transition monitor");
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    polls += 1;
                    let seen = self.check_zones(zones, schedule).await;
                    tracing::debug!(polls, transitions = seen.len(), "Polled zones");
                    fired.extend(seen);
                }
            }
        }
        tracing::info!(polls, transitions = fired.len(), "Stopped transition monitor");
        fired
    }

    /// Returns the counts of one zone.
    #[must_use]
    pub fn counts(&self, zone: &str) -> Option<&TransitionCounts> {
        self.counts.get(zone)
    }

    /// Returns the counts of every zone, ordered by zone.
    #[must_use]
    pub fn summary(&self) -> &BTreeMap<String, TransitionCounts> {
        &self.counts
    }

    /// Forgets all counts and remembered signals.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.counts.clear();
    }

    /// Serializes the counter to JSON.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a counter from JSON written by [`TransitionCounter::to_json`].
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the input is not a valid counter.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn first_observation_seeds_only() {
        let mut counter = TransitionCounter::new();
        assert!(counter.observe_signals("z", true, true, at(0)).is_empty());
        assert_eq!(counter.counts("z"), Some(&TransitionCounts::default()));
    }

    #[test]
    fn counts_off_to_on_only() {
        let mut counter = TransitionCounter::new();
        counter.observe_signals("z", false, false, at(0));

        let fired = counter.observe_signals("z", true, false, at(10));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TransitionKind::Heating);
        assert_eq!(fired[0].count, 1);

        // on -> on and on -> off do not count
        assert!(counter.observe_signals("z", true, false, at(20)).is_empty());
        assert!(counter.observe_signals("z", false, false, at(30)).is_empty());

        let fired = counter.observe_signals("z", true, true, at(40));
        assert_eq!(fired.len(), 2);

        let counts = counter.counts("z").unwrap();
        assert_eq!(counts.heating_cycles, 2);
        assert_eq!(counts.boiler_cycles, 1);
        assert_eq!(counts.last_heating_on, Some(at(40)));
        assert_eq!(counts.last_boiler_on, Some(at(40)));
    }

    #[test]
    fn zones_are_independent() {
        let mut counter = TransitionCounter::new();
        counter.observe_signals("a", false, false, at(0));
        counter.observe_signals("b", true, true, at(0));

        counter.observe_signals("a", true, false, at(5));
        counter.observe_signals("b", true, true, at(5));

        assert_eq!(counter.counts("a").unwrap().heating_cycles, 1);
        assert_eq!(counter.counts("b").unwrap().heating_cycles, 0);
        assert_eq!(counter.summary().len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let mut counter = TransitionCounter::new();
        counter.observe_signals("z", false, false, at(0));
        counter.observe_signals("z", true, true, at(1));
        counter.reset();

        assert!(counter.summary().is_empty());
        assert!(counter.observe_signals("z", true, true, at(2)).is_empty());
    }

    #[test]
    fn survives_json_round_trip() {
        let mut counter = TransitionCounter::new();
        counter.observe_signals("z", false, false, at(0));
        counter.observe_signals("z", true, false, at(100));

        let restored = TransitionCounter::from_json(&counter.to_json().unwrap()).unwrap();
        assert_eq!(restored, counter);

        // remembered signals carry over, so this is not a fresh seed
        let mut restored = restored;
        let fired = restored.observe_signals("z", true, true, at(200));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TransitionKind::Boiler);
    }

    mod polling {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        use super::*;
        use crate::gateway::MemoryGateway;
        use crate::telemetry::{FixedSchedule, TelemetrySnapshot};
        use crate::types::{Mode, PointIndex};

        fn hall() -> TelemetrySnapshot {
            TelemetrySnapshot::new("Hall")
                .with_point(PointIndex::CurrentTemp, 190)
                .with_point(PointIndex::TargetTemp, 200)
                .with_point(PointIndex::Mode, 0)
                .with_point(PointIndex::AdvanceActive, 0)
                .with_point(PointIndex::BoostHours, 0)
                .with_point(PointIndex::BoilerState, 1)
        }

        fn zones() -> Vec<Zone<MemoryGateway>> {
            let gateway = Arc::new(MemoryGateway::new());
            gateway.set_telemetry("hall", hall());
            vec![Zone::new(gateway, "hall")]
        }

        #[tokio::test(start_paused = true)]
        async fn polls_until_shutdown() {
            let zones = zones();
            let polls = AtomicUsize::new(0);
            // Alternates off, on, off, on across polls.
            let schedule = |_: Mode, _: &TelemetrySnapshot| {
                polls.fetch_add(1, Ordering::SeqCst) % 2 == 1
            };
            let mut counter = TransitionCounter::new();

            let fired = counter
                .run(
                    &zones,
                    &schedule,
                    DEFAULT_POLL_INTERVAL,
                    tokio::time::sleep(Duration::from_secs(200)),
                )
                .await;

            // Polls at 0s, 60s, 120s and 180s.
            assert_eq!(polls.load(Ordering::SeqCst), 4);
            assert_eq!(fired.len(), 2);
            assert!(fired.iter().all(|t| t.kind == TransitionKind::Heating));
            assert_eq!(counter.counts("hall").unwrap().heating_cycles, 2);
        }

        #[tokio::test(start_paused = true)]
        async fn ready_shutdown_stops_before_polling() {
            let zones = zones();
            let mut counter = TransitionCounter::new();

            let fired = counter
                .run(&zones, &FixedSchedule(true), Duration::ZERO, std::future::ready(()))
                .await;
            assert!(fired.is_empty());
            assert!(counter.counts("hall").is_none());
        }
    }

    #[test]
    fn empty_json_object_is_empty_counter() {
        let counter = TransitionCounter::from_json("{}").unwrap();
        assert_eq!(counter, TransitionCounter::new());
        assert!(TransitionCounter::from_json("[1]").is_err());
    }
}
