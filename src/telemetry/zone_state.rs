// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed zone state decoded from one snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DecodeError;
use crate::telemetry::{Schedule, TelemetrySnapshot, decoder};
use crate::types::{Mode, PointIndex, Temperature};

/// Raw BOILER_STATE value reported while the boiler relay is closed.
pub const BOILER_ON: i64 = 2;

/// Decoded state of one heating zone.
///
/// Computed fresh from a snapshot; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneState {
    /// Display name of the zone.
    pub name: String,
    /// Measured temperature.
    pub current_temperature: Temperature,
    /// Setpoint in force.
    pub target_temperature: Temperature,
    /// Operating mode.
    pub mode: Mode,
    /// A manual advance is in effect.
    pub advance_active: bool,
    /// Remaining boost hours.
    pub boost_hours: i64,
    /// Boost setpoint, when reported.
    pub boost_temperature: Option<Temperature>,
    /// Boost expiry, when one is set.
    pub boost_expiry: Option<DateTime<Utc>>,
    /// Raw boiler state.
    pub boiler_state: i64,
    /// The injected schedule calls for heat and the zone is not off.
    pub scheduled_on: bool,
    /// The zone is calling for heat.
    pub is_active: bool,
}

impl ZoneState {
    /// Returns `true` if the boiler is firing for this zone.
    #[must_use]
    pub fn boiler_on(&self) -> bool {
        self.boiler_state == BOILER_ON
    }

    /// Returns `true` if a boost is running.
    #[must_use]
    pub fn boost_active(&self) -> bool {
        self.boost_hours != 0
    }
}

/// Decodes a snapshot into a [`ZoneState`].
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` naming the first missing
/// required point (CURRENT_TEMP, TARGET_TEMP, MODE, ADVANCE_ACTIVE,
/// BOOST_HOURS, BOILER_STATE), `DecodeError::InvalidMode` for an
/// unrecognized mode, and `DecodeError::InvalidTimestamp` for an
/// unrepresentable boost expiry.
pub fn decode_zone_state<S>(
    snapshot: &TelemetrySnapshot,
    schedule: &S,
) -> Result<ZoneState, DecodeError>
where
    S: Schedule + ?Sized,
{
    let current_temperature = decoder::temperature(snapshot, PointIndex::CurrentTemp)?;
    let target_temperature = decoder::temperature(snapshot, PointIndex::TargetTemp)?;
    let mode = decoder::mode(snapshot)?;
    let signals = decoder::activity_signals(snapshot, schedule)?;
    let boost_hours = decoder::boost_hours(snapshot)?;
    let boiler_state = decoder::boiler_state(snapshot)?;

    let boost_temperature = match decoder::lookup(snapshot, PointIndex::BoostTemp) {
        Some(_) => Some(decoder::temperature(snapshot, PointIndex::BoostTemp)?),
        None => None,
    };
    let boost_expiry = decoder::boost_expiry(snapshot)?;

    tracing::trace!(
        zone = %snapshot.name(),
        %mode,
        active = signals.is_active(),
        "Decoded zone state"
    );

    Ok(ZoneState {
        name: snapshot.name().to_string(),
        current_temperature,
        target_temperature,
        mode,
        advance_active: signals.advance_active,
        boost_hours,
        boost_temperature,
        boost_expiry,
        boiler_state,
        scheduled_on: signals.scheduled_on,
        is_active: signals.is_active(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{FixedSchedule, TelemetryPoint};

    fn living_room() -> TelemetrySnapshot {
        TelemetrySnapshot::new("Living Room")
            .with_point(PointIndex::CurrentTemp, 205)
            .with_point(PointIndex::TargetTemp, 210)
            .with_point(PointIndex::Mode, 0)
            .with_point(PointIndex::AdvanceActive, 0)
            .with_point(PointIndex::BoostHours, 0)
            .with_point(PointIndex::BoilerState, 1)
    }

    /// Places `overrides` ahead of the living room points so they win lookup.
    fn living_room_with(overrides: &[(PointIndex, i64)]) -> TelemetrySnapshot {
        let points = overrides
            .iter()
            .map(|&(point, value)| TelemetryPoint::new(point, value))
            .chain(living_room().points().iter().copied())
            .collect();
        TelemetrySnapshot::from_points("Living Room", points)
    }

    #[test]
    fn decodes_full_state() {
        let state = decode_zone_state(&living_room(), &FixedSchedule(true)).unwrap();

        assert_eq!(state.name, "Living Room");
        assert_eq!(state.current_temperature.tenths(), 205);
        assert_eq!(state.target_temperature.tenths(), 210);
        assert_eq!(state.mode, Mode::Auto);
        assert!(!state.advance_active);
        assert_eq!(state.boost_hours, 0);
        assert_eq!(state.boost_temperature, None);
        assert_eq!(state.boost_expiry, None);
        assert_eq!(state.boiler_state, 1);
        assert!(!state.boiler_on());
        assert!(state.scheduled_on);
        assert!(state.is_active);
    }

    #[test]
    fn decodes_boost() {
        let snapshot = living_room_with(&[
            (PointIndex::BoostHours, 2),
            (PointIndex::BoostTemp, 230),
            (PointIndex::BoostTime, 1_700_000_000),
        ]);

        let state = decode_zone_state(&snapshot, &FixedSchedule(false)).unwrap();
        assert_eq!(state.boost_hours, 2);
        assert!(state.boost_active());
        assert_eq!(state.boost_temperature, Some(Temperature::from_tenths(230)));
        assert_eq!(state.boost_expiry.unwrap().timestamp(), 1_700_000_000);
        assert!(!state.scheduled_on);
        assert!(state.is_active);
    }

    #[test]
    fn missing_required_point_fails() {
        let snapshot = TelemetrySnapshot::new("Bare").with_point(PointIndex::CurrentTemp, 200);
        assert_eq!(
            decode_zone_state(&snapshot, &FixedSchedule(false)),
            Err(DecodeError::AttributeUnavailable(PointIndex::TargetTemp))
        );
    }

    #[test]
    fn off_zone_is_not_scheduled() {
        let snapshot = living_room_with(&[(PointIndex::Mode, 3)]);
        let state = decode_zone_state(&snapshot, &FixedSchedule(true)).unwrap();
        assert_eq!(state.mode, Mode::Off);
        assert!(!state.scheduled_on);
        assert!(!state.is_active);
    }

    #[test]
    fn boiler_on_value() {
        let snapshot = living_room_with(&[(PointIndex::BoilerState, 2)]);
        let state = decode_zone_state(&snapshot, &FixedSchedule(false)).unwrap();
        assert!(state.boiler_on());
    }

    #[test]
    fn serializes_to_json() {
        let state = decode_zone_state(&living_room(), &FixedSchedule(false)).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["mode"], "AUTO");
        assert_eq!(json["current_temperature"], 20.5);
        assert_eq!(json["is_active"], false);
    }
}
