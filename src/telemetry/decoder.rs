// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure decoding functions over a [`TelemetrySnapshot`].

use chrono::{DateTime, Utc};

use crate::error::DecodeError;
use crate::telemetry::{Schedule, TelemetrySnapshot};
use crate::types::{Mode, PointIndex, SCALE, Temperature};

/// Returns the raw value of the first point with the given index.
#[must_use]
pub fn lookup(snapshot: &TelemetrySnapshot, index: PointIndex) -> Option<i64> {
    snapshot.lookup(index)
}

/// Returns the raw value of a point that must be present.
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` if the point is absent.
pub fn required(snapshot: &TelemetrySnapshot, index: PointIndex) -> Result<i64, DecodeError> {
    snapshot
        .lookup(index)
        .ok_or(DecodeError::AttributeUnavailable(index))
}

/// Returns a fixed-point point value in degrees Celsius.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scaled_temperature(snapshot: &TelemetrySnapshot, index: PointIndex) -> Option<f64> {
    // Raw values are tenths of a degree and far below 2^52.
    lookup(snapshot, index).map(|raw| raw as f64 / SCALE)
}

/// Returns a required temperature point as a [`Temperature`].
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` if the point is absent and
/// `DecodeError::InvalidTemperature` if its raw value does not fit in tenths
/// of a degree.
pub fn temperature(
    snapshot: &TelemetrySnapshot,
    index: PointIndex,
) -> Result<Temperature, DecodeError> {
    let raw = required(snapshot, index)?;
    i32::try_from(raw)
        .map(Temperature::from_tenths)
        .map_err(|_| DecodeError::InvalidTemperature { point: index, raw })
}

/// Decodes the zone's operating mode.
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` if MODE is absent and
/// `DecodeError::InvalidMode` if its raw value is outside the mode domain.
pub fn mode(snapshot: &TelemetrySnapshot) -> Result<Mode, DecodeError> {
    let raw = required(snapshot, PointIndex::Mode)?;
    Mode::from_raw(raw).ok_or(DecodeError::InvalidMode(raw))
}

/// Returns `true` if a manual advance is in effect.
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` if ADVANCE_ACTIVE is absent.
pub fn advance_active(snapshot: &TelemetrySnapshot) -> Result<bool, DecodeError> {
    required(snapshot, PointIndex::AdvanceActive).map(|raw| raw != 0)
}

/// Returns the remaining boost hours.
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` if BOOST_HOURS is absent.
pub fn boost_hours(snapshot: &TelemetrySnapshot) -> Result<i64, DecodeError> {
    required(snapshot, PointIndex::BoostHours)
}

/// Returns `true` if a boost is running.
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` if BOOST_HOURS is absent.
pub fn boost_active(snapshot: &TelemetrySnapshot) -> Result<bool, DecodeError> {
    boost_hours(snapshot).map(|hours| hours != 0)
}

/// Returns the raw boiler state.
///
/// # Errors
///
/// Returns `DecodeError::AttributeUnavailable` if BOILER_STATE is absent.
pub fn boiler_state(snapshot: &TelemetrySnapshot) -> Result<i64, DecodeError> {
    required(snapshot, PointIndex::BoilerState)
}

/// Returns the boost expiry, if one is set.
///
/// An absent BOOST_TIME point and a raw value of zero both mean no expiry.
///
/// # Errors
///
/// Returns `DecodeError::InvalidTimestamp` if the raw seconds cannot be
/// represented as a date.
pub fn boost_expiry(snapshot: &TelemetrySnapshot) -> Result<Option<DateTime<Utc>>, DecodeError> {
    match lookup(snapshot, PointIndex::BoostTime) {
        None | Some(0) => Ok(None),
        Some(secs) => DateTime::from_timestamp(secs, 0)
            .map(Some)
            .ok_or(DecodeError::InvalidTimestamp(secs)),
    }
}

/// Returns `true` if the zone's schedule calls for heat.
///
/// A zone in [`Mode::Off`] is never scheduled on; every other mode defers to
/// the supplied schedule.
///
/// # Errors
///
/// Returns the errors of [`mode`].
pub fn scheduled_on<S>(snapshot: &TelemetrySnapshot, schedule: &S) -> Result<bool, DecodeError>
where
    S: Schedule + ?Sized,
{
    match mode(snapshot)? {
        Mode::Off => Ok(false),
        m => Ok(schedule.is_scheduled_on(m, snapshot)),
    }
}

/// The three independent signals that make a zone call for heat.
///
/// # Examples
///
/// ```
/// use ember_lib::telemetry::ActivitySignals;
///
/// let signals = ActivitySignals {
///     scheduled_on: false,
///     boosting: false,
///     advance_active: true,
/// };
/// assert!(signals.is_active());
/// assert!(!ActivitySignals::default().is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivitySignals {
    /// The schedule calls for heat.
    pub scheduled_on: bool,
    /// Boost hours remain.
    pub boosting: bool,
    /// A manual advance is in effect.
    pub advance_active: bool,
}

impl ActivitySignals {
    /// Returns `true` if any signal holds.
    ///
    /// Temperatures play no part: a zone satisfied by its setpoint is still
    /// active while any signal holds.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.scheduled_on || self.boosting || self.advance_active
    }
}

/// Decodes all activity signals.
///
/// Every signal is decoded, so a missing point is reported even when
/// another signal already holds.
///
/// # Errors
///
/// Returns `DecodeError` if MODE, BOOST_HOURS or ADVANCE_ACTIVE cannot be
/// decoded.
pub fn activity_signals<S>(
    snapshot: &TelemetrySnapshot,
    schedule: &S,
) -> Result<ActivitySignals, DecodeError>
where
    S: Schedule + ?Sized,
{
    Ok(ActivitySignals {
        scheduled_on: scheduled_on(snapshot, schedule)?,
        boosting: boost_hours(snapshot)? > 0,
        advance_active: advance_active(snapshot)?,
    })
}

/// Returns `true` if the zone is calling for heat.
///
/// # Errors
///
/// Returns the errors of [`activity_signals`].
pub fn is_active<S>(snapshot: &TelemetrySnapshot, schedule: &S) -> Result<bool, DecodeError>
where
    S: Schedule + ?Sized,
{
    activity_signals(snapshot, schedule).map(|signals| signals.is_active())
}
