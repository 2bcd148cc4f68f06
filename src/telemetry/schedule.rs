// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Injected schedule evaluation.
//!
//! Deciding whether a zone's schedule table calls for heat right now is not
//! done by this library. Callers supply a [`Schedule`] and the decoder only
//! consults it when the zone is not switched off.

use crate::telemetry::TelemetrySnapshot;
use crate::types::Mode;

/// Answers whether a zone's schedule calls for heat.
///
/// Any `Fn(Mode, &TelemetrySnapshot) -> bool` closure is a schedule.
///
/// # Examples
///
/// ```
/// use ember_lib::telemetry::{Schedule, TelemetrySnapshot};
/// use ember_lib::types::Mode;
///
/// let continuous_only = |mode: Mode, _: &TelemetrySnapshot| mode == Mode::On;
/// let snapshot = TelemetrySnapshot::new("Hall");
///
/// assert!(continuous_only.is_scheduled_on(Mode::On, &snapshot));
/// assert!(!continuous_only.is_scheduled_on(Mode::Auto, &snapshot));
/// ```
pub trait Schedule {
    /// Returns `true` if the schedule calls for heat.
    ///
    /// Never called with [`Mode::Off`].
    fn is_scheduled_on(&self, mode: Mode, snapshot: &TelemetrySnapshot) -> bool;
}

impl<F> Schedule for F
where
    F: Fn(Mode, &TelemetrySnapshot) -> bool,
{
    fn is_scheduled_on(&self, mode: Mode, snapshot: &TelemetrySnapshot) -> bool {
        self(mode, snapshot)
    }
}

/// A schedule with a constant answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedSchedule(pub bool);

impl Schedule for FixedSchedule {
    fn is_scheduled_on(&self, _mode: Mode, _snapshot: &TelemetrySnapshot) -> bool {
        self.0
    }
}
