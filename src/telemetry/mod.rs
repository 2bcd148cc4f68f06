// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telemetry decoding for heating zones.
//!
//! A zone reports its state as a flat list of `(pointIndex, value)` pairs.
//! This module turns such a snapshot into typed attributes and derived
//! signals without ever substituting defaults for missing data.
//!
//! # Examples
//!
//! ```
//! use ember_lib::telemetry::{decode_zone_state, FixedSchedule, TelemetrySnapshot};
//! use ember_lib::types::{Mode, PointIndex};
//!
//! let json = r#"{
//!     "name": "Living Room",
//!     "pointDataList": [
//!         {"pointIndex": 5, "value": 205},
//!         {"pointIndex": 6, "value": "210"},
//!         {"pointIndex": 7, "value": 0},
//!         {"pointIndex": 4, "value": 0},
//!         {"pointIndex": 8, "value": 0},
//!         {"pointIndex": 10, "value": 1}
//!     ]
//! }"#;
//!
//! let snapshot = TelemetrySnapshot::from_json(json).unwrap();
//! assert_eq!(snapshot.lookup(PointIndex::CurrentTemp), Some(205));
//!
//! let state = decode_zone_state(&snapshot, &FixedSchedule(false)).unwrap();
//! assert_eq!(state.name, "Living Room");
//! assert_eq!(state.mode, Mode::Auto);
//! assert!((state.target_temperature.celsius() - 21.0).abs() < f64::EPSILON);
//! assert!(!state.is_active);
//! ```

mod decoder;
mod schedule;
mod snapshot;
mod zone_state;

pub use decoder::{
    ActivitySignals, activity_signals, advance_active, boiler_state, boost_active, boost_expiry,
    boost_hours, is_active, lookup, mode, required, scaled_temperature, scheduled_on, temperature,
};
pub use schedule::{FixedSchedule, Schedule};
pub use snapshot::{TelemetryPoint, TelemetrySnapshot};
pub use zone_state::{BOILER_ON, ZoneState, decode_zone_state};
