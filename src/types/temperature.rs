// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-point temperature type.
//!
//! The controller stores every temperature as an integer number of tenths
//! of a degree Celsius. [`Temperature`] keeps that representation so values
//! read from telemetry are exact.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Number of raw units per degree Celsius.
pub const SCALE: f64 = 10.0;

/// A temperature in tenths of a degree Celsius.
///
/// # Examples
///
/// ```
/// use ember_lib::types::Temperature;
///
/// let t = Temperature::from_tenths(215);
/// assert!((t.celsius() - 21.5).abs() < f64::EPSILON);
///
/// let t = Temperature::from_celsius(19.04).unwrap();
/// assert_eq!(t.tenths(), 190);
/// assert_eq!(t.to_string(), "19.0°C");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Temperature(i32);

impl Temperature {
    /// Creates a temperature from raw tenths of a degree.
    #[must_use]
    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths)
    }

    /// Creates a temperature from degrees Celsius, rounding to the nearest
    /// tenth.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` for NaN or infinite input and
    /// `ValueError::OutOfRange` if the value does not fit in `i32` tenths.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_celsius(celsius: f64) -> Result<Self, ValueError> {
        if !celsius.is_finite() {
            return Err(ValueError::NotFinite);
        }
        let tenths = (celsius * SCALE).round();
        if tenths < f64::from(i32::MIN) || tenths > f64::from(i32::MAX) {
            return Err(ValueError::OutOfRange {
                min: i64::from(i32::MIN),
                max: i64::from(i32::MAX),
                // Out of range either way; saturating cast is informational.
                actual: tenths as i64,
            });
        }
        // Range checked above.
        Ok(Self(tenths as i32))
    }

    /// Returns the raw value in tenths of a degree.
    #[must_use]
    pub const fn tenths(&self) -> i32 {
        self.0
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    pub fn celsius(&self) -> f64 {
        f64::from(self.0) / SCALE
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.celsius())
    }
}

impl From<Temperature> for f64 {
    fn from(value: Temperature) -> Self {
        value.celsius()
    }
}

impl TryFrom<f64> for Temperature {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_celsius(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenths_to_celsius() {
        assert!((Temperature::from_tenths(175).celsius() - 17.5).abs() < f64::EPSILON);
        assert!((Temperature::from_tenths(-25).celsius() + 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn celsius_rounds_to_tenths() {
        assert_eq!(Temperature::from_celsius(21.5).unwrap().tenths(), 215);
        assert_eq!(Temperature::from_celsius(21.549).unwrap().tenths(), 215);
        assert_eq!(Temperature::from_celsius(21.55).unwrap().tenths(), 216);
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(Temperature::from_celsius(f64::NAN), Err(ValueError::NotFinite));
        assert_eq!(
            Temperature::from_celsius(f64::INFINITY),
            Err(ValueError::NotFinite)
        );
    }

    #[test]
    fn rejects_huge_values() {
        assert!(matches!(
            Temperature::from_celsius(1e12),
            Err(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn ordering_and_display() {
        assert!(Temperature::from_tenths(170) < Temperature::from_tenths(185));
        assert_eq!(Temperature::from_tenths(205).to_string(), "20.5°C");
    }

    #[test]
    fn serde_uses_celsius() {
        let json = serde_json::to_string(&Temperature::from_tenths(215)).unwrap();
        assert_eq!(json, "21.5");
        let back: Temperature = serde_json::from_str("19.5").unwrap();
        assert_eq!(back.tenths(), 195);
    }
}
