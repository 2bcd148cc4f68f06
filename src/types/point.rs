// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point index addressing for zone attributes.
//!
//! Every attribute a zone reports or accepts is addressed by a small integer
//! called its point index. The set of indices is fixed by the controller
//! firmware, so it is modelled as a closed enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// The wire representation an attribute uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Fixed-point tenths of a degree Celsius.
    Temperature,
    /// A single small integer (mode, flag, hour count).
    SmallInt,
    /// Seconds since the Unix epoch.
    Timestamp,
}

impl AttributeKind {
    /// Returns the type tag used in the write framing.
    #[must_use]
    pub const fn type_tag(&self) -> u8 {
        match self {
            Self::SmallInt => 1,
            Self::Temperature => 4,
            Self::Timestamp => 5,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Temperature => "temperature",
            Self::SmallInt => "integer",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Address of a zone attribute.
///
/// # Examples
///
/// ```
/// use ember_lib::types::{AttributeKind, PointIndex};
///
/// let point: PointIndex = "target_temp".parse().unwrap();
/// assert_eq!(point, PointIndex::TargetTemp);
/// assert_eq!(point.value(), 6);
/// assert_eq!(point.kind(), AttributeKind::Temperature);
/// assert!(point.is_writable());
///
/// assert!(!PointIndex::CurrentTemp.is_writable());
/// assert_eq!(PointIndex::try_from(10).unwrap(), PointIndex::BoilerState);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum PointIndex {
    /// Manual advance to the next program step.
    AdvanceActive = 4,
    /// Measured zone temperature.
    CurrentTemp = 5,
    /// Setpoint in force.
    TargetTemp = 6,
    /// Operating mode, see [`Mode`](crate::types::Mode).
    Mode = 7,
    /// Remaining boost hours.
    BoostHours = 8,
    /// Boost expiry timestamp.
    BoostTime = 9,
    /// Boiler relay state as reported by the receiver.
    BoilerState = 10,
    /// Boost setpoint.
    BoostTemp = 14,
}

impl PointIndex {
    /// Every point in ascending index order.
    pub const ALL: [Self; 8] = [
        Self::AdvanceActive,
        Self::CurrentTemp,
        Self::TargetTemp,
        Self::Mode,
        Self::BoostHours,
        Self::BoostTime,
        Self::BoilerState,
        Self::BoostTemp,
    ];

    /// Returns the integer address used on the wire.
    #[must_use]
    pub const fn value(&self) -> u8 {
        *self as u8
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdvanceActive => "ADVANCE_ACTIVE",
            Self::CurrentTemp => "CURRENT_TEMP",
            Self::TargetTemp => "TARGET_TEMP",
            Self::Mode => "MODE",
            Self::BoostHours => "BOOST_HOURS",
            Self::BoostTime => "BOOST_TIME",
            Self::BoilerState => "BOILER_STATE",
            Self::BoostTemp => "BOOST_TEMP",
        }
    }

    /// Returns how the attribute is represented on the wire.
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::CurrentTemp | Self::TargetTemp | Self::BoostTemp => AttributeKind::Temperature,
            Self::BoostTime => AttributeKind::Timestamp,
            Self::AdvanceActive | Self::Mode | Self::BoostHours | Self::BoilerState => {
                AttributeKind::SmallInt
            }
        }
    }

    /// Returns `false` for points the controller only reports.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(self, Self::CurrentTemp | Self::BoilerState)
    }
}

impl fmt::Display for PointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointIndex {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == upper)
            .ok_or_else(|| ValueError::UnknownPoint(s.to_string()))
    }
}

impl TryFrom<u8> for PointIndex {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.value() == value)
            .ok_or_else(|| ValueError::UnknownPoint(value.to_string()))
    }
}

impl From<PointIndex> for u8 {
    fn from(point: PointIndex) -> Self {
        point.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_values_match_controller() {
        assert_eq!(PointIndex::AdvanceActive.value(), 4);
        assert_eq!(PointIndex::CurrentTemp.value(), 5);
        assert_eq!(PointIndex::TargetTemp.value(), 6);
        assert_eq!(PointIndex::Mode.value(), 7);
        assert_eq!(PointIndex::BoostHours.value(), 8);
        assert_eq!(PointIndex::BoostTime.value(), 9);
        assert_eq!(PointIndex::BoilerState.value(), 10);
        assert_eq!(PointIndex::BoostTemp.value(), 14);
    }

    #[test]
    fn every_value_round_trips() {
        for point in PointIndex::ALL {
            assert_eq!(PointIndex::try_from(point.value()).unwrap(), point);
            assert_eq!(point.as_str().parse::<PointIndex>().unwrap(), point);
        }
    }

    #[test]
    fn unknown_index_is_rejected() {
        assert!(matches!(
            PointIndex::try_from(11),
            Err(ValueError::UnknownPoint(_))
        ));
        assert!("FAN_SPEED".parse::<PointIndex>().is_err());
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("mode".parse::<PointIndex>().unwrap(), PointIndex::Mode);
        assert_eq!(
            " Boost_Temp ".parse::<PointIndex>().unwrap(),
            PointIndex::BoostTemp
        );
    }

    #[test]
    fn read_only_subset() {
        let read_only: Vec<_> = PointIndex::ALL
            .into_iter()
            .filter(|p| !p.is_writable())
            .collect();
        assert_eq!(
            read_only,
            vec![PointIndex::CurrentTemp, PointIndex::BoilerState]
        );
    }

    #[test]
    fn kinds_and_tags() {
        assert_eq!(PointIndex::BoostTemp.kind(), AttributeKind::Temperature);
        assert_eq!(PointIndex::BoostTime.kind(), AttributeKind::Timestamp);
        assert_eq!(PointIndex::AdvanceActive.kind(), AttributeKind::SmallInt);
        assert_eq!(AttributeKind::SmallInt.type_tag(), 1);
        assert_eq!(AttributeKind::Temperature.type_tag(), 4);
        assert_eq!(AttributeKind::Timestamp.type_tag(), 5);
    }

    #[test]
    fn serializes_as_name() {
        let json = serde_json::to_string(&PointIndex::BoostHours).unwrap();
        assert_eq!(json, "\"BOOST_HOURS\"");
    }
}
