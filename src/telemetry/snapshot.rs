// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw telemetry snapshot as delivered by the gateway.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseError;
use crate::types::PointIndex;

/// One `(pointIndex, value)` pair from a zone's point data list.
///
/// The index is kept as the raw wire integer so that points this library
/// does not know about survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    /// Raw point index.
    #[serde(rename = "pointIndex")]
    pub index: u16,

    /// Raw integer value.
    #[serde(deserialize_with = "deserialize_raw_value")]
    pub value: i64,
}

impl TelemetryPoint {
    /// Creates a point for a known index.
    #[must_use]
    pub fn new(index: PointIndex, value: i64) -> Self {
        Self {
            index: u16::from(index.value()),
            value,
        }
    }

    /// Returns the typed index, or `None` for indices outside the domain.
    #[must_use]
    pub fn point(&self) -> Option<PointIndex> {
        u8::try_from(self.index)
            .ok()
            .and_then(|raw| PointIndex::try_from(raw).ok())
    }
}

/// The controller sends values both as JSON numbers and as numeric strings.
fn deserialize_raw_value<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Int(i64),
        Text(String),
    }

    match RawValue::deserialize(deserializer)? {
        RawValue::Int(v) => Ok(v),
        RawValue::Text(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("point value '{s}' is not an integer"))
        }),
    }
}

/// An immutable view of one zone's telemetry at a point in time.
///
/// Order of points does not matter for lookup. When the same index appears
/// more than once, the first occurrence wins.
///
/// # Examples
///
/// ```
/// use ember_lib::telemetry::TelemetrySnapshot;
/// use ember_lib::types::PointIndex;
///
/// let snapshot = TelemetrySnapshot::new("Hall")
///     .with_point(PointIndex::TargetTemp, 200)
///     .with_point(PointIndex::TargetTemp, 180);
///
/// assert_eq!(snapshot.lookup(PointIndex::TargetTemp), Some(200));
/// assert_eq!(snapshot.lookup(PointIndex::Mode), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Display name of the zone.
    #[serde(default)]
    name: String,

    /// Point data in the order the gateway delivered it.
    #[serde(rename = "pointDataList", default)]
    points: Vec<TelemetryPoint>,
}

impl TelemetrySnapshot {
    /// Creates an empty snapshot for the named zone.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// Creates a snapshot from an ordered list of points.
    #[must_use]
    pub fn from_points(name: impl Into<String>, points: Vec<TelemetryPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Parses the gateway's JSON zone object.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the payload is not a zone object.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let snapshot: Self = serde_json::from_str(json)?;
        let unknown = snapshot.points.iter().filter(|p| p.point().is_none()).count();
        if unknown > 0 {
            tracing::trace!(
                zone = %snapshot.name,
                unknown,
                "Snapshot carries points outside the known index domain"
            );
        }
        Ok(snapshot)
    }

    /// Appends a point, keeping any earlier entry for the same index.
    #[must_use]
    pub fn with_point(mut self, index: PointIndex, value: i64) -> Self {
        self.points.push(TelemetryPoint::new(index, value));
        self
    }

    /// Returns the zone name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the points in delivery order.
    #[must_use]
    pub fn points(&self) -> &[TelemetryPoint] {
        &self.points
    }

    /// Returns the raw value of the first point with the given index.
    #[must_use]
    pub fn lookup(&self, index: PointIndex) -> Option<i64> {
        let raw = u16::from(index.value());
        self.points
            .iter()
            .find(|p| p.index == raw)
            .map(|p| p.value)
    }

    /// Returns `true` if the snapshot carries no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(PointIndex, i64)> for TelemetrySnapshot {
    fn from_iter<T: IntoIterator<Item = (PointIndex, i64)>>(iter: T) -> Self {
        Self {
            name: String::new(),
            points: iter
                .into_iter()
                .map(|(index, value)| TelemetryPoint::new(index, value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_stored_value() {
        let snapshot: TelemetrySnapshot = PointIndex::ALL
            .into_iter()
            .map(|p| (p, i64::from(p.value()) * 100))
            .collect();

        for point in PointIndex::ALL {
            assert_eq!(snapshot.lookup(point), Some(i64::from(point.value()) * 100));
        }
    }

    #[test]
    fn lookup_absent_index() {
        let snapshot = TelemetrySnapshot::new("Empty");
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.lookup(PointIndex::CurrentTemp), None);
    }

    #[test]
    fn lookup_ignores_order() {
        let snapshot = TelemetrySnapshot::new("Zone")
            .with_point(PointIndex::Mode, 2)
            .with_point(PointIndex::CurrentTemp, 190);
        assert_eq!(snapshot.lookup(PointIndex::CurrentTemp), Some(190));
        assert_eq!(snapshot.lookup(PointIndex::Mode), Some(2));
    }

    #[test]
    fn duplicate_index_first_wins() {
        let snapshot = TelemetrySnapshot::from_points(
            "Zone",
            vec![
                TelemetryPoint::new(PointIndex::Mode, 3),
                TelemetryPoint::new(PointIndex::CurrentTemp, 190),
                TelemetryPoint::new(PointIndex::Mode, 0),
            ],
        );
        assert_eq!(snapshot.lookup(PointIndex::Mode), Some(3));
    }

    #[test]
    fn parses_numbers_and_numeric_strings() {
        let json = r#"{"name":"Study","pointDataList":[
            {"pointIndex":5,"value":"195"},
            {"pointIndex":6,"value":210},
            {"pointIndex":99,"value":"1"}
        ]}"#;
        let snapshot = TelemetrySnapshot::from_json(json).unwrap();

        assert_eq!(snapshot.name(), "Study");
        assert_eq!(snapshot.points().len(), 3);
        assert_eq!(snapshot.lookup(PointIndex::CurrentTemp), Some(195));
        assert_eq!(snapshot.lookup(PointIndex::TargetTemp), Some(210));
        assert_eq!(snapshot.points()[2].point(), None);
    }

    #[test]
    fn rejects_non_numeric_value() {
        let json = r#"{"pointDataList":[{"pointIndex":5,"value":"warm"}]}"#;
        assert!(TelemetrySnapshot::from_json(json).is_err());
    }

    #[test]
    fn missing_list_is_empty_snapshot() {
        let snapshot = TelemetrySnapshot::from_json(r#"{"name":"Attic"}"#).unwrap();
        assert!(snapshot.is_empty());
    }
}
