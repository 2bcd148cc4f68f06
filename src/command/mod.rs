// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone write commands and their wire encoding.
//!
//! A [`ZoneCommand`] names a point and a value. Encoding turns it into the
//! [`WireTuple`] the controller expects. The framing is fixed by the
//! controller firmware:
//!
//! | Kind | Points | Tuple |
//! |------|--------|-------|
//! | Small int | MODE, ADVANCE_ACTIVE, BOOST_HOURS | `[0, index, 1, value]` |
//! | Temperature | TARGET_TEMP, BOOST_TEMP | `[0, index, 4, 0, tenths]` |
//! | Timestamp | BOOST_TIME | `[0, index, 5, b3, b2, b1, b0]` of epoch seconds |
//!
//! The last temperature element is the whole tenths value, so 30 °C goes out
//! as `[0, index, 4, 0, 300]`.
//!
//! # Examples
//!
//! ```
//! use ember_lib::command::{encode_command, ZoneCommand};
//! use ember_lib::types::Mode;
//!
//! let wire = encode_command("MODE", 1).unwrap();
//! assert_eq!(wire.as_slice(), &[0, 7, 1, 1]);
//!
//! let wire = ZoneCommand::mode(Mode::Off).encode().unwrap();
//! assert_eq!(wire.as_slice(), &[0, 7, 1, 3]);
//!
//! assert!(encode_command("CURRENT_TEMP", 20.0).is_err());
//! ```

mod wire;

pub use wire::WireTuple;

use chrono::{DateTime, Utc};

use crate::error::{EncodeError, ValueError};
use crate::types::{AttributeKind, Mode, PointIndex, Temperature};

/// Leading element of every write tuple.
const FRAME_START: u16 = 0;

/// Element between the type tag and the tenths of a temperature write.
const TEMPERATURE_PAD: u16 = 0;

/// The value carried by a [`ZoneCommand`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandValue {
    /// Degrees Celsius.
    Temperature(f64),
    /// A small integer, or whole degrees / epoch seconds for points of
    /// those kinds.
    Integer(i64),
    /// A point in time.
    Timestamp(DateTime<Utc>),
}

impl CommandValue {
    /// Returns the attribute kind this value naturally encodes as.
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Temperature(_) => AttributeKind::Temperature,
            Self::Integer(_) => AttributeKind::SmallInt,
            Self::Timestamp(_) => AttributeKind::Timestamp,
        }
    }
}

impl From<f64> for CommandValue {
    fn from(value: f64) -> Self {
        Self::Temperature(value)
    }
}

impl From<Temperature> for CommandValue {
    fn from(value: Temperature) -> Self {
        Self::Temperature(value.celsius())
    }
}

impl From<i64> for CommandValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for CommandValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for CommandValue {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for CommandValue {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Mode> for CommandValue {
    fn from(value: Mode) -> Self {
        Self::Integer(i64::from(value.value()))
    }
}

impl From<DateTime<Utc>> for CommandValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// A request to write one zone attribute.
///
/// # Examples
///
/// ```
/// use ember_lib::command::ZoneCommand;
/// use ember_lib::types::PointIndex;
///
/// let cmd = ZoneCommand::advance(true);
/// assert_eq!(cmd.point(), PointIndex::AdvanceActive);
/// assert_eq!(cmd.encode().unwrap().as_slice(), &[0, 4, 1, 1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneCommand {
    point: PointIndex,
    value: CommandValue,
}

impl ZoneCommand {
    /// Creates a command for any point.
    #[must_use]
    pub fn new(point: PointIndex, value: impl Into<CommandValue>) -> Self {
        Self {
            point,
            value: value.into(),
        }
    }

    /// Creates a command from an attribute name such as `"TARGET_TEMP"`.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::UnknownAttribute` if the name is not a point.
    pub fn parse(attribute: &str, value: impl Into<CommandValue>) -> Result<Self, EncodeError> {
        let point = attribute
            .parse::<PointIndex>()
            .map_err(|_| EncodeError::UnknownAttribute(attribute.to_string()))?;
        Ok(Self::new(point, value))
    }

    /// Sets the zone setpoint.
    #[must_use]
    pub fn target_temperature(celsius: f64) -> Self {
        Self::new(PointIndex::TargetTemp, celsius)
    }

    /// Sets the boost setpoint.
    #[must_use]
    pub fn boost_temperature(celsius: f64) -> Self {
        Self::new(PointIndex::BoostTemp, celsius)
    }

    /// Sets the operating mode.
    #[must_use]
    pub fn mode(mode: Mode) -> Self {
        Self::new(PointIndex::Mode, mode)
    }

    /// Starts or cancels a manual advance.
    #[must_use]
    pub fn advance(active: bool) -> Self {
        Self::new(PointIndex::AdvanceActive, active)
    }

    /// Sets the number of boost hours; zero cancels the boost.
    #[must_use]
    pub fn boost_hours(hours: u8) -> Self {
        Self::new(PointIndex::BoostHours, hours)
    }

    /// Sets the boost expiry.
    #[must_use]
    pub fn boost_expiry(at: DateTime<Utc>) -> Self {
        Self::new(PointIndex::BoostTime, at)
    }

    /// Returns the target point.
    #[must_use]
    pub const fn point(&self) -> PointIndex {
        self.point
    }

    /// Returns the command value.
    #[must_use]
    pub const fn value(&self) -> CommandValue {
        self.value
    }

    /// Encodes the command into its wire tuple.
    ///
    /// # Errors
    ///
    /// See [`encode`].
    pub fn encode(&self) -> Result<WireTuple, EncodeError> {
        encode(self)
    }
}

/// Encodes a command into its wire tuple.
///
/// Encoding is deterministic and depends on nothing but the command.
///
/// # Errors
///
/// - `EncodeError::ReadOnlyAttribute` if the point cannot be written
/// - `EncodeError::EncodingNotSupported` if the value kind does not fit the
///   point
/// - `EncodeError::Value` if the value does not fit its wire field
#[allow(clippy::cast_precision_loss)]
pub fn encode(command: &ZoneCommand) -> Result<WireTuple, EncodeError> {
    let point = command.point;
    if !point.is_writable() {
        return Err(EncodeError::ReadOnlyAttribute(point));
    }

    let kind = point.kind();
    let mut values = vec![
        FRAME_START,
        u16::from(point.value()),
        u16::from(kind.type_tag()),
    ];

    match (kind, command.value) {
        (AttributeKind::Temperature, CommandValue::Temperature(celsius)) => {
            values.extend([TEMPERATURE_PAD, temperature_field(celsius)?]);
        }
        (AttributeKind::Temperature, CommandValue::Integer(degrees)) => {
            values.extend([TEMPERATURE_PAD, temperature_field(degrees as f64)?]);
        }
        (AttributeKind::SmallInt, CommandValue::Integer(raw)) => {
            values.push(u16::from(small_int_field(point, raw)?));
        }
        (AttributeKind::Timestamp, CommandValue::Timestamp(at)) => {
            values.extend(timestamp_field(at.timestamp())?.map(u16::from));
        }
        (AttributeKind::Timestamp, CommandValue::Integer(secs)) => {
            values.extend(timestamp_field(secs)?.map(u16::from));
        }
        (_, value) => {
            return Err(EncodeError::EncodingNotSupported {
                point,
                kind: value.kind(),
            });
        }
    }

    let wire = WireTuple::new(values);
    tracing::debug!(%point, %wire, "Encoded zone command");
    Ok(wire)
}

/// Encodes a command given by attribute name.
///
/// # Errors
///
/// Returns `EncodeError::UnknownAttribute` for an unknown name, otherwise
/// the errors of [`encode`].
pub fn encode_command(
    attribute: &str,
    value: impl Into<CommandValue>,
) -> Result<WireTuple, EncodeError> {
    ZoneCommand::parse(attribute, value)?.encode()
}

fn temperature_field(celsius: f64) -> Result<u16, EncodeError> {
    let tenths = Temperature::from_celsius(celsius)?.tenths();
    let raw = u16::try_from(tenths).map_err(|_| ValueError::OutOfRange {
        min: 0,
        max: i64::from(u16::MAX),
        actual: i64::from(tenths),
    })?;
    Ok(raw)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn small_int_field(point: PointIndex, raw: i64) -> Result<u8, EncodeError> {
    let max = match point {
        PointIndex::Mode => i64::from(Mode::Off.value()),
        PointIndex::AdvanceActive => 1,
        _ => i64::from(u8::MAX),
    };
    if !(0..=max).contains(&raw) {
        return Err(ValueError::OutOfRange {
            min: 0,
            max,
            actual: raw,
        }
        .into());
    }
    // Range checked above.
    Ok(raw as u8)
}

fn timestamp_field(secs: i64) -> Result<[u8; 4], EncodeError> {
    let raw = u32::try_from(secs).map_err(|_| ValueError::OutOfRange {
        min: 0,
        max: i64::from(u32::MAX),
        actual: secs,
    })?;
    Ok(raw.to_be_bytes())
}
