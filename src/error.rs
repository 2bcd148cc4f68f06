// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `ember_lib` library.
//!
//! This module provides the error hierarchy for every failure the library
//! can report: value validation, telemetry decoding, command encoding,
//! program traversal, JSON parsing, and gateway communication.
//!
//! None of these errors are retried or replaced with placeholder values
//! inside the library. A decode that fails is reported as a failure.

use thiserror::Error;

use crate::types::{AttributeKind, PointIndex};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while decoding zone telemetry.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error occurred while encoding a zone command.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error occurred while walking a heating program.
    #[error("program error: {0}")]
    Program(#[from] ProgramError),

    /// Error occurred while parsing a gateway payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error reported by the device gateway.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value does not fit the field it is destined for.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A value that must be finite was NaN or infinite.
    #[error("value is not a finite number")]
    NotFinite,

    /// A point index name or number is not part of the controller's domain.
    #[error("unknown point index: {0}")]
    UnknownPoint(String),

    /// A mode name is not one of AUTO, ALL_DAY, ON or OFF.
    #[error("unknown zone mode: {0}")]
    UnknownMode(String),
}

/// Errors raised while decoding a telemetry snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A required telemetry point is missing from the snapshot.
    #[error("attribute {0} is not present in the telemetry snapshot")]
    AttributeUnavailable(PointIndex),

    /// The MODE point carries a raw value outside the mode domain.
    #[error("raw mode value {0} does not name a zone mode")]
    InvalidMode(i64),

    /// The BOOST_TIME point carries seconds outside the representable range.
    #[error("raw timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    /// A temperature point carries tenths outside the representable range.
    #[error("raw temperature {raw} of {point} is out of range")]
    InvalidTemperature {
        /// The temperature point.
        point: PointIndex,
        /// The raw value as received.
        raw: i64,
    },
}

/// Errors raised while encoding a zone command into a wire tuple.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The command targets a point the controller only reports.
    #[error("cannot write to read-only attribute {0}")]
    ReadOnlyAttribute(PointIndex),

    /// The command value has no encoding for the target point.
    #[error("{point} cannot be encoded from a {kind} value")]
    EncodingNotSupported {
        /// The point the command targets.
        point: PointIndex,
        /// The kind of value that was supplied.
        kind: AttributeKind,
    },

    /// The attribute name does not parse to a point index.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The value does not fit its wire field.
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Errors raised while linearizing a program graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// A node reached during traversal has no id.
    #[error("program node at step {position} has no id")]
    MalformedNode {
        /// The 1-based step position at which the node was reached.
        position: usize,
    },
}

/// Errors related to parsing gateway payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// Errors surfaced by a [`Gateway`](crate::gateway::Gateway) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway does not know the requested zone.
    #[error("unknown zone: {0}")]
    ZoneNotFound(String),

    /// The gateway failed to reach the controller.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
