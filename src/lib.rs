// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Ember` Lib - A Rust library to read, command and sequence EPH Ember
//! heating zones.
//!
//! This library turns the controller's raw data into typed values and back:
//!
//! - **Telemetry**: decode a point-indexed snapshot into a [`ZoneState`],
//!   including the derived "calling for heat" signal
//! - **Commands**: encode setpoint, mode, advance and boost writes into the
//!   controller's wire tuples
//! - **Programs**: linearize the circular program graph into ordered steps,
//!   then summarize them and split them into heating cycles
//! - **Monitoring**: count heating and boiler switch-on events per zone
//!
//! Network access is left to a [`Gateway`] implementation. [`MemoryGateway`]
//! keeps everything in process.
//!
//! # Quick Start
//!
//! ## Decoding telemetry
//!
//! ```
//! use ember_lib::telemetry::{decode_zone_state, FixedSchedule, TelemetrySnapshot};
//! use ember_lib::types::PointIndex;
//!
//! let snapshot = TelemetrySnapshot::new("Study")
//!     .with_point(PointIndex::CurrentTemp, 192)
//!     .with_point(PointIndex::TargetTemp, 205)
//!     .with_point(PointIndex::Mode, 0)
//!     .with_point(PointIndex::AdvanceActive, 0)
//!     .with_point(PointIndex::BoostHours, 1)
//!     .with_point(PointIndex::BoilerState, 2);
//!
//! let state = decode_zone_state(&snapshot, &FixedSchedule(false))?;
//! assert!(state.is_active);
//! assert!(state.boiler_on());
//! # Ok::<(), ember_lib::Error>(())
//! ```
//!
//! ## Encoding a command
//!
//! ```
//! use ember_lib::encode_command;
//!
//! let wire = encode_command("TARGET_TEMP", 21.5)?;
//! assert_eq!(wire, [0, 6, 4, 0, 215]);
//! # Ok::<(), ember_lib::Error>(())
//! ```
//!
//! ## Analyzing a program
//!
//! ```
//! use ember_lib::program::{extract_program, summarize, ProgramGraph};
//!
//! let graph = ProgramGraph::from_json(r#"{
//!     "id": "a", "temperature": 180, "time": 120,
//!     "Next": {"id": "b", "temperature": 160, "time": 480, "Next": {"id": "a"}}
//! }"#)?;
//!
//! let steps = extract_program(&graph, 20)?;
//! let summary = summarize(&steps);
//! assert_eq!(summary.step_count, 2);
//! assert_eq!(summary.duration.total, Some(600));
//! # Ok::<(), ember_lib::Error>(())
//! ```

pub mod command;
pub mod error;
pub mod gateway;
pub mod monitor;
pub mod program;
pub mod telemetry;
pub mod types;
pub mod zone;

pub use command::{CommandValue, WireTuple, ZoneCommand, encode, encode_command};
pub use error::{
    DecodeError, EncodeError, Error, GatewayError, ParseError, ProgramError, Result, ValueError,
};
pub use gateway::{Gateway, MemoryGateway};
pub use monitor::{Transition, TransitionCounter, TransitionKind};
pub use program::{
    HeatingCycle, ProgramAnalysis, ProgramGraph, ProgramStep, ProgramSummary, SequencerConfig,
    detect_cycles, extract_program, summarize,
};
pub use telemetry::{
    FixedSchedule, Schedule, TelemetryPoint, TelemetrySnapshot, ZoneState, decode_zone_state,
};
pub use types::{Mode, PointIndex, Temperature};
pub use zone::Zone;
