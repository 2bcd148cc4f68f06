// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating program parsing and analysis.
//!
//! A program arrives from the controller as a ring of nodes that may never
//! close cleanly. It is loaded into a [`ProgramGraph`] arena and then
//! linearized by [`traverse`] under a visited-id set and a step bound.
//! The resulting [`ProgramStep`] list feeds [`summarize`] and
//! [`detect_cycles`].
//!
//! # Examples
//!
//! ```
//! use ember_lib::program::{ProgramGraph, SequencerConfig, analyze};
//!
//! let json = r#"{
//!     "id": "a", "temperature": 175, "time": 40,
//!     "Next": {"id": "b", "temperature": 300, "time": 60, "Next": {"id": "a"}}
//! }"#;
//! let graph = ProgramGraph::from_json(json).unwrap();
//! let analysis = analyze(&graph, &SequencerConfig::default()).unwrap();
//!
//! assert_eq!(analysis.steps.len(), 2);
//! assert_eq!(analysis.summary.duration.total, Some(100));
//! assert_eq!(analysis.cycles.len(), 2);
//! ```

mod config;
mod cycles;
mod graph;
mod sequencer;
mod summary;

use serde::Serialize;

pub use config::SequencerConfig;
pub use cycles::{DEFAULT_CYCLE_THRESHOLD, HeatingCycle, detect_cycles};
pub use graph::{NodeRef, ProgramGraph, ProgramNode};
pub use sequencer::{ProgramStep, extract_program, traverse};
pub use summary::{
    DEFAULT_PREVIEW_LEN, DurationRange, ProgramSummary, TemperatureRange, summarize,
    summarize_with_preview,
};

use crate::error::ProgramError;

/// Steps, summary and cycles of one program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramAnalysis {
    /// Linearized steps, bounded by the configured `max_steps`.
    pub steps: Vec<ProgramStep>,
    /// Statistics over `steps`.
    pub summary: ProgramSummary,
    /// Heating cycles found in `steps`.
    pub cycles: Vec<HeatingCycle>,
}

/// Extracts a program from its root and derives its summary and cycles.
///
/// # Errors
///
/// Returns `ProgramError::MalformedNode` if traversal reaches a node
/// without an id.
pub fn analyze(
    graph: &ProgramGraph,
    config: &SequencerConfig,
) -> Result<ProgramAnalysis, ProgramError> {
    let steps = extract_program(graph, config.max_steps())?;
    let summary = summarize_with_preview(&steps, config.preview_len());
    let cycles = detect_cycles(&steps, config.cycle_threshold());
    Ok(ProgramAnalysis {
        steps,
        summary,
        cycles,
    })
}
