// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping of program steps into heating cycles.

use serde::Serialize;

use crate::program::ProgramStep;
use crate::types::{SCALE, Temperature};

/// Temperature jump, in degrees, that starts a new cycle by default.
pub const DEFAULT_CYCLE_THRESHOLD: f64 = 10.0;

/// A run of consecutive steps with no large temperature jump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatingCycle {
    /// Setpoint of the first step.
    pub start_temperature: Option<Temperature>,
    /// Setpoint of the last step.
    pub end_temperature: Option<Temperature>,
    /// Sum of the step durations that are present, in minutes.
    pub duration: u64,
    /// Member steps in program order.
    pub steps: Vec<ProgramStep>,
}

impl HeatingCycle {
    fn from_steps(steps: Vec<ProgramStep>) -> Self {
        Self {
            start_temperature: steps.first().and_then(|s| s.temperature),
            end_temperature: steps.last().and_then(|s| s.temperature),
            duration: steps.iter().filter_map(|s| s.duration).map(u64::from).sum(),
            steps,
        }
    }
}

/// Splits steps into cycles wherever the temperature moves by more than
/// `threshold` degrees from the previous step.
///
/// A split only happens between two steps that both carry a temperature.
/// The run in progress is always emitted when the scan ends. Fewer than two
/// steps produce no cycles at all.
///
/// # Examples
///
/// ```
/// use ember_lib::program::{ProgramStep, detect_cycles};
/// use ember_lib::types::Temperature;
///
/// let steps: Vec<_> = [175, 175, 185, 300]
///     .into_iter()
///     .enumerate()
///     .map(|(i, t)| ProgramStep {
///         position: i + 1,
///         id: i.to_string(),
///         temperature: Some(Temperature::from_tenths(t)),
///         duration: Some(30),
///         count: None,
///     })
///     .collect();
///
/// let cycles = detect_cycles(&steps, 10.0);
/// assert_eq!(cycles.len(), 2);
/// assert_eq!(cycles[0].steps.len(), 3);
/// assert_eq!(cycles[1].steps.len(), 1);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_cycles(steps: &[ProgramStep], threshold: f64) -> Vec<HeatingCycle> {
    if steps.len() < 2 {
        return Vec::new();
    }

    let mut cycles = Vec::new();
    let mut current: Vec<ProgramStep> = Vec::new();
    let mut previous: Option<Temperature> = None;

    for step in steps {
        if let (Some(prev), Some(temp)) = (previous, step.temperature) {
            let delta = i64::from(temp.tenths()) - i64::from(prev.tenths());
            let jump = delta.abs() as f64 / SCALE;
            if jump > threshold && !current.is_empty() {
                cycles.push(HeatingCycle::from_steps(std::mem::take(&mut current)));
            }
        }
        current.push(step.clone());
        previous = step.temperature;
    }

    if !current.is_empty() {
        cycles.push(HeatingCycle::from_steps(current));
    }

    tracing::trace!(cycles = cycles.len(), threshold, "Detected heating cycles");
    cycles
}
