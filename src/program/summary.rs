// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aggregate statistics over a linearized program.

use serde::Serialize;

use crate::program::ProgramStep;
use crate::types::{SCALE, Temperature};

/// Number of leading steps kept in [`ProgramSummary::preview`] by default.
pub const DEFAULT_PREVIEW_LEN: usize = 6;

/// Temperature statistics over the steps that carry a temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TemperatureRange {
    /// Lowest setpoint.
    pub min: Option<Temperature>,
    /// Highest setpoint.
    pub max: Option<Temperature>,
    /// Mean in degrees Celsius.
    pub average: Option<f64>,
}

/// Duration statistics over the steps that carry a duration, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DurationRange {
    /// Shortest step.
    pub min: Option<u32>,
    /// Longest step.
    pub max: Option<u32>,
    /// Sum of all present durations.
    pub total: Option<u64>,
}

/// Summary of a linearized program.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgramSummary {
    /// Number of steps, including those missing a temperature or duration.
    pub step_count: usize,
    /// Setpoint statistics.
    pub temperature: TemperatureRange,
    /// Duration statistics.
    pub duration: DurationRange,
    /// The first few steps, in order.
    pub preview: Vec<ProgramStep>,
}

/// Summarizes steps with the default preview length.
///
/// # Examples
///
/// ```
/// use ember_lib::program::summarize;
///
/// let summary = summarize(&[]);
/// assert_eq!(summary.step_count, 0);
/// assert_eq!(summary.temperature.min, None);
/// assert_eq!(summary.duration.total, None);
/// ```
#[must_use]
pub fn summarize(steps: &[ProgramStep]) -> ProgramSummary {
    summarize_with_preview(steps, DEFAULT_PREVIEW_LEN)
}

/// Summarizes steps, keeping the first `preview_len` as a preview.
///
/// Steps without a temperature or duration are left out of the matching
/// statistics; a zero value still counts.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_with_preview(steps: &[ProgramStep], preview_len: usize) -> ProgramSummary {
    let temps: Vec<Temperature> = steps.iter().filter_map(|s| s.temperature).collect();
    let durations: Vec<u32> = steps.iter().filter_map(|s| s.duration).collect();

    let average = if temps.is_empty() {
        None
    } else {
        let sum: i64 = temps.iter().map(|t| i64::from(t.tenths())).sum();
        Some(sum as f64 / temps.len() as f64 / SCALE)
    };

    ProgramSummary {
        step_count: steps.len(),
        temperature: TemperatureRange {
            min: temps.iter().copied().min(),
            max: temps.iter().copied().max(),
            average,
        },
        duration: DurationRange {
            min: durations.iter().copied().min(),
            max: durations.iter().copied().max(),
            total: (!durations.is_empty())
                .then(|| durations.iter().map(|&d| u64::from(d)).sum()),
        },
        preview: steps.iter().take(preview_len).cloned().collect(),
    }
}
