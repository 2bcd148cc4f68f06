// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuning for program analysis.

use serde::Deserialize;

use crate::program::{DEFAULT_CYCLE_THRESHOLD, DEFAULT_PREVIEW_LEN};

/// Bounds and thresholds used when analyzing a program.
///
/// Missing fields take their defaults when deserialized, so the struct can
/// be embedded in a larger configuration file.
///
/// # Examples
///
/// ```
/// use ember_lib::program::SequencerConfig;
///
/// let config = SequencerConfig::new()
///     .with_max_steps(48)
///     .with_cycle_threshold(5.0);
///
/// assert_eq!(config.max_steps(), 48);
/// assert_eq!(config.preview_len(), 6);
///
/// let parsed: SequencerConfig = serde_json::from_str(r#"{"max_steps": 10}"#).unwrap();
/// assert_eq!(parsed.max_steps(), 10);
/// assert_eq!(parsed.cycle_threshold(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    max_steps: usize,
    preview_len: usize,
    cycle_threshold: f64,
}

impl SequencerConfig {
    /// Default bound on emitted steps.
    pub const DEFAULT_MAX_STEPS: usize = 20;
    /// Default number of steps in a summary preview.
    pub const DEFAULT_PREVIEW_LEN: usize = DEFAULT_PREVIEW_LEN;
    /// Default temperature jump, in degrees, that starts a new cycle.
    pub const DEFAULT_CYCLE_THRESHOLD: f64 = DEFAULT_CYCLE_THRESHOLD;

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_steps: Self::DEFAULT_MAX_STEPS,
            preview_len: Self::DEFAULT_PREVIEW_LEN,
            cycle_threshold: Self::DEFAULT_CYCLE_THRESHOLD,
        }
    }

    /// Sets the bound on emitted steps.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the summary preview length.
    #[must_use]
    pub fn with_preview_len(mut self, preview_len: usize) -> Self {
        self.preview_len = preview_len;
        self
    }

    /// Sets the cycle split threshold in degrees.
    #[must_use]
    pub fn with_cycle_threshold(mut self, threshold: f64) -> Self {
        self.cycle_threshold = threshold;
        self
    }

    /// Returns the bound on emitted steps.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the summary preview length.
    #[must_use]
    pub fn preview_len(&self) -> usize {
        self.preview_len
    }

    /// Returns the cycle split threshold in degrees.
    #[must_use]
    pub fn cycle_threshold(&self) -> f64 {
        self.cycle_threshold
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self::new()
    }
}
