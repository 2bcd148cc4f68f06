// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone operating mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Operating mode of a heating zone.
///
/// # Examples
///
/// ```
/// use ember_lib::types::Mode;
///
/// assert_eq!(Mode::from_raw(1), Some(Mode::AllDay));
/// assert_eq!(Mode::from_raw(4), None);
/// assert_eq!(Mode::Off.value(), 3);
/// assert_eq!("all_day".parse::<Mode>().unwrap(), Mode::AllDay);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Follow the programmed schedule.
    Auto,
    /// Follow the schedule's first on period for the whole day.
    AllDay,
    /// Heat continuously.
    On,
    /// Never heat from the schedule.
    Off,
}

impl Mode {
    /// Returns the raw value the controller uses for this mode.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::AllDay => 1,
            Self::On => 2,
            Self::Off => 3,
        }
    }

    /// Decodes a raw MODE value, returning `None` outside the domain.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Auto),
            1 => Some(Self::AllDay),
            2 => Some(Self::On),
            3 => Some(Self::Off),
            _ => None,
        }
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::AllDay => "ALL_DAY",
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AUTO" | "0" => Ok(Self::Auto),
            "ALL_DAY" | "ALLDAY" | "1" => Ok(Self::AllDay),
            "ON" | "2" => Ok(Self::On),
            "OFF" | "3" => Ok(Self::Off),
            _ => Err(ValueError::UnknownMode(s.to_string())),
        }
    }
}
