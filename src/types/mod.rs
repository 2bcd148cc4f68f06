// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for heating zone control.
//!
//! # Types
//!
//! - [`PointIndex`] - Address of a zone attribute on the wire
//! - [`AttributeKind`] - Wire representation of an attribute
//! - [`Mode`] - Zone operating mode (AUTO, ALL_DAY, ON, OFF)
//! - [`Temperature`] - Fixed-point tenths of a degree Celsius

mod mode;
mod point;
mod temperature;

pub use mode::Mode;
pub use point::{AttributeKind, PointIndex};
pub use temperature::{SCALE, Temperature};
