// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire tuple transmitted to the controller.

use std::fmt;

use serde::Serialize;

/// The literal integer sequence that expresses one write command.
///
/// Every element is one integer of the controller protocol. Framing and
/// timestamp elements are single bytes, while a temperature element carries
/// the full tenths value.
///
/// # Examples
///
/// ```
/// use ember_lib::command::ZoneCommand;
///
/// let wire = ZoneCommand::target_temperature(21.5).encode().unwrap();
/// assert_eq!(wire.as_slice(), &[0, 6, 4, 0, 215]);
/// assert_eq!(wire.to_string(), "[0, 6, 4, 0, 215]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WireTuple(Vec<u16>);

impl WireTuple {
    pub(crate) fn new(values: Vec<u16>) -> Self {
        Self(values)
    }

    /// Returns the tuple elements.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    /// Consumes the tuple and returns its elements.
    #[must_use]
    pub fn into_vec(self) -> Vec<u16> {
        self.0
    }

    /// Returns the tuple as the integer list the gateway transmits.
    #[must_use]
    pub fn to_ints(&self) -> Vec<i64> {
        self.0.iter().map(|&v| i64::from(v)).collect()
    }

    /// Returns the number of integers in the tuple.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the tuple is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u16]> for WireTuple {
    fn as_ref(&self) -> &[u16] {
        &self.0
    }
}

impl PartialEq<[u16]> for WireTuple {
    fn eq(&self, other: &[u16]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<[u16; N]> for WireTuple {
    fn eq(&self, other: &[u16; N]) -> bool {
        self.0 == other
    }
}

impl fmt::Display for WireTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_integers() {
        assert_eq!(WireTuple::new(vec![0, 7, 1, 1]).to_string(), "[0, 7, 1, 1]");
        assert_eq!(WireTuple::new(Vec::new()).to_string(), "[]");
    }

    #[test]
    fn compares_with_arrays() {
        let wire = WireTuple::new(vec![0, 4, 1, 0]);
        assert_eq!(wire, [0, 4, 1, 0]);
        assert_eq!(wire.to_ints(), vec![0, 4, 1, 0]);
        assert_eq!(wire.len(), 4);
    }

    #[test]
    fn serializes_as_list() {
        let json = serde_json::to_string(&WireTuple::new(vec![0, 9, 5, 1, 2, 3, 4])).unwrap();
        assert_eq!(json, "[0,9,5,1,2,3,4]");
    }

    #[test]
    fn holds_values_wider_than_a_byte() {
        let wire = WireTuple::new(vec![0, 6, 4, 0, 300]);
        assert_eq!(wire.to_string(), "[0, 6, 4, 0, 300]");
        assert_eq!(wire.into_vec(), vec![0, 6, 4, 0, 300]);
    }
}
