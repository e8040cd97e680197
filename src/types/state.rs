// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical device state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized state of a printer, independent of the language or encoding
/// the device used to report it.
///
/// The structured endpoint reports a numeric code (see
/// [`CanonicalState::from_code`]); the HTML pages only carry the LCD text,
/// which is classified through the locale tables in [`crate::status`].
///
/// # Examples
///
/// ```
/// use syncthru::types::CanonicalState;
///
/// assert_eq!(CanonicalState::from_code(2), CanonicalState::Normal);
/// assert_eq!(CanonicalState::from_code(9), CanonicalState::Invalid);
/// assert_eq!(CanonicalState::Normal.code(), Some(2));
/// assert_eq!(CanonicalState::Sleeping.as_str(), "sleeping");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalState {
    /// No source answered at all.
    Offline,
    /// The device answered but its state could not be classified.
    Unknown,
    /// Ready / idle.
    Normal,
    /// Operational with a warning (e.g. toner low).
    Warning,
    /// Power saving.
    Sleeping,
    /// Fuser warming up.
    WarmingUp,
    /// Printing a job.
    Printing,
    /// Scanning or copying.
    Scanning,
    /// Running a calibration cycle.
    Calibrating,
    /// Not operational.
    Error,
    /// Running a self test.
    Testing,
    /// A numeric status outside the documented range.
    Invalid,
}

impl CanonicalState {
    /// All states, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Offline,
        Self::Unknown,
        Self::Normal,
        Self::Warning,
        Self::Sleeping,
        Self::WarmingUp,
        Self::Printing,
        Self::Scanning,
        Self::Calibrating,
        Self::Error,
        Self::Testing,
        Self::Invalid,
    ];

    /// Maps the numeric `hrDeviceStatus` code onto a state.
    ///
    /// Codes 0 to 5 are documented; everything else is [`Self::Invalid`].
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Offline,
            1 => Self::Unknown,
            2 => Self::Normal,
            3 => Self::Warning,
            4 => Self::Testing,
            5 => Self::Error,
            _ => Self::Invalid,
        }
    }

    /// Returns the numeric code for states the structured endpoint can report.
    #[must_use]
    pub const fn code(self) -> Option<i64> {
        match self {
            Self::Offline => Some(0),
            Self::Unknown => Some(1),
            Self::Normal => Some(2),
            Self::Warning => Some(3),
            Self::Testing => Some(4),
            Self::Error => Some(5),
            _ => None,
        }
    }

    /// Returns a stable lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Unknown => "unknown",
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Sleeping => "sleeping",
            Self::WarmingUp => "warming_up",
            Self::Printing => "printing",
            Self::Scanning => "scanning",
            Self::Calibrating => "calibrating",
            Self::Error => "error",
            Self::Testing => "testing",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code_documented_range() {
        assert_eq!(CanonicalState::from_code(0), CanonicalState::Offline);
        assert_eq!(CanonicalState::from_code(1), CanonicalState::Unknown);
        assert_eq!(CanonicalState::from_code(2), CanonicalState::Normal);
        assert_eq!(CanonicalState::from_code(3), CanonicalState::Warning);
        assert_eq!(CanonicalState::from_code(4), CanonicalState::Testing);
        assert_eq!(CanonicalState::from_code(5), CanonicalState::Error);
    }

    #[test]
    fn from_code_out_of_range() {
        for code in [-1, 6, 42, i64::MIN, i64::MAX] {
            assert_eq!(CanonicalState::from_code(code), CanonicalState::Invalid);
        }
    }

    #[test]
    fn code_round_trips_through_from_code() {
        for state in CanonicalState::ALL {
            if let Some(code) = state.code() {
                assert_eq!(CanonicalState::from_code(code), state);
            }
        }
    }

    #[test]
    fn display_uses_identifier() {
        assert_eq!(CanonicalState::WarmingUp.to_string(), "warming_up");
    }
}
