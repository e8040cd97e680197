// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device status classification.
//!
//! Printers report their state either as a numeric code (structured
//! endpoint) or as the free-text line shown on the LCD, in whatever display
//! language the device is configured for. This module turns both into a
//! [`CanonicalState`](crate::types::CanonicalState).
//!
//! The free-text path is a closed lookup over hand-maintained phrase tables
//! ([`locale::LOCALES`]), not a general text classifier.
//!
//! # Examples
//!
//! ```
//! use syncthru::status::{classify, classify_numeric};
//! use syncthru::types::CanonicalState;
//!
//! assert_eq!(classify_numeric(2), CanonicalState::Normal);
//! assert_eq!(classify("Ruhemodus", Some("DE"))?, CanonicalState::Sleeping);
//! # Ok::<(), syncthru::Error>(())
//! ```

mod classifier;
pub mod locale;

pub use classifier::{
    OFFLINE_SENTINEL, classify, classify_numeric, classify_value, display_name, normalize,
    supported_languages,
};
