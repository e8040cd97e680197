// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! # Types
//!
//! - [`CanonicalState`] - Normalized printer state
//! - [`ConnectionMode`] - Which data sources an update may use

mod mode;
mod state;

pub use mode::ConnectionMode;
pub use state::CanonicalState;
