// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device snapshots.
//!
//! A [`Snapshot`] is the immutable result of one update: the merged tree
//! from whichever sources answered, plus typed accessors over it.

mod snapshot;

pub use snapshot::{COLOR_NAMES, OutputTray, Snapshot};
