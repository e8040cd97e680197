// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing.
//!
//! - [`decode`] reads the relaxed JSON the structured endpoint emits.
//! - [`html`] holds the page scrapers used when no JSON is available.
//!
//! Both produce the same loosely-typed tree ([`serde_json::Value`]), so the
//! [`Snapshot`](crate::state::Snapshot) accessors do not care which source
//! filled it.

pub mod html;
mod lenient_json;

pub use lenient_json::decode;
