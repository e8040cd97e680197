// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `syncthru` - Status resolver for SyncThru network printers.
//!
//! Determines whether a printer is reachable, what state it is in, and
//! exposes its supplies, trays and identity. Devices are queried through
//! their built-in web service:
//!
//! - **Structured endpoint**: a (frequently malformed) JSON status document
//! - **HTML pages**: the administration UI, scraped when no JSON is served
//!
//! The free-text status shown on the device display is mapped to a
//! [`CanonicalState`] across several display languages.
//!
//! # Quick Start
//!
//! ```no_run
//! use syncthru::SyncThru;
//!
//! #[tokio::main]
//! async fn main() -> syncthru::Result<()> {
//!     let printer = SyncThru::http("192.168.0.25").build()?;
//!     let snapshot = printer.update().await?;
//!
//!     println!("{:?} is {}", snapshot.model(), snapshot.device_status());
//!     for (tray, info) in snapshot.input_tray_status(true) {
//!         println!("{tray}: {info}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pinning the source
//!
//! ```no_run
//! use syncthru::{ConnectionMode, SyncThru};
//!
//! # async fn example() -> syncthru::Result<()> {
//! // Fails with `Error::UnsupportedBySource` if the device serves no JSON
//! let printer = SyncThru::http("192.168.0.25")
//!     .with_connection_mode(ConnectionMode::Api)
//!     .with_counters(true)
//!     .build()?;
//! printer.update().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `http` (default): reqwest-backed [`protocol::HttpClient`]. Without it,
//!   supply your own [`protocol::Transport`].

mod device;
pub mod error;
pub mod parser;
pub mod protocol;
pub mod state;
pub mod status;
pub mod types;

pub use device::{AcquisitionOptions, SyncThru, SyncThruBuilder, acquisition};
pub use error::{Error, ParseError, Result, TransportError};
pub use state::{OutputTray, Snapshot};
pub use types::{CanonicalState, ConnectionMode};
