// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection mode selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which data sources an update may use.
///
/// # Examples
///
/// ```
/// use syncthru::types::ConnectionMode;
///
/// assert_eq!(ConnectionMode::default(), ConnectionMode::Auto);
/// assert!(ConnectionMode::Auto.uses_api());
/// assert!(ConnectionMode::Auto.uses_html());
/// assert!(!ConnectionMode::Html.uses_api());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Try the JSON endpoint first, fall back to scraping HTML pages.
    #[default]
    Auto,
    /// Only the JSON endpoint; fails if it does not answer with JSON.
    Api,
    /// Only the HTML pages.
    Html,
}

impl ConnectionMode {
    /// Returns `true` if the structured endpoint is queried in this mode.
    #[must_use]
    pub const fn uses_api(self) -> bool {
        matches!(self, Self::Auto | Self::Api)
    }

    /// Returns `true` if the HTML pages are scraped in this mode.
    #[must_use]
    pub const fn uses_html(self) -> bool {
        matches!(self, Self::Auto | Self::Html)
    }

    /// Returns `true` if the caller pinned a single source.
    #[must_use]
    pub const fn is_pinned(self) -> bool {
        !matches!(self, Self::Auto)
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Api => f.write_str("API"),
            Self::Html => f.write_str("HTML"),
        }
    }
}
