// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scrapers for the SyncThru administration pages.
//!
//! Devices without a working JSON endpoint still serve a handful of HTML
//! pages. Each [`Extractor`] understands one page shape and writes what it
//! finds into the shared snapshot tree, using the same keys and value shapes
//! the JSON endpoint would have produced.
//!
//! Extraction is best effort: malformed markup is parsed as far as possible
//! and anything unrecognized is ignored. When two extractors write the same
//! field, the later one wins.

mod identity;
mod protocols;
mod variables;

pub use identity::IdentityExtractor;
pub use protocols::ProtocolSettingsExtractor;
pub use variables::ScriptVariableExtractor;

use serde_json::{Map, Value};

/// A scanner for one page shape.
pub trait Extractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Scans `markup` and writes recognized fields into `tree`.
    fn extract(&self, markup: &str, tree: &mut Map<String, Value>);
}

/// An HTML page and the extractors that run over it, in order.
#[derive(Clone, Copy)]
pub struct Page {
    /// Path relative to the device base URL.
    pub path: &'static str,
    /// Extractors applied to the page body.
    pub extractors: &'static [&'static dyn Extractor],
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("path", &self.path)
            .field(
                "extractors",
                &self.extractors.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Pages scraped in HTML mode, fetched in this order.
pub static PAGES: &[Page] = &[
    Page {
        path: "/home.htm",
        extractors: &[&IdentityExtractor, &ScriptVariableExtractor],
    },
    Page {
        path: "/Information/supplies_status.htm",
        extractors: &[&ScriptVariableExtractor],
    },
    Page {
        path: "/Settings/Protocols/general_protocols.htm",
        extractors: &[&ProtocolSettingsExtractor],
    },
];

/// Runs every extractor registered for `page` over `markup`.
pub fn extract_page(page: &Page, markup: &str, tree: &mut Map<String, Value>) {
    for extractor in page.extractors {
        tracing::trace!(page = page.path, extractor = extractor.name(), "Running extractor");
        extractor.extract(markup, tree);
    }
}

/// Merges `fields` into the object stored at `tree[key]`.
///
/// A missing or non-object entry is replaced; existing fields not present in
/// `fields` are kept.
pub(crate) fn merge_section(tree: &mut Map<String, Value>, key: &str, fields: Map<String, Value>) {
    match tree.get_mut(key) {
        Some(Value::Object(existing)) => existing.extend(fields),
        _ => {
            tree.insert(key.to_string(), Value::Object(fields));
        }
    }
}

/// Turns a page label such as `"MAC Address :"` into a field name
/// (`"mac_address"`).
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .replace(':', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Maps a normalized identity label onto the key the JSON endpoint uses.
pub(crate) fn identity_key(label: String) -> String {
    match label.as_str() {
        "name" | "host_name" | "hostname" => "host_name".to_string(),
        "mac_address" => "mac_addr".to_string(),
        "ip_address" | "ipv4_address" => "ip_addr".to_string(),
        "serial_number" => "serial_num".to_string(),
        _ => label,
    }
}
