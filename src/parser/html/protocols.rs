// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! General protocol settings table.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

use super::{Extractor, identity_key, merge_section, normalize_label};

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("row selector is valid"));
static INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input").expect("input selector is valid"));
static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector is valid"));

/// Reads label/value rows from `general_protocols.htm` into `identity`.
///
/// A row contributes when it has exactly two cells: a label and either a
/// plain text value or an `<input value="...">`. Rows wrapping nested tables
/// are layout, not data, and are skipped.
///
/// ```html
/// <tr><td>MAC Address :</td><td>84:25:00:00:06:48</td></tr>
/// <tr><td>Host Name</td><td><input type="text" value="SEC84250000"></td></tr>
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolSettingsExtractor;

impl Extractor for ProtocolSettingsExtractor {
    fn name(&self) -> &'static str {
        "protocol-settings"
    }

    fn extract(&self, markup: &str, tree: &mut Map<String, Value>) {
        let document = Html::parse_document(markup);
        let mut fields = Map::new();

        for row in document.select(&ROW) {
            let cells: Vec<ElementRef<'_>> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "td" | "th"))
                .collect();
            let [label, value] = cells.as_slice() else {
                continue;
            };
            if label.select(&TABLE).next().is_some() || value.select(&TABLE).next().is_some() {
                continue;
            }

            let key = normalize_label(&label.text().collect::<String>());
            let value = cell_value(value);
            if key.is_empty() || value.is_empty() {
                continue;
            }

            let key = identity_key(key);
            tracing::trace!(key = %key, "Found protocol setting");
            fields.insert(key, Value::String(value));
        }

        if !fields.is_empty() {
            merge_section(tree, "identity", fields);
        }
    }
}

/// Value of an `<input>` inside the cell, or its trimmed text.
fn cell_value(cell: &ElementRef<'_>) -> String {
    cell.select(&INPUT)
        .find_map(|input| input.value().attr("value"))
        .map_or_else(
            || cell.text().collect::<String>().trim().to_string(),
            |v| v.trim().to_string(),
        )
}
