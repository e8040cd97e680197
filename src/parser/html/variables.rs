// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inline `<script>` variables carrying supply and tray data.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value, json};

use super::{Extractor, merge_section};

/// Translates a raw variable value into snapshot fields.
type Transform = fn(&str) -> Map<String, Value>;

/// Whitelisted script variables and their transforms.
const VARIABLES: &[(&str, Transform)] = &[
    ("BlackTonerPer", |v| toner("toner_black", v)),
    ("CyanTonerPer", |v| toner("toner_cyan", v)),
    ("MagentaTonerPer", |v| toner("toner_magenta", v)),
    ("YellowTonerPer", |v| toner("toner_yellow", v)),
    ("DrumPer", |v| toner("drum_black", v)),
    ("tray1Status", |_| installed("tray1", true)),
    ("tray2Installed", |v| installed("tray2", v == "Installed")),
    ("tray3Installed", |v| installed("tray3", v == "Installed")),
    ("tray4Installed", |v| installed("tray4", v == "Installed")),
];

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("script selector is valid"));

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    let names = VARIABLES
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r#"var\s+(?P<name>{names})\s*=\s*["']?(?P<value>[a-zA-Z0-9]+)["']?\s*;"#
    ))
    .expect("variable assignment regex is valid")
});

fn toner(key: &str, raw: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Ok(remaining) = raw.parse::<i64>() {
        fields.insert(key.to_string(), json!({"opt": 1, "remaining": remaining}));
    }
    fields
}

fn installed(key: &str, present: bool) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(key.to_string(), json!({"opt": i64::from(present)}));
    fields
}

/// Reads whitelisted `var NAME = "value";` assignments from inline scripts.
///
/// Only `<script language="javascript">` and
/// `<script type="text/javascript">` blocks are scanned. Each variable is
/// translated into the field shape the JSON endpoint uses, e.g.
/// `var BlackTonerPer = "66";` becomes
/// `toner_black: {opt: 1, remaining: 66}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptVariableExtractor;

impl Extractor for ScriptVariableExtractor {
    fn name(&self) -> &'static str {
        "script-variables"
    }

    fn extract(&self, markup: &str, tree: &mut Map<String, Value>) {
        let document = Html::parse_document(markup);

        for script in document.select(&SCRIPT).filter(|s| is_javascript(s.value())) {
            let source = script.text().collect::<String>();
            for captures in ASSIGNMENT.captures_iter(&source) {
                let name = &captures["name"];
                let value = &captures["value"];
                let Some((_, transform)) = VARIABLES.iter().find(|(n, _)| *n == name) else {
                    continue;
                };
                tracing::trace!(variable = name, value = value, "Found script variable");

                for (key, field) in transform(value) {
                    match field {
                        Value::Object(fields) => merge_section(tree, &key, fields),
                        other => {
                            tree.insert(key, other);
                        }
                    }
                }
            }
        }
    }
}

fn is_javascript(element: &scraper::node::Element) -> bool {
    element
        .attr("language")
        .is_some_and(|l| l.eq_ignore_ascii_case("javascript"))
        || element
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("text/javascript"))
}
