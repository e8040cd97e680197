// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Result of one update cycle.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::status::{classify, classify_value};
use crate::types::CanonicalState;

/// Supply colors, in reporting order.
pub const COLOR_NAMES: [&str; 4] = ["black", "cyan", "magenta", "yellow"];

/// Input trays, as `(result key, snapshot key)`.
const INPUT_TRAYS: [(&str, &str); 7] = [
    ("tray_1", "tray1"),
    ("tray_2", "tray2"),
    ("tray_3", "tray3"),
    ("tray_4", "tray4"),
    ("tray_5", "tray5"),
    ("mp", "mp"),
    ("manual", "manual"),
];

/// Field holding the numeric or textual device status.
pub(crate) const STATUS_FIELD: &str = "hrDeviceStatus";

/// One complete device snapshot.
///
/// Wraps the loosely-typed tree assembled from the JSON endpoint or the
/// HTML pages and exposes typed accessors over it. Accessors never fail:
/// a missing field yields `None`, an empty map, or a documented default
/// state. They are pure reads; a snapshot never changes after it has been
/// built.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use syncthru::state::Snapshot;
/// use syncthru::types::CanonicalState;
///
/// let tree = json!({
///     "status": {"hrDeviceStatus": 2},
///     "identity": {"model_name": "M2070 Series"},
///     "toner_black": {"opt": 1, "remaining": 58},
///     "toner_cyan": {"opt": 0, "remaining": 0},
/// });
/// let snapshot = Snapshot::from_tree(tree.as_object().unwrap().clone());
///
/// assert_eq!(snapshot.device_status(), CanonicalState::Normal);
/// assert_eq!(snapshot.model(), Some("M2070 Series"));
/// assert_eq!(snapshot.toner_status(true).len(), 1);
/// assert_eq!(snapshot.toner_status(false).len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counters: Option<Map<String, Value>>,
    #[serde(skip)]
    language_hint: Option<String>,
}

/// One output tray from the `outputTray` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTray {
    /// Tray name or number as reported.
    pub name: String,
    /// Capacity in sheets, if numeric.
    pub capacity: Option<i64>,
    /// Status text (empty when fine).
    pub status: String,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::offline()
    }
}

impl Snapshot {
    /// A snapshot for a device that did not answer at all.
    #[must_use]
    pub fn offline() -> Self {
        Self::with_status(CanonicalState::Offline)
    }

    pub(crate) fn with_status(state: CanonicalState) -> Self {
        let mut data = Map::new();
        data.insert("status".into(), json!({ STATUS_FIELD: state.code() }));
        Self {
            data,
            counters: None,
            language_hint: None,
        }
    }

    /// Wraps a tree decoded from the JSON endpoint.
    ///
    /// The device answered, so a missing `status` object or status field is
    /// filled in as [`CanonicalState::Unknown`].
    #[must_use]
    pub fn from_tree(mut data: Map<String, Value>) -> Self {
        ensure_status(&mut data);
        Self {
            data,
            counters: None,
            language_hint: None,
        }
    }

    /// Attaches the separately fetched counters document.
    #[must_use]
    pub fn with_counters(mut self, counters: Map<String, Value>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Sets the language used when the device reports none itself.
    #[must_use]
    pub fn with_language_hint(mut self, language: impl Into<String>) -> Self {
        self.language_hint = Some(language.into());
        self
    }

    /// Records that some source answered: an offline status becomes unknown.
    pub(crate) fn mark_reachable(&mut self) {
        ensure_status(&mut self.data);
        let offline = json!(CanonicalState::Offline.code());
        if let Some(code) = self
            .data
            .get_mut("status")
            .and_then(|status| status.get_mut(STATUS_FIELD))
            .filter(|code| **code == offline)
        {
            *code = json!(CanonicalState::Unknown.code());
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Returns the whole tree.
    #[must_use]
    pub fn raw(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the counters document, if it was fetched.
    #[must_use]
    pub fn counters(&self) -> Option<&Map<String, Value>> {
        self.counters.as_ref()
    }

    fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.data.get(key).and_then(Value::as_object)
    }

    fn identity(&self, key: &str) -> Option<&str> {
        self.section("identity")?.get(key)?.as_str()
    }

    // ========== Identity ==========

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.identity("model_name")
    }

    /// Returns the configured location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.identity("location")
    }

    /// Returns the serial number.
    #[must_use]
    pub fn serial_number(&self) -> Option<&str> {
        self.identity("serial_num")
    }

    /// Returns the host name.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.identity("host_name")
    }

    /// Returns the MAC address.
    #[must_use]
    pub fn mac_address(&self) -> Option<&str> {
        self.identity("mac_addr")
    }

    /// Returns the IP address.
    #[must_use]
    pub fn ip_address(&self) -> Option<&str> {
        self.identity("ip_addr")
    }

    /// Display language of the device.
    ///
    /// Taken from `status.language` or `identity.language`, falling back to
    /// the configured hint.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        ["status", "identity"]
            .into_iter()
            .find_map(|section| self.section(section)?.get("language")?.as_str())
            .or(self.language_hint.as_deref())
    }

    // ========== Status ==========

    /// Returns the canonical device state.
    ///
    /// A numeric status goes through the numeric mapping, text through the
    /// locale tables. A snapshot without a status field is
    /// [`CanonicalState::Offline`].
    #[must_use]
    pub fn device_status(&self) -> CanonicalState {
        self.section("status")
            .and_then(|status| status.get(STATUS_FIELD))
            .map_or(CanonicalState::Offline, |value| {
                classify_value(value, self.language())
            })
    }

    /// Returns `true` unless the device is offline.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.device_status() != CanonicalState::Offline
    }

    /// Returns `true` if the exact state could not be retrieved.
    ///
    /// This differs from the device itself reporting an unknown state.
    #[must_use]
    pub fn is_unknown_state(&self) -> bool {
        matches!(
            self.device_status(),
            CanonicalState::Offline | CanonicalState::Invalid
        )
    }

    /// Returns the LCD display lines (`status1`..`status4`) joined by spaces.
    #[must_use]
    pub fn device_status_details(&self) -> String {
        let Some(status) = self.section("status") else {
            return String::new();
        };
        (1..=4)
            .filter_map(|i| status.get(&format!("status{i}"))?.as_str())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Classifies the first LCD display line.
    ///
    /// This is usually finer grained than [`device_status`](Self::device_status)
    /// (e.g. sleeping vs. ready). Falls back to `device_status` when there
    /// is no display line.
    #[must_use]
    pub fn display_status(&self) -> CanonicalState {
        let line = self
            .section("status")
            .and_then(|status| status.get("status1"))
            .and_then(Value::as_str)
            .filter(|line| !line.trim().is_empty());

        match line {
            Some(line) => classify(line, self.language())
                .or_else(|_| classify(line, None))
                .unwrap_or(CanonicalState::Unknown),
            None => self.device_status(),
        }
    }

    // ========== Supplies and trays ==========

    /// Returns the capability flags reported by the device.
    #[must_use]
    pub fn capability(&self) -> Map<String, Value> {
        self.section("capability").cloned().unwrap_or_default()
    }

    /// Returns toner cartridges by color.
    ///
    /// With `filter_supported`, cartridges whose `opt` flag is 0 or missing
    /// are left out.
    #[must_use]
    pub fn toner_status(&self, filter_supported: bool) -> BTreeMap<String, Value> {
        self.consumables("toner", filter_supported)
    }

    /// Returns imaging drums by color.
    ///
    /// With `filter_supported`, drums whose `opt` flag is 0 or missing are
    /// left out.
    #[must_use]
    pub fn drum_status(&self, filter_supported: bool) -> BTreeMap<String, Value> {
        self.consumables("drum", filter_supported)
    }

    fn consumables(&self, kind: &str, filter_supported: bool) -> BTreeMap<String, Value> {
        COLOR_NAMES
            .iter()
            .filter_map(|color| {
                let entry = self.object_or_empty(&format!("{kind}_{color}"));
                if filter_supported && option_flag(&entry) == 0 {
                    return None;
                }
                Some(((*color).to_string(), Value::Object(entry)))
            })
            .collect()
    }

    /// Returns input trays keyed `tray_1`..`tray_5`, `mp` and `manual`.
    ///
    /// With `filter_supported`, only trays whose `opt` flag is 1 are kept.
    #[must_use]
    pub fn input_tray_status(&self, filter_supported: bool) -> BTreeMap<String, Value> {
        INPUT_TRAYS
            .iter()
            .filter_map(|(name, key)| {
                let entry = match self.section(key) {
                    Some(entry) => entry.clone(),
                    None => self.object_or_empty(name),
                };
                if filter_supported && option_flag(&entry) != 1 {
                    return None;
                }
                Some(((*name).to_string(), Value::Object(entry)))
            })
            .collect()
    }

    /// Returns output trays by position.
    ///
    /// Entries that are not `[name, capacity, status]` lists are skipped.
    #[must_use]
    pub fn output_tray_status(&self) -> BTreeMap<usize, OutputTray> {
        let Some(trays) = self.data.get("outputTray").and_then(Value::as_array) else {
            return BTreeMap::new();
        };
        trays
            .iter()
            .enumerate()
            .filter_map(|(i, tray)| {
                let [name, capacity, status, ..] = tray.as_array()?.as_slice() else {
                    return None;
                };
                Some((
                    i,
                    OutputTray {
                        name: scalar_to_string(name),
                        capacity: capacity.as_i64(),
                        status: scalar_to_string(status),
                    },
                ))
            })
            .collect()
    }

    fn object_or_empty(&self, key: &str) -> Map<String, Value> {
        self.section(key).cloned().unwrap_or_default()
    }
}

/// Makes sure `status` is an object carrying a status field.
fn ensure_status(data: &mut Map<String, Value>) {
    let status = data
        .entry("status")
        .or_insert_with(|| Value::Object(Map::new()));
    if !status.is_object() {
        *status = Value::Object(Map::new());
    }
    if let Value::Object(status) = status {
        status
            .entry(STATUS_FIELD)
            .or_insert_with(|| json!(CanonicalState::Unknown.code()));
    }
}

fn option_flag(entry: &Map<String, Value>) -> i64 {
    entry.get("opt").and_then(Value::as_i64).unwrap_or(0)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
