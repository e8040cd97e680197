// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-text and numeric status classification.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

use super::locale::{LOCALES, LocaleTable};
use crate::error::{Error, Result};
use crate::types::CanonicalState;

/// Placeholder the firmware shows when the engine is not reachable.
///
/// Always classified as [`CanonicalState::Offline`], whatever the language.
pub const OFFLINE_SENTINEL: &str = "Offline";

/// Phrase lookup tables, built once from [`LOCALES`].
struct Index {
    per_locale: HashMap<&'static str, HashMap<String, CanonicalState>>,
    merged: HashMap<String, CanonicalState>,
}

static INDEX: LazyLock<Index> = LazyLock::new(|| Index {
    per_locale: LOCALES
        .iter()
        .map(|table| (table.language, build_merged(std::slice::from_ref(table))))
        .collect(),
    merged: build_merged(LOCALES),
});

static SENTINEL: LazyLock<String> = LazyLock::new(|| normalize(OFFLINE_SENTINEL));

/// Merges phrase tables in order; the first table to register a phrase keeps it.
fn build_merged(tables: &[LocaleTable]) -> HashMap<String, CanonicalState> {
    let mut merged = HashMap::new();
    for table in tables {
        for (phrase, state) in table.phrases {
            merged.entry(normalize(phrase)).or_insert(*state);
        }
    }
    merged
}

fn locale(language: &str) -> Option<&'static LocaleTable> {
    LOCALES
        .iter()
        .find(|table| table.language.eq_ignore_ascii_case(language.trim()))
}

/// Normalizes an LCD status line for lookup.
///
/// Collapses whitespace runs, drops trailing ellipses and lowercases.
///
/// # Examples
///
/// ```
/// use syncthru::status::normalize;
///
/// assert_eq!(normalize("  Sleeping...   "), "sleeping");
/// assert_eq!(normalize(" Ready  to Copy "), "ready to copy");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['.', '\u{2026}', ' '])
        .to_lowercase()
}

/// Classifies a free-text status string.
///
/// With a `language` hint only that locale's table is consulted; without
/// one, the merged table of all locales is used. Unrecognized text yields
/// [`CanonicalState::Unknown`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedLocale`] if `language` names no known locale.
///
/// # Examples
///
/// ```
/// use syncthru::status::classify;
/// use syncthru::types::CanonicalState;
///
/// assert_eq!(classify("  Sleeping...   ", Some("EN"))?, CanonicalState::Sleeping);
/// assert_eq!(classify("Papierstau", None)?, CanonicalState::Error);
/// assert_eq!(classify("something else", None)?, CanonicalState::Unknown);
/// assert!(classify("Ready", Some("XX")).is_err());
/// # Ok::<(), syncthru::Error>(())
/// ```
pub fn classify(raw: &str, language: Option<&str>) -> Result<CanonicalState> {
    let table = match language {
        Some(tag) => {
            let table = locale(tag).ok_or_else(|| Error::UnsupportedLocale(tag.to_string()))?;
            INDEX.per_locale.get(table.language)
        }
        None => Some(&INDEX.merged),
    };

    let key = normalize(raw);
    if key == *SENTINEL {
        return Ok(CanonicalState::Offline);
    }

    Ok(table
        .and_then(|phrases| phrases.get(&key))
        .copied()
        .unwrap_or(CanonicalState::Unknown))
}

/// Classifies the numeric `hrDeviceStatus` code.
///
/// Never fails; codes outside 0-5 are [`CanonicalState::Invalid`].
#[must_use]
pub const fn classify_numeric(code: i64) -> CanonicalState {
    CanonicalState::from_code(code)
}

/// Classifies a status value taken from a snapshot tree.
///
/// Integers and integer-looking strings go through [`classify_numeric`];
/// other strings through [`classify`], falling back to the merged table if
/// `language` is not a known locale. Everything else is
/// [`CanonicalState::Invalid`].
#[must_use]
pub fn classify_value(value: &Value, language: Option<&str>) -> CanonicalState {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| integral(n.as_f64()?))
            .map_or(CanonicalState::Invalid, CanonicalState::from_code),
        Value::String(s) => {
            if let Ok(code) = s.trim().parse::<i64>() {
                return CanonicalState::from_code(code);
            }
            classify(s, language)
                .or_else(|_| classify(s, None))
                .unwrap_or(CanonicalState::Unknown)
        }
        _ => CanonicalState::Invalid,
    }
}

/// Whole-numbered floats such as `2.0`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
}

/// Returns the display name of `state` in `language`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedLocale`] if `language` names no known locale.
pub fn display_name(state: CanonicalState, language: &str) -> Result<Option<&'static str>> {
    locale(language)
        .map(|table| table.display_name(state))
        .ok_or_else(|| Error::UnsupportedLocale(language.to_string()))
}

/// Returns the tags of all supported languages, in registration order.
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    LOCALES.iter().map(|table| table.language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phrase_classifies_with_its_own_locale() {
        for table in LOCALES {
            for (phrase, state) in table.phrases {
                let expected = if normalize(phrase) == *SENTINEL {
                    CanonicalState::Offline
                } else {
                    *state
                };
                assert_eq!(
                    classify(phrase, Some(table.language)).unwrap(),
                    expected,
                    "{}: {phrase}",
                    table.language
                );
            }
        }
    }

    #[test]
    fn every_phrase_classifies_without_hint() {
        for table in LOCALES {
            for (phrase, _) in table.phrases {
                let merged = INDEX.merged[&normalize(phrase)];
                assert_eq!(classify(phrase, None).unwrap(), merged);
                assert_ne!(merged, CanonicalState::Invalid);
            }
        }
    }

    #[test]
    fn firmware_padding_is_tolerated() {
        assert_eq!(
            classify("  Sleeping...   ", Some("EN")).unwrap(),
            CanonicalState::Sleeping
        );
        assert_eq!(
            classify(" Ready to Copy  ", Some("en")).unwrap(),
            CanonicalState::Normal
        );
        assert_eq!(
            classify("   Warming Up   ", None).unwrap(),
            CanonicalState::WarmingUp
        );
    }

    #[test]
    fn unknown_text_is_unknown() {
        assert_eq!(
            classify("Definitely not a status", None).unwrap(),
            CanonicalState::Unknown
        );
        assert_eq!(classify("", Some("DE")).unwrap(), CanonicalState::Unknown);
    }

    #[test]
    fn locale_hint_restricts_lookup() {
        // German phrase is not in the English table
        assert_eq!(
            classify("Papierstau", Some("EN")).unwrap(),
            CanonicalState::Unknown
        );
        assert_eq!(
            classify("Papierstau", Some("DE")).unwrap(),
            CanonicalState::Error
        );
    }

    #[test]
    fn unsupported_locale_fails() {
        let err = classify("Ready", Some("tlh")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLocale(tag) if tag == "tlh"));
    }

    #[test]
    fn sentinel_is_offline_in_every_locale() {
        for language in supported_languages() {
            assert_eq!(
                classify("  OFFLINE ", Some(language)).unwrap(),
                CanonicalState::Offline
            );
        }
        assert_eq!(classify("offline", None).unwrap(), CanonicalState::Offline);
    }

    #[test]
    fn merge_keeps_first_registered_entry() {
        let first = LocaleTable {
            language: "AA",
            phrases: &[("Service", CanonicalState::Error)],
        };
        let second = LocaleTable {
            language: "BB",
            phrases: &[
                ("Service", CanonicalState::Warning),
                ("Idle", CanonicalState::Normal),
            ],
        };
        let merged = build_merged(&[first, second]);
        assert_eq!(merged["service"], CanonicalState::Error);
        assert_eq!(merged["idle"], CanonicalState::Normal);
    }

    #[test]
    fn numeric_codes() {
        let expected = [
            CanonicalState::Offline,
            CanonicalState::Unknown,
            CanonicalState::Normal,
            CanonicalState::Warning,
            CanonicalState::Testing,
            CanonicalState::Error,
        ];
        for (code, state) in (0..).zip(expected) {
            assert_eq!(classify_numeric(code), state);
        }
        for code in [-5, -1, 6, 100] {
            assert_eq!(classify_numeric(code), CanonicalState::Invalid);
        }
    }

    #[test]
    fn value_classification() {
        assert_eq!(
            classify_value(&serde_json::json!(2), None),
            CanonicalState::Normal
        );
        assert_eq!(
            classify_value(&serde_json::json!("3"), None),
            CanonicalState::Warning
        );
        assert_eq!(
            classify_value(&serde_json::json!(2.5), None),
            CanonicalState::Invalid
        );
        assert_eq!(
            classify_value(&serde_json::json!(null), None),
            CanonicalState::Invalid
        );
        assert_eq!(
            classify_value(&serde_json::json!([1]), None),
            CanonicalState::Invalid
        );
        assert_eq!(
            classify_value(&serde_json::json!("Bereit"), Some("DE")),
            CanonicalState::Normal
        );
        // unknown language hint degrades to the merged table
        assert_eq!(
            classify_value(&serde_json::json!("Bereit"), Some("XX")),
            CanonicalState::Normal
        );
    }

    #[test]
    fn whole_floats_take_numeric_path() {
        assert_eq!(
            classify_value(&serde_json::json!(2.0), None),
            CanonicalState::Normal
        );
        assert_eq!(
            classify_value(&serde_json::json!(5.0), None),
            CanonicalState::Error
        );
        assert_eq!(
            classify_value(&serde_json::json!(9.0), None),
            CanonicalState::Invalid
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(
            display_name(CanonicalState::Sleeping, "EN").unwrap(),
            Some("Sleeping")
        );
        assert_eq!(
            display_name(CanonicalState::Normal, "fr").unwrap(),
            Some("Prêt")
        );
        assert!(display_name(CanonicalState::Normal, "XX").is_err());
    }
}
