// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity block of `home.htm`.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::{Map, Value};

use super::{Extractor, identity_key, merge_section, normalize_label};

static LCD_FONT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"font[class="lcdFont"]"#).expect("lcdFont selector is valid")
});

/// Reads model name and the label/value identity list from `home.htm`.
///
/// The page renders everything in `<font class="lcdFont">` elements (that
/// exact class; decorated variants are headings). The
/// first one holds the model name. After that, elements alternate between a
/// label (no `color` attribute) and its value (with a `color` attribute):
///
/// ```html
/// <font class="lcdFont">M2070 Series</font>
/// <font class="lcdFont">Serial Number:</font>
/// <font class="lcdFont" color="#000000">ZFAYB8KGGGG1GZP</font>
/// ```
///
/// Labels become snake-case keys under `identity`; `name` is stored as
/// `host_name`, and the serial number and IP address labels use the JSON
/// endpoint's `serial_num` / `ip_addr` keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExtractor;

impl Extractor for IdentityExtractor {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn extract(&self, markup: &str, tree: &mut Map<String, Value>) {
        let document = Html::parse_document(markup);
        let mut fields = Map::new();
        let mut fonts = document.select(&LCD_FONT);

        if let Some(model) = fonts.next() {
            let model = model.text().collect::<String>();
            fields.insert("model_name".into(), Value::String(model.trim().to_string()));
        }

        let mut label: Option<String> = None;
        for font in fonts {
            let text = font.text().collect::<String>();
            if font.value().attr("color").is_none() {
                label = Some(normalize_label(&text)).filter(|l| !l.is_empty());
            } else if let Some(key) = label.take() {
                let key = identity_key(key);
                tracing::trace!(key = %key, "Found identity field");
                fields.insert(key, Value::String(text.trim().to_string()));
            }
        }

        if !fields.is_empty() {
            merge_section(tree, "identity", fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const HOME: &str = r##"<html><body><table>
        <tr><td><font class="lcdFont">  M2070 Series  </font></td></tr>
        <tr><td><font class="lcdFont">Name:</font></td>
            <td><font class="lcdFont" color="#333333">SEC811119110648</font></td></tr>
        <tr><td><font class="lcdFont">Serial Number:</font></td>
            <td><font class="lcdFont" color="#333333">ZFAYB8KGGGG1GZP</font></td></tr>
        <tr><td><font class="lcdFont">IP Address:</font></td>
            <td><font class="lcdFont" color="#333333">192.168.0.25</font></td></tr>
        <tr><td><font class="lcdFont">Location:</font></td>
            <td><font class="lcdFont" color="#333333"></font></td></tr>
        <tr><td><font class="other">Ignored:</font></td></tr>
    </table></body></html>"##;

    fn run(markup: &str) -> Map<String, Value> {
        let mut tree = Map::new();
        IdentityExtractor.extract(markup, &mut tree);
        tree
    }

    #[test]
    fn extracts_model_and_fields() {
        let tree = run(HOME);
        assert_eq!(
            tree["identity"],
            json!({
                "model_name": "M2070 Series",
                "host_name": "SEC811119110648",
                "serial_num": "ZFAYB8KGGGG1GZP",
                "ip_addr": "192.168.0.25",
                "location": ""
            })
        );
    }

    #[test]
    fn value_without_label_is_ignored() {
        let tree = run(
            r##"<font class="lcdFont">C480</font><font class="lcdFont" color="#000">orphan</font>"##,
        );
        assert_eq!(tree["identity"], json!({"model_name": "C480"}));
    }

    #[test]
    fn only_plain_lcd_font_class_counts() {
        let tree = run(
            r##"<font class="lcdFont title">Welcome</font>
                <font class="lcdFont">M2070 Series</font>
                <font class="lcdFont">Location:</font>
                <font class="lcdFont small" color="#000">ignored</font>"##,
        );
        assert_eq!(tree["identity"], json!({"model_name": "M2070 Series"}));
    }

    #[test]
    fn keeps_existing_identity_fields() {
        let mut tree = Map::new();
        tree.insert("identity".into(), json!({"mac_addr": "84:25:00:00:06:48"}));
        IdentityExtractor.extract(r#"<font class="lcdFont">M2070</font>"#, &mut tree);
        assert_eq!(
            tree["identity"],
            json!({"mac_addr": "84:25:00:00:06:48", "model_name": "M2070"})
        );
    }

    #[test]
    fn page_without_fonts_leaves_tree_untouched() {
        assert!(run("<html><body><p>Login required</p>").is_empty());
        assert!(run("<<<not html at all").is_empty());
    }
}
