// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Endpoint fallback: structured JSON first, then the HTML pages.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::{Error, Result, TransportError};
use crate::parser::{decode, html};
use crate::protocol::{FetchResponse, Transport};
use crate::state::Snapshot;
use crate::types::ConnectionMode;

/// Structured status document.
pub const API_PATH: &str = "/sws/app/information/home/home.json";

/// Structured counters document.
pub const COUNTERS_PATH: &str = "/sws/app/information/counters/counters.json";

/// Parameters of one acquisition run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionOptions {
    /// Which sources to consult.
    pub mode: ConnectionMode,
    /// Upper bound for each individual fetch.
    pub timeout: Duration,
    /// Also fetch the counters document after a structured answer.
    pub fetch_counters: bool,
    /// Language assumed when the device reports none.
    pub language: Option<String>,
}

impl AcquisitionOptions {
    /// Default per-fetch timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            mode: ConnectionMode::Auto,
            timeout: Self::DEFAULT_TIMEOUT,
            fetch_counters: false,
            language: None,
        }
    }
}

/// Builds one snapshot of the device at `base_url`.
///
/// Connectivity problems never fail the run; an unreachable device yields
/// an offline snapshot.
///
/// # Errors
///
/// Returns [`Error::UnsupportedBySource`] when the mode is pinned to
/// [`ConnectionMode::Api`] and the structured endpoint answered with
/// something that is not a JSON object.
pub async fn acquire<T: Transport>(
    transport: &T,
    base_url: &str,
    options: &AcquisitionOptions,
) -> Result<Snapshot> {
    let mut snapshot = None;

    if options.mode.uses_api() {
        snapshot = acquire_api(transport, base_url, options).await?;
    }
    if snapshot.is_none() && options.mode.uses_html() {
        snapshot = Some(acquire_html(transport, base_url, options.timeout).await);
    }

    let snapshot = snapshot.unwrap_or_else(Snapshot::offline);
    Ok(match &options.language {
        Some(language) => snapshot.with_language_hint(language.clone()),
        None => snapshot,
    })
}

/// Structured endpoint. `Ok(None)` means "fall back".
async fn acquire_api<T: Transport>(
    transport: &T,
    base_url: &str,
    options: &AcquisitionOptions,
) -> Result<Option<Snapshot>> {
    let url = format!("{base_url}{API_PATH}");
    let response = match fetch(transport, &url, options.timeout).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Structured endpoint unreachable");
            return Ok(None);
        }
    };

    let reason = match decode_object(&response.body) {
        Ok(tree) => {
            let mut snapshot = Snapshot::from_tree(tree);
            if options.fetch_counters
                && let Some(counters) = acquire_counters(transport, base_url, options.timeout).await
            {
                snapshot = snapshot.with_counters(counters);
            }
            return Ok(Some(snapshot));
        }
        Err(reason) => reason,
    };

    if options.mode.is_pinned() {
        return Err(Error::UnsupportedBySource {
            mode: options.mode,
            reason,
        });
    }
    tracing::warn!(
        url = %url,
        status = response.status,
        reason = %reason,
        "Structured endpoint returned no usable data, falling back to HTML"
    );
    Ok(None)
}

async fn acquire_counters<T: Transport>(
    transport: &T,
    base_url: &str,
    timeout: Duration,
) -> Option<Map<String, Value>> {
    let url = format!("{base_url}{COUNTERS_PATH}");
    let response = fetch(transport, &url, timeout)
        .await
        .inspect_err(|e| tracing::debug!(url = %url, error = %e, "Counters unreachable"))
        .ok()?;
    decode_object(&response.body)
        .inspect_err(|reason| tracing::debug!(url = %url, reason = %reason, "Counters unusable"))
        .ok()
}

/// HTML pages, in registration order. Never fails.
async fn acquire_html<T: Transport>(transport: &T, base_url: &str, timeout: Duration) -> Snapshot {
    let mut snapshot = Snapshot::offline();
    let mut reachable = false;

    for page in html::PAGES {
        let url = format!("{base_url}{}", page.path);
        match fetch(transport, &url, timeout).await {
            Ok(response) if response.is_success() => {
                reachable = true;
                html::extract_page(page, &response.body, snapshot.data_mut());
            }
            Ok(response) => {
                reachable = true;
                tracing::debug!(url = %url, status = response.status, "Page not available");
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Page unreachable");
            }
        }
    }

    if reachable {
        snapshot.mark_reachable();
    }
    snapshot
}

/// Decodes a body that must be a JSON object; the error is a human reason.
fn decode_object(body: &str) -> std::result::Result<Map<String, Value>, String> {
    match decode(body) {
        Ok(Value::Object(tree)) => Ok(tree),
        Ok(other) => Err(format!("expected a JSON object, got {}", kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fetches with a hard deadline on top of the transport's own timeout.
async fn fetch<T: Transport>(
    transport: &T,
    url: &str,
    timeout: Duration,
) -> std::result::Result<FetchResponse, TransportError> {
    tokio::time::timeout(timeout, transport.fetch(url, timeout))
        .await
        .unwrap_or_else(|_| {
            Err(TransportError::Timeout(
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;
    use crate::types::CanonicalState;

    const BASE: &str = "http://printer";

    /// Serves canned answers; anything else is a refused connection.
    #[derive(Default)]
    struct FakeTransport {
        answers: HashMap<String, FetchResponse>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn answer(mut self, path: &str, status: u16, body: &str) -> Self {
            self.answers
                .insert(format!("{BASE}{path}"), FetchResponse::new(status, body));
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    impl Transport for FakeTransport {
        async fn fetch(
            &self,
            url: &str,
            _timeout: Duration,
        ) -> std::result::Result<FetchResponse, TransportError> {
            self.requests.lock().push(url.to_string());
            self.answers
                .get(url)
                .cloned()
                .ok_or_else(|| TransportError::ConnectionFailed("refused".into()))
        }
    }

    /// Never answers.
    struct HangingTransport;

    impl Transport for HangingTransport {
        async fn fetch(
            &self,
            _url: &str,
            _timeout: Duration,
        ) -> std::result::Result<FetchResponse, TransportError> {
            std::future::pending().await
        }
    }

    fn options(mode: ConnectionMode) -> AcquisitionOptions {
        AcquisitionOptions {
            mode,
            ..AcquisitionOptions::default()
        }
    }

    const HOME_HTM: &str = r#"<html><body>
        <font class="lcdFont">M2070 Series</font>
        <script language="javascript">var BlackTonerPer = "66";</script>
    </body></html>"#;

    #[tokio::test]
    async fn api_answer_is_whole_snapshot() {
        let transport = FakeTransport::default()
            .answer(API_PATH, 200, "{status: {hrDeviceStatus: 2,}, identity: {model_name: 'C480'}}")
            .answer("/home.htm", 200, HOME_HTM);

        let snapshot = acquire(&transport, BASE, &options(ConnectionMode::Auto))
            .await
            .unwrap();

        assert_eq!(snapshot.device_status(), CanonicalState::Normal);
        assert_eq!(snapshot.model(), Some("C480"));
        assert_eq!(transport.requested(), [format!("{BASE}{API_PATH}")]);
    }

    #[tokio::test]
    async fn api_without_status_is_unknown() {
        let transport = FakeTransport::default().answer(API_PATH, 200, "{identity: {}}");
        let snapshot = acquire(&transport, BASE, &options(ConnectionMode::Api))
            .await
            .unwrap();
        assert_eq!(snapshot.device_status(), CanonicalState::Unknown);
    }

    #[tokio::test]
    async fn nothing_reachable_is_offline() {
        let transport = FakeTransport::default();
        let snapshot = acquire(&transport, BASE, &options(ConnectionMode::Auto))
            .await
            .unwrap();
        assert_eq!(snapshot, Snapshot::offline());
        assert_eq!(transport.requested().len(), 1 + html::PAGES.len());
    }

    #[tokio::test]
    async fn unreachable_api_in_api_mode_is_offline() {
        let snapshot = acquire(&FakeTransport::default(), BASE, &options(ConnectionMode::Api))
            .await
            .unwrap();
        assert!(!snapshot.is_online());
    }

    #[tokio::test]
    async fn falls_back_to_html_on_garbage() {
        let transport = FakeTransport::default()
            .answer(API_PATH, 404, "<html>Not Found</html>")
            .answer("/home.htm", 200, HOME_HTM);

        let snapshot = acquire(&transport, BASE, &options(ConnectionMode::Auto))
            .await
            .unwrap();

        assert_eq!(snapshot.model(), Some("M2070 Series"));
        assert_eq!(snapshot.device_status(), CanonicalState::Unknown);
        assert_eq!(
            snapshot.toner_status(true)["black"],
            serde_json::json!({"opt": 1, "remaining": 66})
        );
    }

    #[tokio::test]
    async fn pinned_api_rejects_non_object() {
        for body in ["<html></html>", "[1, 2]"] {
            let transport = FakeTransport::default().answer(API_PATH, 200, body);
            let err = acquire(&transport, BASE, &options(ConnectionMode::Api))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                Error::UnsupportedBySource {
                    mode: ConnectionMode::Api,
                    ..
                }
            ));
        }
    }

    #[tokio::test]
    async fn html_mode_skips_api() {
        let transport = FakeTransport::default()
            .answer(API_PATH, 200, "{status: {hrDeviceStatus: 2}}")
            .answer("/home.htm", 200, HOME_HTM);

        let snapshot = acquire(&transport, BASE, &options(ConnectionMode::Html))
            .await
            .unwrap();

        assert_eq!(snapshot.model(), Some("M2070 Series"));
        assert!(
            !transport
                .requested()
                .contains(&format!("{BASE}{API_PATH}"))
        );
    }

    #[tokio::test]
    async fn error_pages_count_as_reachable_but_are_not_scraped() {
        let transport = FakeTransport::default().answer("/home.htm", 500, HOME_HTM);
        let snapshot = acquire(&transport, BASE, &options(ConnectionMode::Html))
            .await
            .unwrap();
        assert_eq!(snapshot.device_status(), CanonicalState::Unknown);
        assert_eq!(snapshot.model(), None);
    }

    #[tokio::test]
    async fn counters_are_fetched_when_enabled() {
        let transport = FakeTransport::default()
            .answer(API_PATH, 200, "{status: {hrDeviceStatus: 2}}")
            .answer(COUNTERS_PATH, 200, "{GXI_BILLING_TOTAL_IMP_CNT: 1234,}");

        let options = AcquisitionOptions {
            fetch_counters: true,
            ..AcquisitionOptions::default()
        };
        let snapshot = acquire(&transport, BASE, &options).await.unwrap();
        assert_eq!(snapshot.counters().unwrap()["GXI_BILLING_TOTAL_IMP_CNT"], 1234);
    }

    #[tokio::test]
    async fn broken_counters_do_not_fail_the_update() {
        let transport = FakeTransport::default()
            .answer(API_PATH, 200, "{status: {hrDeviceStatus: 3}}")
            .answer(COUNTERS_PATH, 200, "not json at all {");

        let options = AcquisitionOptions {
            fetch_counters: true,
            ..AcquisitionOptions::default()
        };
        let snapshot = acquire(&transport, BASE, &options).await.unwrap();
        assert_eq!(snapshot.device_status(), CanonicalState::Warning);
        assert!(snapshot.counters().is_none());
    }

    #[tokio::test]
    async fn language_option_is_a_fallback_hint() {
        let transport = FakeTransport::default()
            .answer(API_PATH, 200, "{status: {hrDeviceStatus: 'Ruhemodus'}}");
        let options = AcquisitionOptions {
            language: Some("DE".into()),
            ..AcquisitionOptions::default()
        };
        let snapshot = acquire(&transport, BASE, &options).await.unwrap();
        assert_eq!(snapshot.language(), Some("DE"));
        assert_eq!(snapshot.device_status(), CanonicalState::Sleeping);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_device_times_out() {
        let options = AcquisitionOptions {
            timeout: Duration::from_millis(50),
            ..AcquisitionOptions::default()
        };
        let snapshot = acquire(&HangingTransport, BASE, &options).await.unwrap();
        assert_eq!(snapshot.device_status(), CanonicalState::Offline);
    }
}
