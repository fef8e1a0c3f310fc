//! HTTP implementation of the remote service interface.
//!
//! Blocking requests with a bounded timeout, the credential as an `apiKey`
//! query parameter on every URL, and a small retry budget for transient
//! failures (connection errors, timeouts, 5xx). Client errors (4xx) are never
//! retried. Responses arrive wrapped in a `{"data": ...}` envelope which is
//! unwrapped here so the core only sees plain documents.

use std::thread;
use std::time::Duration;

use log::warn;
use reqwest::blocking::{Client, Response};
use serde_json::Value;

use suitesync_core::error::{Result, SyncError};
use suitesync_core::remote::{RemoteApi, SuiteSummary, TestSummary};

/// Attempts per request: first try plus retries on transient failure.
const MAX_ATTEMPTS: u32 = 3;

/// Base delay between attempts; grows linearly with the attempt number.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `RemoteApi` backed by the remote service's HTTP API.
pub struct HttpRemote {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpRemote {
    /// Build a client against the given service base URL.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SyncError::RemoteTransport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}?apiKey={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Send a request, retrying transient failures up to [`MAX_ATTEMPTS`].
    fn execute<F>(&self, url: &str, send: F) -> Result<Response>
    where
        F: Fn() -> reqwest::Result<Response>,
    {
        let mut attempt = 1;
        loop {
            match send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if !(status.is_server_error() && attempt < MAX_ATTEMPTS) {
                        return Err(SyncError::RemoteStatus {
                            status: status.as_u16(),
                            url: redacted(url),
                        });
                    }
                    warn!(
                        "attempt {}/{} got {} from {}, retrying",
                        attempt,
                        MAX_ATTEMPTS,
                        status,
                        redacted(url)
                    );
                }
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    if !(transient && attempt < MAX_ATTEMPTS) {
                        return Err(SyncError::RemoteTransport(e.to_string()));
                    }
                    warn!(
                        "attempt {}/{} failed for {}: {}, retrying",
                        attempt,
                        MAX_ATTEMPTS,
                        redacted(url),
                        e
                    );
                }
            }
            thread::sleep(RETRY_DELAY * attempt);
            attempt += 1;
        }
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        let response = self.execute(&url, || self.client.get(&url).send())?;
        let document: Value = response
            .json()
            .map_err(|e| SyncError::RemoteTransport(e.to_string()))?;
        Ok(unwrap_envelope(document))
    }

    fn post_json(&self, path: &str, document: &Value) -> Result<()> {
        let url = self.url(path);
        self.execute(&url, || self.client.post(&url).json(document).send())?;
        Ok(())
    }
}

/// Unwrap the service's `{"data": ...}` response envelope, when present.
fn unwrap_envelope(document: Value) -> Value {
    match document {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Drop the query string (which carries the credential) for logging.
fn redacted(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

/// Extract `{_id, name}` summaries from a listing document.
fn summaries(document: &Value, what: &str) -> Result<Vec<(String, String)>> {
    let items = document
        .as_array()
        .ok_or_else(|| SyncError::RemoteResponse(format!("{} listing is not an array", what)))?;
    Ok(items
        .iter()
        .filter_map(|item| {
            let id = item.get("_id")?.as_str()?;
            let name = item.get("name")?.as_str()?;
            Some((id.to_string(), name.to_string()))
        })
        .collect())
}

impl RemoteApi for HttpRemote {
    fn list_suites(&self, folder_id: &str) -> Result<Vec<SuiteSummary>> {
        let document = self.get_json(&format!(
            "folders/{}/suites/",
            urlencoding::encode(folder_id)
        ))?;
        Ok(summaries(&document, "suite")?
            .into_iter()
            .map(|(suite_id, display_name)| SuiteSummary {
                suite_id,
                display_name,
            })
            .collect())
    }

    fn get_suite(&self, suite_id: &str) -> Result<Value> {
        self.get_json(&format!("suites/{}/", urlencoding::encode(suite_id)))
    }

    fn export_suite(&self, suite_id: &str) -> Result<Vec<u8>> {
        let url = self.url(&format!(
            "suites/{}/export/json/",
            urlencoding::encode(suite_id)
        ));
        let response = self.execute(&url, || self.client.get(&url).send())?;
        let bytes = response
            .bytes()
            .map_err(|e| SyncError::RemoteTransport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn list_tests(&self, suite_id: &str) -> Result<Vec<TestSummary>> {
        let document =
            self.get_json(&format!("suites/{}/tests/", urlencoding::encode(suite_id)))?;
        Ok(summaries(&document, "test")?
            .into_iter()
            .map(|(remote_id, name)| TestSummary { remote_id, name })
            .collect())
    }

    fn get_test(&self, remote_id: &str) -> Result<Value> {
        self.get_json(&format!("tests/{}/", urlencoding::encode(remote_id)))
    }

    fn import_test(&self, suite_id: &str, document: &Value) -> Result<()> {
        self.post_json(
            &format!("suites/{}/import-test/json", urlencoding::encode(suite_id)),
            document,
        )
    }

    fn update_test(&self, remote_id: &str, document: &Value) -> Result<()> {
        self.post_json(&format!("tests/{}/", urlencoding::encode(remote_id)), document)
    }

    fn delete_test(&self, remote_id: &str) -> Result<()> {
        let url = self.url(&format!("tests/{}/", urlencoding::encode(remote_id)));
        self.execute(&url, || self.client.delete(&url).send())?;
        Ok(())
    }
}
