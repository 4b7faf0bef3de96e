//! Locality data source.
//!
//! Records are fetched at request time, either from a remote URL or from a
//! local JSON file override. The payload must be a JSON array; each element
//! is validated individually by [`parse_localities`].

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::edge::{parse_localities, ParsedLocalities};
use crate::error::{Error, Result};
use crate::report::Reporter;

/// Remote URL serving the locality list.
pub const LOCALITY_URL_ENV: &str = "WAYMATRIX_LOCALITY_URL";
/// Local JSON file that replaces the remote URL when set.
pub const LOCALITY_SOURCE_ENV: &str = "WAYMATRIX_LOCALITY_SOURCE";
/// Fetch timeout in whole seconds.
pub const FETCH_TIMEOUT_ENV: &str = "WAYMATRIX_FETCH_TIMEOUT_SECS";
/// Number of extra attempts after a failed fetch.
pub const FETCH_RETRIES_ENV: &str = "WAYMATRIX_FETCH_RETRIES";

/// Timeout applied to a fetch when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Where locality records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => f.write_str(url),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Configuration for fetching locality records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub location: SourceLocation,
    /// Upper bound for a single fetch attempt.
    pub timeout: Duration,
    /// Extra attempts after the first failure; `0` disables retries.
    pub retries: u32,
}

impl SourceConfig {
    pub fn url(url: impl Into<String>) -> Self {
        Self::new(SourceLocation::Url(url.into()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(SourceLocation::File(path.into()))
    }

    fn new(location: SourceLocation) -> Self {
        Self {
            location,
            timeout: DEFAULT_FETCH_TIMEOUT,
            retries: 0,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Read the configuration from the environment.
    ///
    /// `WAYMATRIX_LOCALITY_SOURCE` wins over `WAYMATRIX_LOCALITY_URL`. Unparseable
    /// timeout or retry values fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same rules as [`SourceConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let location = match (non_blank(LOCALITY_SOURCE_ENV), non_blank(LOCALITY_URL_ENV)) {
            (Some(path), _) => SourceLocation::File(PathBuf::from(path)),
            (None, Some(url)) => SourceLocation::Url(url.trim().to_string()),
            (None, None) => return Err(Error::SourceNotConfigured),
        };

        let timeout = lookup(FETCH_TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT);

        let retries = lookup(FETCH_RETRIES_ENV)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0);

        Ok(Self {
            location,
            timeout,
            retries,
        })
    }
}

/// Fetches and validates locality records.
#[derive(Debug, Clone)]
pub struct LocalitySource {
    config: SourceConfig,
    client: Client,
}

impl LocalitySource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Fetch raw records, retrying transport failures up to the configured bound.
    ///
    /// Every failed attempt is passed to `reporter`. A payload that is not a
    /// JSON array is not retried.
    pub async fn fetch_records(&self, reporter: &dyn Reporter) -> Result<Vec<Value>> {
        let attempts = self.config.retries.saturating_add(1);
        let mut attempt = 1;
        loop {
            match self.fetch_once().await {
                Ok(records) => return Ok(records),
                Err(error) => {
                    reporter.fetch_attempt_failed(attempt, &error);
                    if attempt >= attempts || !is_retryable(&error) {
                        return Err(error);
                    }
                }
            }
            attempt += 1;
            tokio::time::sleep(RETRY_BACKOFF).await;
        }
    }

    /// Fetch and validate records; invalid records are skipped and reported.
    pub async fn fetch_edges(&self, reporter: &dyn Reporter) -> Result<ParsedLocalities> {
        let records = self.fetch_records(reporter).await?;
        Ok(parse_localities(&records, reporter))
    }

    async fn fetch_once(&self) -> Result<Vec<Value>> {
        let source_name = self.config.location.to_string();
        debug!(source = %source_name, "fetching locality records");

        let body = match &self.config.location {
            SourceLocation::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(|err| self.transport_error(err))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(Error::Fetch {
                        source_name,
                        message: format!("unexpected status {status}"),
                    });
                }

                response
                    .bytes()
                    .await
                    .map_err(|err| self.transport_error(err))?
                    .to_vec()
            }
            SourceLocation::File(path) => {
                tokio::fs::read(path).await.map_err(|err| Error::Fetch {
                    source_name: source_name.clone(),
                    message: err.to_string(),
                })?
            }
        };

        parse_payload(&source_name, &body)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let source_name = self.config.location.to_string();
        if err.is_timeout() {
            Error::FetchTimeout {
                source_name,
                timeout: self.config.timeout,
            }
        } else {
            Error::Fetch {
                source_name,
                message: err.to_string(),
            }
        }
    }
}

fn parse_payload(source_name: &str, body: &[u8]) -> Result<Vec<Value>> {
    let invalid = |message: String| Error::InvalidPayload {
        source_name: source_name.to_string(),
        message,
    };

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => Err(invalid(format!(
            "expected a JSON array, found {}",
            kind(&other)
        ))),
        Err(err) => Err(invalid(err.to_string())),
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

fn is_retryable(error: &Error) -> bool {
    matches!(error, Error::Fetch { .. } | Error::FetchTimeout { .. })
}

fn user_agent() -> String {
    format!("waymatrix-lib/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_must_be_an_array() {
        let err = parse_payload("test", br#"{"data": []}"#).unwrap_err();
        assert!(err.to_string().contains("found an object"));

        let err = parse_payload("test", b"<html>").unwrap_err();
        assert!(matches!(err, Error::InvalidPayload { .. }));

        let records = parse_payload("test", b"[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn builders_set_defaults() {
        let config = SourceConfig::url("http://localhost/localities");
        assert_eq!(config.timeout, DEFAULT_FETCH_TIMEOUT);
        assert_eq!(config.retries, 0);

        let config = SourceConfig::file("/tmp/localities.json")
            .with_timeout(Duration::from_secs(2))
            .with_retries(3);
        assert_eq!(config.location.to_string(), "/tmp/localities.json");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.retries, 3);
    }

    #[test]
    fn only_transport_failures_retry() {
        assert!(is_retryable(&Error::Fetch {
            source_name: "x".into(),
            message: "refused".into()
        }));
        assert!(!is_retryable(&Error::InvalidPayload {
            source_name: "x".into(),
            message: "bad".into()
        }));
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn local_source_wins_over_url() {
        let config = SourceConfig::from_lookup(lookup_from(&[
            (LOCALITY_URL_ENV, "http://upstream/localities"),
            (LOCALITY_SOURCE_ENV, "/data/localities.json"),
        ]))
        .unwrap();

        assert_eq!(
            config.location,
            SourceLocation::File(PathBuf::from("/data/localities.json"))
        );
    }

    #[test]
    fn url_is_used_when_no_local_source() {
        let config = SourceConfig::from_lookup(lookup_from(&[
            (LOCALITY_URL_ENV, " http://upstream/localities "),
            (LOCALITY_SOURCE_ENV, ""),
        ]))
        .unwrap();

        assert_eq!(
            config.location,
            SourceLocation::Url("http://upstream/localities".to_string())
        );
    }

    #[test]
    fn missing_source_is_not_configured() {
        let err = SourceConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::SourceNotConfigured));

        let blank = lookup_from(&[(LOCALITY_URL_ENV, "   ")]);
        let err = SourceConfig::from_lookup(blank).unwrap_err();
        assert!(matches!(err, Error::SourceNotConfigured));
    }

    #[test]
    fn timeout_defaults_when_absent_zero_or_unparseable() {
        for timeout in [None, Some("0"), Some("soon"), Some("-5")] {
            let mut vars = vec![(LOCALITY_URL_ENV, "http://upstream/localities")];
            if let Some(value) = timeout {
                vars.push((FETCH_TIMEOUT_ENV, value));
            }
            let config = SourceConfig::from_lookup(lookup_from(&vars)).unwrap();
            assert_eq!(config.timeout, DEFAULT_FETCH_TIMEOUT, "timeout {timeout:?}");
        }

        let config = SourceConfig::from_lookup(lookup_from(&[
            (LOCALITY_URL_ENV, "http://upstream/localities"),
            (FETCH_TIMEOUT_ENV, " 3 "),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn retries_are_parsed() {
        let config = SourceConfig::from_lookup(lookup_from(&[
            (LOCALITY_URL_ENV, "http://upstream/localities"),
            (FETCH_RETRIES_ENV, "2"),
        ]))
        .unwrap();
        assert_eq!(config.retries, 2);

        let config = SourceConfig::from_lookup(lookup_from(&[
            (LOCALITY_URL_ENV, "http://upstream/localities"),
            (FETCH_RETRIES_ENV, "many"),
        ]))
        .unwrap();
        assert_eq!(config.retries, 0);
    }
}
