use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

/// JSON body of `POST /scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
    pub url: String,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Every field the service may send; which ones matter depends on the status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeReplyBody {
    pub iframes: Option<Vec<String>>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ScrapeReplyBody {
    /// Parses any JSON document. Fields are read one at a time, so a field of
    /// the wrong type counts as absent without discarding the others.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        let iframes = value.get("iframes").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        });
        Ok(Self {
            iframes,
            message: text("message"),
            error: text("error"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            // The hosted service cold-starts slowly.
            request_timeout: Duration::from_secs(60),
            max_response_bytes: 2 * 1024 * 1024,
        }
    }
}

/// No usable response was obtained from the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: TransportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    InvalidEndpoint,
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            TransportKind::Timeout => write!(f, "timeout"),
            TransportKind::Network => write!(f, "network error"),
            TransportKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            TransportKind::Decode => write!(f, "undecodable response body"),
        }
    }
}
