use futures_util::StreamExt;
use iframist_core::ScrapeResult;
use iframist_logging::{iframist_debug, iframist_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use crate::{ClientSettings, ScrapeReplyBody, ScrapeRequest, TransportError, TransportKind};

const SCRAPE_PATH: &str = "scrape";
const REDIRECT_LIMIT: usize = 5;

/// The remote extraction capability.
///
/// Implementations never fail: every outcome, including an unreachable
/// service, is folded into a [`ScrapeResult`].
#[async_trait::async_trait]
pub trait ScrapeClient: Send + Sync {
    async fn perform_request(&self, request: &ScrapeRequest) -> ScrapeResult;
}

#[derive(Debug, Clone)]
pub struct ReqwestScrapeClient {
    settings: ClientSettings,
    endpoint: Url,
    client: reqwest::Client,
}

impl ReqwestScrapeClient {
    /// Builds a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, TransportError> {
        let endpoint = scrape_endpoint(base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
            .build()
            .map_err(|err| TransportError::new(TransportKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Like [`ScrapeClient::perform_request`] but keeps transport failures distinct.
    pub async fn try_perform(&self, request: &ScrapeRequest) -> Result<ScrapeResult, TransportError> {
        let (status, body) = self.send(request).await?;
        iframist_debug!(
            "scrape reply status={} body_len={}",
            status.as_u16(),
            body.len()
        );
        classify_reply(status, &body)
    }

    async fn send(&self, request: &ScrapeRequest) -> Result<(StatusCode, Vec<u8>), TransportError> {
        let payload = serde_json::to_vec(request)
            .map_err(|err| TransportError::new(TransportKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(TransportError::new(
                    TransportKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(TransportError::new(
                    TransportKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok((status, bytes))
    }
}

#[async_trait::async_trait]
impl ScrapeClient for ReqwestScrapeClient {
    async fn perform_request(&self, request: &ScrapeRequest) -> ScrapeResult {
        match self.try_perform(request).await {
            Ok(result) => result,
            Err(err) => {
                iframist_warn!("scrape request to {} failed: {}", self.endpoint, err);
                ScrapeResult::transport_failure()
            }
        }
    }
}

/// Resolves the `POST /scrape` URL for a service base such as `https://host`.
pub fn scrape_endpoint(base_url: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|err| TransportError::new(TransportKind::InvalidEndpoint, err.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::new(
            TransportKind::InvalidEndpoint,
            format!("not an http(s) base url: {base_url}"),
        ));
    }

    let path = url.path().trim_end_matches('/').to_string();
    if !path.ends_with(&format!("/{SCRAPE_PATH}")) {
        url.set_path(&format!("{path}/{SCRAPE_PATH}"));
    }
    Ok(url)
}

/// Interprets a completed call.
///
/// A body that is not JSON yields no usable response whatever the status,
/// and is reported as a transport error. Otherwise the status is inspected
/// before the payload.
pub fn classify_reply(status: StatusCode, body: &[u8]) -> Result<ScrapeResult, TransportError> {
    let reply = ScrapeReplyBody::from_json(body)
        .map_err(|err| TransportError::new(TransportKind::Decode, err.to_string()))?;
    if !status.is_success() {
        return Ok(ScrapeResult::remote_failure(reply.error));
    }
    Ok(ScrapeResult::success(
        reply.iframes.unwrap_or_default(),
        reply.message,
    ))
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportKind::Timeout, err.to_string());
    }
    TransportError::new(TransportKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iframist_core::UNKNOWN_ERROR_MESSAGE;

    #[test]
    fn endpoint_appends_scrape_path() {
        let url = scrape_endpoint("https://iframist.example").unwrap();
        assert_eq!(url.as_str(), "https://iframist.example/scrape");

        let url = scrape_endpoint("http://localhost:5000/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/scrape");

        let url = scrape_endpoint("https://host/scrape").unwrap();
        assert_eq!(url.as_str(), "https://host/scrape");
    }

    #[test]
    fn endpoint_rejects_non_http() {
        let err = scrape_endpoint("ftp://host").unwrap_err();
        assert_eq!(err.kind, TransportKind::InvalidEndpoint);
        let err = scrape_endpoint("not a url").unwrap_err();
        assert_eq!(err.kind, TransportKind::InvalidEndpoint);
    }

    #[test]
    fn failure_status_wins_over_items() {
        let body = br#"{"iframes":["https://a"],"error":"blocked"}"#;
        let result = classify_reply(StatusCode::FORBIDDEN, body).unwrap();
        assert_eq!(result, ScrapeResult::Failure("blocked".to_string()));
    }

    #[test]
    fn failure_status_with_html_body_is_transport_error() {
        let err = classify_reply(StatusCode::NOT_FOUND, b"<html>404</html>").unwrap_err();
        assert_eq!(err.kind, TransportKind::Decode);

        let err = classify_reply(StatusCode::BAD_GATEWAY, b"").unwrap_err();
        assert_eq!(err.kind, TransportKind::Decode);
    }

    #[test]
    fn failure_status_keeps_error_despite_malformed_fields() {
        let body = br#"{"error":"blocked","iframes":"x"}"#;
        let result = classify_reply(StatusCode::NOT_FOUND, body).unwrap();
        assert_eq!(result, ScrapeResult::Failure("blocked".to_string()));

        let result = classify_reply(StatusCode::INTERNAL_SERVER_ERROR, br#"{"error":7}"#).unwrap();
        assert_eq!(
            result,
            ScrapeResult::Failure(UNKNOWN_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn success_ignores_message_of_wrong_type() {
        let body = br#"{"iframes":["https://a"],"message":5}"#;
        let result = classify_reply(StatusCode::OK, body).unwrap();
        assert_eq!(
            result,
            ScrapeResult::success(vec!["https://a".to_string()], None)
        );
    }

    #[test]
    fn success_with_non_object_json_is_empty() {
        let result = classify_reply(StatusCode::OK, b"[1, 2]").unwrap();
        assert_eq!(result, ScrapeResult::success(Vec::new(), None));
    }

    #[test]
    fn success_without_iframes_field_is_empty_success() {
        let result = classify_reply(StatusCode::OK, br#"{"message":"dynamic page"}"#).unwrap();
        assert_eq!(
            result,
            ScrapeResult::success(Vec::new(), Some("dynamic page".to_string()))
        );

        let result = classify_reply(StatusCode::OK, br#"{"iframes":null}"#).unwrap();
        assert_eq!(result, ScrapeResult::success(Vec::new(), None));
    }

    #[test]
    fn success_with_unreadable_body_is_transport_error() {
        let err = classify_reply(StatusCode::OK, b"not json").unwrap_err();
        assert_eq!(err.kind, TransportKind::Decode);
    }
}
