mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::FetchError;
use tracing::debug;

/// Issues a GET through `client` and returns the body of a successful response.
pub async fn fetch_bytes<C: HttpClient>(
    client: &C,
    url: reqwest::Url,
) -> Result<Vec<u8>, FetchError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(bytes = bytes.len(), "Response body received");
    Ok(bytes)
}

/// Parses `url`, mapping failures into [`FetchError::InvalidUrl`].
pub fn parse_url(url: &str) -> Result<reqwest::Url, FetchError> {
    url.parse::<reqwest::Url>().map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// True when `input` parses as an absolute `http` or `https` URL.
pub fn is_http_url(input: &str) -> bool {
    input
        .parse::<reqwest::Url>()
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_rejects_garbage() {
        assert!(matches!(
            parse_url("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://earthquake.usgs.gov/fdsnws/event/1/query.geojson"));
        assert!(is_http_url("http://localhost:8080/q"));
        assert!(!is_http_url("http_dump.geojson"));
        assert!(!is_http_url("https_events/saved.geojson"));
        assert!(!is_http_url("file:///tmp/events.geojson"));
    }

    #[test]
    fn test_parse_url_accepts_https() {
        let url = parse_url("https://earthquake.usgs.gov/fdsnws/event/1/query.geojson").unwrap();
        assert_eq!(url.host_str(), Some("earthquake.usgs.gov"));
    }
}
