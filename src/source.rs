//! Where event collections come from.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::event::EventCollection;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes, parse_url};
use crate::parser::parse_collection;
use crate::query::{DEFAULT_ENDPOINT, EventQuery};

/// Produces one [`EventCollection`] per call.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<EventCollection, FetchError>;
}

/// Queries the USGS event API.
pub struct UsgsSource<C = BasicClient> {
    client: C,
    url: reqwest::Url,
}

impl UsgsSource<BasicClient> {
    /// Source for `query` against the default endpoint.
    pub fn new(query: &EventQuery) -> Result<Self, FetchError> {
        Self::with_client(BasicClient::new()?, DEFAULT_ENDPOINT, query)
    }
}

impl<C: HttpClient> UsgsSource<C> {
    pub fn with_client(client: C, endpoint: &str, query: &EventQuery) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            url: query.url(endpoint)?,
        })
    }

    /// Source for a URL that already carries its query string.
    pub fn from_url(client: C, url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            url: parse_url(url)?,
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

#[async_trait]
impl<C: HttpClient> DataSource for UsgsSource<C> {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<EventCollection, FetchError> {
        let bytes = fetch_bytes(&self.client, self.url.clone()).await?;
        let collection = parse_collection(&bytes)?;
        info!(records = collection.len(), "Event collection fetched");
        check_reported_count(&collection);
        Ok(collection)
    }
}

/// Reads a previously saved GeoJSON response from disk.
pub struct FileSource {
    path: String,
}

impl FileSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    #[tracing::instrument(skip(self), fields(path = %self.path))]
    async fn fetch(&self) -> Result<EventCollection, FetchError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        let collection = parse_collection(&bytes)?;
        info!(records = collection.len(), "Event collection loaded");
        check_reported_count(&collection);
        Ok(collection)
    }
}

/// Warns when the metadata count disagrees with the records received.
fn check_reported_count(collection: &EventCollection) -> bool {
    match collection.reported_count {
        Some(reported) if reported != collection.len() as u64 => {
            warn!(
                reported,
                received = collection.len(),
                "Metadata count differs from records received"
            );
            false
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_usgs_source_builds_query_url() {
        let source = UsgsSource::with_client(
            BasicClient::new().unwrap(),
            "https://example.test/query.geojson",
            &EventQuery::default(),
        )
        .unwrap();

        assert_eq!(source.url().host_str(), Some("example.test"));
        assert!(source.url().query().unwrap().contains("orderby=time-asc"));
    }

    #[tokio::test]
    async fn test_file_source_reads_collection() {
        let path = temp_path("quake_stats_test_source.geojson");
        fs::write(
            &path,
            r#"{"features":[{"properties":{"mag":2.0,"time":0},"geometry":{"coordinates":[1.0,2.0]}}]}"#,
        )
        .unwrap();

        let collection = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!(collection.len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_check_reported_count() {
        let c = EventCollection::default();
        assert!(check_reported_count(&c));
        assert!(check_reported_count(&c.clone().with_metadata(None, Some(0))));
        assert!(!check_reported_count(&c.with_metadata(None, Some(3))));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let result = FileSource::new(temp_path("quake_stats_does_not_exist.geojson"))
            .fetch()
            .await;
        assert!(matches!(result, Err(FetchError::Io { .. })));
    }
}
