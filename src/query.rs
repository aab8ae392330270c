//! The event query sent to the USGS FDSN endpoint.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::fetch::parse_url;

pub const DEFAULT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query.geojson";

/// Date window, bounding box and magnitude floor for one query.
///
/// Can be stored as JSON; omitted keys fall back to the defaults (the British
/// Isles, 2000-01-01 to 2018-10-11, magnitude 1 and up):
/// ```json
/// { "start": "2010-01-01", "min_magnitude": 2.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_magnitude: f64,
    pub order_by: String,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2018, 10, 11).unwrap_or_default(),
            min_latitude: 50.008,
            max_latitude: 58.723,
            min_longitude: -9.756,
            max_longitude: 1.67,
            min_magnitude: 1.0,
            order_by: "time-asc".to_string(),
        }
    }
}

impl EventQuery {
    /// Loads a query from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Query parameters in the names the FDSN event service expects.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("starttime", self.start.format("%Y-%m-%d").to_string()),
            ("endtime", self.end.format("%Y-%m-%d").to_string()),
            ("minlatitude", self.min_latitude.to_string()),
            ("maxlatitude", self.max_latitude.to_string()),
            ("minlongitude", self.min_longitude.to_string()),
            ("maxlongitude", self.max_longitude.to_string()),
            ("minmagnitude", self.min_magnitude.to_string()),
            ("orderby", self.order_by.clone()),
        ]
    }

    /// Full request URL against `endpoint`.
    pub fn url(&self, endpoint: &str) -> Result<reqwest::Url, FetchError> {
        let mut url = parse_url(endpoint)?;
        url.query_pairs_mut().extend_pairs(self.params());
        Ok(url)
    }
}
