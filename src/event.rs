//! Typed seismic event records and the accessors the aggregator reads them through.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::AggregateError;

const COORDINATES_FIELD: &str = "geometry.coordinates";
const TIME_FIELD: &str = "properties.time";

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lon, self.lat)
    }
}

/// One reported seismic event.
///
/// Produced by [`crate::parser::parse_collection`]. Fields the source may omit
/// or mistype are kept raw; the accessors decide which are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    index: usize,
    pub id: Option<String>,
    pub place: Option<String>,
    pub magnitude: Option<f64>,
    /// Expected `[lon, lat]` with an optional trailing depth.
    pub coordinates: Option<Value>,
    /// Expected epoch milliseconds, UTC.
    pub time_millis: Option<Value>,
}

impl EventRecord {
    pub fn new(magnitude: Option<f64>, coordinates: Vec<f64>, time_millis: Option<i64>) -> Self {
        Self {
            index: 0,
            id: None,
            place: None,
            magnitude,
            coordinates: Some(Value::from(coordinates)),
            time_millis: time_millis.map(Value::from),
        }
    }

    /// Position of this record in its collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Reported magnitude, `None` when the source left it null or missing.
    pub fn magnitude(&self) -> Option<f64> {
        self.magnitude
    }

    /// First two coordinate values; any depth component is ignored.
    pub fn coordinates(&self) -> Result<Location, AggregateError> {
        let values = match &self.coordinates {
            Some(Value::Array(values)) => values,
            Some(other) => {
                return Err(self.malformed(
                    COORDINATES_FIELD,
                    format!("expected an array, found {other}"),
                ));
            }
            None => return Err(self.malformed(COORDINATES_FIELD, "missing".to_string())),
        };

        match values.as_slice() {
            [lon, lat, ..] => Ok(Location {
                lon: self.number(lon)?,
                lat: self.number(lat)?,
            }),
            other => Err(self.malformed(
                COORDINATES_FIELD,
                format!("expected at least 2 values, found {}", other.len()),
            )),
        }
    }

    /// UTC calendar year of the event time.
    pub fn year(&self) -> Result<i32, AggregateError> {
        let raw = self
            .time_millis
            .as_ref()
            .ok_or_else(|| self.malformed(TIME_FIELD, "missing".to_string()))?;

        let millis = raw
            .as_i64()
            .ok_or_else(|| self.malformed(TIME_FIELD, format!("{raw} is not an integer")))?;

        let ts = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| self.malformed(TIME_FIELD, format!("{millis} is out of range")))?;

        Ok(ts.year())
    }

    fn number(&self, value: &Value) -> Result<f64, AggregateError> {
        value
            .as_f64()
            .ok_or_else(|| self.malformed(COORDINATES_FIELD, format!("{value} is not a number")))
    }

    fn malformed(&self, field: &'static str, reason: String) -> AggregateError {
        AggregateError::MalformedRecord {
            index: self.index,
            field,
            reason,
        }
    }
}

/// Ordered records from one query, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCollection {
    records: Vec<EventRecord>,
    /// Title reported by the API, if any.
    pub title: Option<String>,
    /// Record count the API claims in its metadata, if any.
    pub reported_count: Option<u64>,
}

impl EventCollection {
    /// Builds a collection, numbering records by their position.
    pub fn new(mut records: Vec<EventRecord>) -> Self {
        for (i, r) in records.iter_mut().enumerate() {
            r.index = i;
        }
        Self {
            records,
            title: None,
            reported_count: None,
        }
    }

    pub fn with_metadata(mut self, title: Option<String>, reported_count: Option<u64>) -> Self {
        self.title = title;
        self.reported_count = reported_count;
        self
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }
}
