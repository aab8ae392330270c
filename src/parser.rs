//! GeoJSON parser for USGS event feeds.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::event::{EventCollection, EventRecord};

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    metadata: Option<Metadata>,
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Metadata {
    title: Option<String>,
    count: Option<u64>,
}

#[derive(Deserialize)]
struct Feature {
    id: Option<String>,
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Properties {
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default)]
    time: Option<Value>,
    #[serde(default)]
    place: Option<String>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Option<Value>,
}

/// Decodes a GeoJSON `FeatureCollection` into an [`EventCollection`].
///
/// Null magnitudes are kept as absent values. Times and coordinates are kept
/// raw, so a mistyped value only fails the accessor that reads it.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the bytes are not JSON, the document has
/// no `features` list, or a magnitude is not a number.
pub fn parse_collection(bytes: &[u8]) -> Result<EventCollection, FetchError> {
    let raw: FeatureCollection = serde_json::from_slice(bytes)?;

    let records = raw
        .features
        .into_iter()
        .map(|f| {
            let mut record = EventRecord::new(f.properties.mag, vec![], None);
            record.coordinates = f.geometry.and_then(|g| g.coordinates);
            record.time_millis = f.properties.time;
            record.id = f.id;
            record.place = f.properties.place;
            record
        })
        .collect();

    let (title, count) = raw
        .metadata
        .map(|m| (m.title, m.count))
        .unwrap_or_default();

    Ok(EventCollection::new(records).with_metadata(title, count))
}
