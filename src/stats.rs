//! Aggregation over an [`EventCollection`]: counts, peak events and per-year statistics.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::AggregateError;
use crate::event::{EventCollection, EventRecord, Location};

/// The strongest event(s) of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakEvents {
    pub magnitude: f64,
    /// Locations of every event at `magnitude`, in collection order.
    pub locations: Vec<Location>,
}

/// Count and mean magnitude for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearStats {
    pub count: usize,
    pub mean_magnitude: f64,
}

/// Per-year statistics keyed by UTC year, iterated in ascending order.
///
/// Only years with at least one event carrying a magnitude are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearlyStats(BTreeMap<i32, YearStats>);

impl YearlyStats {
    pub fn get(&self, year: i32) -> Option<&YearStats> {
        self.0.get(&year)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &YearStats)> {
        self.0.iter().map(|(y, s)| (*y, s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Number of records, whether or not they carry a magnitude.
pub fn count(collection: &EventCollection) -> usize {
    collection.len()
}

/// Finds the maximum magnitude and the locations of every event reaching it.
///
/// Ties are decided by exact floating-point equality on the reported value.
///
/// # Errors
///
/// [`AggregateError::EmptyData`] if no record has a magnitude, and
/// [`AggregateError::MalformedRecord`] if a peak record has unusable coordinates.
pub fn find_peak(collection: &EventCollection) -> Result<PeakEvents, AggregateError> {
    let magnitude = collection
        .iter()
        .filter_map(EventRecord::magnitude)
        .reduce(f64::max)
        .ok_or(AggregateError::EmptyData)?;

    let locations = collection
        .iter()
        .filter(|r| r.magnitude() == Some(magnitude))
        .map(EventRecord::coordinates)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(magnitude, peaks = locations.len(), "Peak magnitude found");

    Ok(PeakEvents {
        magnitude,
        locations,
    })
}

/// Groups events with a magnitude by UTC year and averages them.
///
/// # Errors
///
/// [`AggregateError::MalformedRecord`] if any event with a magnitude has a
/// missing or invalid timestamp. Events without a magnitude are skipped
/// before their timestamp is read.
pub fn annual_stats(collection: &EventCollection) -> Result<YearlyStats, AggregateError> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();

    for record in collection.iter() {
        let Some(magnitude) = record.magnitude() else {
            continue;
        };
        by_year.entry(record.year()?).or_default().push(magnitude);
    }

    let stats = by_year
        .into_iter()
        .map(|(year, mags)| {
            (
                year,
                YearStats {
                    count: mags.len(),
                    mean_magnitude: mean(&mags),
                },
            )
        })
        .collect();

    Ok(YearlyStats(stats))
}

/// Everything a reporter needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub peak: Option<PeakEvents>,
    pub yearly: YearlyStats,
}

impl Summary {
    /// Runs every aggregate over `collection`.
    ///
    /// A collection with no magnitudes yields `peak: None` rather than an
    /// error; malformed records abort.
    pub fn from_collection(collection: &EventCollection) -> Result<Self, AggregateError> {
        let peak = match find_peak(collection) {
            Ok(p) => Some(p),
            Err(AggregateError::EmptyData) => {
                warn!(records = collection.len(), "No event carries a magnitude");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Summary {
            count: count(collection),
            peak,
            yearly: annual_stats(collection)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2001-01-01T00:00:00Z and 2002-01-01T00:00:00Z
    const Y2001: i64 = 978_307_200_000;
    const Y2002: i64 = 1_009_843_200_000;

    fn rec(mag: Option<f64>, lon: f64, lat: f64) -> EventRecord {
        EventRecord::new(mag, vec![lon, lat], Some(Y2001))
    }

    fn dated(mag: Option<f64>, millis: i64) -> EventRecord {
        EventRecord::new(mag, vec![0.0, 0.0], Some(millis))
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_count_includes_absent_magnitudes() {
        let c = EventCollection::new(vec![rec(None, 0.0, 0.0), rec(Some(1.0), 0.0, 0.0)]);
        assert_eq!(count(&c), 2);
        assert_eq!(count(&EventCollection::default()), 0);
    }

    #[test]
    fn test_find_peak_ties_keep_order() {
        let c = EventCollection::new(vec![
            rec(Some(3.1), 1.0, 1.0),
            rec(Some(5.0), 2.0, 2.0),
            rec(Some(5.0), 3.0, 3.0),
            rec(Some(2.0), 4.0, 4.0),
        ]);

        let peak = find_peak(&c).unwrap();
        assert_eq!(peak.magnitude, 5.0);
        assert_eq!(
            peak.locations,
            vec![Location { lon: 2.0, lat: 2.0 }, Location { lon: 3.0, lat: 3.0 }]
        );
    }

    #[test]
    fn test_find_peak_order_tracks_input_order() {
        let c = EventCollection::new(vec![
            rec(Some(5.0), 3.0, 3.0),
            rec(Some(2.0), 4.0, 4.0),
            rec(Some(5.0), 2.0, 2.0),
            rec(Some(3.1), 1.0, 1.0),
        ]);

        let peak = find_peak(&c).unwrap();
        assert_eq!(
            peak.locations,
            vec![Location { lon: 3.0, lat: 3.0 }, Location { lon: 2.0, lat: 2.0 }]
        );
    }

    #[test]
    fn test_find_peak_skips_absent_magnitudes() {
        let c = EventCollection::new(vec![rec(None, 9.0, 9.0), rec(Some(1.2), 1.0, 2.0)]);
        let peak = find_peak(&c).unwrap();
        assert_eq!(peak.magnitude, 1.2);
        assert_eq!(peak.locations.len(), 1);
    }

    #[test]
    fn test_find_peak_exact_equality_only() {
        let c = EventCollection::new(vec![
            rec(Some(0.1 + 0.2), 1.0, 1.0),
            rec(Some(0.3), 2.0, 2.0),
        ]);
        let peak = find_peak(&c).unwrap();
        assert_eq!(peak.locations, vec![Location { lon: 1.0, lat: 1.0 }]);
    }

    #[test]
    fn test_find_peak_all_absent() {
        let c = EventCollection::new(vec![rec(None, 0.0, 0.0), rec(None, 1.0, 1.0)]);
        assert_eq!(find_peak(&c), Err(AggregateError::EmptyData));
    }

    #[test]
    fn test_find_peak_empty() {
        assert_eq!(
            find_peak(&EventCollection::default()),
            Err(AggregateError::EmptyData)
        );
    }

    #[test]
    fn test_find_peak_malformed_peak_location() {
        let c = EventCollection::new(vec![
            rec(Some(1.0), 0.0, 0.0),
            EventRecord::new(Some(4.0), vec![1.0], Some(Y2001)),
        ]);
        assert!(matches!(
            find_peak(&c),
            Err(AggregateError::MalformedRecord { index: 1, .. })
        ));
    }

    #[test]
    fn test_annual_stats_skips_years_without_magnitudes() {
        let c = EventCollection::new(vec![
            dated(Some(1.0), Y2001),
            dated(Some(3.0), Y2001 + 1000),
            dated(None, Y2002),
        ]);

        let stats = annual_stats(&c).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(
            stats.get(2001),
            Some(&YearStats {
                count: 2,
                mean_magnitude: 2.0
            })
        );
        assert_eq!(stats.get(2002), None);
    }

    #[test]
    fn test_annual_stats_iterates_ascending() {
        let c = EventCollection::new(vec![
            dated(Some(2.0), Y2002),
            dated(Some(1.0), Y2001),
            dated(Some(4.0), Y2002),
        ]);

        let stats = annual_stats(&c).unwrap();
        let years: Vec<_> = stats.iter().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2001, 2002]);
        assert_eq!(stats.get(2002).unwrap().mean_magnitude, 3.0);
    }

    #[test]
    fn test_annual_stats_propagates_bad_timestamp() {
        let c = EventCollection::new(vec![
            dated(Some(1.0), Y2001),
            EventRecord::new(Some(2.0), vec![0.0, 0.0], None),
        ]);
        assert!(matches!(
            annual_stats(&c),
            Err(AggregateError::MalformedRecord {
                index: 1,
                field: "properties.time",
                ..
            })
        ));
    }

    #[test]
    fn test_annual_stats_ignores_bad_timestamp_without_magnitude() {
        let c = EventCollection::new(vec![
            dated(Some(1.0), Y2001),
            EventRecord::new(None, vec![], None),
        ]);
        assert_eq!(annual_stats(&c).unwrap().len(), 1);
    }

    #[test]
    fn test_annual_stats_is_idempotent() {
        let c = EventCollection::new(vec![dated(Some(1.5), Y2001), dated(Some(2.5), Y2002)]);
        assert_eq!(annual_stats(&c).unwrap(), annual_stats(&c).unwrap());
    }

    #[test]
    fn test_shuffled_input_same_aggregates() {
        let records = vec![
            dated(Some(1.0), Y2001),
            dated(Some(2.5), Y2002),
            dated(None, Y2002),
            dated(Some(3.0), Y2001),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let a = EventCollection::new(records);
        let b = EventCollection::new(reversed);

        assert_eq!(count(&a), count(&b));
        assert_eq!(annual_stats(&a).unwrap(), annual_stats(&b).unwrap());
        assert_eq!(find_peak(&a).unwrap().magnitude, find_peak(&b).unwrap().magnitude);
    }

    #[test]
    fn test_summary_without_magnitudes_has_no_peak() {
        let c = EventCollection::new(vec![dated(None, Y2001), dated(None, Y2002)]);
        let summary = Summary::from_collection(&c).unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.peak, None);
        assert!(summary.yearly.is_empty());
    }

    #[test]
    fn test_summary_propagates_malformed() {
        let c = EventCollection::new(vec![EventRecord::new(Some(1.0), vec![0.0, 0.0], None)]);
        assert!(Summary::from_collection(&c).is_err());
    }
}
