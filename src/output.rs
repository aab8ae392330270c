//! Reporting of aggregation results.
//!
//! Supports a plain-text summary, JSON, a CSV year series and a text chart.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::chart::TimeChart;
use crate::stats::{Summary, YearlyStats};

/// Consumes a [`Summary`]; the pipeline's output seam.
pub trait Reporter {
    fn report(&mut self, summary: &Summary) -> Result<()>;
}

/// Human-readable summary followed by the per-year table.
pub struct TextReporter<W> {
    out: W,
    yearly: bool,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, yearly: true }
    }

    /// Skip the per-year table.
    pub fn summary_only(mut self) -> Self {
        self.yearly = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, summary: &Summary) -> Result<()> {
        writeln!(self.out, "Loaded {} earthquakes.", summary.count)?;

        match &summary.peak {
            Some(peak) => {
                let locations: Vec<String> =
                    peak.locations.iter().map(ToString::to_string).collect();
                writeln!(
                    self.out,
                    "The strongest earthquake was at [{}] with magnitude {}.",
                    locations.join(", "),
                    peak.magnitude
                )?;
            }
            None => writeln!(self.out, "No earthquake carries a magnitude.")?,
        }

        if self.yearly {
            writeln!(self.out)?;
            write_year_table(&mut self.out, &summary.yearly)?;
        }

        Ok(())
    }
}

fn write_year_table<W: Write>(out: &mut W, yearly: &YearlyStats) -> Result<()> {
    writeln!(out, "{:>6}  {:>6}  {:>8}", "year", "count", "avg mag")?;
    for (year, stats) in yearly.iter() {
        writeln!(
            out,
            "{:>6}  {:>6}  {:>8.2}",
            year, stats.count, stats.mean_magnitude
        )?;
    }
    Ok(())
}

/// Pretty-printed JSON of the whole summary.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, summary: &Summary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, summary)?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// Text chart of the yearly series.
pub struct ChartReporter<W> {
    out: W,
    width: usize,
}

impl<W: Write> ChartReporter<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self { out, width }
    }
}

impl<W: Write> Reporter for ChartReporter<W> {
    fn report(&mut self, summary: &Summary) -> Result<()> {
        let chart = TimeChart::from_yearly(&summary.yearly);
        write!(self.out, "{}", chart.render(self.width))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct YearRow {
    year: i32,
    count: usize,
    mean_magnitude: f64,
}

/// Appends the yearly series to a CSV file, then hands off to `inner`.
pub struct CsvReporter<R> {
    path: String,
    inner: R,
}

impl<R: Reporter> CsvReporter<R> {
    pub fn new(path: impl Into<String>, inner: R) -> Self {
        Self {
            path: path.into(),
            inner,
        }
    }
}

impl<R: Reporter> Reporter for CsvReporter<R> {
    fn report(&mut self, summary: &Summary) -> Result<()> {
        append_yearly(&self.path, &summary.yearly)?;
        self.inner.report(summary)
    }
}

/// Appends one `year,count,mean_magnitude` row per year to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_yearly(path: &str, yearly: &YearlyStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, years = yearly.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for (year, stats) in yearly.iter() {
        writer.serialize(YearRow {
            year,
            count: stats.count,
            mean_magnitude: stats.mean_magnitude,
        })?;
    }
    writer.flush()?;

    Ok(())
}
