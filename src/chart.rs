//! Year-based time charts rendered as text.

use crate::stats::YearlyStats;

/// One named series of `(year, value)` points, ascending by year.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

impl Series {
    fn max(&self) -> f64 {
        self.points.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }
}

/// Events-per-year and average-magnitude series sharing an integer year axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeChart {
    pub counts: Series,
    pub averages: Series,
}

impl TimeChart {
    pub fn from_yearly(yearly: &YearlyStats) -> Self {
        let counts = yearly.iter().map(|(y, s)| (y, s.count as f64)).collect();
        let averages = yearly.iter().map(|(y, s)| (y, s.mean_magnitude)).collect();

        Self {
            counts: Series {
                name: "events per year".to_string(),
                points: counts,
            },
            averages: Series {
                name: "average magnitude".to_string(),
                points: averages,
            },
        }
    }

    /// Renders both series, one row per year, bars at most `width` characters.
    pub fn render(&self, width: usize) -> String {
        let mut out = String::new();
        render_series(&mut out, &self.counts, width, 0);
        out.push('\n');
        render_series(&mut out, &self.averages, width, 2);
        out
    }
}

fn render_series(out: &mut String, series: &Series, width: usize, precision: usize) {
    out.push_str(&series.name);
    out.push('\n');

    if series.points.is_empty() {
        out.push_str("  (no data)\n");
        return;
    }

    let max = series.max();
    for (year, value) in &series.points {
        let len = if max > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        let bar = "#".repeat(len);
        out.push_str(&format!("{year:>6} | {bar:<width$} {value:.precision$}\n"));
    }
}
