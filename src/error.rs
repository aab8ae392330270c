//! Error types shared by the fetch, aggregation and pipeline layers.

/// Failure while obtaining or decoding the event collection.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse event collection: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of a single aggregation call. No partial result is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("record {index}: malformed `{field}`: {reason}")]
    MalformedRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("no event with a magnitude in the collection")]
    EmptyData,
}

/// Everything that can abort [`crate::pipeline::run`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("report failed: {0}")]
    Report(#[source] anyhow::Error),
}
