pub mod chart;
pub mod error;
pub mod event;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod source;
pub mod stats;
