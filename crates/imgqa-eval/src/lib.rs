#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// evaluation configuration.
pub mod config;

/// CSV tables written per epoch.
pub mod csv_sink;

/// Error types for the evaluation module.
pub mod error;

/// batch evaluation driver.
pub mod evaluator;

/// result sink abstraction.
pub mod sink;

pub use crate::config::{ErrorPolicy, EvalConfig, Metric};
pub use crate::csv_sink::CsvResultSink;
pub use crate::error::EvalError;
pub use crate::evaluator::Evaluator;
pub use crate::sink::{BatchSummary, MemoryResultSink, Record, ResultSink};
