use serde::Serialize;

use crate::{config::Metric, error::EvalError};

/// Aggregate of one evaluation pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchSummary {
    /// The metric that was computed.
    pub metric: Metric,
    /// The epoch the pass belongs to.
    pub epoch: u32,
    /// Number of pairs that contributed to the mean.
    pub count: usize,
    /// Number of pairs left out after an error.
    pub skipped: usize,
    /// Running sum of the per-image values.
    pub sum: f64,
    /// Mean of the per-image values.
    pub mean: f64,
}

/// A single per-image result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    /// The epoch the value belongs to.
    pub epoch: u32,
    /// Label of the image, e.g. `image_3`.
    pub label: String,
    /// The metric value.
    pub value: f64,
}

/// Destination of evaluation results.
///
/// A sink receives one [`ResultSink::record`] call per evaluated image and a
/// final [`ResultSink::finish`] call with the batch mean.
pub trait ResultSink {
    /// Store the metric value of one image.
    fn record(&mut self, epoch: u32, label: &str, value: f64) -> Result<(), EvalError>;

    /// Store the aggregate of the pass and flush pending output.
    fn finish(&mut self, summary: &BatchSummary) -> Result<(), EvalError>;
}

/// A sink keeping every result in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryResultSink {
    /// Per-image results in evaluation order.
    pub records: Vec<Record>,
    /// One summary per finished pass.
    pub summaries: Vec<BatchSummary>,
}

impl ResultSink for MemoryResultSink {
    fn record(&mut self, epoch: u32, label: &str, value: f64) -> Result<(), EvalError> {
        self.records.push(Record {
            epoch,
            label: label.to_string(),
            value,
        });
        Ok(())
    }

    fn finish(&mut self, summary: &BatchSummary) -> Result<(), EvalError> {
        self.summaries.push(summary.clone());
        Ok(())
    }
}
