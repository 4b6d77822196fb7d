/// An error type for the evaluation module.
#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    /// Error computing a metric on an image pair.
    #[error("Failed to evaluate the image pair. {0}")]
    Image(#[from] imgqa_image::ImageError),

    /// Error to create or write a result file.
    #[error("Failed to manipulate the file. {0}")]
    Io(#[from] std::io::Error),

    /// Error to write a CSV record.
    #[error("Failed to write the CSV record. {0}")]
    Csv(#[from] csv::Error),

    /// Error to parse the configuration.
    #[error("Failed to parse the configuration. {0}")]
    Config(#[from] serde_json::Error),

    /// The generated and reference sequences have different lengths.
    #[error("Got {0} generated images but {1} reference images")]
    LengthMismatch(usize, usize),

    /// No image pair could be evaluated.
    #[error("No image pair was evaluated")]
    EmptyBatch,
}
