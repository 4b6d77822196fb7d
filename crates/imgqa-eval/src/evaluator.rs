use std::time::Instant;

use imgqa_image::{ops::check_same_shape, Image, ImageDtype};
use imgqa_imgproc::{
    metrics::{psnr, ssim_with},
    preprocess::prepare_with,
};
use log::{info, warn};
use ndarray::ArrayViewD;

use crate::{
    config::{ErrorPolicy, EvalConfig, Metric},
    csv_sink::CsvResultSink,
    error::EvalError,
    sink::{BatchSummary, ResultSink},
};

/// Evaluates generated images against their references at the end of an epoch.
///
/// # Example
///
/// ```
/// use imgqa_eval::{EvalConfig, Evaluator, MemoryResultSink};
/// use imgqa_image::{Image, ImageSize};
///
/// let size = ImageSize { width: 16, height: 16 };
/// let generated = vec![Image::from_size_val(size, 3, 0u8)];
/// let reference = vec![Image::from_size_val(size, 3, 255u8)];
///
/// let evaluator = Evaluator::new(EvalConfig::default());
/// let mut sink = MemoryResultSink::default();
/// let summary = evaluator.evaluate(&generated, &reference, 1, &mut sink).unwrap();
///
/// assert_eq!(summary.count, 1);
/// assert_eq!(summary.mean, 0.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Create an evaluator from a configuration.
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// The configuration of the evaluator.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Prepare one pair and compute the configured metric.
    ///
    /// The shapes are compared before any preprocessing, so a color image is
    /// never paired with a gray one even when both reduce to the same luma shape.
    ///
    /// # Errors
    ///
    /// * [`imgqa_image::ImageError::ShapeMismatch`] if the raw images differ in shape.
    /// * The image error of the preprocessing or the metric.
    pub fn evaluate_pair<T: ImageDtype>(
        &self,
        generated: ArrayViewD<'_, T>,
        reference: ArrayViewD<'_, T>,
    ) -> Result<f64, EvalError> {
        check_same_shape(&generated, &reference)?;

        let options = self.config.prepare_options();
        let generated = prepare_with(generated, &options)?;
        let reference = prepare_with(reference, &options)?;

        let value = match self.config.metric {
            Metric::Psnr => psnr(reference.view(), generated.view(), self.config.data_range)?,
            Metric::Ssim => ssim_with(
                reference.view(),
                generated.view(),
                self.config.ssim_policy,
            )?,
        };

        Ok(value)
    }

    /// Evaluate a batch of pairs, paired by index, and report to `sink`.
    ///
    /// Every evaluated image is recorded as `image_<index>`; the sink is
    /// finished with the batch mean once the loop completes.
    ///
    /// # Arguments
    ///
    /// * `generated` - The generated images.
    /// * `reference` - The ground truth images, same length as `generated`.
    /// * `epoch` - The epoch the results belong to.
    /// * `sink` - The destination of the results.
    ///
    /// # Errors
    ///
    /// * [`EvalError::LengthMismatch`] if the two sequences differ in length.
    /// * [`EvalError::EmptyBatch`] if no pair could be evaluated.
    /// * The first pair error with [`ErrorPolicy::Abort`].
    /// * Any error of the sink.
    pub fn evaluate<T, S>(
        &self,
        generated: &[Image<T>],
        reference: &[Image<T>],
        epoch: u32,
        sink: &mut S,
    ) -> Result<BatchSummary, EvalError>
    where
        T: ImageDtype,
        S: ResultSink + ?Sized,
    {
        check_batch(generated, reference)?;

        let metric = self.config.metric;
        if self.config.test_y {
            info!("Testing Y channel.");
        } else {
            info!("Testing RGB channels.");
        }

        let start = Instant::now();
        let (mut count, mut skipped, mut sum) = (0usize, 0usize, 0.0f64);

        for (i, (gen, gt)) in generated.iter().zip(reference.iter()).enumerate() {
            match self.evaluate_pair(gen.view(), gt.view()) {
                Ok(value) => {
                    sink.record(epoch, &format!("image_{i}"), value)?;
                    sum += value;
                    count += 1;
                }
                Err(err) => match self.config.on_error {
                    ErrorPolicy::Abort => return Err(err),
                    ErrorPolicy::Skip => {
                        warn!("skipping image {i}: {err}");
                        skipped += 1;
                    }
                },
            }

            if self.config.log_every > 0 && i % self.config.log_every == 0 {
                info!("=== {metric} is processing {i:>3}-th image ===");
            }
        }

        if count == 0 {
            return Err(EvalError::EmptyBatch);
        }

        let summary = BatchSummary {
            metric,
            epoch,
            count,
            skipped,
            sum,
            mean: sum / count as f64,
        };

        info!(
            "Complete the {metric} test of {count} images ({skipped} skipped), took {:.2?}",
            start.elapsed()
        );
        info!("Average {metric}: {}", summary.mean);

        sink.finish(&summary)?;

        Ok(summary)
    }

    /// Evaluate a batch and write the CSV tables into the configured result directory.
    ///
    /// See [`Evaluator::evaluate`] and [`CsvResultSink`]. The tables are only
    /// written once the whole batch succeeded.
    pub fn evaluate_to_dir<T: ImageDtype>(
        &self,
        generated: &[Image<T>],
        reference: &[Image<T>],
        epoch: u32,
    ) -> Result<BatchSummary, EvalError> {
        check_batch(generated, reference)?;

        let mut sink = CsvResultSink::create(&self.config.result_dir, self.config.metric, epoch)?;
        self.evaluate(generated, reference, epoch, &mut sink)
    }
}

/// Check that a batch pairs up and is not empty.
fn check_batch<T>(generated: &[Image<T>], reference: &[Image<T>]) -> Result<(), EvalError> {
    if generated.len() != reference.len() {
        return Err(EvalError::LengthMismatch(generated.len(), reference.len()));
    }
    if generated.is_empty() {
        return Err(EvalError::EmptyBatch);
    }
    Ok(())
}
