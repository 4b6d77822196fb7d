use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::{
    config::Metric,
    error::EvalError,
    sink::{BatchSummary, ResultSink},
};

/// Format a metric value rounded to 6 decimals.
///
/// The text matches the float formatting of the historical result tables:
/// integral values keep a `.0`, magnitudes below `1e-4` or from `1e16` use an
/// exponent with at least two digits, and identical images give `inf`.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }

    // `{:.6}` rounds the exact binary value, ties to even
    let rounded = format!("{value:.6}").parse::<f64>().unwrap_or(value);

    let magnitude = rounded.abs();
    if rounded != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{rounded:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        }
    } else {
        format!("{rounded:?}")
    }
}

/// A sink writing two CSV tables into a result directory.
///
/// * `<METRIC>_epoch_<epoch>.csv`: header `image_name,<metric>`, one row per
///   image and a final `Average` row. Replaced as a whole.
/// * `<METRIC>_total_results_epoch_avg<metric>.csv`: header
///   `epoch,avg_<metric>`, one row per finished epoch. Appended to.
///
/// Rows are kept in memory until [`ResultSink::finish`]. A sink dropped before
/// that leaves both tables as they were.
#[derive(Debug)]
pub struct CsvResultSink {
    metric: Metric,
    epoch: u32,
    epoch_path: PathBuf,
    total_path: PathBuf,
    rows: Vec<[String; 2]>,
}

impl CsvResultSink {
    /// Create the result directory if needed and resolve both table paths.
    ///
    /// No table is touched before [`ResultSink::finish`].
    ///
    /// # Arguments
    ///
    /// * `dir` - The directory receiving the tables.
    /// * `metric` - The metric naming the files and columns.
    /// * `epoch` - The epoch of the per-image table.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(dir: impl AsRef<Path>, metric: Metric, epoch: u32) -> Result<Self, EvalError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let epoch_path = dir.join(format!("{}_epoch_{}.csv", metric.file_prefix(), epoch));
        let total_path = dir.join(format!(
            "{}_total_results_epoch_avg{}.csv",
            metric.file_prefix(),
            metric.column()
        ));

        Ok(Self {
            metric,
            epoch,
            epoch_path,
            total_path,
            rows: Vec::new(),
        })
    }

    /// Path of the per-image table.
    pub fn epoch_path(&self) -> &Path {
        &self.epoch_path
    }

    /// Path of the cumulative per-epoch table.
    pub fn total_path(&self) -> &Path {
        &self.total_path
    }

    /// Write the per-image table next to its destination, then move it in place.
    fn write_epoch_table(&mut self, mean: &str) -> Result<(), EvalError> {
        let mut tmp_path = self.epoch_path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp_path)?;
            writer.write_record(["image_name", self.metric.column()])?;
            for row in self.rows.drain(..) {
                writer.write_record(&row)?;
            }
            writer.write_record(["Average", mean])?;
            writer.flush()?;
        }

        fs::rename(&tmp_path, &self.epoch_path)?;
        Ok(())
    }

    fn append_total(&self, epoch: u32, mean: &str) -> Result<(), EvalError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.total_path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            let column = format!("avg_{}", self.metric.column());
            writer.write_record(["epoch", column.as_str()])?;
        }
        writer.write_record([epoch.to_string().as_str(), mean])?;
        writer.flush()?;

        Ok(())
    }
}

impl ResultSink for CsvResultSink {
    fn record(&mut self, epoch: u32, label: &str, value: f64) -> Result<(), EvalError> {
        if epoch != self.epoch {
            log::warn!(
                "record of epoch {epoch} written to the table of epoch {}",
                self.epoch
            );
        }
        self.rows.push([label.to_string(), format_value(value)]);
        Ok(())
    }

    fn finish(&mut self, summary: &BatchSummary) -> Result<(), EvalError> {
        let mean = format_value(summary.mean);

        self.write_epoch_table(&mean)?;
        self.append_total(summary.epoch, &mean)?;

        log::debug!(
            "wrote results to {} and {}",
            self.epoch_path.display(),
            self.total_path.display()
        );

        Ok(())
    }
}
