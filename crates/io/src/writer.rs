//! High-level Parquet writer configuration and orchestration.

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::datatypes::SchemaRef;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tlaloc_synth::{TimeSeries, TimeSeriesBlock};
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_write;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing attenuation series to Parquet.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    // --- Accessors ---

    /// Compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Maximum rows per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn properties(&self) -> Result<WriterProperties, IoError> {
        Ok(WriterProperties::builder()
            .set_compression(self.compression.to_parquet()?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

/// Incremental Parquet writer fed one [`TimeSeriesBlock`] at a time.
///
/// Blocks must arrive in sample order with a consistent site count and
/// sampling interval. Call [`finish`](Self::finish) to write the footer; a
/// writer dropped without `finish` leaves an unreadable file.
pub struct TimeSeriesWriter {
    path: PathBuf,
    writer: ArrowWriter<File>,
    schema: SchemaRef,
    n_sites: Option<usize>,
    next_sample: usize,
    rows_written: usize,
}

impl std::fmt::Debug for TimeSeriesWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeSeriesWriter")
            .field("path", &self.path)
            .field("n_sites", &self.n_sites)
            .field("next_sample", &self.next_sample)
            .field("rows_written", &self.rows_written)
            .finish()
    }
}

impl TimeSeriesWriter {
    /// Creates (or truncates) `path` and prepares a Parquet writer.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`IoError::Validation`] | invalid `config` |
    /// | [`IoError::Access`] | the file cannot be created |
    /// | [`IoError::Parquet`] | writer construction fails |
    pub fn create(path: &Path, config: &WriterConfig) -> Result<Self, IoError> {
        config.validate()?;
        let props = config.properties()?;
        let file = File::create(path).map_err(|e| IoError::Access {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let schema = parquet_write::build_schema();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        debug!(path = %path.display(), compression = ?config.compression, "opened parquet writer");
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            schema,
            n_sites: None,
            next_sample: 0,
            rows_written: 0,
        })
    }

    /// Appends one block.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`IoError::Validation`] | site count differs from earlier blocks, or the block does not start where the previous one ended |
    /// | [`IoError::Parquet`] | encoding or file I/O fails |
    pub fn write_block(&mut self, block: &TimeSeriesBlock) -> Result<(), IoError> {
        let n_sites = *self.n_sites.get_or_insert(block.n_sites());
        let mut problems = Vec::new();
        if block.n_sites() != n_sites {
            problems.push(format!(
                "block has {} sites, expected {n_sites}",
                block.n_sites()
            ));
        }
        if block.start() != self.next_sample {
            problems.push(format!(
                "block starts at sample {}, expected {}",
                block.start(),
                self.next_sample
            ));
        }
        if !problems.is_empty() {
            return Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }

        let batch = parquet_write::to_record_batch(
            block.values().view(),
            block.start(),
            block.sampling_interval_s(),
            &self.schema,
        )?;
        self.writer.write(&batch)?;
        self.rows_written += batch.num_rows();
        self.next_sample = block.end();
        Ok(())
    }

    /// Rows written so far (`sites × samples`).
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Samples per site written so far.
    pub fn samples_written(&self) -> usize {
        self.next_sample
    }

    /// Flushes remaining rows, writes the footer and closes the file.
    ///
    /// Returns the total number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Parquet`] if closing the writer fails.
    pub fn finish(self) -> Result<usize, IoError> {
        self.writer.close()?;
        info!(
            path = %self.path.display(),
            rows = self.rows_written,
            samples = self.next_sample,
            "parquet output complete"
        );
        Ok(self.rows_written)
    }
}

/// Writes an in-memory [`TimeSeries`] to a Parquet file.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Same as [`TimeSeriesWriter::create`] and [`TimeSeriesWriter::finish`].
pub fn write_parquet(
    path: &Path,
    series: &TimeSeries,
    config: &WriterConfig,
) -> Result<usize, IoError> {
    let mut writer = TimeSeriesWriter::create(path, config)?;
    let schema = writer.schema.clone();
    let batch = parquet_write::to_record_batch(
        series.values().view(),
        0,
        series.sampling_interval_s(),
        &schema,
    )?;
    writer.writer.write(&batch)?;
    writer.rows_written = batch.num_rows();
    writer.n_sites = Some(series.n_sites());
    writer.next_sample = series.n_samples();
    writer.finish()
}
