use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{PipelineError, Result};
use super::model::{Dataset, Sample};

/// Column order of every supported format.
const COLUMNS: [&str; 3] = ["frame", "angle", "t_absolute"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, then `frame,angle,t_absolute` (header names ignored)
/// * `.json`    – `[{ "frame": 0, "angle": 12.3, "t_absolute": 0.01 }, ...]`
/// * `.parquet` – columns `frame`, `angle` and `t_absolute` of any numeric type
pub fn load_file(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PipelineError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io(e),
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(file)?,
        "json" => read_json(BufReader::new(file))?,
        "parquet" | "pq" => read_parquet(file)?,
        other => {
            return Err(PipelineError::format(format!(
                "unsupported file extension: .{other}"
            )))
        }
    };

    log::info!("Loaded {} samples from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a comma-delimited table with exactly three numeric columns.
///
/// The first line is a header and its names are not interpreted, but a first
/// line made only of numbers is reported as a missing header rather than
/// silently swallowing a data row.
pub fn read_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?;
    if headers.len() != COLUMNS.len() {
        return Err(PipelineError::format(format!(
            "header has {} columns, expected {} ({})",
            headers.len(),
            COLUMNS.len(),
            COLUMNS.join(", ")
        )));
    }
    if headers.iter().all(|h| h.parse::<f64>().is_ok()) {
        return Err(PipelineError::format("missing header row"));
    }

    let mut dataset = Dataset::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        // 1-based line number, counting the header
        let line = row_no + 2;

        if record.len() != COLUMNS.len() {
            return Err(PipelineError::format(format!(
                "line {line}: {} columns, expected {}",
                record.len(),
                COLUMNS.len()
            )));
        }

        let frame = parse_frame(&record[0], line)?;
        let angle = parse_number(&record[1], line, COLUMNS[1])?;
        let t_absolute = parse_number(&record[2], line, COLUMNS[2])?;

        dataset.push(Sample {
            frame,
            angle,
            t_absolute,
        });
    }

    ensure_rows(dataset)
}

fn parse_number(cell: &str, line: usize, col: &str) -> Result<f64> {
    let value: f64 = cell.parse().map_err(|_| {
        PipelineError::format(format!("line {line}, {col}: '{cell}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(PipelineError::format(format!(
            "line {line}, {col}: '{cell}' is not finite"
        )));
    }
    Ok(value)
}

/// Frames are integers, but tables exported from float arrays write `3.0`.
fn parse_frame(cell: &str, line: usize) -> Result<u64> {
    if let Ok(frame) = cell.parse::<u64>() {
        return Ok(frame);
    }
    let value = parse_number(cell, line, COLUMNS[0])?;
    frame_from_f64(value).ok_or_else(|| {
        PipelineError::format(format!(
            "line {line}, frame: '{cell}' is not a non-negative integer"
        ))
    })
}

fn frame_from_f64(value: f64) -> Option<u64> {
    (value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then_some(value as u64)
}

fn ensure_rows(dataset: Dataset) -> Result<Dataset> {
    if dataset.is_empty() {
        return Err(PipelineError::format("no data rows"));
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, one object per frame.
pub fn read_json<R: Read>(source: R) -> Result<Dataset> {
    let samples: Vec<Sample> = serde_json::from_reader(source)?;

    if let Some((i, _)) = samples
        .iter()
        .enumerate()
        .find(|(_, s)| !s.angle.is_finite() || !s.t_absolute.is_finite())
    {
        return Err(PipelineError::format(format!("record {i}: non-finite value")));
    }

    ensure_rows(samples.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with `frame`, `angle` and `t_absolute` columns.
///
/// Integer and float columns are both accepted; everything is cast to
/// `Float64` before validation, so files written by Pandas and Polars load
/// the same way.
fn read_parquet(file: File) -> Result<Dataset> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut frames = Vec::new();
    let mut angles = Vec::new();
    let mut times = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        for raw in numeric_column(&batch, COLUMNS[0])? {
            let frame = frame_from_f64(raw).ok_or_else(|| {
                PipelineError::format(format!(
                    "row {}: frame {raw} is not a non-negative integer",
                    frames.len()
                ))
            })?;
            frames.push(frame);
        }
        angles.extend(numeric_column(&batch, COLUMNS[1])?);
        times.extend(numeric_column(&batch, COLUMNS[2])?);
    }

    ensure_rows(Dataset::from_columns(frames, angles, times)?)
}

/// Extract a named column of a record batch as finite `f64`s.
fn numeric_column(batch: &RecordBatch, name: &str) -> Result<Vec<f64>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| PipelineError::format(format!("Parquet file missing '{name}' column")))?;

    let column = cast(batch.column(idx), &DataType::Float64)?;
    let values = column
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| PipelineError::format(format!("column '{name}' is not numeric")))?;

    values
        .iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(PipelineError::format(format!(
                "row {row}, {name}: missing or non-finite value"
            ))),
        })
        .collect()
}
