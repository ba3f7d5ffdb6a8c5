use polars::prelude::*;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

use crate::catalog::Column as Field;
use crate::domain::DruidError;

/// One data row of the statistics file, one string per catalog field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Result<Self, DruidError> {
        if fields.len() != Field::COUNT {
            return Err(DruidError::LoadingFailed(format!(
                "record needs {} fields, got {}",
                Field::COUNT,
                fields.len()
            )));
        }
        Ok(Self { fields })
    }

    pub fn get(&self, field: Field) -> &str {
        &self.fields[field.index()]
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

// Cells of one CSV column, in row order.
struct ColumnCells {
    idx: usize,
    data: Vec<String>,
}

/// Load every data row of the CSV file at `path`, discarding the header.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_data(path: &Path) -> Result<Vec<Record>, DruidError> {
    check_file(path)?;

    let start_time = Instant::now();
    let rows = check_row_lengths(path)?;
    let df = load_csv(path)?.collect()?;
    if df.width() != Field::COUNT {
        return Err(DruidError::ColumnCount {
            expected: Field::COUNT,
            found: df.width(),
        });
    }

    // Convert each column in its own rayon task, then transpose into rows.
    let c_: Result<Vec<ColumnCells>, PolarsError> = df
        .get_column_names()
        .par_iter()
        .enumerate()
        .map(|(idx, name)| load_column(&df, idx, name))
        .collect();
    let mut columns = c_?;
    columns.sort_unstable_by_key(|c| c.idx);

    let records = transpose(columns, df.height())?;
    if records.len() != rows {
        debug!("Checked {rows} rows, polars produced {}", records.len());
    }
    let data_loading_duration = start_time.elapsed().as_millis();
    info!(
        "Loaded {} records in {data_loading_duration}ms ...",
        records.len()
    );
    Ok(records)
}

fn check_file(path: &Path) -> Result<(), DruidError> {
    let metadata = fs::metadata(path).map_err(|e| open_error(path, e))?;
    if !metadata.is_file() {
        return Err(DruidError::LoadingFailed("Not a file!".into()));
    }
    debug!("Data file has {} bytes", metadata.len());
    Ok(())
}

fn open_error(path: &Path, e: io::Error) -> DruidError {
    match e.kind() {
        ErrorKind::NotFound => DruidError::FileNotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => DruidError::PermissionDenied(path.to_path_buf()),
        _ => DruidError::IoError(e),
    }
}

/// Check the header width, count the data rows and fail on the first row
/// with too few fields. Blank lines are not rows. Rows with too many fields
/// are left to polars.
fn check_row_lengths(path: &Path) -> Result<usize, DruidError> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let width = rdr.headers()?.len();
    if width != Field::COUNT {
        return Err(DruidError::ColumnCount {
            expected: Field::COUNT,
            found: width,
        });
    }

    let mut rows = 0;
    for (record, result) in rdr.records().enumerate() {
        let fields = result?;
        if fields.len() < Field::COUNT {
            return Err(DruidError::ShortRecord {
                record,
                expected: Field::COUNT,
                found: fields.len(),
            });
        }
        rows += 1;
    }
    Ok(rows)
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    // No schema inference: every field stays a string, empty fields stay
    // empty strings.
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_missing_is_null(false)
        .finish()
}

fn load_column(df: &DataFrame, idx: usize, col_name: &str) -> Result<ColumnCells, PolarsError> {
    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    let data = series
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect();
    Ok(ColumnCells { idx, data })
}

// A row with every field empty comes from a blank line and is dropped.
fn transpose(mut columns: Vec<ColumnCells>, nrows: usize) -> Result<Vec<Record>, DruidError> {
    let mut cells: Vec<_> = columns
        .iter_mut()
        .map(|c| std::mem::take(&mut c.data).into_iter())
        .collect();

    let mut records = Vec::with_capacity(nrows);
    for row in 0..nrows {
        let fields: Vec<String> = cells
            .iter_mut()
            .map(|column| column.next().unwrap_or_default())
            .collect();
        if fields.iter().all(String::is_empty) {
            trace!("Skipping blank row {row}");
            continue;
        }
        records.push(Record::new(fields)?);
    }
    Ok(records)
}
