use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;

pub const HELP_TEXT: &str = "\
Navigation
  ↑/k ↓/j      move row           ←/h →/l   move column
  PgUp PgDn    page               g / G     first / last row
  J / K        scroll details

Table
  Enter        show focused creature
  s / n        sort by size / name (again to reverse)
  o            sort by focused column
  mouse        click header to sort, click name to select

Other
  Tab          switch Selected / Logs
  y            copy selected creature as CSV
  ?            this help      Esc  close      q  quit";

#[derive(Debug)]
pub enum DruidError {
    IoError(Error),
    PolarsError(PolarsError),
    CsvError(csv::Error),
    LoadingFailed(String),
    FileNotFound(PathBuf),
    PermissionDenied(PathBuf),
    InvalidPath(String),
    InvalidConfig(String),
    ColumnCount { expected: usize, found: usize },
    ShortRecord { record: usize, expected: usize, found: usize },
    UnknownColumn(String),
    InvalidSize(String),
}

impl fmt::Display for DruidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DruidError::IoError(e) => write!(f, "io error: {e}"),
            DruidError::PolarsError(e) => write!(f, "csv error: {e}"),
            DruidError::CsvError(e) => write!(f, "csv error: {e}"),
            DruidError::LoadingFailed(reason) => write!(f, "loading failed: {reason}"),
            DruidError::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            DruidError::PermissionDenied(path) => {
                write!(f, "permission denied: {}", path.display())
            }
            DruidError::InvalidPath(reason) => write!(f, "invalid path: {reason}"),
            DruidError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            DruidError::ColumnCount { expected, found } => {
                write!(f, "expected {expected} columns, header has {found}")
            }
            DruidError::ShortRecord {
                record,
                expected,
                found,
            } => write!(
                f,
                "record {record} has {found} fields, expected {expected}"
            ),
            DruidError::UnknownColumn(key) => write!(f, "no sorter for column \"{key}\""),
            DruidError::InvalidSize(value) => write!(f, "unknown size \"{value}\""),
        }
    }
}

impl std::error::Error for DruidError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DruidError::IoError(e) => Some(e),
            DruidError::PolarsError(e) => Some(e),
            DruidError::CsvError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for DruidError {
    fn from(err: Error) -> Self {
        DruidError::IoError(err)
    }
}

impl From<csv::Error> for DruidError {
    fn from(err: csv::Error) -> Self {
        DruidError::CsvError(err)
    }
}

impl From<PolarsError> for DruidError {
    fn from(err: PolarsError) -> Self {
        DruidError::PolarsError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub event_poll_time: u64,
    pub log_capacity: usize,
    pub log_level: String,
    #[setters(strip_option)]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            event_poll_time: 100,
            log_capacity: 500,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Mount,
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    Enter,
    Exit,
    SortBySize,
    SortByName,
    SortCurrentColumn,
    NextTab,
    ScrollDetailsUp,
    ScrollDetailsDown,
    CopyRecord,
    Help,
    Click(u16, u16),
    Resize(u16, u16),
}
