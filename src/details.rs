use crate::catalog::Column;
use crate::data::Record;

/// What the "Selected" tab shows for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDetail {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl RecordDetail {
    /// Name as heading, then every other non-empty field as (title, value).
    pub fn from_record(record: &Record) -> Self {
        let entries = record
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(idx, value)| Column::from_index(idx).map(|c| (c, value)))
            .filter(|(column, _)| *column != Column::Name)
            .map(|(column, value)| (column.title(), value.clone()))
            .collect();
        Self {
            name: record.get(Column::Name).to_string(),
            entries,
        }
    }
}

/// Quote a cell the way a CSV reader expects it.
pub fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = needs_escaping || c.chars().any(|c| c == ',' || c == '\n' || c == '\r');
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping {
        out = format!("\"{out}\"");
    }
    out
}

/// The record as one CSV line, fields in catalog order.
pub fn record_to_csv(record: &Record) -> String {
    record
        .fields()
        .iter()
        .map(|f| wrap_cell_content(f))
        .collect::<Vec<String>>()
        .join(",")
}
