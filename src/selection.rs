use tracing::{error, info, warn};

use crate::catalog::Column;
use crate::domain::DruidError;

/// A table cell was activated, by mouse click or by Enter on the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellSelected {
    pub column_key: Option<String>,
    pub row_key: Option<String>,
    pub value: String,
}

/// Events a table widget reacts to.
pub trait TableEvents {
    fn on_mount(&mut self);

    /// A column header was activated. Sorts by that column.
    fn on_header_activated(&mut self, column_key: &str) -> Result<(), DruidError>;

    /// A cell was activated. Returns the record index to show, if any.
    fn on_cell_activated(&mut self, event: &CellSelected) -> Option<usize>;
}

/// Resolves cell events to indices into the record collection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionBridge {
    record_count: usize,
}

impl SelectionBridge {
    pub fn new(record_count: usize) -> Self {
        Self { record_count }
    }

    /// Only cells of the name column select a record.
    pub fn resolve(&self, event: &CellSelected) -> Option<usize> {
        let column = event.column_key.as_deref().and_then(Column::from_key)?;
        if column != Column::Name {
            return None;
        }

        let Some(row_key) = event.row_key.as_deref() else {
            error!("Name cell \"{}\" has no row key", event.value);
            return None;
        };
        let index = match row_key.parse::<usize>() {
            Ok(index) => index,
            Err(e) => {
                warn!("Row key \"{row_key}\" is not a record index: {e}");
                return None;
            }
        };
        if index >= self.record_count {
            warn!(
                "Row key {index} is outside of {} records",
                self.record_count
            );
            return None;
        }

        info!("Animal selected: {} ({index})", event.value);
        Some(index)
    }
}
