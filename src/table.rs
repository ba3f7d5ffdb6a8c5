use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

use crate::catalog::Column;
use crate::data::Record;
use crate::domain::DruidError;

/// Columns shown by the table, in display order.
pub const DISPLAY_COLUMNS: [Column; 2] = [Column::Size, Column::Name];

const ANIMAL: &str = "animal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Size {
    Fine,
    Diminutive,
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
    Colossal,
}

impl Size {
    pub fn parse(value: &str) -> Result<Size, DruidError> {
        match value.to_lowercase().as_str() {
            "fine" => Ok(Size::Fine),
            "diminutive" => Ok(Size::Diminutive),
            "tiny" => Ok(Size::Tiny),
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            "large" => Ok(Size::Large),
            "huge" => Ok(Size::Huge),
            "gargantuan" => Ok(Size::Gargantuan),
            "colossal" => Ok(Size::Colossal),
            _ => Err(DruidError::InvalidSize(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// How values of a sortable column are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sorter {
    Lexicographic,
    SizeScale,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Text(String),
    Size(Size),
}

impl Sorter {
    fn key(&self, value: &str) -> Result<SortKey, DruidError> {
        match self {
            Sorter::Lexicographic => Ok(SortKey::Text(value.to_string())),
            Sorter::SizeScale => Size::parse(value).map(SortKey::Size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Index of the source record.
    pub key: usize,
    pub size: String,
    pub name: String,
}

impl DisplayRow {
    pub fn value(&self, column: Column) -> Option<&str> {
        match column {
            Column::Size => Some(&self.size),
            Column::Name => Some(&self.name),
            _ => None,
        }
    }
}

/// Direction last applied to each column.
#[derive(Debug, Default)]
pub struct SortState {
    applied: HashMap<Column, SortDirection>,
}

impl SortState {
    /// Direction the next sort of `column` will use.
    pub fn next(&self, column: Column) -> SortDirection {
        self.applied
            .get(&column)
            .map(|d| d.flip())
            .unwrap_or(SortDirection::Ascending)
    }

    pub fn get(&self, column: Column) -> Option<SortDirection> {
        self.applied.get(&column).copied()
    }

    fn toggle(&mut self, column: Column) -> SortDirection {
        let direction = self.next(column);
        self.applied.insert(column, direction);
        direction
    }
}

/// Display projection of the records, filtered to animals and sortable by
/// size or name.
pub struct SortableTable {
    records: Arc<[Record]>,
    rows: Vec<DisplayRow>,
    sorters: HashMap<Column, Sorter>,
    sort_state: SortState,
}

impl SortableTable {
    pub fn new(records: Arc<[Record]>) -> Self {
        let sorters = HashMap::from([
            (Column::Name, Sorter::Lexicographic),
            (Column::Size, Sorter::SizeScale),
        ]);
        Self {
            records,
            rows: Vec::new(),
            sorters,
            sort_state: SortState::default(),
        }
    }

    pub fn columns(&self) -> [Column; 2] {
        DISPLAY_COLUMNS
    }

    pub fn populate(&mut self) {
        self.rows.clear();
        self.rows.extend(
            self.records
                .iter()
                .enumerate()
                .filter(|(_, record)| record.get(Column::Type) == ANIMAL)
                .map(|(key, record)| DisplayRow {
                    key,
                    size: record.get(Column::Size).to_string(),
                    name: record.get(Column::Name).to_string(),
                }),
        );
        debug!(
            "Populated {} of {} records",
            self.rows.len(),
            self.records.len()
        );
    }

    /// Sort the rows by `column`, alternating ascending and descending on
    /// repeated calls. On error neither the row order nor the sort state
    /// changes.
    #[instrument(skip(self))]
    pub fn sort_by(&mut self, column: Column) -> Result<SortDirection, DruidError> {
        let sorter = *self
            .sorters
            .get(&column)
            .ok_or_else(|| DruidError::UnknownColumn(column.key().to_string()))?;

        let keys = self
            .rows
            .iter()
            .map(|row| sorter.key(row.value(column).unwrap_or_default()))
            .collect::<Result<Vec<SortKey>, DruidError>>()?;

        let direction = self.sort_state.toggle(column);
        let mut keyed: Vec<(SortKey, DisplayRow)> =
            keys.into_iter().zip(self.rows.drain(..)).collect();
        keyed.sort_by(|(a, _), (b, _)| match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        });
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
        trace!("Sorted {} rows {:?}", self.rows.len(), direction);
        Ok(direction)
    }

    pub fn sort_direction(&self, column: Column) -> Option<SortDirection> {
        self.sort_state.get(column)
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&DisplayRow> {
        self.rows.get(idx)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
