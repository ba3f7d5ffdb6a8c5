use std::sync::Arc;

use ratatui::layout::{Margin, Position, Rect};
use ratatui::widgets::TableState;
use tracing::{debug, info, trace};

use crate::catalog::Column;
use crate::data::Record;
use crate::domain::DruidError;
use crate::selection::{CellSelected, SelectionBridge, TableEvents};
use crate::table::{DISPLAY_COLUMNS, SortDirection, SortableTable};
use crate::ui::{COLUMN_SPACING, SIZE_COLUMN_WIDTH};

/// Where a mouse position landed inside the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Header(Column),
    Cell { row: usize, column: Column },
}

/// State of the animal table widget: rows, sort state and cursor.
pub struct Listing {
    table: SortableTable,
    bridge: SelectionBridge,
    state: TableState,
}

impl Listing {
    pub fn new(records: Arc<[Record]>) -> Self {
        let bridge = SelectionBridge::new(records.len());
        Self {
            table: SortableTable::new(records),
            bridge,
            state: TableState::default().with_selected_column(Some(1)),
        }
    }

    pub fn table(&self) -> &SortableTable {
        &self.table
    }

    pub fn state_mut(&mut self) -> &mut TableState {
        &mut self.state
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn focused_column(&self) -> Column {
        let idx = self.state.selected_column().unwrap_or(0);
        DISPLAY_COLUMNS[idx.min(DISPLAY_COLUMNS.len() - 1)]
    }

    pub fn header_title(&self, column: Column) -> String {
        match self.table.sort_direction(column) {
            Some(SortDirection::Ascending) => format!("{} ▲", column.title()),
            Some(SortDirection::Descending) => format!("{} ▼", column.title()),
            None => column.title(),
        }
    }

    pub fn move_selection_down(&mut self, size: usize) {
        if let Some(last) = self.table.len().checked_sub(1) {
            let row = self.state.selected().map_or(0, |r| r.saturating_add(size));
            self.state.select(Some(row.min(last)));
        }
    }

    pub fn move_selection_up(&mut self, size: usize) {
        if !self.table.is_empty() {
            let row = self.state.selected().map_or(0, |r| r.saturating_sub(size));
            self.state.select(Some(row));
        }
    }

    pub fn move_selection_beginning(&mut self) {
        if !self.table.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn move_selection_end(&mut self) {
        if let Some(last) = self.table.len().checked_sub(1) {
            self.state.select(Some(last));
        }
    }

    pub fn move_selection_left(&mut self) {
        let column = self.state.selected_column().unwrap_or(0);
        self.state.select_column(Some(column.saturating_sub(1)));
    }

    pub fn move_selection_right(&mut self) {
        let column = self.state.selected_column().unwrap_or(0);
        self.state
            .select_column(Some((column + 1).min(DISPLAY_COLUMNS.len() - 1)));
    }

    pub fn focus(&mut self, row: usize, column: Column) {
        if row < self.table.len() {
            self.state.select(Some(row));
        }
        if let Some(idx) = DISPLAY_COLUMNS.iter().position(|c| *c == column) {
            self.state.select_column(Some(idx));
        }
    }

    /// Cell event for a displayed cell, keyed like the toolkit would key it.
    pub fn cell_event(&self, row: usize, column: Column) -> Option<CellSelected> {
        let display_row = self.table.row(row)?;
        Some(CellSelected {
            column_key: Some(column.key().to_string()),
            row_key: Some(display_row.key.to_string()),
            value: display_row.value(column).unwrap_or_default().to_string(),
        })
    }

    pub fn focused_cell(&self) -> Option<CellSelected> {
        self.cell_event(self.state.selected()?, self.focused_column())
    }

    /// Map a terminal position to the header or a cell. `area` is the
    /// bordered area the listing was last rendered into.
    pub fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<Hit> {
        let inner = area.inner(Margin::new(1, 1));
        if !inner.contains(Position::new(x, y)) {
            return None;
        }

        let dx = x - inner.x;
        let column = if dx < SIZE_COLUMN_WIDTH {
            Column::Size
        } else if dx >= SIZE_COLUMN_WIDTH + COLUMN_SPACING {
            Column::Name
        } else {
            return None;
        };

        let dy = y - inner.y;
        let hit = if dy == 0 {
            Hit::Header(column)
        } else {
            let row = self.state.offset() + usize::from(dy - 1);
            if row >= self.table.len() {
                return None;
            }
            Hit::Cell { row, column }
        };
        trace!("Hit test ({x}, {y}) => {hit:?}");
        Some(hit)
    }
}

impl TableEvents for Listing {
    fn on_mount(&mut self) {
        info!("Populating animal listing ...");
        self.table.populate();
        let first = if self.table.is_empty() { None } else { Some(0) };
        self.state.select(first);
    }

    fn on_header_activated(&mut self, column_key: &str) -> Result<(), DruidError> {
        let column = Column::from_key(column_key)
            .ok_or_else(|| DruidError::UnknownColumn(column_key.to_string()))?;
        info!("Sorting animals by {}", column.title());
        let direction = self.table.sort_by(column)?;
        debug!("Sorted {:?}", direction);
        Ok(())
    }

    fn on_cell_activated(&mut self, event: &CellSelected) -> Option<usize> {
        self.bridge.resolve(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::creature;

    fn listing() -> Listing {
        let records: Arc<[Record]> = vec![
            creature("Ant", "animal", "tiny"),
            creature("Bear", "animal", "large"),
            creature("Chair", "furniture", "medium"),
            creature("Wolf", "animal", "medium"),
        ]
        .into();
        let mut listing = Listing::new(records);
        listing.on_mount();
        listing
    }

    fn names(listing: &Listing) -> Vec<&str> {
        listing.table().rows().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn mount_populates_and_selects_first_row() {
        let listing = listing();
        assert_eq!(names(&listing), vec!["Ant", "Bear", "Wolf"]);
        assert_eq!(listing.selected_row(), Some(0));
        assert_eq!(listing.focused_column(), Column::Name);
    }

    #[test]
    fn header_activation_sorts_and_marks_header() {
        let mut listing = listing();
        listing.on_header_activated("size").unwrap();
        assert_eq!(names(&listing), vec!["Ant", "Wolf", "Bear"]);
        assert_eq!(listing.header_title(Column::Size), "Size ▲");
        listing.on_header_activated("size").unwrap();
        assert_eq!(names(&listing), vec!["Bear", "Wolf", "Ant"]);
        assert_eq!(listing.header_title(Column::Size), "Size ▼");
        assert_eq!(listing.header_title(Column::Name), "Name");
    }

    #[test]
    fn unknown_header_key_keeps_order() {
        let mut listing = listing();
        let err = listing.on_header_activated("nope").unwrap_err();
        assert!(matches!(err, DruidError::UnknownColumn(_)));
        assert_eq!(names(&listing), vec!["Ant", "Bear", "Wolf"]);
    }

    #[test]
    fn focused_name_cell_resolves_to_source_record() {
        let mut listing = listing();
        listing.move_selection_down(2);
        let event = listing.focused_cell().unwrap();
        assert_eq!(event.value, "Wolf");
        // Wolf is the fourth record of the source collection.
        assert_eq!(listing.on_cell_activated(&event), Some(3));

        listing.move_selection_left();
        let event = listing.focused_cell().unwrap();
        assert_eq!(event.value, "medium");
        assert_eq!(listing.on_cell_activated(&event), None);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut listing = listing();
        listing.move_selection_down(10);
        assert_eq!(listing.selected_row(), Some(2));
        listing.move_selection_up(10);
        assert_eq!(listing.selected_row(), Some(0));
        listing.move_selection_end();
        assert_eq!(listing.selected_row(), Some(2));
        listing.move_selection_right();
        assert_eq!(listing.focused_column(), Column::Name);
    }

    #[test]
    fn hit_test_maps_header_and_cells() {
        let listing = listing();
        let area = Rect::new(0, 1, 40, 10);
        // Border at y=1, header at y=2, first row at y=3.
        assert_eq!(listing.hit_test(area, 2, 2), Some(Hit::Header(Column::Size)));
        assert_eq!(
            listing.hit_test(area, 1 + SIZE_COLUMN_WIDTH + COLUMN_SPACING, 2),
            Some(Hit::Header(Column::Name))
        );
        assert_eq!(
            listing.hit_test(area, 20, 4),
            Some(Hit::Cell {
                row: 1,
                column: Column::Name
            })
        );
        assert_eq!(listing.hit_test(area, 1 + SIZE_COLUMN_WIDTH, 4), None);
        // Below the last row, and on the border.
        assert_eq!(listing.hit_test(area, 20, 8), None);
        assert_eq!(listing.hit_test(area, 0, 4), None);
    }
}
