use arboard::Clipboard;
use ratatui::layout::Rect;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

use crate::catalog::Column;
use crate::console::LogConsole;
use crate::data::{Record, load_data};
use crate::details::{RecordDetail, record_to_csv};
use crate::domain::{AppConfig, DruidError, Message};
use crate::listing::{Hit, Listing};
use crate::selection::{CellSelected, TableEvents};
use crate::ui::AppLayout;

#[derive(Debug, PartialEq)]
pub enum Status {
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Selected,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modus {
    Table,
    Popup,
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    file_name: String,
    records: Arc<[Record]>,
    listing: Listing,
    selected: Option<usize>,
    detail: Option<RecordDetail>,
    detail_scroll: u16,
    tab: DetailTab,
    layout: AppLayout,
    console: LogConsole,
    clipboard: Option<Clipboard>,
    status_message: String,
}

impl Model {
    pub fn load(config: &AppConfig, console: LogConsole) -> Result<Self, DruidError> {
        let records = load_data(&config.data_path)?;
        let file_name = config
            .data_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();
        Ok(Model::init(file_name, records, console))
    }

    pub fn init(file_name: String, records: Vec<Record>, console: LogConsole) -> Self {
        let records: Arc<[Record]> = records.into();
        Self {
            status: Status::Ready,
            modus: Modus::Table,
            file_name,
            listing: Listing::new(Arc::clone(&records)),
            records,
            selected: None,
            detail: None,
            detail_scroll: 0,
            tab: DetailTab::Selected,
            layout: AppLayout::default(),
            console,
            clipboard: None,
            status_message: "Started druider!".to_string(),
        }
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), DruidError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);

        match self.modus {
            Modus::Table => match msg {
                Message::Mount => self.mount(),
                Message::Quit => self.quit(),
                Message::MoveDown => self.listing.move_selection_down(1),
                Message::MoveUp => self.listing.move_selection_up(1),
                Message::MoveLeft => self.listing.move_selection_left(),
                Message::MoveRight => self.listing.move_selection_right(),
                Message::MovePageDown => self.listing.move_selection_down(self.page_size()),
                Message::MovePageUp => self.listing.move_selection_up(self.page_size()),
                Message::MoveBeginning => self.listing.move_selection_beginning(),
                Message::MoveEnd => self.listing.move_selection_end(),
                Message::Enter => self.activate_focused_cell(),
                Message::SortBySize => self.header_activated(Column::Size),
                Message::SortByName => self.header_activated(Column::Name),
                Message::SortCurrentColumn => {
                    self.header_activated(self.listing.focused_column())
                }
                Message::NextTab => self.next_tab(),
                Message::ScrollDetailsDown => {
                    self.detail_scroll = self.detail_scroll.saturating_add(1)
                }
                Message::ScrollDetailsUp => {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1)
                }
                Message::CopyRecord => self.copy_record(),
                Message::Help => self.modus = Modus::Popup,
                Message::Click(x, y) => self.click(x, y),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit => {}
            },
            Modus::Popup => match msg {
                Message::Quit => self.quit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit | Message::Help | Message::Enter | Message::Click(_, _) => {
                    trace!("Close popup ...");
                    self.modus = Modus::Table;
                }
                _ => (),
            },
        }
        Ok(())
    }

    // -------------------- Event handlers ---------------------- //

    fn mount(&mut self) {
        self.listing.on_mount();
        let animals = self.listing.table().len();
        self.set_status_message(format!(
            "Loaded {} animals from {} records",
            animals,
            self.records.len()
        ));
    }

    // Failures end here: logged, reported, and the table stays usable.
    fn header_activated(&mut self, column: Column) {
        match self.listing.on_header_activated(column.key()) {
            Ok(()) => {
                let title = self.listing.header_title(column);
                self.set_status_message(format!("Sorted by {title}"));
            }
            Err(e) => {
                error!("Sorting by {} failed: {e}", column.title());
                self.set_status_message(format!("Sort failed: {e}"));
            }
        }
    }

    fn activate_focused_cell(&mut self) {
        if let Some(event) = self.listing.focused_cell() {
            self.cell_activated(&event);
        }
    }

    fn cell_activated(&mut self, event: &CellSelected) {
        debug!("Cell activated: {:?}", event);
        if let Some(index) = self.listing.on_cell_activated(event) {
            self.show_record(index);
        }
    }

    fn show_record(&mut self, index: usize) {
        match self.records.get(index) {
            Some(record) => {
                let detail = RecordDetail::from_record(record);
                info!("Passing to details: {}", detail.name);
                self.set_status_message(format!("Selected {}", detail.name));
                self.detail = Some(detail);
                self.selected = Some(index);
                self.detail_scroll = 0;
                self.tab = DetailTab::Selected;
            }
            None => error!("Record {index} does not exist"),
        }
    }

    fn click(&mut self, x: u16, y: u16) {
        match self.listing.hit_test(self.layout.listing, x, y) {
            Some(Hit::Header(column)) => self.header_activated(column),
            Some(Hit::Cell { row, column }) => {
                self.listing.focus(row, column);
                if let Some(event) = self.listing.cell_event(row, column) {
                    self.cell_activated(&event);
                }
            }
            None => trace!("Click at ({x}, {y}) hit nothing"),
        }
    }

    fn next_tab(&mut self) {
        self.tab = match self.tab {
            DetailTab::Selected => DetailTab::Logs,
            DetailTab::Logs => DetailTab::Selected,
        };
    }

    fn copy_record(&mut self) {
        let Some(record) = self.selected.and_then(|idx| self.records.get(idx)) else {
            self.set_status_message("Nothing selected to copy");
            return;
        };
        let content = record_to_csv(record);

        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => warn!("Clipboard is not available: {:?}", e),
            }
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            self.set_status_message("Clipboard is not available");
            return;
        };
        match clipboard.set_text(content) {
            Ok(_) => {
                trace!("Copied record to clipboard.");
                self.set_status_message("Copied record to clipboard");
            }
            Err(e) => warn!("Error copying to clipboard: {:?}", e),
        }
    }

    fn quit(&mut self) {
        self.status = Status::Quitting;
    }

    fn ui_resize(&mut self, width: u16, height: u16) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.layout.title.width, width, self.layout.listing.height, height
        );
        self.layout = AppLayout::from_area(Rect::new(0, 0, width, height));
    }

    fn page_size(&self) -> usize {
        // Border and header take three lines of the listing.
        usize::from(self.layout.listing.height.saturating_sub(3)).max(1)
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    // -------------------- Accessors for the UI ---------------------- //

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut Listing {
        &mut self.listing
    }

    pub fn detail(&self) -> Option<&RecordDetail> {
        self.detail.as_ref()
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn console(&self) -> &LogConsole {
        &self.console
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn show_popup(&self) -> bool {
        self.modus == Modus::Popup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::creature;

    fn model() -> Model {
        let records = vec![
            creature("Ant", "animal", "tiny"),
            creature("Bear", "animal", "large"),
            creature("Chair", "furniture", "medium"),
            creature("Wolf", "animal", "medium"),
        ];
        let mut model = Model::init("data.csv".to_string(), records, LogConsole::new(16));
        model.update(Some(Message::Resize(100, 30))).unwrap();
        model.update(Some(Message::Mount)).unwrap();
        model
    }

    fn names(model: &Model) -> Vec<&str> {
        model.listing().table().rows().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn loads_fixture_and_lists_animals() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/bestiary.csv");
        let cfg = AppConfig::default().with_data_path(path);
        let mut model = Model::load(&cfg, LogConsole::new(16)).unwrap();
        model.update(Some(Message::Mount)).unwrap();
        assert_eq!(model.file_name(), "bestiary.csv");
        assert_eq!(model.record_count(), 5);
        assert_eq!(names(&model), vec!["Ant", "Bear", "Wolf"]);

        model.update(Some(Message::SortBySize)).unwrap();
        assert_eq!(names(&model), vec!["Ant", "Wolf", "Bear"]);
        model.update(Some(Message::MoveEnd)).unwrap();
        model.update(Some(Message::Enter)).unwrap();
        let detail = model.detail().unwrap();
        assert_eq!(detail.name, "Bear");
        assert!(
            detail
                .entries
                .contains(&("Melee".to_string(), "bite +5, 2 claws +5".to_string()))
        );
    }

    #[test]
    fn missing_file_fails_to_load() {
        let cfg = AppConfig::default().with_data_path("no/such/data.csv".into());
        assert!(matches!(
            Model::load(&cfg, LogConsole::new(16)),
            Err(DruidError::FileNotFound(_))
        ));
    }

    #[test]
    fn mount_fills_listing() {
        let model = model();
        assert_eq!(names(&model), vec!["Ant", "Bear", "Wolf"]);
        assert_eq!(model.status_message(), "Loaded 3 animals from 4 records");
        assert!(model.detail().is_none());
    }

    #[test]
    fn enter_on_name_shows_detail() {
        let mut model = model();
        model.update(Some(Message::MoveEnd)).unwrap();
        model.update(Some(Message::Enter)).unwrap();
        let detail = model.detail().unwrap();
        assert_eq!(detail.name, "Wolf");
        assert_eq!(model.selected, Some(3));
        assert_eq!(model.tab(), DetailTab::Selected);
    }

    #[test]
    fn enter_on_size_column_selects_nothing() {
        let mut model = model();
        model.update(Some(Message::MoveLeft)).unwrap();
        model.update(Some(Message::Enter)).unwrap();
        assert!(model.detail().is_none());
    }

    #[test]
    fn sort_keys_toggle_direction() {
        let mut model = model();
        model.update(Some(Message::SortBySize)).unwrap();
        assert_eq!(names(&model), vec!["Ant", "Wolf", "Bear"]);
        model.update(Some(Message::SortBySize)).unwrap();
        assert_eq!(names(&model), vec!["Bear", "Wolf", "Ant"]);
        model.update(Some(Message::SortByName)).unwrap();
        assert_eq!(names(&model), vec!["Ant", "Bear", "Wolf"]);
        assert_eq!(model.status_message(), "Sorted by Name ▲");
    }

    #[test]
    fn failed_sort_is_reported_not_propagated() {
        let records = vec![
            creature("Bear", "animal", "large"),
            creature("Tarrasque", "animal", "behemoth"),
        ];
        let mut model = Model::init("data.csv".to_string(), records, LogConsole::new(16));
        model.update(Some(Message::Mount)).unwrap();
        assert!(model.update(Some(Message::SortBySize)).is_ok());
        assert_eq!(names(&model), vec!["Bear", "Tarrasque"]);
        assert!(model.status_message().starts_with("Sort failed"));

        // Still interactive afterwards.
        model.update(Some(Message::SortByName)).unwrap();
        assert_eq!(model.status_message(), "Sorted by Name ▲");
    }

    #[test]
    fn clicks_sort_and_select() {
        let mut model = model();
        // Listing spans x 0..40, y 1..29; header row at y=2, rows from y=3.
        model.update(Some(Message::Click(3, 2))).unwrap();
        assert_eq!(names(&model), vec!["Ant", "Wolf", "Bear"]);

        model.update(Some(Message::Click(20, 5))).unwrap();
        assert_eq!(model.detail().unwrap().name, "Bear");
        assert_eq!(model.listing().selected_row(), Some(2));

        // A size cell moves the cursor but selects nothing new.
        model.update(Some(Message::Click(3, 3))).unwrap();
        assert_eq!(model.detail().unwrap().name, "Bear");
        assert_eq!(model.listing().selected_row(), Some(0));
    }

    #[test]
    fn popup_swallows_table_keys() {
        let mut model = model();
        model.update(Some(Message::Help)).unwrap();
        assert!(model.show_popup());
        model.update(Some(Message::SortBySize)).unwrap();
        assert_eq!(names(&model), vec!["Ant", "Bear", "Wolf"]);
        model.update(Some(Message::Exit)).unwrap();
        assert!(!model.show_popup());
        model.update(Some(Message::Quit)).unwrap();
        assert_eq!(model.status, Status::Quitting);
    }

    #[test]
    fn tabs_and_scrolling() {
        let mut model = model();
        model.update(Some(Message::NextTab)).unwrap();
        assert_eq!(model.tab(), DetailTab::Logs);
        model.update(Some(Message::ScrollDetailsUp)).unwrap();
        assert_eq!(model.detail_scroll(), 0);
        model.update(Some(Message::ScrollDetailsDown)).unwrap();
        assert_eq!(model.detail_scroll(), 1);
        model.update(Some(Message::NextTab)).unwrap();
        assert_eq!(model.tab(), DetailTab::Selected);
    }

    #[test]
    fn copy_without_selection_is_a_status_message() {
        let mut model = model();
        model.update(Some(Message::CopyRecord)).unwrap();
        assert_eq!(model.status_message(), "Nothing selected to copy");
    }
}
