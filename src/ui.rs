use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};
use tracing::Level;

use crate::domain::HELP_TEXT;
use crate::model::{DetailTab, Model};

pub const SIZE_COLUMN_WIDTH: u16 = 12;
pub const COLUMN_SPACING: u16 = 1;
pub const TITLE_HEIGHT: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const LISTING_PERCENTAGE: u16 = 40;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub title: Rect,
    pub listing: Rect,
    pub details: Rect,
    pub statusline: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let [title, body, statusline] = Layout::vertical([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(area);
        let [listing, details] = Layout::horizontal([
            Constraint::Percentage(LISTING_PERCENTAGE),
            Constraint::Percentage(100 - LISTING_PERCENTAGE),
        ])
        .areas(body);
        AppLayout {
            title,
            listing,
            details,
            statusline,
        }
    }
}

#[derive(Debug, Default)]
pub struct TableUI {}

impl TableUI {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&mut self, model: &mut Model, frame: &mut Frame) {
        let layout = AppLayout::from_area(frame.area());
        self.render_title(model, frame, layout.title);
        self.render_listing(model, frame, layout.listing);
        self.render_details(model, frame, layout.details);
        self.render_statusline(model, frame, layout.statusline);
        if model.show_popup() {
            let area = frame.area();
            self.render_popup(frame, area);
        }
    }

    fn render_title(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let listing = model.listing();
        let position = listing.selected_row().map_or(0, |r| r + 1);
        let title = Line::from(vec![
            " Druider ".bold().black().on_green(),
            format!(" {} ", model.file_name()).yellow(),
            format!(
                "{position}/{} animals, {} records",
                listing.table().len(),
                model.record_count()
            )
            .into(),
        ]);
        frame.render_widget(Paragraph::new(title), area);
    }

    fn render_listing(&self, model: &mut Model, frame: &mut Frame, area: Rect) {
        let listing = model.listing();
        let header = Row::new(
            listing
                .table()
                .columns()
                .iter()
                .map(|c| Cell::from(listing.header_title(*c)))
                .collect::<Vec<Cell>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));

        let rows = listing
            .table()
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let style = if idx % 2 == 1 {
                    Style::default().bg(Color::Rgb(30, 30, 30))
                } else {
                    Style::default()
                };
                Row::new(vec![Cell::from(row.size.clone()), Cell::from(row.name.clone())])
                    .style(style)
            })
            .collect::<Vec<Row>>();

        let block = Block::bordered()
            .title(Line::from(" Animals ".bold()))
            .border_set(border::ROUNDED);
        let table = Table::new(
            rows,
            [Constraint::Length(SIZE_COLUMN_WIDTH), Constraint::Fill(1)],
        )
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .cell_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        frame.render_stateful_widget(table, area, model.listing_mut().state_mut());
    }

    fn render_details(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(Line::from(" Details ".bold()))
            .border_set(border::ROUNDED);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs_area, content] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        let selected = match model.tab() {
            DetailTab::Selected => 0,
            DetailTab::Logs => 1,
        };
        let logs = format!("Logs ({})", model.console().len());
        let tabs = Tabs::new(vec!["Selected".to_string(), logs])
            .select(selected)
            .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, tabs_area);

        match model.tab() {
            DetailTab::Selected => self.render_record(model, frame, content),
            DetailTab::Logs => self.render_logs(model, frame, content),
        }
    }

    fn render_record(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let text = match model.detail() {
            Some(detail) => {
                let mut lines = vec![Line::from(detail.name.clone().bold().yellow())];
                lines.extend(detail.entries.iter().map(|(title, value)| {
                    Line::from(vec![
                        format!("├ {title}: ").cyan(),
                        Span::raw(value.clone()),
                    ])
                }));
                Text::from(lines)
            }
            None => Text::from("Select animal for more details".italic()),
        };
        frame.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .scroll((model.detail_scroll(), 0)),
            area,
        );
    }

    fn render_logs(&self, model: &Model, frame: &mut Frame, area: Rect) {
        if model.console().is_empty() {
            frame.render_widget(Paragraph::new("No log output yet".italic()), area);
            return;
        }
        let lines = model
            .console()
            .tail(area.height as usize)
            .into_iter()
            .map(|line| {
                let color = match line.level {
                    Level::ERROR => Color::Red,
                    Level::WARN => Color::Yellow,
                    Level::INFO => Color::Green,
                    Level::DEBUG => Color::Blue,
                    _ => Color::DarkGray,
                };
                Line::from(vec![
                    Span::styled(format!("{:<5} ", line.level), Style::default().fg(color)),
                    Span::styled(format!("{}: ", line.target), Style::default().fg(Color::DarkGray)),
                    Span::raw(line.message),
                ])
            })
            .collect::<Vec<Line>>();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_statusline(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            format!(" {} ", model.status_message()).into(),
            " ? ".blue().bold(),
            "help ".into(),
            " q ".blue().bold(),
            "quit ".into(),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect) {
        let area = popup_area(area, 64, 20);
        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .border_set(border::THICK);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(HELP_TEXT).block(block), area);
    }
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_splits_body_between_listing_and_details() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.title, Rect::new(0, 0, 100, 1));
        assert_eq!(layout.statusline, Rect::new(0, 29, 100, 1));
        assert_eq!(layout.listing, Rect::new(0, 1, 40, 28));
        assert_eq!(layout.details, Rect::new(40, 1, 60, 28));
    }

    #[test]
    fn popup_is_centered() {
        let area = popup_area(Rect::new(0, 0, 100, 40), 64, 20);
        assert_eq!(area, Rect::new(18, 10, 64, 20));
    }
}
