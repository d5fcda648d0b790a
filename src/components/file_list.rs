use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::components::{fit_name, place_rows};
use crate::panes::projection::FileListing;
use crate::panes::ListCursor;
use crate::settings::NameDisplay;
use crate::theme::ThemeColors;

const NEW_NOTE_LABEL: &str = "[+]";
const EMPTY_LABEL: &str = "No folder selected";

/// File list pane: a header naming the folder with a new-note button, then
/// the folder's files.
pub struct FileListWidget<'a> {
    listing: Option<&'a FileListing>,
    cursor: ListCursor,
    focused: bool,
    name_display: NameDisplay,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> FileListWidget<'a> {
    pub fn new(listing: Option<&'a FileListing>, cursor: ListCursor, theme: &'a ThemeColors) -> Self {
        Self {
            listing,
            cursor,
            focused: false,
            name_display: NameDisplay::Truncate,
            theme,
            block: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn name_display(mut self, name_display: NameDisplay) -> Self {
        self.name_display = name_display;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn inner(&self, area: Rect) -> Rect {
        match &self.block {
            Some(block) => block.inner(area),
            None => area,
        }
    }

    /// Clickable `[+]` at the right end of the header row.
    pub fn new_note_area(&self, area: Rect) -> Option<Rect> {
        self.listing?;
        let inner = self.inner(area);
        let width = NEW_NOTE_LABEL.len() as u16;
        if inner.height == 0 || inner.width < width {
            return None;
        }
        Some(Rect::new(inner.x + inner.width - width, inner.y, width, 1))
    }

    /// Area below the header.
    fn rows_area(&self, area: Rect) -> Rect {
        let inner = self.inner(area);
        Rect::new(
            inner.x,
            inner.y.saturating_add(1),
            inner.width,
            inner.height.saturating_sub(1),
        )
    }

    fn lines(&self, name: &str, width: u16) -> Vec<String> {
        fit_name(" ", name, width as usize, self.name_display)
    }

    /// Screen area of each visible file row, keyed by row index.
    pub fn row_areas(&self, area: Rect) -> Vec<(usize, Rect)> {
        let Some(listing) = self.listing else {
            return Vec::new();
        };
        let rows = self.rows_area(area);
        let heights: Vec<u16> = listing
            .files
            .iter()
            .map(|f| self.lines(&f.name, rows.width).len() as u16)
            .collect();
        place_rows(&heights, self.cursor.offset, self.cursor.index, rows)
    }

    fn render_header(&self, listing: &FileListing, inner: Rect, buf: &mut Buffer) {
        let button_width = NEW_NOTE_LABEL.len();
        let title_width = (inner.width as usize).saturating_sub(button_width + 1);
        let title = fit_name("", &listing.header, title_width, NameDisplay::Truncate)
            .into_iter()
            .next()
            .unwrap_or_default();
        let gap = (inner.width as usize)
            .saturating_sub(title.chars().count())
            .saturating_sub(button_width);
        let line = Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(self.theme.header_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(gap)),
            Span::styled(
                NEW_NOTE_LABEL,
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}

impl<'a> Widget for FileListWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let placed = self.row_areas(area);
        let inner = self.inner(area);
        if let Some(block) = &self.block {
            block.clone().render(area, buf);
        }
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let Some(listing) = self.listing else {
            let line = Line::from(Span::styled(
                EMPTY_LABEL,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        };

        self.render_header(listing, inner, buf);

        for (index, row_area) in placed {
            let file = &listing.files[index];
            let style = if self.focused && index == self.cursor.index {
                Style::default()
                    .bg(self.theme.cursor_bg)
                    .fg(self.theme.selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.file_fg)
            };
            for (i, text) in self
                .lines(&file.name, row_area.width)
                .into_iter()
                .take(row_area.height as usize)
                .enumerate()
            {
                let padded = format!("{:<width$}", text, width = row_area.width as usize);
                let line = Line::from(Span::styled(padded, style));
                buf.set_line(row_area.x, row_area.y + i as u16, &line, row_area.width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_to_string;
    use crate::panes::projection::FileRow;
    use crate::theme;

    fn listing() -> FileListing {
        FileListing {
            folder_path: "Notes".into(),
            header: "Notes".into(),
            files: vec![
                FileRow {
                    path: "Notes/a.md".into(),
                    name: "a.md".into(),
                },
                FileRow {
                    path: "Notes/b.md".into(),
                    name: "b.md".into(),
                },
            ],
        }
    }

    #[test]
    fn renders_header_and_files() {
        let tc = theme::dark_theme();
        let listing = listing();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        FileListWidget::new(Some(&listing), ListCursor::default(), &tc).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].starts_with("Notes"));
        assert!(lines[0].ends_with("[+]"));
        assert_eq!(lines[1].trim(), "a.md");
        assert_eq!(lines[2].trim(), "b.md");
    }

    #[test]
    fn empty_state_without_listing() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        let widget = FileListWidget::new(None, ListCursor::default(), &tc);
        assert!(widget.new_note_area(area).is_none());
        assert!(widget.row_areas(area).is_empty());
        widget.render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("No folder selected"));
    }

    #[test]
    fn new_note_button_position() {
        let tc = theme::dark_theme();
        let listing = listing();
        let widget = FileListWidget::new(Some(&listing), ListCursor::default(), &tc)
            .block(Block::default().borders(ratatui::widgets::Borders::ALL));
        assert_eq!(
            widget.new_note_area(Rect::new(10, 5, 30, 10)),
            Some(Rect::new(36, 6, 3, 1))
        );
    }

    #[test]
    fn rows_start_below_header() {
        let tc = theme::dark_theme();
        let listing = listing();
        let widget = FileListWidget::new(Some(&listing), ListCursor::default(), &tc);
        let areas = widget.row_areas(Rect::new(0, 0, 20, 10));
        assert_eq!(areas[0], (0, Rect::new(0, 1, 20, 1)));
        assert_eq!(areas[1], (1, Rect::new(0, 2, 20, 1)));
    }

    #[test]
    fn focused_cursor_row_is_highlighted() {
        let tc = theme::dark_theme();
        let listing = listing();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        let cursor = ListCursor {
            index: 1,
            offset: 0,
        };
        FileListWidget::new(Some(&listing), cursor, &tc)
            .focused(true)
            .render(area, &mut buf);
        assert_eq!(buf.cell((1, 2)).unwrap().bg, tc.cursor_bg);
        assert_ne!(buf.cell((1, 1)).unwrap().bg, tc.cursor_bg);
    }

    #[test]
    fn long_header_keeps_button_visible() {
        let tc = theme::dark_theme();
        let mut listing = listing();
        listing.header = "A folder with a very long name".into();
        let area = Rect::new(0, 0, 16, 2);
        let mut buf = Buffer::empty(area);
        FileListWidget::new(Some(&listing), ListCursor::default(), &tc).render(area, &mut buf);
        let first = buffer_to_string(&buf, area).lines().next().unwrap().to_string();
        assert!(first.contains('…'));
        assert!(first.ends_with("[+]"));
    }
}
