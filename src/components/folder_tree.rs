use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::components::{fit_name, place_rows};
use crate::panes::projection::FolderRow;
use crate::panes::ListCursor;
use crate::settings::NameDisplay;
use crate::theme::ThemeColors;

/// Folder tree pane: one row per visible folder, indented by depth.
pub struct FolderTreeWidget<'a> {
    rows: &'a [FolderRow],
    cursor: ListCursor,
    focused: bool,
    name_display: NameDisplay,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> FolderTreeWidget<'a> {
    pub fn new(rows: &'a [FolderRow], cursor: ListCursor, theme: &'a ThemeColors) -> Self {
        Self {
            rows,
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

    /// Indentation and expand marker in front of a folder label.
    fn prefix(row: &FolderRow) -> String {
        let marker = if row.expanded { "▾ " } else { "▸ " };
        format!("{}{}", "  ".repeat(row.depth), marker)
    }

    fn lines(&self, row: &FolderRow, width: u16) -> Vec<String> {
        fit_name(&Self::prefix(row), &row.label, width as usize, self.name_display)
    }

    /// Area inside the block, if any.
    pub fn inner(&self, area: Rect) -> Rect {
        match &self.block {
            Some(block) => block.inner(area),
            None => area,
        }
    }

    /// Screen area of each visible row, keyed by row index.
    pub fn row_areas(&self, area: Rect) -> Vec<(usize, Rect)> {
        let inner = self.inner(area);
        let heights: Vec<u16> = self
            .rows
            .iter()
            .map(|row| self.lines(row, inner.width).len() as u16)
            .collect();
        place_rows(&heights, self.cursor.offset, self.cursor.index, inner)
    }

    fn row_style(&self, index: usize, row: &FolderRow) -> Style {
        let on_cursor = self.focused && index == self.cursor.index;
        let mut style = if row.selected {
            Style::default()
                .bg(self.theme.selected_bg)
                .fg(self.theme.selected_fg)
                .add_modifier(Modifier::BOLD)
        } else if on_cursor {
            Style::default()
                .bg(self.theme.cursor_bg)
                .fg(self.theme.folder_fg)
        } else {
            Style::default().fg(self.theme.folder_fg)
        };
        if on_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if row.is_root() {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }
}

impl<'a> Widget for FolderTreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let placed = self.row_areas(area);
        let inner = self.inner(area);
        if let Some(block) = &self.block {
            block.clone().render(area, buf);
        }
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        for (index, row_area) in placed {
            let row = &self.rows[index];
            let style = self.row_style(index, row);
            for (i, text) in self
                .lines(row, inner.width)
                .into_iter()
                .take(row_area.height as usize)
                .enumerate()
            {
                let padded = format!("{:<width$}", text, width = inner.width as usize);
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
    use crate::theme;

    fn row(path: &str, label: &str, depth: usize, expanded: bool, selected: bool) -> FolderRow {
        FolderRow {
            path: path.into(),
            label: label.into(),
            depth,
            expanded,
            selected,
        }
    }

    fn rows() -> Vec<FolderRow> {
        vec![
            row("/", "Vault", 0, true, false),
            row("Notes", "Notes", 1, false, true),
            row("Projects", "Projects-with-a-long-name", 1, false, false),
        ]
    }

    #[test]
    fn renders_indented_labels() {
        let tc = theme::dark_theme();
        let rows = rows();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        FolderTreeWidget::new(&rows, ListCursor::default(), &tc).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].starts_with("▾ Vault"));
        assert!(lines[1].starts_with("  ▸ Notes"));
    }

    #[test]
    fn selected_row_is_highlighted() {
        let tc = theme::dark_theme();
        let rows = rows();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        FolderTreeWidget::new(&rows, ListCursor::default(), &tc).render(area, &mut buf);
        assert_eq!(buf.cell((4, 1)).unwrap().bg, tc.selected_bg);
        assert_ne!(buf.cell((4, 0)).unwrap().bg, tc.selected_bg);
        assert_ne!(buf.cell((4, 2)).unwrap().bg, tc.selected_bg);
    }

    #[test]
    fn truncate_and_wrap_modes() {
        let tc = theme::dark_theme();
        let rows = rows();
        let area = Rect::new(0, 0, 16, 6);

        let mut buf = Buffer::empty(area);
        FolderTreeWidget::new(&rows, ListCursor::default(), &tc).render(area, &mut buf);
        let truncated = buffer_to_string(&buf, area);
        assert!(truncated.lines().nth(2).unwrap().ends_with('…'));

        let mut buf = Buffer::empty(area);
        let widget = FolderTreeWidget::new(&rows, ListCursor::default(), &tc)
            .name_display(NameDisplay::Wrap);
        let areas = widget.row_areas(area);
        assert_eq!(areas[2].1.height, 3);
        widget.render(area, &mut buf);
        let wrapped = buffer_to_string(&buf, area);
        let lines: Vec<&str> = wrapped.lines().skip(2).take(3).map(str::trim_end).collect();
        assert_eq!(lines, vec!["  ▸ Projects-wit", "    h-a-long-nam", "    e"]);
    }

    #[test]
    fn row_areas_respect_block() {
        let tc = theme::dark_theme();
        let rows = rows();
        let widget = FolderTreeWidget::new(&rows, ListCursor::default(), &tc)
            .block(Block::default().borders(ratatui::widgets::Borders::ALL));
        let areas = widget.row_areas(Rect::new(0, 0, 30, 10));
        assert_eq!(areas[0].1, Rect::new(1, 1, 28, 1));
        assert_eq!(areas.len(), 3);
    }

    #[test]
    fn zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let rows = rows();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        FolderTreeWidget::new(&rows, ListCursor::default(), &tc).render(area, &mut buf);
    }
}
