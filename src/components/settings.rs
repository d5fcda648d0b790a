use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::components::dialog::centered_rect;
use crate::settings::PanelSettings;
use crate::theme::ThemeColors;

/// Number of rows in the settings overlay.
pub const SETTINGS_ROWS: usize = 2;

/// Settings overlay: one row per panel setting, with the highlighted row
/// toggled by Enter or Space.
pub struct SettingsWidget<'a> {
    settings: PanelSettings,
    row: usize,
    theme: &'a ThemeColors,
}

impl<'a> SettingsWidget<'a> {
    pub fn new(settings: PanelSettings, row: usize, theme: &'a ThemeColors) -> Self {
        Self {
            settings,
            row,
            theme,
        }
    }

    fn rows(&self) -> [(&'static str, &'static str); SETTINGS_ROWS] {
        [
            ("Layout", self.settings.layout.label()),
            ("Name display", self.settings.name_display.label()),
        ]
    }
}

impl<'a> Widget for SettingsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 54.min(area.width.saturating_sub(4));
        let height = (SETTINGS_ROWS as u16 + 5).min(area.height);
        let rect = centered_rect(width, height, area);

        Clear.render(rect, buf);
        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        for (i, (name, value)) in self.rows().into_iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let highlighted = i == self.row;
            let marker = if highlighted { "› " } else { "  " };
            let name_style = if highlighted {
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.pane_fg)
            };
            let line = Line::from(vec![
                Span::styled(marker, name_style),
                Span::styled(format!("{:<14}", name), name_style),
                Span::styled(value, Style::default().fg(self.theme.header_fg)),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }

        if inner.height > SETTINGS_ROWS as u16 + 1 {
            let hint = Line::from(Span::styled(
                "[Enter] Toggle  [j/k] Move  [Esc] Close",
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ));
            buf.set_line(inner.x, inner.y + inner.height - 1, &hint, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_to_string;
    use crate::settings::{Layout, NameDisplay};
    use crate::theme;

    #[test]
    fn shows_current_values() {
        let tc = theme::dark_theme();
        let settings = PanelSettings {
            layout: Layout::Vertical,
            name_display: NameDisplay::Wrap,
        };
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        SettingsWidget::new(settings, 0, &tc).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Settings"));
        assert!(content.contains("Vertical (files on the right)"));
        assert!(content.contains("Wrap onto next line"));
        assert!(content.contains("[Enter] Toggle"));
    }

    #[test]
    fn highlighted_row_has_marker() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        SettingsWidget::new(PanelSettings::default(), 1, &tc).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        let marked = content.lines().find(|l| l.contains('›')).unwrap();
        assert!(marked.contains("Name display"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        SettingsWidget::new(PanelSettings::default(), 0, &tc).render(area, &mut buf);
    }
}
