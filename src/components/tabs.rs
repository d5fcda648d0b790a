use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::fs::path;
use crate::theme::ThemeColors;
use crate::workspace::Leaf;

const PIN_MARKER: &str = "📌";

/// One-line strip of open notes. Pinned leaves carry a pin marker and the
/// active leaf is highlighted.
pub struct TabStripWidget<'a> {
    leaves: &'a [Leaf],
    active: Option<usize>,
    theme: &'a ThemeColors,
}

impl<'a> TabStripWidget<'a> {
    pub fn new(leaves: &'a [Leaf], active: Option<usize>, theme: &'a ThemeColors) -> Self {
        Self {
            leaves,
            active,
            theme,
        }
    }

    /// Screen area of each tab label, keyed by leaf index. Tabs past the
    /// right edge are left out; a partly visible tab is clipped.
    pub fn tab_areas(&self, area: Rect) -> Vec<(usize, Rect)> {
        let mut areas = Vec::new();
        if area.height == 0 {
            return areas;
        }
        let mut x = area.x;
        for (i, leaf) in self.leaves.iter().enumerate() {
            if x >= area.right() {
                break;
            }
            let width = (Span::raw(Self::label(leaf)).width() as u16).min(area.right() - x);
            areas.push((i, Rect::new(x, area.y, width, 1)));
            // Label plus the separator.
            x = x.saturating_add(width).saturating_add(1);
        }
        areas
    }

    fn label(leaf: &Leaf) -> String {
        let name = path::name_of(&leaf.path);
        if leaf.pinned {
            format!(" {} {} ", PIN_MARKER, name)
        } else {
            format!(" {} ", name)
        }
    }
}

impl<'a> Widget for TabStripWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let base = Style::default().bg(self.theme.status_bg);
        if self.leaves.is_empty() {
            let line = Line::from(Span::styled(
                " No open notes",
                base.fg(self.theme.dim_fg).add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let mut spans = Vec::with_capacity(self.leaves.len() * 2);
        for (i, leaf) in self.leaves.iter().enumerate() {
            let style = if Some(i) == self.active {
                Style::default()
                    .bg(self.theme.tab_active_bg)
                    .fg(self.theme.selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                base.fg(self.theme.tab_fg)
            };
            spans.push(Span::styled(Self::label(leaf), style));
            spans.push(Span::styled("│", base.fg(self.theme.border_fg)));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
