use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " n:note  N:dir  r:ren  d:del  p:pin  s:set ";

/// Keep the last `width` characters, marking the cut with `...`.
fn tail(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width > 3 {
        let kept: String = text.chars().skip(len - (width - 3)).collect();
        format!("...{}", kept)
    } else {
        text.chars().take(width).collect()
    }
}

/// Status bar widget that displays the location, pane info, key hints, or a
/// status message.
pub struct StatusBarWidget<'a> {
    location: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    leaf_info: Option<&'a str>,
    watcher_status: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(location: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            location,
            info,
            theme,
            status_message: None,
            is_error: false,
            leaf_info: None,
            watcher_status: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn leaf_info(mut self, info: &'a str) -> Self {
        self.leaf_info = Some(info);
        self
    }

    pub fn watcher_status(mut self, status: &'a str) -> Self {
        self.watcher_status = Some(status);
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };

            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [location] [info] [leaf] [watcher] [key_hints]
        let hints_len = KEY_HINTS.chars().count();
        let remaining = width.saturating_sub(hints_len);

        let info_len = self.info.chars().count();
        let location_budget = remaining.saturating_sub(info_len).saturating_sub(1);
        let location_display = tail(self.location, location_budget);

        let info_budget = remaining.saturating_sub(location_display.chars().count());
        let info_display: String = self.info.chars().take(info_budget).collect();

        let separator = if location_display.is_empty() || info_display.is_empty() {
            ""
        } else {
            " "
        };

        let base = Style::default().bg(self.theme.status_bg);
        let mut spans = vec![
            Span::styled(location_display, base.fg(self.theme.status_fg)),
            Span::styled(separator, base),
            Span::styled(info_display, base.fg(self.theme.accent_fg)),
        ];

        if let Some(leaf) = self.leaf_info {
            spans.push(Span::styled(" ", base));
            spans.push(Span::styled(
                leaf.to_string(),
                base.fg(self.theme.tab_fg).add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(watcher) = self.watcher_status {
            spans.push(Span::styled(" ", base));
            spans.push(Span::styled(
                watcher.to_string(),
                base.fg(self.theme.warning_fg).add_modifier(Modifier::BOLD),
            ));
        }

        // Pad to fill remaining width if needed, then add hints
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::styled(" ".repeat(pad), base));
        }
        spans.push(Span::styled(
            KEY_HINTS,
            base.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
        ));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
