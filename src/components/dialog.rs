use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::panes::dialog::{Confirm, Modal, TextPrompt};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    modal: &'a Modal,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(modal: &'a Modal, theme: &'a ThemeColors) -> Self {
        Self { modal, theme }
    }
}

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.modal {
            Modal::Prompt(prompt) => render_prompt(prompt, self.theme, area, buf),
            Modal::Confirm(confirm) => render_confirm(confirm, self.theme, area, buf),
        }
    }
}

fn dialog_block<'b>(title: &str, border: ratatui::style::Color, theme: &ThemeColors) -> Block<'b> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.dialog_bg))
        .padding(Padding::horizontal(1))
}

fn render_hint(hint: &str, theme: &ThemeColors, inner: Rect, buf: &mut Buffer) {
    let hint_style = Style::default()
        .fg(theme.dim_fg)
        .add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint.to_string(), hint_style));
    buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
}

fn render_prompt(prompt: &TextPrompt, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let dialog_height = 6;
    let rect = centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);
    let block = dialog_block(&prompt.title, theme.dialog_border_fg, theme);
    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let message = Line::from(Span::styled(
        prompt.message.clone(),
        Style::default().fg(theme.pane_fg),
    ));
    buf.set_line(inner.x, inner.y, &message, inner.width);

    if inner.height > 1 {
        let line = input_line(prompt, theme, inner.width as usize);
        buf.set_line(inner.x, inner.y + 1, &line, inner.width);
    }

    if inner.height > 2 {
        render_hint("[Enter] Confirm  [Esc] Cancel", theme, inner, buf);
    }
}

/// Input text with a block cursor, scrolled so the cursor stays in view.
fn input_line<'b>(prompt: &TextPrompt, theme: &ThemeColors, max_width: usize) -> Line<'b> {
    let input = prompt.input();
    let (before, rest) = input.split_at(prompt.cursor());
    let mut rest_chars = rest.chars();
    let cursor_char = rest_chars
        .next()
        .map_or_else(|| " ".to_string(), |c| c.to_string());
    let after: String = rest_chars.collect();

    // Keep the tail of the text before the cursor when it does not fit.
    let before_budget = max_width.saturating_sub(1);
    let before_len = before.chars().count();
    let before_display: String = if before_len > before_budget {
        before.chars().skip(before_len - before_budget).collect()
    } else {
        before.to_string()
    };

    let input_style = Style::default().fg(theme.pane_fg);
    let cursor_style = Style::default()
        .bg(theme.pane_fg)
        .fg(theme.dialog_bg)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, input_style),
    ])
}

fn render_confirm(confirm: &Confirm, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let dialog_width = (confirm.message.chars().count() as u16 + 6)
        .max(40)
        .min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);
    let block = dialog_block(&confirm.title, theme.error_fg, theme);
    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let message = Line::from(Span::styled(
        confirm.message.clone(),
        Style::default()
            .fg(theme.warning_fg)
            .add_modifier(Modifier::BOLD),
    ));
    buf.set_line(inner.x, inner.y, &message, inner.width);

    if inner.height > 1 {
        render_hint("[y] Yes  [n/Esc] Cancel", theme, inner, buf);
    }
}
