use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, AppMode};
use crate::fs::vault::VaultStore;
use crate::panes::dialog::Modal;
use crate::panes::Panel;

/// Handle a key event according to the current mode.
pub fn handle_key_event<V: VaultStore>(app: &mut App<V>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match &app.mode {
        AppMode::Normal => handle_normal_key(app, key),
        AppMode::Modal(Modal::Prompt(_)) => handle_prompt_key(app, key),
        AppMode::Modal(Modal::Confirm(_)) => handle_confirm_key(app, key),
        AppMode::Settings { .. } => handle_settings_key(app, key),
    }
}

fn handle_normal_key<V: VaultStore>(app: &mut App<V>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('o') => app.toggle_panel(),
        KeyCode::Char('s') => app.open_settings(),
        KeyCode::Char('p') => app.toggle_pin(),
        KeyCode::Char(']') => app.workspace.next(),
        KeyCode::Char('[') => app.workspace.previous(),
        KeyCode::Char('x') => app.close_leaf(),
        // Everything below needs the panel.
        _ if !app.view.is_open() => {}
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('n') => app.new_note(),
        KeyCode::Char('a') => app.new_note_at_cursor(),
        KeyCode::Char('N') => app.prompt_new_folder(),
        KeyCode::Char('r') => app.prompt_rename(),
        KeyCode::Char('d') | KeyCode::Delete => app.confirm_delete(),
        _ => {}
    }
}

fn handle_prompt_key<V: VaultStore>(app: &mut App<V>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_modal(),
        KeyCode::Esc => app.cancel_modal(),
        code => {
            let Some(prompt) = app.prompt_mut() else {
                return;
            };
            match code {
                KeyCode::Char(c) => prompt.insert_char(c),
                KeyCode::Backspace => prompt.delete_char(),
                KeyCode::Delete => prompt.delete_forward(),
                KeyCode::Left => prompt.move_left(),
                KeyCode::Right => prompt.move_right(),
                KeyCode::Home => prompt.home(),
                KeyCode::End => prompt.end(),
                _ => {}
            }
        }
    }
}

fn handle_confirm_key<V: VaultStore>(app: &mut App<V>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.submit_modal(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_modal(),
        _ => {}
    }
}

fn handle_settings_key<V: VaultStore>(app: &mut App<V>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => app.close_settings(),
        KeyCode::Char('j') | KeyCode::Down => app.settings_next_row(),
        KeyCode::Char('k') | KeyCode::Up => app.settings_previous_row(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
            app.cycle_setting()
        }
        _ => {}
    }
}

/// Handle a mouse event. Only the left button is used.
pub fn handle_mouse_event<V: VaultStore>(app: &mut App<V>, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.drag(mouse.column, mouse.row),
        MouseEventKind::Up(_) => app.release(),
        _ => {}
    }
}
