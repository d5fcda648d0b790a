use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::components::settings::SETTINGS_ROWS;
use crate::event::Event;
use crate::fs::path;
use crate::fs::vault::VaultStore;
use crate::panes::dialog::{Confirm, ConfirmAction, Modal, PromptAction, TextPrompt};
use crate::panes::{DualPaneView, Focus, Notice, Panel};
use crate::settings::{Layout, SettingsStore};
use crate::theme::ThemeColors;
use crate::workspace::Workspace;

/// How long a notice stays in the status bar.
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// A prompt or confirmation is waiting for an answer.
    Modal(Modal),
    /// The settings page is shown; `row` is the highlighted setting.
    Settings { row: usize },
}

/// Screen areas recorded by the last render, used for mouse hit-testing.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    /// Area shared by both panes and the divider.
    pub container: Rect,
    pub divider: Option<Rect>,
    pub folder_rows: Vec<(usize, Rect)>,
    pub file_rows: Vec<(usize, Rect)>,
    pub new_note: Option<Rect>,
    /// Tab labels in the strip, keyed by leaf index.
    pub tabs: Vec<(usize, Rect)>,
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

fn row_at(rows: &[(usize, Rect)], column: u16, row: u16) -> Option<usize> {
    rows.iter()
        .find_map(|(index, area)| contains(*area, column, row).then_some(*index))
}

/// Main application state.
pub struct App<V: VaultStore> {
    pub vault: V,
    pub view: DualPaneView,
    pub workspace: Workspace,
    pub settings: SettingsStore,
    pub theme: ThemeColors,
    pub mode: AppMode,
    pub status_message: Option<(Notice, Instant)>,
    pub hit_map: HitMap,
    pub should_quit: bool,
    /// Whether external changes are delivered at all (`--no-watcher` turns it off).
    pub watcher_enabled: bool,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl<V: VaultStore> App<V> {
    pub fn new(
        vault: V,
        settings: SettingsStore,
        theme: ThemeColors,
        event_tx: mpsc::UnboundedSender<Event>,
        watcher_enabled: bool,
    ) -> Self {
        Self {
            vault,
            view: DualPaneView::new(settings.settings()),
            workspace: Workspace::new(),
            settings,
            theme,
            mode: AppMode::Normal,
            status_message: None,
            hit_map: HitMap::default(),
            should_quit: false,
            watcher_enabled,
            event_tx,
        }
    }

    // ── Panel lifecycle ─────────────────────────────────────────────────────

    pub fn open_panel(&mut self) {
        if self.view.is_open() {
            return;
        }
        if let Err(e) = self
            .view
            .open(&mut self.vault, &mut self.settings, self.event_tx.clone())
        {
            tracing::warn!(error = %e, "vault subscription failed");
            self.notify(Some(Notice::error(format!("Live updates unavailable: {}", e))));
        }
    }

    pub fn close_panel(&mut self) {
        if !self.view.is_open() {
            return;
        }
        self.view.close(&mut self.settings);
        self.mode = AppMode::Normal;
        self.hit_map = HitMap::default();
    }

    pub fn toggle_panel(&mut self) {
        if self.view.is_open() {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    /// Route a store or settings notification to the panel.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Vault(ev) => {
                self.view.handle_vault_event(&mut self.vault, &ev);
            }
            Event::Settings(change) => {
                if self.view.is_open() {
                    self.view.apply_settings(change);
                }
            }
            _ => {}
        }
    }

    // ── Notices ─────────────────────────────────────────────────────────────

    pub fn notify(&mut self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            self.status_message = Some((notice, Instant::now()));
        }
    }

    /// Clear the status message once it has been displayed long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, created)) = &self.status_message {
            if created.elapsed() >= NOTICE_TTL {
                self.status_message = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    pub fn toggle_focus(&mut self) {
        self.view.focus = self.view.focus.toggled();
    }

    pub fn select_next(&mut self) {
        match self.view.focus {
            Focus::Folders => {
                let len = self.view.folders.rows().len();
                self.view.folders.cursor.next(len);
            }
            Focus::Files => {
                let len = self.view.files.len();
                self.view.files.cursor.next(len);
            }
        }
    }

    pub fn select_previous(&mut self) {
        match self.view.focus {
            Focus::Folders => self.view.folders.cursor.previous(),
            Focus::Files => self.view.files.cursor.previous(),
        }
    }

    pub fn select_first(&mut self) {
        match self.view.focus {
            Focus::Folders => self.view.folders.cursor.first(),
            Focus::Files => self.view.files.cursor.first(),
        }
    }

    pub fn select_last(&mut self) {
        match self.view.focus {
            Focus::Folders => {
                let len = self.view.folders.rows().len();
                self.view.folders.cursor.last(len);
            }
            Focus::Files => {
                let len = self.view.files.len();
                self.view.files.cursor.last(len);
            }
        }
    }

    /// Toggle the folder or open the file under the cursor.
    pub fn activate(&mut self) {
        match self.view.focus {
            Focus::Folders => {
                if let Some(path) = self.view.folders.cursor_row().map(|r| r.path.clone()) {
                    self.view.toggle(&mut self.vault, &path);
                }
            }
            Focus::Files => {
                if let Some(path) = self.view.files.cursor_row().map(|r| r.path.clone()) {
                    self.view.open_file(&mut self.workspace, &path);
                }
            }
        }
    }

    // ── Commands ────────────────────────────────────────────────────────────

    /// Create a timestamped note in the selected folder.
    pub fn new_note(&mut self) {
        let Some(folder) = self.view.files.folder_path().map(str::to_string) else {
            return;
        };
        let now = chrono::Local::now().naive_local();
        let notice = self
            .view
            .create_file(&mut self.vault, &mut self.workspace, &folder, now);
        self.notify(Some(notice));
    }

    /// Create a timestamped note in the folder at the cursor, whether or not
    /// it is the selected one.
    pub fn new_note_at_cursor(&mut self) {
        let Some(folder) = self.view.folders.cursor_row().map(|r| r.path.clone()) else {
            return;
        };
        let now = chrono::Local::now().naive_local();
        let notice = self
            .view
            .create_file(&mut self.vault, &mut self.workspace, &folder, now);
        self.notify(Some(notice));
    }

    /// Ask for the name of a folder to create under the folder at the cursor.
    pub fn prompt_new_folder(&mut self) {
        if !self.view.is_open() {
            return;
        }
        let parent = self
            .view
            .folders
            .cursor_row()
            .map_or_else(|| path::ROOT_PATH.to_string(), |r| r.path.clone());
        self.mode = AppMode::Modal(Modal::Prompt(TextPrompt::new(
            "New folder",
            "Folder name:",
            "",
            PromptAction::CreateFolder { parent },
        )));
    }

    /// Ask for a new name for the folder or file at the cursor.
    pub fn prompt_rename(&mut self) {
        let prompt = match self.view.focus {
            Focus::Folders => {
                let Some(row) = self.view.folders.cursor_row().filter(|r| !r.is_root()) else {
                    return;
                };
                TextPrompt::new(
                    "Rename folder",
                    "New name:",
                    path::name_of(&row.path),
                    PromptAction::RenameFolder {
                        path: row.path.clone(),
                    },
                )
            }
            Focus::Files => {
                let (Some(row), Some(folder)) =
                    (self.view.files.cursor_row(), self.view.files.folder_path())
                else {
                    return;
                };
                TextPrompt::new(
                    "Rename file",
                    "New name:",
                    &row.name,
                    PromptAction::RenameFile {
                        path: row.path.clone(),
                        folder: folder.to_string(),
                    },
                )
            }
        };
        self.mode = AppMode::Modal(Modal::Prompt(prompt));
    }

    /// Ask before deleting the folder or file at the cursor.
    pub fn confirm_delete(&mut self) {
        let confirm = match self.view.focus {
            Focus::Folders => {
                let Some(row) = self.view.folders.cursor_row().filter(|r| !r.is_root()) else {
                    return;
                };
                Confirm::new(
                    "Delete folder",
                    &format!("Delete \"{}\" and all its contents?", row.label),
                    ConfirmAction::DeleteFolder {
                        path: row.path.clone(),
                    },
                )
            }
            Focus::Files => {
                let (Some(row), Some(folder)) =
                    (self.view.files.cursor_row(), self.view.files.folder_path())
                else {
                    return;
                };
                Confirm::new(
                    "Delete file",
                    &format!("Delete \"{}\"?", row.name),
                    ConfirmAction::DeleteFile {
                        path: row.path.clone(),
                        folder: folder.to_string(),
                    },
                )
            }
        };
        self.mode = AppMode::Modal(Modal::Confirm(confirm));
    }

    /// Resolve the open modal with the entered value or as confirmed.
    pub fn submit_modal(&mut self) {
        if let AppMode::Modal(modal) = std::mem::take(&mut self.mode) {
            let notice = self.view.resolve(&mut self.vault, modal.submit());
            self.notify(notice);
        }
    }

    /// Resolve the open modal as cancelled or declined.
    pub fn cancel_modal(&mut self) {
        if let AppMode::Modal(modal) = std::mem::take(&mut self.mode) {
            let notice = self.view.resolve(&mut self.vault, modal.cancel());
            self.notify(notice);
        }
    }

    pub fn prompt_mut(&mut self) -> Option<&mut TextPrompt> {
        match &mut self.mode {
            AppMode::Modal(Modal::Prompt(prompt)) => Some(prompt),
            _ => None,
        }
    }

    // ── Workspace ───────────────────────────────────────────────────────────

    pub fn toggle_pin(&mut self) {
        if let Some(pinned) = self.workspace.toggle_pin() {
            tracing::debug!(pinned, "active leaf pin toggled");
        }
    }

    pub fn close_leaf(&mut self) {
        if let Some(leaf) = self.workspace.close_active() {
            tracing::debug!(path = %leaf.path, "leaf closed");
        }
    }

    // ── Settings page ───────────────────────────────────────────────────────

    pub fn open_settings(&mut self) {
        self.mode = AppMode::Settings { row: 0 };
    }

    pub fn close_settings(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn settings_next_row(&mut self) {
        if let AppMode::Settings { row } = &mut self.mode {
            *row = (*row + 1).min(SETTINGS_ROWS - 1);
        }
    }

    pub fn settings_previous_row(&mut self) {
        if let AppMode::Settings { row } = &mut self.mode {
            *row = row.saturating_sub(1);
        }
    }

    /// Flip the highlighted setting. The live panel hears about it through
    /// its settings subscription.
    pub fn cycle_setting(&mut self) {
        let AppMode::Settings { row } = self.mode else {
            return;
        };
        let current = self.settings.settings();
        let result = match row {
            0 => self.settings.set_layout(current.layout.toggled()),
            _ => self
                .settings
                .set_name_display(current.name_display.toggled()),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "saving settings failed");
            self.notify(Some(Notice::error(format!("Failed to save settings: {}", e))));
        }
    }

    // ── Mouse ───────────────────────────────────────────────────────────────

    /// Left button pressed at a screen position.
    pub fn click(&mut self, column: u16, row: u16) {
        if self.mode != AppMode::Normal {
            return;
        }
        if let Some(index) = row_at(&self.hit_map.tabs, column, row) {
            self.workspace.activate(index);
            return;
        }
        if !self.view.is_open() {
            return;
        }
        if self
            .hit_map
            .divider
            .is_some_and(|d| contains(d, column, row))
        {
            self.view.split.begin_drag();
            return;
        }
        if self
            .hit_map
            .new_note
            .is_some_and(|b| contains(b, column, row))
        {
            self.new_note();
            return;
        }
        if let Some(index) = row_at(&self.hit_map.folder_rows, column, row) {
            self.view.focus = Focus::Folders;
            self.view.folders.cursor.index = index;
            self.activate();
            return;
        }
        if let Some(index) = row_at(&self.hit_map.file_rows, column, row) {
            self.view.focus = Focus::Files;
            self.view.files.cursor.index = index;
            self.activate();
        }
    }

    /// Pointer moved with the left button held.
    pub fn drag(&mut self, column: u16, row: u16) {
        if !self.view.split.is_dragging() {
            return;
        }
        let container = self.hit_map.container;
        let (offset, extent) = match self.view.layout() {
            Layout::Vertical => (column.saturating_sub(container.x), container.width),
            Layout::Horizontal => (row.saturating_sub(container.y), container.height),
        };
        self.view.split.drag_to(offset, extent);
    }

    /// Left button released anywhere.
    pub fn release(&mut self) {
        self.view.split.end_drag();
    }

    // ── Status bar text ─────────────────────────────────────────────────────

    /// Vault name followed by the selected folder path.
    pub fn location(&self) -> String {
        match self.view.projection().selected() {
            Some(selected) if !path::is_root(selected) => {
                format!("{}/{}", self.vault.name(), selected)
            }
            _ => self.vault.name().to_string(),
        }
    }

    pub fn pane_info(&self) -> String {
        match self.view.files.listing() {
            Some(listing) if listing.files.len() == 1 => "1 file".to_string(),
            Some(listing) => format!("{} files", listing.files.len()),
            None => String::new(),
        }
    }

    pub fn leaf_info(&self) -> Option<String> {
        let index = self.workspace.active_index()?;
        let leaf = self.workspace.active_leaf()?;
        let pin = if leaf.pinned { " (pinned)" } else { "" };
        Some(format!(
            "[{}/{}] {}{}",
            index + 1,
            self.workspace.leaves().len(),
            path::name_of(&leaf.path),
            pin
        ))
    }

    pub fn watcher_status(&self) -> Option<&'static str> {
        if !self.watcher_enabled {
            Some("[watch off]")
        } else if self.view.is_open() && !self.view.is_live() {
            Some("[not live]")
        } else {
            None
        }
    }
}
