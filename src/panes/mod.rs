//! The dual-pane vault panel: folder tree on one side, the selected folder's
//! files on the other, kept in sync with the store's mutation events.

pub mod dialog;
pub mod file_pane;
pub mod folder_pane;
pub mod projection;
pub mod reconciler;
pub mod split;

use chrono::NaiveDateTime;
use tokio::sync::mpsc;

use crate::event::Event;
use crate::fs::vault::{StoreResult, Subscription, VaultEvent, VaultStore};
use crate::settings::{Layout, NameDisplay, PanelSettings, SettingsChange, SettingsStore};
use crate::workspace::PaneManager;

use self::dialog::{ConfirmAction, PromptAction, Resolution};
use self::file_pane::FilePane;
use self::folder_pane::FolderPane;
use self::projection::TreeProjection;
use self::reconciler::{reconcile, Rerender};
use self::split::PaneSplit;

/// Identifier the panel registers under.
pub const VIEW_TYPE: &str = "dual-pane-file-manager";

/// A panel the host can open and close.
pub trait Panel {
    fn view_type(&self) -> &'static str;

    fn display_text(&self) -> &'static str;

    /// Build initial state and start listening for store and settings changes.
    ///
    /// The panel is open even when the store subscription fails; the error is
    /// returned so the caller can report that live updates are unavailable.
    fn open(
        &mut self,
        vault: &mut dyn VaultStore,
        settings: &mut SettingsStore,
        tx: mpsc::UnboundedSender<Event>,
    ) -> StoreResult<()>;

    /// Release subscriptions and discard transient state.
    fn close(&mut self, settings: &mut SettingsStore);

    fn is_open(&self) -> bool;
}

/// A transient status-bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Keyboard position and scroll offset within a list of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    pub index: usize,
    pub offset: usize,
}

impl ListCursor {
    pub fn next(&mut self, len: usize) {
        if len > 0 && self.index < len - 1 {
            self.index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.index = 0;
    }

    pub fn last(&mut self, len: usize) {
        self.index = len.saturating_sub(1);
    }

    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }

    /// Keep the cursor row within a window of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + visible_height {
            self.offset = self.index - visible_height + 1;
        }
    }
}

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Folders,
    Files,
}

impl Focus {
    pub fn toggled(self) -> Self {
        match self {
            Focus::Folders => Focus::Files,
            Focus::Files => Focus::Folders,
        }
    }
}

pub struct DualPaneView {
    projection: TreeProjection,
    pub folders: FolderPane,
    pub files: FilePane,
    pub focus: Focus,
    pub split: PaneSplit,
    layout: Layout,
    name_display: NameDisplay,
    subscription: Option<Subscription>,
    open: bool,
    /// The store has seen events since its tree was last re-read.
    stale: bool,
}

impl DualPaneView {
    pub fn new(settings: PanelSettings) -> Self {
        Self {
            projection: TreeProjection::new(),
            folders: FolderPane::new(),
            files: FilePane::new(),
            focus: Focus::Folders,
            split: PaneSplit::new(),
            layout: settings.layout,
            name_display: settings.name_display,
            subscription: None,
            open: false,
            stale: false,
        }
    }

    pub fn projection(&self) -> &TreeProjection {
        &self.projection
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn name_display(&self) -> NameDisplay {
        self.name_display
    }

    pub fn is_live(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| s.is_active())
    }

    /// Rebuild the folder rows from the live tree.
    pub fn render_folders(&mut self, vault: &dyn VaultStore) {
        self.folders.render(&self.projection, vault);
    }

    /// Show the selected folder's files, or nothing when no live folder is selected.
    pub fn render_files(&mut self, vault: &dyn VaultStore) {
        match self.projection.file_listing(vault.root()) {
            Some(listing) => self.files.show_listing(listing),
            None => self.files.clear(),
        }
    }

    /// Re-read the store if events arrived since the last read.
    fn sync(&mut self, vault: &mut dyn VaultStore) {
        if !self.stale {
            return;
        }
        self.stale = false;
        if let Err(e) = vault.refresh() {
            tracing::warn!(error = %e, "vault refresh failed");
        }
    }

    /// Flip a folder's expansion, select it and show its files.
    pub fn toggle(&mut self, vault: &mut dyn VaultStore, path: &str) {
        self.sync(vault);
        let expanded = self.projection.toggle(path);
        tracing::debug!(path, expanded, "folder toggled");
        self.render_folders(vault);
        self.folders.move_cursor_to(path);
        self.render_files(vault);
    }

    /// Bring the store up to date and redraw whatever the event invalidates.
    pub fn handle_vault_event(&mut self, vault: &mut dyn VaultStore, event: &VaultEvent) -> Rerender {
        if !self.open {
            return Rerender::NONE;
        }
        self.stale = true;
        let rerender = reconcile(self.projection.selected(), event);
        tracing::debug!(
            kind = ?event.kind,
            path = %event.entry.path,
            folders = rerender.folders,
            files = rerender.files,
            "reconciled vault event"
        );
        if rerender.folders || rerender.files {
            self.sync(vault);
        }
        if rerender.folders {
            self.render_folders(vault);
        }
        if rerender.files {
            self.render_files(vault);
        }
        rerender
    }

    pub fn apply_settings(&mut self, change: SettingsChange) {
        match change {
            SettingsChange::Layout(layout) => self.update_layout(layout),
            SettingsChange::NameDisplay(name_display) => self.update_name_display(name_display),
        }
    }

    /// Switch pane arrangement; the boundary returns to the middle.
    pub fn update_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.split = PaneSplit::new();
    }

    /// Presentation only; rows are not rebuilt.
    pub fn update_name_display(&mut self, name_display: NameDisplay) {
        self.name_display = name_display;
    }

    pub fn create_folder(
        &mut self,
        vault: &mut dyn VaultStore,
        parent: &str,
        name: Option<&str>,
    ) -> Option<Notice> {
        let notice = folder_pane::create_folder(vault, parent, name)?;
        if !notice.is_error {
            self.render_folders(vault);
        }
        Some(notice)
    }

    pub fn rename_folder(
        &mut self,
        vault: &mut dyn VaultStore,
        path: &str,
        new_name: Option<&str>,
    ) -> Option<Notice> {
        let notice = folder_pane::rename_folder(vault, path, new_name)?;
        if !notice.is_error {
            self.render_folders(vault);
        }
        Some(notice)
    }

    pub fn delete_folder(&mut self, vault: &mut dyn VaultStore, path: &str) -> Option<Notice> {
        let notice = folder_pane::delete_folder(vault, path)?;
        if !notice.is_error {
            self.render_folders(vault);
        }
        Some(notice)
    }

    /// Create a timestamped note in `folder` and open it.
    pub fn create_file(
        &mut self,
        vault: &mut dyn VaultStore,
        panes: &mut dyn PaneManager,
        folder: &str,
        now: NaiveDateTime,
    ) -> Notice {
        let notice = file_pane::create_file(vault, panes, folder, now);
        // Only the listing on screen is refreshed; selection stays put.
        if !notice.is_error && self.files.folder_path() == Some(folder) {
            self.show_files_of(vault, folder);
        }
        notice
    }

    pub fn rename_file(
        &mut self,
        vault: &mut dyn VaultStore,
        path: &str,
        folder: &str,
        new_name: Option<&str>,
    ) -> Option<Notice> {
        let notice = file_pane::rename_file(vault, path, folder, new_name)?;
        if !notice.is_error {
            self.show_files_of(vault, folder);
        }
        Some(notice)
    }

    pub fn delete_file(&mut self, vault: &mut dyn VaultStore, path: &str, folder: &str) -> Notice {
        let notice = file_pane::delete_file(vault, path);
        if !notice.is_error {
            self.show_files_of(vault, folder);
        }
        notice
    }

    pub fn open_file(&self, panes: &mut dyn PaneManager, path: &str) {
        file_pane::open_file(panes, path);
    }

    fn show_files_of(&mut self, vault: &dyn VaultStore, folder_path: &str) {
        if let Some(folder) = vault.folder(folder_path) {
            self.files.show_folder(folder);
        }
    }

    /// Resume the command a modal was opened for. Cancelled prompts and
    /// declined confirmations never reach the store.
    pub fn resolve(&mut self, vault: &mut dyn VaultStore, resolution: Resolution) -> Option<Notice> {
        match resolution {
            Resolution::Prompt { value: None, .. } => None,
            Resolution::Confirm {
                confirmed: false, ..
            } => None,
            Resolution::Prompt {
                action,
                value: Some(value),
            } => match action {
                PromptAction::CreateFolder { parent } => {
                    self.create_folder(vault, &parent, Some(&value))
                }
                PromptAction::RenameFolder { path } => self.rename_folder(vault, &path, Some(&value)),
                PromptAction::RenameFile { path, folder } => {
                    self.rename_file(vault, &path, &folder, Some(&value))
                }
            },
            Resolution::Confirm {
                action,
                confirmed: true,
            } => match action {
                ConfirmAction::DeleteFolder { path } => self.delete_folder(vault, &path),
                ConfirmAction::DeleteFile { path, folder } => {
                    Some(self.delete_file(vault, &path, &folder))
                }
            },
        }
    }
}

impl Panel for DualPaneView {
    fn view_type(&self) -> &'static str {
        VIEW_TYPE
    }

    fn display_text(&self) -> &'static str {
        "Dual pane file manager"
    }

    fn open(
        &mut self,
        vault: &mut dyn VaultStore,
        settings: &mut SettingsStore,
        tx: mpsc::UnboundedSender<Event>,
    ) -> StoreResult<()> {
        let current = settings.settings();
        self.layout = current.layout;
        self.name_display = current.name_display;
        self.split = PaneSplit::new();
        self.focus = Focus::Folders;
        self.projection = TreeProjection::opened();
        self.open = true;
        self.stale = true;
        self.sync(vault);
        settings.subscribe(tx.clone());
        self.render_folders(vault);
        self.render_files(vault);
        tracing::info!(
            vault = vault.name(),
            view = self.view_type(),
            title = self.display_text(),
            "panel opened"
        );

        let subscription = vault.subscribe(tx)?;
        self.subscription = Some(subscription);
        Ok(())
    }

    fn close(&mut self, settings: &mut SettingsStore) {
        self.subscription = None;
        settings.unsubscribe();
        self.projection = TreeProjection::new();
        self.folders.clear();
        self.files.clear();
        self.split.end_drag();
        self.open = false;
        tracing::info!("panel closed");
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
