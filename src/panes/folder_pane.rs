//! Folder pane: the visible folder rows and the folder commands issued
//! against the store.

use crate::fs::path;
use crate::fs::vault::VaultStore;
use crate::panes::projection::{FolderRow, TreeProjection};
use crate::panes::{ListCursor, Notice};

#[derive(Debug, Default)]
pub struct FolderPane {
    rows: Vec<FolderRow>,
    pub cursor: ListCursor,
}

impl FolderPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[FolderRow] {
        &self.rows
    }

    pub fn cursor_row(&self) -> Option<&FolderRow> {
        self.rows.get(self.cursor.index)
    }

    /// Rebuild rows from the live tree. The cursor stays on the same folder
    /// when it is still visible.
    pub fn render(&mut self, projection: &TreeProjection, vault: &dyn VaultStore) {
        let previous = self.cursor_row().map(|r| r.path.clone());
        self.rows = projection.folder_rows(vault.root(), vault.name());
        match previous.and_then(|p| self.position(&p)) {
            Some(index) => self.cursor.index = index,
            None => self.cursor.clamp(self.rows.len()),
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.cursor = ListCursor::default();
    }

    pub fn position(&self, path: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.path == path)
    }

    pub fn move_cursor_to(&mut self, path: &str) {
        if let Some(index) = self.position(path) {
            self.cursor.index = index;
        }
    }
}

/// Create `name` inside `parent`. Empty or cancelled names are a no-op.
pub fn create_folder(vault: &mut dyn VaultStore, parent: &str, name: Option<&str>) -> Option<Notice> {
    let name = name.filter(|n| !n.is_empty())?;
    let target = path::join(parent, name);
    Some(match vault.create_folder(&target) {
        Ok(()) => {
            tracing::info!(path = %target, "folder created");
            Notice::success(format!("Folder \"{}\" created", name))
        }
        Err(e) => {
            tracing::warn!(path = %target, error = %e, "create folder rejected");
            Notice::error(format!("Failed to create folder: {}", e))
        }
    })
}

/// Rename the folder at `folder_path` to `new_name` within its parent.
///
/// The root, empty or cancelled names, and unchanged names are a no-op.
pub fn rename_folder(
    vault: &mut dyn VaultStore,
    folder_path: &str,
    new_name: Option<&str>,
) -> Option<Notice> {
    let parent = path::parent_of(folder_path)?;
    let new_name = new_name.filter(|n| !n.is_empty() && *n != path::name_of(folder_path))?;
    let target = path::join(&parent, new_name);
    Some(match vault.rename(folder_path, &target) {
        Ok(()) => {
            tracing::info!(from = folder_path, to = %target, "folder renamed");
            Notice::success(format!("Folder renamed to \"{}\"", new_name))
        }
        Err(e) => {
            tracing::warn!(path = folder_path, error = %e, "rename folder rejected");
            Notice::error(format!("Failed to rename folder: {}", e))
        }
    })
}

/// Delete a confirmed folder and its contents. The root is never deleted.
pub fn delete_folder(vault: &mut dyn VaultStore, folder_path: &str) -> Option<Notice> {
    if path::is_root(folder_path) {
        return None;
    }
    let name = path::name_of(folder_path);
    Some(match vault.delete(folder_path) {
        Ok(()) => {
            tracing::info!(path = folder_path, "folder deleted");
            Notice::success(format!("Folder \"{}\" deleted", name))
        }
        Err(e) => {
            tracing::warn!(path = folder_path, error = %e, "delete folder rejected");
            Notice::error(format!("Failed to delete folder: {}", e))
        }
    })
}
