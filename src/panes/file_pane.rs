//! File pane: the listing for the selected folder and the file commands.

use chrono::NaiveDateTime;

use crate::fs::path;
use crate::fs::vault::{FolderNode, VaultStore};
use crate::panes::projection::{FileListing, FileRow};
use crate::panes::{ListCursor, Notice};
use crate::workspace::PaneManager;

#[derive(Debug, Default)]
pub struct FilePane {
    listing: Option<FileListing>,
    pub cursor: ListCursor,
}

impl FilePane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self) -> Option<&FileListing> {
        self.listing.as_ref()
    }

    pub fn folder_path(&self) -> Option<&str> {
        self.listing.as_ref().map(|l| l.folder_path.as_str())
    }

    pub fn cursor_row(&self) -> Option<&FileRow> {
        self.listing
            .as_ref()
            .and_then(|l| l.files.get(self.cursor.index))
    }

    pub fn len(&self) -> usize {
        self.listing.as_ref().map_or(0, |l| l.files.len())
    }

    /// Replace the content with `folder`'s direct files.
    pub fn show_folder(&mut self, folder: &FolderNode) {
        self.show_listing(FileListing::for_folder(folder));
    }

    /// Replace the content. Switching folders resets the cursor.
    pub fn show_listing(&mut self, listing: FileListing) {
        let same_folder = self.folder_path() == Some(listing.folder_path.as_str());
        self.listing = Some(listing);
        if same_folder {
            self.cursor.clamp(self.len());
        } else {
            self.cursor = ListCursor::default();
        }
    }

    pub fn clear(&mut self) {
        self.listing = None;
        self.cursor = ListCursor::default();
    }
}

/// Note name for the given local time: `YYYYMMDD-HHmmss.md`.
pub fn note_file_name(now: NaiveDateTime) -> String {
    now.format("%Y%m%d-%H%M%S.md").to_string()
}

/// Create an empty note in `folder` named after `now` and open it.
///
/// Name collisions are left to the store to reject.
pub fn create_file(
    vault: &mut dyn VaultStore,
    panes: &mut dyn PaneManager,
    folder: &str,
    now: NaiveDateTime,
) -> Notice {
    let target = path::join(folder, &note_file_name(now));
    match vault.create(&target, "") {
        Ok(file) => {
            tracing::info!(path = %file.path, "note created");
            open_file(panes, &file.path);
            Notice::success("New note created")
        }
        Err(e) => {
            tracing::warn!(path = %target, error = %e, "create note rejected");
            Notice::error(format!("Failed to create note: {}", e))
        }
    }
}

/// Rename a file within `folder`. Empty, cancelled and unchanged names are a no-op.
pub fn rename_file(
    vault: &mut dyn VaultStore,
    file_path: &str,
    folder: &str,
    new_name: Option<&str>,
) -> Option<Notice> {
    let new_name = new_name.filter(|n| !n.is_empty() && *n != path::name_of(file_path))?;
    let target = path::join(folder, new_name);
    Some(match vault.rename(file_path, &target) {
        Ok(()) => {
            tracing::info!(from = file_path, to = %target, "file renamed");
            Notice::success(format!("File renamed to \"{}\"", new_name))
        }
        Err(e) => {
            tracing::warn!(path = file_path, error = %e, "rename file rejected");
            Notice::error(format!("Failed to rename file: {}", e))
        }
    })
}

/// Delete a confirmed file.
pub fn delete_file(vault: &mut dyn VaultStore, file_path: &str) -> Notice {
    match vault.delete(file_path) {
        Ok(()) => {
            tracing::info!(path = file_path, "file deleted");
            Notice::success(format!("File \"{}\" deleted", path::name_of(file_path)))
        }
        Err(e) => {
            tracing::warn!(path = file_path, error = %e, "delete file rejected");
            Notice::error(format!("Failed to delete file: {}", e))
        }
    }
}

/// Open a file without clobbering a pinned pane.
pub fn open_file(panes: &mut dyn PaneManager, file_path: &str) {
    panes.open_file_in_pane(file_path, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory::{MemoryVault, StoreCall};
    use crate::workspace::Workspace;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn note_name_is_zero_padded() {
        assert_eq!(note_file_name(at(2024, 5, 1, 10, 3, 7)), "20240501-100307.md");
        assert_eq!(note_file_name(at(2023, 12, 31, 23, 59, 59)), "20231231-235959.md");
    }

    #[test]
    fn create_file_requests_timestamped_empty_note() {
        let mut v = MemoryVault::with_entries("Vault", &["Notes/", "Notes/a.md"]);
        let mut ws = Workspace::new();
        let notice = create_file(&mut v, &mut ws, "Notes", at(2024, 5, 1, 10, 3, 7));
        assert!(!notice.is_error);
        assert_eq!(notice.message, "New note created");
        assert_eq!(
            v.calls,
            vec![StoreCall::Create {
                path: "Notes/20240501-100307.md".into(),
                content: String::new()
            }]
        );
        assert_eq!(
            ws.active_leaf().map(|l| l.path.as_str()),
            Some("Notes/20240501-100307.md")
        );
    }

    #[test]
    fn create_file_at_root_uses_bare_name() {
        let mut v = MemoryVault::new("Vault");
        let mut ws = Workspace::new();
        create_file(&mut v, &mut ws, "/", at(2024, 1, 2, 3, 4, 5));
        assert!(v.node("20240102-030405.md").is_some());
    }

    #[test]
    fn create_file_collision_reports_and_opens_nothing() {
        let mut v = MemoryVault::with_entries("Vault", &["Notes/", "Notes/20240501-100307.md"]);
        let mut ws = Workspace::new();
        let notice = create_file(&mut v, &mut ws, "Notes", at(2024, 5, 1, 10, 3, 7));
        assert!(notice.is_error);
        assert!(notice.message.starts_with("Failed to create note: "));
        assert!(ws.leaves().is_empty());
    }

    #[test]
    fn create_file_respects_pinned_pane() {
        let mut v = MemoryVault::with_entries("Vault", &["a.md"]);
        let mut ws = Workspace::new();
        ws.open_file_in_pane("a.md", true);
        ws.toggle_pin();
        create_file(&mut v, &mut ws, "/", at(2024, 5, 1, 10, 3, 7));
        assert_eq!(ws.leaves().len(), 2);
        assert_eq!(ws.active_index(), Some(1));
    }

    #[test]
    fn rename_file_within_folder() {
        let mut v = MemoryVault::with_entries("Vault", &["Notes/", "Notes/a.md"]);
        let notice = rename_file(&mut v, "Notes/a.md", "Notes", Some("b.md")).unwrap();
        assert_eq!(notice.message, "File renamed to \"b.md\"");
        assert!(v.node("Notes/b.md").is_some());
    }

    #[test]
    fn rename_file_noops() {
        let mut v = MemoryVault::with_entries("Vault", &["Notes/", "Notes/a.md"]);
        assert!(rename_file(&mut v, "Notes/a.md", "Notes", Some("a.md")).is_none());
        assert!(rename_file(&mut v, "Notes/a.md", "Notes", Some("")).is_none());
        assert!(rename_file(&mut v, "Notes/a.md", "Notes", None).is_none());
        assert!(v.calls.is_empty());
    }

    #[test]
    fn delete_file_reports_name() {
        let mut v = MemoryVault::with_entries("Vault", &["Notes/", "Notes/a.md"]);
        let notice = delete_file(&mut v, "Notes/a.md");
        assert_eq!(notice.message, "File \"a.md\" deleted");
        assert!(v.node("Notes/a.md").is_none());
    }

    #[test]
    fn open_file_routes_through_pane_manager() {
        let mut ws = Workspace::new();
        open_file(&mut ws, "a.md");
        open_file(&mut ws, "b.md");
        assert_eq!(ws.leaves().len(), 1);
        ws.toggle_pin();
        open_file(&mut ws, "c.md");
        assert_eq!(ws.leaves().len(), 2);
    }

    #[test]
    fn show_folder_lists_direct_files_in_store_order() {
        let v = MemoryVault::with_entries(
            "Vault",
            &["Notes/", "Notes/b.md", "Notes/Sub/", "Notes/Sub/c.md", "Notes/a.md"],
        );
        let mut pane = FilePane::new();
        pane.show_folder(v.folder("Notes").unwrap());
        let names: Vec<&str> = pane
            .listing()
            .unwrap()
            .files
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["b.md", "a.md"]);
    }

    #[test]
    fn show_folder_resets_cursor_on_switch() {
        let v = MemoryVault::with_entries("Vault", &["A/", "A/1.md", "A/2.md", "B/", "B/1.md"]);
        let mut pane = FilePane::new();
        pane.show_folder(v.folder("A").unwrap());
        pane.cursor.index = 1;
        pane.show_folder(v.folder("A").unwrap());
        assert_eq!(pane.cursor.index, 1);
        pane.show_folder(v.folder("B").unwrap());
        assert_eq!(pane.cursor.index, 0);
    }
}
