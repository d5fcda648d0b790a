//! Tree projection: expansion and selection state, and the rows it yields
//! for a given store tree.

use std::collections::HashSet;

use crate::fs::path::{self, ROOT_PATH};
use crate::fs::vault::FolderNode;

/// A visible folder in the tree pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    pub path: String,
    /// Folder name; the vault name for the root.
    pub label: String,
    /// Nesting level, 0 for the root.
    pub depth: usize,
    pub expanded: bool,
    pub selected: bool,
}

impl FolderRow {
    pub fn is_root(&self) -> bool {
        path::is_root(&self.path)
    }
}

/// A file row in the file pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub path: String,
    pub name: String,
}

/// Contents of the file pane for one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListing {
    pub folder_path: String,
    /// Folder name, or "Root" for the vault root.
    pub header: String,
    pub files: Vec<FileRow>,
}

impl FileListing {
    pub fn for_folder(folder: &FolderNode) -> Self {
        let header = if folder.is_root() {
            "Root".to_string()
        } else {
            folder.name.clone()
        };
        Self {
            folder_path: folder.path.clone(),
            header,
            files: folder
                .files()
                .map(|f| FileRow {
                    path: f.path.clone(),
                    name: f.name.clone(),
                })
                .collect(),
        }
    }
}

/// Expansion set plus the single selected folder.
///
/// Paths are kept as given, so entries for renamed or deleted folders stay
/// behind and simply never match a live folder again.
#[derive(Debug, Clone, Default)]
pub struct TreeProjection {
    expanded: HashSet<String>,
    selected: Option<String>,
}

impl TreeProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a freshly opened panel: root expanded and selected.
    pub fn opened() -> Self {
        let mut projection = Self::new();
        projection.toggle(ROOT_PATH);
        projection
    }

    /// Flip expansion of `path` and select it. Returns the new expansion state.
    pub fn toggle(&mut self, path: &str) -> bool {
        let expanded = if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        };
        self.selected = Some(path.to_string());
        expanded
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.as_deref() == Some(path)
    }

    /// Visible folders in depth-first pre-order. Children of a folder appear
    /// only when the folder itself is expanded, in store order.
    pub fn folder_rows(&self, root: &FolderNode, vault_name: &str) -> Vec<FolderRow> {
        let mut rows = Vec::new();
        self.push_rows(root, vault_name, 0, &mut rows);
        rows
    }

    fn push_rows(&self, folder: &FolderNode, label: &str, depth: usize, rows: &mut Vec<FolderRow>) {
        let expanded = self.is_expanded(&folder.path);
        rows.push(FolderRow {
            path: folder.path.clone(),
            label: label.to_string(),
            depth,
            expanded,
            selected: self.is_selected(&folder.path),
        });
        if expanded {
            for child in folder.folders() {
                self.push_rows(child, &child.name, depth + 1, rows);
            }
        }
    }

    /// Listing for the selected folder, if it still exists under `root`.
    pub fn file_listing(&self, root: &FolderNode) -> Option<FileListing> {
        let selected = self.selected.as_deref()?;
        root.find_folder(selected).map(FileListing::for_folder)
    }
}
