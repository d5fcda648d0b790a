//! Decides which panes a store mutation invalidates.

use crate::fs::path;
use crate::fs::vault::{VaultEvent, VaultEventKind};

/// Panes that must be redrawn after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rerender {
    pub folders: bool,
    pub files: bool,
}

impl Rerender {
    pub const NONE: Rerender = Rerender {
        folders: false,
        files: false,
    };

    pub fn any(&self) -> bool {
        self.folders || self.files
    }
}

/// Reconcile one event against the current selection.
///
/// Nothing is redrawn without a selection. Folder create/rename/delete
/// reshapes the tree; folder `modify` is ignored. The file pane is redrawn
/// only when the entry sits directly inside the selected folder.
pub fn reconcile(selected: Option<&str>, event: &VaultEvent) -> Rerender {
    let Some(selected) = selected else {
        return Rerender::NONE;
    };

    if event.entry.is_folder() && event.kind == VaultEventKind::Modify {
        return Rerender::NONE;
    }

    let parent = event.entry.parent();
    let in_selected = if path::is_root(selected) {
        parent.as_deref().map_or(true, path::is_root)
    } else {
        parent.as_deref() == Some(selected)
    };

    Rerender {
        folders: event.entry.is_folder(),
        files: in_selected,
    }
}
