//! The host's editing panes: a row of open notes ("leaves"), each of which can
//! be pinned so navigation never replaces its content.

/// Where the host opens files for editing.
pub trait PaneManager {
    /// Open `path`. With `reuse_most_recent_unpinned`, the most recently used
    /// leaf is reused if it exists and is not pinned; otherwise a new leaf is
    /// opened and activated.
    fn open_file_in_pane(&mut self, path: &str, reuse_most_recent_unpinned: bool);
}

/// An editing pane showing one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub path: String,
    pub pinned: bool,
}

#[derive(Debug, Default)]
pub struct Workspace {
    leaves: Vec<Leaf>,
    /// Index of the most recently used (and displayed) leaf.
    active: Option<usize>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_leaf(&self) -> Option<&Leaf> {
        self.active.and_then(|i| self.leaves.get(i))
    }

    /// Pin or unpin the active leaf. Returns the new pinned state.
    pub fn toggle_pin(&mut self) -> Option<bool> {
        let leaf = self.active.and_then(|i| self.leaves.get_mut(i))?;
        leaf.pinned = !leaf.pinned;
        Some(leaf.pinned)
    }

    pub fn next(&mut self) {
        if let Some(i) = self.active {
            self.active = Some((i + 1) % self.leaves.len());
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.active {
            let len = self.leaves.len();
            self.active = Some((i + len - 1) % len);
        }
    }

    /// Close the active leaf; its left neighbour becomes active.
    pub fn close_active(&mut self) -> Option<Leaf> {
        let i = self.active?;
        let leaf = self.leaves.remove(i);
        self.active = if self.leaves.is_empty() {
            None
        } else {
            Some(i.saturating_sub(1).min(self.leaves.len() - 1))
        };
        Some(leaf)
    }

    pub fn activate(&mut self, index: usize) {
        if index < self.leaves.len() {
            self.active = Some(index);
        }
    }
}

impl PaneManager for Workspace {
    fn open_file_in_pane(&mut self, path: &str, reuse_most_recent_unpinned: bool) {
        if reuse_most_recent_unpinned {
            if let Some(leaf) = self.active.and_then(|i| self.leaves.get_mut(i)) {
                if !leaf.pinned {
                    leaf.path = path.to_string();
                    tracing::debug!(path, "opened in most recent leaf");
                    return;
                }
            }
        }
        self.leaves.push(Leaf {
            path: path.to_string(),
            pinned: false,
        });
        self.active = Some(self.leaves.len() - 1);
        tracing::debug!(path, "opened in new leaf");
    }
}
