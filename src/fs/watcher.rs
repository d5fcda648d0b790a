use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::event::Event;
use crate::fs::local::KnownFolders;
use crate::fs::path;
use crate::fs::vault::{EntryRef, VaultEvent};

/// Default patterns to ignore when scanning and watching a vault.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[".git", ".obsidian", ".trash", "node_modules"];

/// Filesystem watcher that turns raw notifications under a vault directory into
/// `VaultEvent`s and forwards them on the application event channel.
pub struct FsWatcher {
    /// Handle to the watcher (dropped to stop watching).
    _watcher: notify::RecommendedWatcher,
}

impl FsWatcher {
    /// Watch `base` recursively.
    ///
    /// Events are forwarded only while `active` is set. Paths matching any of
    /// `ignore_patterns`, hidden entries and the vault root itself are dropped.
    pub fn new(
        base: &Path,
        ignore_patterns: Vec<String>,
        known_folders: KnownFolders,
        active: Arc<AtomicBool>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let root = base.to_path_buf();
        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                if !active.load(Ordering::Relaxed) {
                    return;
                }
                match result {
                    Ok(raw) => {
                        let translator = Translator {
                            base: &root,
                            ignore_patterns: &ignore_patterns,
                            known_folders: &known_folders,
                        };
                        for event in translator.translate(&raw) {
                            if event_tx.send(Event::Vault(event)).is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        // Watcher errors are non-fatal; the next scan catches up.
                        tracing::warn!(error = %e, "watcher error");
                    }
                }
            })?;

        watcher.watch(base, RecursiveMode::Recursive)?;
        tracing::debug!(path = %base.display(), "watching vault");

        Ok(Self { _watcher: watcher })
    }
}

/// Maps raw notify events onto vault events.
struct Translator<'a> {
    base: &'a Path,
    ignore_patterns: &'a [String],
    known_folders: &'a KnownFolders,
}

impl Translator<'_> {
    fn translate(&self, raw: &notify::Event) -> Vec<VaultEvent> {
        match raw.kind {
            EventKind::Create(kind) => raw
                .paths
                .iter()
                .filter_map(|p| {
                    let rel = self.relative(p)?;
                    let entry = match kind {
                        CreateKind::Folder => EntryRef::folder(&rel),
                        CreateKind::File => EntryRef::file(&rel),
                        _ => self.existing_entry(p, &rel),
                    };
                    Some(VaultEvent::create(entry))
                })
                .collect(),
            EventKind::Remove(kind) => raw
                .paths
                .iter()
                .filter_map(|p| {
                    let rel = self.relative(p)?;
                    let entry = match kind {
                        RemoveKind::Folder => EntryRef::folder(&rel),
                        RemoveKind::File => EntryRef::file(&rel),
                        _ => self.removed_entry(&rel),
                    };
                    Some(VaultEvent::delete(entry))
                })
                .collect(),
            EventKind::Modify(ModifyKind::Name(mode)) => self.translate_rename(mode, &raw.paths),
            EventKind::Modify(_) => raw
                .paths
                .iter()
                .filter_map(|p| {
                    let rel = self.relative(p)?;
                    Some(VaultEvent::modify(self.existing_entry(p, &rel)))
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn translate_rename(&self, mode: RenameMode, paths: &[PathBuf]) -> Vec<VaultEvent> {
        match (mode, paths) {
            (RenameMode::Both, [from, to, ..]) => {
                match (self.relative(from), self.relative(to)) {
                    (Some(old), Some(new)) => {
                        vec![VaultEvent::rename(self.existing_entry(to, &new), &old)]
                    }
                    // Moved in from an excluded location.
                    (None, Some(new)) => vec![VaultEvent::create(self.existing_entry(to, &new))],
                    // Moved out to an excluded location.
                    (Some(old), None) => vec![VaultEvent::delete(self.removed_entry(&old))],
                    (None, None) => Vec::new(),
                }
            }
            (RenameMode::From, _) => paths
                .iter()
                .filter_map(|p| self.relative(p))
                .map(|rel| VaultEvent::delete(self.removed_entry(&rel)))
                .collect(),
            (RenameMode::To, _) => paths
                .iter()
                .filter_map(|p| Some(VaultEvent::create(self.existing_entry(p, &self.relative(p)?))))
                .collect(),
            _ => paths
                .iter()
                .filter_map(|p| {
                    let rel = self.relative(p)?;
                    Some(if p.exists() {
                        VaultEvent::create(self.existing_entry(p, &rel))
                    } else {
                        VaultEvent::delete(self.removed_entry(&rel))
                    })
                })
                .collect(),
        }
    }

    /// Vault path for an absolute path, or `None` if it is outside the vault,
    /// excluded, or the root itself.
    fn relative(&self, abs: &Path) -> Option<String> {
        let rel = abs.strip_prefix(self.base).ok()?;
        let mut segments = Vec::new();
        for component in rel.components() {
            if let Component::Normal(name) = component {
                let name = name.to_string_lossy();
                if name.starts_with('.') {
                    return None;
                }
                segments.push(name.to_string());
            }
        }
        if segments.is_empty() || should_ignore(rel, self.ignore_patterns) {
            return None;
        }
        Some(path::normalize(&segments.join("/")))
    }

    fn existing_entry(&self, abs: &Path, rel: &str) -> EntryRef {
        if abs.is_dir() {
            EntryRef::folder(rel)
        } else if abs.exists() {
            EntryRef::file(rel)
        } else {
            self.removed_entry(rel)
        }
    }

    fn removed_entry(&self, rel: &str) -> EntryRef {
        let was_folder = self
            .known_folders
            .read()
            .map(|known| known.contains(rel))
            .unwrap_or(false);
        if was_folder {
            EntryRef::folder(rel)
        } else {
            EntryRef::file(rel)
        }
    }
}

/// Check if a path should be ignored based on ignore patterns.
///
/// A path is ignored if any of its components match any ignore pattern exactly.
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            patterns.iter().any(|pattern| name == pattern.as_str())
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::vault::{NodeKind, VaultEventKind};
    use std::collections::HashSet;
    use std::sync::RwLock;
    use tempfile::TempDir;

    fn known(paths: &[&str]) -> KnownFolders {
        Arc::new(RwLock::new(paths.iter().map(|p| p.to_string()).collect::<HashSet<_>>()))
    }

    fn raw(kind: EventKind, paths: Vec<PathBuf>) -> notify::Event {
        let mut event = notify::Event::new(kind);
        event.paths = paths;
        event
    }

    #[test]
    fn ignore_git_directory() {
        let patterns = vec![".git".to_string()];
        assert!(should_ignore(Path::new("/vault/.git/HEAD"), &patterns));
    }

    #[test]
    fn do_not_ignore_normal_paths() {
        let patterns = vec![".git".to_string(), ".obsidian".to_string()];
        assert!(!should_ignore(Path::new("/vault/Notes/a.md"), &patterns));
    }

    #[test]
    fn partial_name_does_not_match() {
        let patterns = vec![".trash".to_string()];
        assert!(!should_ignore(Path::new("/vault/.trash2/x.md"), &patterns));
    }

    #[test]
    fn create_file_maps_to_create() {
        let base = PathBuf::from("/vault");
        let folders = known(&["/"]);
        let patterns = Vec::new();
        let t = Translator {
            base: &base,
            ignore_patterns: &patterns,
            known_folders: &folders,
        };
        let events = t.translate(&raw(
            EventKind::Create(CreateKind::File),
            vec![base.join("Notes").join("a.md")],
        ));
        assert_eq!(events, vec![VaultEvent::create(EntryRef::file("Notes/a.md"))]);
    }

    #[test]
    fn remove_any_uses_known_folders() {
        let base = PathBuf::from("/vault");
        let folders = known(&["/", "Notes"]);
        let patterns = Vec::new();
        let t = Translator {
            base: &base,
            ignore_patterns: &patterns,
            known_folders: &folders,
        };
        let events = t.translate(&raw(
            EventKind::Remove(RemoveKind::Any),
            vec![base.join("Notes"), base.join("todo.md")],
        ));
        assert_eq!(events[0].entry.kind, NodeKind::Folder);
        assert_eq!(events[1].entry.kind, NodeKind::File);
        assert!(events.iter().all(|e| e.kind == VaultEventKind::Delete));
    }

    #[test]
    fn paired_rename_carries_old_path() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().to_path_buf();
        std::fs::write(base.join("new.md"), "").unwrap();
        let folders = known(&["/"]);
        let patterns = Vec::new();
        let t = Translator {
            base: &base,
            ignore_patterns: &patterns,
            known_folders: &folders,
        };
        let events = t.translate(&raw(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            vec![base.join("old.md"), base.join("new.md")],
        ));
        assert_eq!(
            events,
            vec![VaultEvent::rename(EntryRef::file("new.md"), "old.md")]
        );
    }

    #[test]
    fn hidden_and_ignored_paths_are_dropped() {
        let base = PathBuf::from("/vault");
        let folders = known(&["/"]);
        let patterns = vec!["node_modules".to_string()];
        let t = Translator {
            base: &base,
            ignore_patterns: &patterns,
            known_folders: &folders,
        };
        let events = t.translate(&raw(
            EventKind::Create(CreateKind::File),
            vec![
                base.join(".obsidian").join("workspace.json"),
                base.join("node_modules").join("x.js"),
                base.clone(),
            ],
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn data_change_maps_to_modify() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().to_path_buf();
        std::fs::write(base.join("a.md"), "x").unwrap();
        let folders = known(&["/"]);
        let patterns = Vec::new();
        let t = Translator {
            base: &base,
            ignore_patterns: &patterns,
            known_folders: &folders,
        };
        let events = t.translate(&raw(
            EventKind::Modify(ModifyKind::Any),
            vec![base.join("a.md")],
        ));
        assert_eq!(events, vec![VaultEvent::modify(EntryRef::file("a.md"))]);
    }

    #[test]
    fn access_events_are_ignored() {
        let base = PathBuf::from("/vault");
        let folders = known(&["/"]);
        let patterns = Vec::new();
        let t = Translator {
            base: &base,
            ignore_patterns: &patterns,
            known_folders: &folders,
        };
        let events = t.translate(&raw(
            EventKind::Access(notify::event::AccessKind::Any),
            vec![base.join("a.md")],
        ));
        assert!(events.is_empty());
    }
}
