//! Directory-backed vault store.

use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use crate::event::Event;
use crate::fs::path::{self, ROOT_PATH};
use crate::fs::vault::{
    validate_new_path, FileNode, FolderNode, Node, NodeKind, StoreError, StoreResult,
    Subscription, VaultStore,
};
use crate::fs::watcher::{should_ignore, FsWatcher};

/// Folder paths seen at the last scan, shared with the watcher thread so it can
/// classify removals after the entry is already gone from disk.
pub type KnownFolders = Arc<RwLock<HashSet<String>>>;

/// A vault mirrored from a directory on disk.
///
/// Hidden entries, symlinks and anything matching an ignore pattern are not part
/// of the vault. Children are ordered folders first, then files, each
/// case-insensitively by name.
pub struct LocalVault {
    base: PathBuf,
    name: String,
    root: FolderNode,
    ignore_patterns: Vec<String>,
    known_folders: KnownFolders,
    watch: bool,
}

impl LocalVault {
    /// Open the directory at `base` as a vault.
    pub fn open(base: &Path, ignore_patterns: Vec<String>) -> StoreResult<Self> {
        let base = base.canonicalize()?;
        if !base.is_dir() {
            return Err(StoreError::NotFound(base.display().to_string()));
        }
        let name = base
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| base.to_string_lossy().to_string());

        let mut vault = Self {
            base,
            name,
            root: FolderNode::root(),
            ignore_patterns,
            known_folders: Arc::new(RwLock::new(HashSet::new())),
            watch: true,
        };
        vault.refresh()?;
        Ok(vault)
    }

    /// Enable or disable filesystem watching for future subscriptions.
    /// Unwatched subscriptions deliver no events.
    pub fn set_watch(&mut self, watch: bool) {
        self.watch = watch;
    }

    /// Absolute location of a vault path.
    pub fn abs(&self, vault_path: &str) -> PathBuf {
        if path::is_root(vault_path) {
            self.base.clone()
        } else {
            vault_path
                .split('/')
                .fold(self.base.clone(), |acc, segment| acc.join(segment))
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        name.starts_with('.') || should_ignore(Path::new(name), &self.ignore_patterns)
    }

    /// Read one directory level and recurse into subfolders.
    ///
    /// Unreadable directories and entries are skipped rather than failing the scan.
    fn scan_folder(&self, vault_path: &str) -> FolderNode {
        let mut folder = FolderNode::new(vault_path);
        let entries = match fs::read_dir(self.abs(vault_path)) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = vault_path, error = %e, "cannot read folder");
                return folder;
            }
        };

        let mut folders = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().to_string();
            if self.is_excluded(&name) {
                continue;
            }
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            let child_path = path::join(vault_path, &name);
            if file_type.is_dir() {
                folders.push(self.scan_folder(&child_path));
            } else if file_type.is_file() {
                files.push(FileNode::new(&child_path));
            }
        }

        folders.sort_by_key(|f| f.name.to_lowercase());
        files.sort_by_key(|f| f.name.to_lowercase());
        folder.children = folders
            .into_iter()
            .map(Node::Folder)
            .chain(files.into_iter().map(Node::File))
            .collect();
        folder
    }

    fn ensure_parent_folder(&self, vault_path: &str) -> StoreResult<()> {
        let parent = path::parent_of(vault_path).unwrap_or_else(|| ROOT_PATH.to_string());
        if self.folder(&parent).is_none() {
            return Err(StoreError::NotFound(parent));
        }
        Ok(())
    }

    fn ensure_existing(&self, raw: &str) -> StoreResult<(String, NodeKind)> {
        let vault_path = path::normalize(raw);
        if path::is_root(&vault_path) {
            return Err(StoreError::RootImmutable);
        }
        match self.node(&vault_path).map(|n| n.kind()) {
            Some(kind) => Ok((vault_path, kind)),
            None => Err(StoreError::NotFound(vault_path)),
        }
    }
}

/// Map an I/O failure on `vault_path` to the store's vocabulary.
fn io_error(vault_path: &str, err: std::io::Error) -> StoreError {
    match err.kind() {
        ErrorKind::AlreadyExists => StoreError::AlreadyExists(vault_path.to_string()),
        ErrorKind::NotFound => StoreError::NotFound(vault_path.to_string()),
        _ => StoreError::Io(err),
    }
}

impl VaultStore for LocalVault {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> &FolderNode {
        &self.root
    }

    fn create(&mut self, raw: &str, content: &str) -> StoreResult<FileNode> {
        let vault_path = validate_new_path(raw)?;
        self.ensure_parent_folder(&vault_path)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.abs(&vault_path))
            .map_err(|e| io_error(&vault_path, e))?;
        file.write_all(content.as_bytes())?;

        self.refresh()?;
        Ok(FileNode::new(&vault_path))
    }

    fn create_folder(&mut self, raw: &str) -> StoreResult<()> {
        let vault_path = validate_new_path(raw)?;
        self.ensure_parent_folder(&vault_path)?;
        fs::create_dir(self.abs(&vault_path)).map_err(|e| io_error(&vault_path, e))?;
        self.refresh()
    }

    fn rename(&mut self, raw: &str, new_raw: &str) -> StoreResult<()> {
        let (from, _) = self.ensure_existing(raw)?;
        let to = validate_new_path(new_raw)?;
        if from == to {
            return Ok(());
        }
        self.ensure_parent_folder(&to)?;
        let dest = self.abs(&to);
        if dest.exists() {
            return Err(StoreError::AlreadyExists(to));
        }
        fs::rename(self.abs(&from), dest).map_err(|e| io_error(&from, e))?;
        self.refresh()
    }

    fn delete(&mut self, raw: &str) -> StoreResult<()> {
        let (vault_path, kind) = self.ensure_existing(raw)?;
        let target = self.abs(&vault_path);
        let result = if kind == NodeKind::Folder {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        result.map_err(|e| io_error(&vault_path, e))?;
        self.refresh()
    }

    fn subscribe(&mut self, tx: mpsc::UnboundedSender<Event>) -> StoreResult<Subscription> {
        let active = Arc::new(AtomicBool::new(true));
        if !self.watch {
            tracing::debug!("watching disabled; subscription delivers no events");
            return Ok(Subscription::new(active, None));
        }
        let watcher = FsWatcher::new(
            &self.base,
            self.ignore_patterns.clone(),
            self.known_folders.clone(),
            active.clone(),
            tx,
        )
        .map_err(|e| StoreError::Io(std::io::Error::other(e.to_string())))?;
        Ok(Subscription::new(active, Some(Box::new(watcher))))
    }

    fn refresh(&mut self) -> StoreResult<()> {
        self.root = self.scan_folder(ROOT_PATH);
        let paths: HashSet<String> = self.root.folder_paths().into_iter().collect();
        if let Ok(mut known) = self.known_folders.write() {
            *known = paths;
        }
        Ok(())
    }
}
