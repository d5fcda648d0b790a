//! Backing store model: folder/file nodes, the `VaultStore` trait, and the
//! mutation events a store delivers to its subscribers.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::event::Event;
use crate::fs::path::{self, ROOT_PATH};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Rejections reported by a store. The `Display` text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("the vault root cannot be renamed or deleted")]
    RootImmutable,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Kind of a vault entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
}

/// A file in the vault. Content is not modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub path: String,
    pub name: String,
}

impl FileNode {
    pub fn new(path: &str) -> Self {
        Self {
            name: path::name_of(path).to_string(),
            path: path.to_string(),
        }
    }
}

/// A child of a folder, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(FolderNode),
    File(FileNode),
}

impl Node {
    pub fn path(&self) -> &str {
        match self {
            Node::Folder(f) => &f.path,
            Node::File(f) => &f.path,
        }
    }
}

/// A folder and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub path: String,
    pub name: String,
    pub children: Vec<Node>,
}

impl FolderNode {
    /// An empty folder at `path`.
    pub fn new(path: &str) -> Self {
        Self {
            name: path::name_of(path).to_string(),
            path: path.to_string(),
            children: Vec::new(),
        }
    }

    /// An empty root folder.
    pub fn root() -> Self {
        Self::new(ROOT_PATH)
    }

    pub fn is_root(&self) -> bool {
        path::is_root(&self.path)
    }

    /// Direct subfolders, in store order.
    pub fn folders(&self) -> impl Iterator<Item = &FolderNode> {
        self.children.iter().filter_map(|c| match c {
            Node::Folder(f) => Some(f),
            Node::File(_) => None,
        })
    }

    /// Direct files, in store order.
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.children.iter().filter_map(|c| match c {
            Node::File(f) => Some(f),
            Node::Folder(_) => None,
        })
    }

    /// Find a descendant folder (or this folder) by path.
    pub fn find_folder(&self, target: &str) -> Option<&FolderNode> {
        if self.path == target {
            return Some(self);
        }
        self.folders()
            .filter(|f| f.path == target || is_within(target, &f.path))
            .find_map(|f| f.find_folder(target))
    }

    /// Find any descendant entry by path. The receiver itself is not a `Node`
    /// and is therefore never returned.
    pub fn find(&self, target: &str) -> Option<&Node> {
        for child in &self.children {
            if child.path() == target {
                return Some(child);
            }
            if let Node::Folder(f) = child {
                if is_within(target, &f.path) {
                    return f.find(target);
                }
            }
        }
        None
    }

    /// Every folder path in this subtree, including this folder.
    pub fn folder_paths(&self) -> Vec<String> {
        let mut out = vec![self.path.clone()];
        for f in self.folders() {
            out.extend(f.folder_paths());
        }
        out
    }
}

/// Whether `target` lies strictly below the folder at `folder`.
fn is_within(target: &str, folder: &str) -> bool {
    path::is_root(folder)
        || target
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// A borrowed view of any vault entry, root included.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Folder(&'a FolderNode),
    File(&'a FileNode),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Folder(_) => NodeKind::Folder,
            NodeRef::File(_) => NodeKind::File,
        }
    }
}

/// The entry an event is about, captured when the event was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    pub path: String,
    pub kind: NodeKind,
}

impl EntryRef {
    pub fn folder(path: &str) -> Self {
        Self {
            path: path::normalize(path),
            kind: NodeKind::Folder,
        }
    }

    pub fn file(path: &str) -> Self {
        Self {
            path: path::normalize(path),
            kind: NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Parent folder path; `None` only for the root itself.
    pub fn parent(&self) -> Option<String> {
        path::parent_of(&self.path)
    }
}

/// What happened to the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEventKind {
    Create,
    Rename { old_path: String },
    Delete,
    Modify,
}

/// A mutation notification from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEvent {
    pub kind: VaultEventKind,
    pub entry: EntryRef,
}

impl VaultEvent {
    pub fn create(entry: EntryRef) -> Self {
        Self {
            kind: VaultEventKind::Create,
            entry,
        }
    }

    pub fn rename(entry: EntryRef, old_path: &str) -> Self {
        Self {
            kind: VaultEventKind::Rename {
                old_path: path::normalize(old_path),
            },
            entry,
        }
    }

    pub fn delete(entry: EntryRef) -> Self {
        Self {
            kind: VaultEventKind::Delete,
            entry,
        }
    }

    pub fn modify(entry: EntryRef) -> Self {
        Self {
            kind: VaultEventKind::Modify,
            entry,
        }
    }
}

/// A live event subscription. Dropping it stops delivery.
pub struct Subscription {
    active: Arc<AtomicBool>,
    /// Store-specific resources kept alive for as long as the subscription lives.
    _guard: Option<Box<dyn Any + Send>>,
}

impl Subscription {
    pub fn new(active: Arc<AtomicBool>, guard: Option<Box<dyn Any + Send>>) -> Self {
        active.store(true, Ordering::Relaxed);
        Self {
            active,
            _guard: guard,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// The host's hierarchical store of folders and files.
///
/// All paths are vault paths (see [`crate::fs::path`]). Mutations either
/// succeed completely or leave the store untouched and report why.
pub trait VaultStore {
    /// Display name of the vault, used to label the root row.
    fn name(&self) -> &str;

    /// The root folder of the live tree.
    fn root(&self) -> &FolderNode;

    /// Look up any entry, the root included.
    fn node(&self, path: &str) -> Option<NodeRef<'_>> {
        let path = path::normalize(path);
        let root = self.root();
        if path::is_root(&path) {
            return Some(NodeRef::Folder(root));
        }
        root.find(&path).map(|node| match node {
            Node::Folder(f) => NodeRef::Folder(f),
            Node::File(f) => NodeRef::File(f),
        })
    }

    /// Look up a folder, the root included.
    fn folder(&self, path: &str) -> Option<&FolderNode> {
        match self.node(path) {
            Some(NodeRef::Folder(f)) => Some(f),
            _ => None,
        }
    }

    /// Create a file with the given content. Fails if the path is taken.
    fn create(&mut self, path: &str, content: &str) -> StoreResult<FileNode>;

    /// Create an empty folder. Fails if the path is taken.
    fn create_folder(&mut self, path: &str) -> StoreResult<()>;

    /// Move an entry to `new_path`.
    fn rename(&mut self, path: &str, new_path: &str) -> StoreResult<()>;

    /// Delete an entry; folders are removed with their contents.
    fn delete(&mut self, path: &str) -> StoreResult<()>;

    /// Start delivering mutation events as `Event::Vault` on `tx`.
    fn subscribe(&mut self, tx: mpsc::UnboundedSender<Event>) -> StoreResult<Subscription>;

    /// Bring the in-memory view of the tree up to date with the backing medium.
    fn refresh(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

/// Validate every segment of a path that is about to be created.
pub fn validate_new_path(raw: &str) -> StoreResult<String> {
    let path = path::normalize(raw);
    if path::is_root(&path) {
        return Err(StoreError::InvalidName(raw.to_string()));
    }
    path::validate_name(path::name_of(&path)).map_err(StoreError::InvalidName)?;
    Ok(path)
}
