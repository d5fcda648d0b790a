//! In-memory store for exercising the panes without a filesystem.
//!
//! Records every mutation request so tests can assert what reached the store,
//! and can be told to reject the next request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::Event;
use crate::fs::path;
use crate::fs::vault::{
    validate_new_path, EntryRef, FileNode, FolderNode, Node, StoreError, StoreResult,
    Subscription, VaultEvent, VaultStore,
};

/// A request that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create { path: String, content: String },
    CreateFolder { path: String },
    Rename { path: String, new_path: String },
    Delete { path: String },
}

pub struct MemoryVault {
    name: String,
    root: FolderNode,
    pub calls: Vec<StoreCall>,
    /// Number of times the tree was asked to re-read.
    pub refreshes: usize,
    reject_next: Option<StoreError>,
    subscriber: Option<(Arc<AtomicBool>, mpsc::UnboundedSender<Event>)>,
}

impl MemoryVault {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            root: FolderNode::root(),
            calls: Vec::new(),
            refreshes: 0,
            reject_next: None,
            subscriber: None,
        }
    }

    /// Build a vault from a list of paths; entries ending in `/` are folders.
    pub fn with_entries(name: &str, entries: &[&str]) -> Self {
        let mut vault = Self::new(name);
        for entry in entries {
            let is_folder = entry.ends_with('/');
            let p = path::normalize(entry);
            let node = if is_folder {
                Node::Folder(FolderNode::new(&p))
            } else {
                Node::File(FileNode::new(&p))
            };
            vault.insert(node);
        }
        vault
    }

    /// Make the next mutation fail with `err`.
    pub fn reject_next(&mut self, err: StoreError) {
        self.reject_next = Some(err);
    }

    fn take_rejection(&mut self) -> StoreResult<()> {
        match self.reject_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn emit(&self, event: VaultEvent) {
        if let Some((active, tx)) = &self.subscriber {
            if active.load(Ordering::Relaxed) {
                let _ = tx.send(Event::Vault(event));
            }
        }
    }

    fn folder_mut(&mut self, target: &str) -> Option<&mut FolderNode> {
        fn walk<'a>(folder: &'a mut FolderNode, target: &str) -> Option<&'a mut FolderNode> {
            if folder.path == target {
                return Some(folder);
            }
            folder.children.iter_mut().find_map(|c| match c {
                Node::Folder(f) => walk(f, target),
                Node::File(_) => None,
            })
        }
        walk(&mut self.root, target)
    }

    /// Append a node under its parent. Missing parents are created.
    fn insert(&mut self, node: Node) {
        let parent = path::parent_of(node.path()).unwrap_or_else(|| path::ROOT_PATH.to_string());
        if self.folder(&parent).is_none() {
            self.insert(Node::Folder(FolderNode::new(&parent)));
        }
        if let Some(folder) = self.folder_mut(&parent) {
            folder.children.push(node);
        }
    }

    fn remove(&mut self, target: &str) -> Option<Node> {
        let parent = path::parent_of(target)?;
        let folder = self.folder_mut(&parent)?;
        let idx = folder.children.iter().position(|c| c.path() == target)?;
        Some(folder.children.remove(idx))
    }

    fn ensure_free(&self, p: &str) -> StoreResult<()> {
        if self.node(p).is_some() {
            return Err(StoreError::AlreadyExists(p.to_string()));
        }
        let parent = path::parent_of(p).unwrap_or_else(|| path::ROOT_PATH.to_string());
        if self.folder(&parent).is_none() {
            return Err(StoreError::NotFound(parent));
        }
        Ok(())
    }
}

/// Rewrite the paths of `node` and its descendants to live under `new_path`.
fn relocate(node: Node, new_path: &str) -> Node {
    match node {
        Node::File(_) => Node::File(FileNode::new(new_path)),
        Node::Folder(folder) => {
            let mut moved = FolderNode::new(new_path);
            moved.children = folder
                .children
                .into_iter()
                .map(|child| {
                    let child_path = path::join(new_path, path::name_of(child.path()));
                    relocate(child, &child_path)
                })
                .collect();
            Node::Folder(moved)
        }
    }
}

impl VaultStore for MemoryVault {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> &FolderNode {
        &self.root
    }

    fn create(&mut self, raw: &str, content: &str) -> StoreResult<FileNode> {
        self.calls.push(StoreCall::Create {
            path: raw.to_string(),
            content: content.to_string(),
        });
        self.take_rejection()?;
        let p = validate_new_path(raw)?;
        self.ensure_free(&p)?;
        let node = FileNode::new(&p);
        self.insert(Node::File(node.clone()));
        self.emit(VaultEvent::create(EntryRef::file(&p)));
        Ok(node)
    }

    fn create_folder(&mut self, raw: &str) -> StoreResult<()> {
        self.calls.push(StoreCall::CreateFolder {
            path: raw.to_string(),
        });
        self.take_rejection()?;
        let p = validate_new_path(raw)?;
        self.ensure_free(&p)?;
        self.insert(Node::Folder(FolderNode::new(&p)));
        self.emit(VaultEvent::create(EntryRef::folder(&p)));
        Ok(())
    }

    fn rename(&mut self, raw: &str, new_raw: &str) -> StoreResult<()> {
        self.calls.push(StoreCall::Rename {
            path: raw.to_string(),
            new_path: new_raw.to_string(),
        });
        self.take_rejection()?;
        let from = path::normalize(raw);
        if path::is_root(&from) {
            return Err(StoreError::RootImmutable);
        }
        let to = validate_new_path(new_raw)?;
        if self.node(&from).is_none() {
            return Err(StoreError::NotFound(from));
        }
        self.ensure_free(&to)?;
        let node = self.remove(&from).ok_or_else(|| StoreError::NotFound(from.clone()))?;
        let entry = match &node {
            Node::Folder(_) => EntryRef::folder(&to),
            Node::File(_) => EntryRef::file(&to),
        };
        self.insert(relocate(node, &to));
        self.emit(VaultEvent::rename(entry, &from));
        Ok(())
    }

    fn delete(&mut self, raw: &str) -> StoreResult<()> {
        self.calls.push(StoreCall::Delete {
            path: raw.to_string(),
        });
        self.take_rejection()?;
        let p = path::normalize(raw);
        if path::is_root(&p) {
            return Err(StoreError::RootImmutable);
        }
        let node = self.remove(&p).ok_or_else(|| StoreError::NotFound(p.clone()))?;
        let entry = match &node {
            Node::Folder(_) => EntryRef::folder(&p),
            Node::File(_) => EntryRef::file(&p),
        };
        self.emit(VaultEvent::delete(entry));
        Ok(())
    }

    fn subscribe(&mut self, tx: mpsc::UnboundedSender<Event>) -> StoreResult<Subscription> {
        let active = Arc::new(AtomicBool::new(true));
        self.subscriber = Some((active.clone(), tx));
        Ok(Subscription::new(active, None))
    }

    fn refresh(&mut self) -> StoreResult<()> {
        self.refreshes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_entries_builds_tree_in_insertion_order() {
        let vault = MemoryVault::with_entries("v", &["Notes/", "Notes/b.md", "Notes/a.md"]);
        let notes = vault.folder("Notes").unwrap();
        let files: Vec<&str> = notes.files().map(|f| f.name.as_str()).collect();
        assert_eq!(files, vec!["b.md", "a.md"]);
    }

    #[test]
    fn rename_folder_relocates_children() {
        let mut vault = MemoryVault::with_entries("v", &["Notes/", "Notes/a.md"]);
        vault.rename("Notes", "Journal").unwrap();
        assert!(vault.node("Journal/a.md").is_some());
        assert!(vault.node("Notes/a.md").is_none());
    }

    #[test]
    fn mutations_emit_events_while_subscribed() {
        let mut vault = MemoryVault::new("v");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sub = vault.subscribe(tx).unwrap();
        vault.create_folder("Notes").unwrap();
        match rx.try_recv() {
            Ok(Event::Vault(ev)) => assert_eq!(ev, VaultEvent::create(EntryRef::folder("Notes"))),
            other => panic!("unexpected {:?}", other),
        }
        drop(sub);
        vault.create("Notes/a.md", "").unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn rejection_applies_once() {
        let mut vault = MemoryVault::new("v");
        vault.reject_next(StoreError::AlreadyExists("x".into()));
        assert!(vault.create_folder("x").is_err());
        assert!(vault.create_folder("x").is_ok());
        assert_eq!(vault.calls.len(), 2);
    }
}
