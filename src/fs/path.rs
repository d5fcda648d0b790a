//! Vault path helpers.
//!
//! Vault paths are `/`-separated and relative to the vault root, without a
//! leading or trailing separator (`Notes/a.md`). The root itself is `"/"`.

/// Canonical path of the vault root.
pub const ROOT_PATH: &str = "/";

/// Characters the store refuses in a file or folder name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Whether `path` denotes the vault root.
pub fn is_root(path: &str) -> bool {
    path == ROOT_PATH
}

/// Normalize a user- or host-supplied path.
///
/// Backslashes become separators, empty and `.` segments are dropped and
/// surrounding separators are stripped. An empty result is the root.
pub fn normalize(path: &str) -> String {
    let joined = path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        ROOT_PATH.to_string()
    } else {
        joined
    }
}

/// Join a child name onto a parent folder path. Children of the root are bare names.
pub fn join(parent: &str, name: &str) -> String {
    if is_root(parent) {
        normalize(name)
    } else {
        normalize(&format!("{}/{}", parent, name))
    }
}

/// Parent folder path, or `None` for the root.
pub fn parent_of(path: &str) -> Option<String> {
    if is_root(path) {
        return None;
    }
    match path.rfind('/') {
        Some(idx) => Some(path[..idx].to_string()),
        None => Some(ROOT_PATH.to_string()),
    }
}

/// Last segment of a path. The root has an empty name.
pub fn name_of(path: &str) -> &str {
    if is_root(path) {
        return "";
    }
    path.rsplit('/').next().unwrap_or(path)
}

/// Check a single name against the store's naming rules.
pub fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("\"{}\" is not a valid name", name));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(format!("name cannot contain '{}'", c));
    }
    Ok(())
}
