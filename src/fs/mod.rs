pub mod local;
#[cfg(test)]
pub mod memory;
pub mod path;
pub mod vault;
pub mod watcher;
