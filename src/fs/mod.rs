pub mod accessor;
pub mod entry;
pub mod listing;
#[cfg(test)]
pub mod memory;
pub mod tree;
pub mod watcher;
