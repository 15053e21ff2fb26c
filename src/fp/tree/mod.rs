// Tree module - prefix tree data structures and operations

mod tree;
mod tree_ops;

// Re-export the main types
pub use tree::{FpNode, FpTree};
