//! Tree- and list-shaped structures built on top of `GraphModel`.

mod binary_tree;
mod linked_list;

pub use binary_tree::BinaryTree;
pub use linked_list::{LinkedList, ListConfig};
