//! An ordered set backed by a self-balancing AVL tree.
//!
//! # Examples
//!
//! ```
//! use avl_collections::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! tree.insert(10);
//! tree.insert(20);
//! tree.insert(30);
//!
//! assert!(tree.contains(&20));
//! assert_eq!(tree.min(), Ok(&10));
//! assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&10, &20, &30]);
//! ```

pub mod avl_tree;

pub use crate::avl_tree::{AvlTree, AvlTreeIntoIter, AvlTreeIter, Error, Result};
