//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod node;
mod set;
mod tree;

pub use self::set::{AvlTree, AvlTreeIntoIter, AvlTreeIter};

use std::error;
use std::fmt;
use std::result;

/// Errors returned by queries that require a non-empty tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    EmptyTree,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTree => write!(f, "operation requires a non-empty tree"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
