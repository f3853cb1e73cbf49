pub mod array;
pub mod assoc;
pub mod bfs_iter;
pub mod bitset;
pub mod constants;
pub mod dfs_iter;
pub mod error;
pub mod fixtures;
pub mod graph;
pub mod hashtable;
pub mod priority_queue;
pub mod queue;
pub mod rpn;
pub mod schedule;
pub mod simulation;
pub mod sorting;
pub mod stack;

pub use bfs_iter::*;
pub use dfs_iter::*;
pub use error::{Error, Result};
pub use graph::*;
