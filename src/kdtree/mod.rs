//! An implementation of an immutable K-D Tree over latitude/longitude points.

#![warn(missing_docs)]

mod builder;
mod index;
mod r#trait;
pub mod traversal;

pub use builder::KDTreeBuilder;
pub use index::{KDNode, KDTree, NodeId};
pub use r#trait::{KDTreeIndex, Neighbor};
