use crate::error::Result;
use crate::kdtree::KDTreeBuilder;
use crate::r#type::{Axis, Point};

/// Position of a node in a [`KDTree`]'s node arena.
pub type NodeId = usize;

/// A single node of a [`KDTree`].
///
/// Each node owns exactly one point, referenced by its insertion index, and at most two children.
#[derive(Debug, Clone, PartialEq)]
pub struct KDNode {
    pub(crate) item: usize,
    pub(crate) axis: Axis,
    pub(crate) depth: usize,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl KDNode {
    /// The insertion index of the point owned by this node.
    #[inline]
    pub fn item(&self) -> usize {
        self.item
    }

    /// The axis this node splits on.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The depth of this node, 0 for the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The arena position of the left child, if any.
    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The arena position of the right child, if any.
    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }
}

/// An immutable 2D k-d tree over latitude/longitude points.
///
/// Nodes are stored in pre-order (node, left subtree, right subtree), so the root is always at
/// position 0 when the tree is non-empty. Points keep their insertion order; nodes refer to them
/// by insertion index.
///
/// Usually this will be created from scratch via [`KDTreeBuilder`] or [`KDTree::try_new`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KDTree {
    pub(crate) points: Vec<Point>,
    pub(crate) nodes: Vec<KDNode>,
    pub(crate) height: usize,
}

impl KDTree {
    /// Build a tree from a batch of points.
    ///
    /// Fails with [`InvalidInput`][crate::GeoNearbyError::InvalidInput] if any point has
    /// coordinates outside the valid latitude/longitude range. No partial tree is produced.
    pub fn try_new(points: impl IntoIterator<Item = Point>) -> Result<Self> {
        let points = points.into_iter();
        let mut builder = KDTreeBuilder::new(points.size_hint().0);
        for point in points {
            builder.add(point);
        }
        builder.finish()
    }

    /// The number of points in this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if this tree holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The number of levels of this tree, 0 when empty.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The point with the given insertion index.
    pub fn point(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Iterate over the points in depth-first order, visiting each node before its left and then
    /// its right subtree.
    pub fn iter_depth_first(&self) -> impl Iterator<Item = &Point> + '_ {
        self.nodes.iter().map(|node| &self.points[node.item])
    }
}
