//! Utilities to traverse the KDTree structure.

use geo_traits::RectTrait;

use crate::kdtree::index::NodeId;
use crate::kdtree::{KDNode, KDTreeIndex};
use crate::r#type::{Axis, LatLon, Point, LAT_RANGE, LON_RANGE};

/// A node in the KDTree.
#[derive(Debug, Clone)]
pub struct Node<'a, T: KDTreeIndex> {
    /// The tree that this node is a reference onto
    tree: &'a T,

    /// Position in the tree's node arena
    id: NodeId,

    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl<'a, T: KDTreeIndex> Node<'a, T> {
    pub(crate) fn from_root(tree: &'a T) -> Option<Self> {
        if tree.nodes().is_empty() {
            return None;
        }
        Some(Self {
            tree,
            id: 0,
            min_lat: LAT_RANGE.0,
            min_lon: LON_RANGE.0,
            max_lat: LAT_RANGE.1,
            max_lon: LON_RANGE.1,
        })
    }

    #[inline]
    fn node(&self) -> &'a KDNode {
        &self.tree.nodes()[self.id]
    }

    /// The point owned by this node.
    pub fn point(&self) -> &'a Point {
        &self.tree.points()[self.node().item]
    }

    /// The insertion index of the point owned by this node.
    pub fn insertion_index(&self) -> usize {
        self.node().item
    }

    /// The axis that the children of this node are split over.
    pub fn axis(&self) -> Axis {
        self.node().axis
    }

    /// The depth of this node, 0 for the root.
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// The child node holding points that sort before this node's point on its axis.
    ///
    /// Its bounds are capped at this node's coordinate on the split axis.
    pub fn left_child(&self) -> Option<Node<'a, T>> {
        let id = self.node().left?;
        let coord = self.point().coord();

        let mut max_lat = self.max_lat;
        let mut max_lon = self.max_lon;
        match self.axis() {
            Axis::Latitude => max_lat = coord.lat,
            Axis::Longitude => max_lon = coord.lon,
        }

        Some(Self {
            tree: self.tree,
            id,
            min_lat: self.min_lat,
            min_lon: self.min_lon,
            max_lat,
            max_lon,
        })
    }

    /// The child node holding points that sort after this node's point on its axis.
    ///
    /// Its bounds start at this node's coordinate on the split axis.
    pub fn right_child(&self) -> Option<Node<'a, T>> {
        let id = self.node().right?;
        let coord = self.point().coord();

        let mut min_lat = self.min_lat;
        let mut min_lon = self.min_lon;
        match self.axis() {
            Axis::Latitude => min_lat = coord.lat,
            Axis::Longitude => min_lon = coord.lon,
        }

        Some(Self {
            tree: self.tree,
            id,
            min_lat,
            min_lon,
            max_lat: self.max_lat,
            max_lon: self.max_lon,
        })
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        let node = self.node();
        node.left.is_none() && node.right.is_none()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }
}

impl<T: KDTreeIndex> RectTrait for Node<'_, T> {
    type T = f64;
    type CoordType<'a>
        = LatLon
    where
        Self: 'a;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn min(&self) -> Self::CoordType<'_> {
        LatLon::new(self.min_lat, self.min_lon)
    }

    fn max(&self) -> Self::CoordType<'_> {
        LatLon::new(self.max_lat, self.max_lon)
    }
}
