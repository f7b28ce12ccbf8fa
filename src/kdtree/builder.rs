use std::cmp::Ordering;

use crate::error::{GeoNearbyError, Result};
use crate::kdtree::index::{KDNode, NodeId};
use crate::kdtree::KDTree;
use crate::r#type::{Axis, Point};

/// A builder to create a [`KDTree`].
///
/// Points are collected with [`add`][KDTreeBuilder::add] and validated all at once in
/// [`finish`][KDTreeBuilder::finish], so a single invalid point rejects the whole batch.
#[derive(Debug, Clone, Default)]
pub struct KDTreeBuilder {
    points: Vec<Point>,
}

impl KDTreeBuilder {
    /// Create a new builder with room for the provided number of items.
    pub fn new(num_items: usize) -> Self {
        Self {
            points: Vec::with_capacity(num_items),
        }
    }

    /// Add a point to the index, returning its insertion index.
    pub fn add(&mut self, point: Point) -> usize {
        let index = self.points.len();
        self.points.push(point);
        index
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points have been added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume this builder, validating every point and performing the median split to generate a
    /// KDTree ready for queries.
    pub fn finish(self) -> Result<KDTree> {
        for (index, point) in self.points.iter().enumerate() {
            point.coord().validate().map_err(|reason| {
                GeoNearbyError::InvalidInput(format!(
                    "point {} (id {:?}): {}",
                    index, point.id, reason
                ))
            })?;
        }

        let mut ids: Vec<usize> = (0..self.points.len()).collect();
        let mut nodes = Vec::with_capacity(self.points.len());
        let mut height = 0;
        split(&self.points, &mut ids, 0, &mut nodes, &mut height);

        log::debug!(
            "built kd-tree with {} points and height {}",
            self.points.len(),
            height
        );

        Ok(KDTree {
            points: self.points,
            nodes,
            height,
        })
    }
}

/// Recursively place the median of `ids` on the axis of `depth`, then split the halves on the
/// opposite axis. Nodes are appended to `nodes` in pre-order.
fn split(
    points: &[Point],
    ids: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KDNode>,
    height: &mut usize,
) -> Option<NodeId> {
    if ids.is_empty() {
        return None;
    }

    let axis = Axis::from_depth(depth);

    // Stable: equal coordinates keep their relative order from the parent level
    ids.sort_by(|&a, &b| cmp_axis(&points[a], &points[b], axis));

    // lower-middle for even counts
    let m = ids.len() >> 1;

    let id = nodes.len();
    nodes.push(KDNode {
        item: ids[m],
        axis,
        depth,
        left: None,
        right: None,
    });
    *height = (*height).max(depth + 1);

    let (left, rest) = ids.split_at_mut(m);
    let right = &mut rest[1..];

    let left = split(points, left, depth + 1, nodes, height);
    let right = split(points, right, depth + 1, nodes, height);
    nodes[id].left = left;
    nodes[id].right = right;

    Some(id)
}

#[inline]
fn cmp_axis(a: &Point, b: &Point, axis: Axis) -> Ordering {
    a.coord()
        .get(axis)
        .partial_cmp(&b.coord().get(axis))
        .unwrap_or(Ordering::Equal)
}
