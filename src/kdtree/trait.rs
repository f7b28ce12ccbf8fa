use std::cmp::Ordering;

use geo_traits::CoordTrait;
use serde::Serialize;
use tinyvec::TinyVec;

use crate::distance::{DistanceMetric, HaversineDistance};
use crate::error::{GeoNearbyError, Result};
use crate::kdtree::traversal::Node;
use crate::kdtree::{KDNode, KDTree};
use crate::r#type::{LatLon, Point};

/// A point found by a radius search, with its distance to the query target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor<'a> {
    /// The matching point
    pub point: &'a Point,
    /// Distance to the target, in the unit of the metric (kilometers for Haversine)
    pub distance: f64,
    /// Insertion index of the point
    #[serde(skip)]
    pub index: usize,
}

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex: Sized {
    /// The points of this tree, in insertion order
    fn points(&self) -> &[Point];

    /// The node arena of this tree, in depth-first pre-order
    fn nodes(&self) -> &[KDNode];

    /// The number of items in this KDTree
    fn num_items(&self) -> usize {
        self.points().len()
    }

    /// Search the index for the points within a given great-circle distance of a target.
    ///
    /// - target: coordinate of the query point
    /// - max_distance: radius in kilometers, must be `>= 0`
    /// - max_results: maximum number of results, must be `>= 1`
    ///
    /// Returns up to `max_results` neighbors ordered by ascending Haversine distance.
    fn neighbors(
        &self,
        target: &LatLon,
        max_distance: f64,
        max_results: usize,
    ) -> Result<Vec<Neighbor<'_>>> {
        self.neighbors_with_distance(
            target,
            max_distance,
            max_results,
            &HaversineDistance::default(),
        )
    }

    /// Search the index for the points within a given distance of a coordinate.
    ///
    /// The coordinate is read as `x = longitude`, `y = latitude`.
    fn neighbors_coord(
        &self,
        coord: &impl CoordTrait<T = f64>,
        max_distance: f64,
        max_results: usize,
    ) -> Result<Vec<Neighbor<'_>>> {
        self.neighbors(&LatLon::from_coord(coord), max_distance, max_results)
    }

    /// Search the index for the points within a given distance of a target, using a custom
    /// distance metric.
    ///
    /// The far side of a split is only visited when the target's offset from the splitting
    /// coordinate, in raw degrees, is smaller than `max_distance`. This comparison does not
    /// convert units, so subtrees across the antimeridian or very close to the poles can be
    /// skipped even though they hold points within range.
    fn neighbors_with_distance<M: DistanceMetric>(
        &self,
        target: &LatLon,
        max_distance: f64,
        max_results: usize,
        distance_metric: &M,
    ) -> Result<Vec<Neighbor<'_>>> {
        if max_results < 1 {
            return Err(GeoNearbyError::InvalidQuery(
                "max_results must be at least 1".to_string(),
            ));
        }
        if max_distance.is_nan() || max_distance < 0.0 {
            return Err(GeoNearbyError::InvalidQuery(format!(
                "max_distance must be a non-negative number, got {}",
                max_distance
            )));
        }
        target
            .validate()
            .map_err(|reason| GeoNearbyError::InvalidQuery(format!("target {}", reason)))?;

        let points = self.points();
        let nodes = self.nodes();
        let mut result: Vec<Neighbor<'_>> = vec![];
        if nodes.is_empty() {
            return Ok(result);
        }

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[usize; 64]> = TinyVec::new();
        stack.push(0);
        let mut visited = 0;

        while let Some(id) = stack.pop() {
            visited += 1;
            let node = &nodes[id];
            let point = &points[node.item];
            let coord = point.coord();

            let distance = distance_metric.distance(target, &coord);
            if distance <= max_distance {
                result.push(Neighbor {
                    point,
                    distance,
                    index: node.item,
                });
            }

            let axis_delta = target.get(node.axis) - coord.get(node.axis);
            let (near, far) = if axis_delta < 0.0 {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };

            // Points equal to the split coordinate can sit on either side of it, so a target
            // lying exactly on the split also checks the far side.
            // Note: far is pushed before near so that the near subtree is fully explored first
            if axis_delta.abs() < max_distance || axis_delta == 0.0 {
                if let Some(far) = far {
                    stack.push(far);
                }
            }
            if let Some(near) = near {
                stack.push(near);
            }
        }

        log::trace!(
            "radius search visited {} of {} nodes, {} candidates",
            visited,
            nodes.len(),
            result.len()
        );

        result.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
        });
        result.truncate(max_results);
        Ok(result)
    }

    /// Access the root node of the KDTree for manual traversal.
    ///
    /// Returns `None` for an empty tree.
    fn root(&self) -> Option<Node<'_, Self>> {
        Node::from_root(self)
    }
}

impl KDTreeIndex for KDTree {
    fn points(&self) -> &[Point] {
        &self.points
    }

    fn nodes(&self) -> &[KDNode] {
        &self.nodes
    }
}
