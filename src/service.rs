//! Request dispatch around a swappable [`KDTree`].
//!
//! The tree itself is immutable. Loading a new point set builds a fresh tree outside of any lock
//! and then swaps it into an [`IndexHandle`]. Searches take a snapshot of the current tree and
//! run without holding the lock, so a search always sees either the old or the new tree in full.

#![warn(missing_docs)]

use std::sync::Arc;

use geojson::FeatureCollection;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::{GeoNearbyError, Result};
use crate::feature::points_from_features;
use crate::kdtree::{KDTree, KDTreeIndex};
use crate::r#type::{LatLon, Point};

/// A shared, atomically replaceable handle on the currently loaded tree.
#[derive(Debug, Default)]
pub struct IndexHandle {
    current: RwLock<Option<Arc<KDTree>>>,
}

impl IndexHandle {
    /// Create a handle with no tree loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the current tree, if one is loaded.
    pub fn load(&self) -> Option<Arc<KDTree>> {
        self.current.read().clone()
    }

    /// Swap in a new tree, returning the previous one.
    pub fn replace(&self, tree: KDTree) -> Option<Arc<KDTree>> {
        self.current.write().replace(Arc::new(tree))
    }

    /// Drop the current tree.
    pub fn clear(&self) -> Option<Arc<KDTree>> {
        self.current.write().take()
    }

    /// Returns `true` if a tree is loaded.
    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }
}

/// The target of a search. Only the coordinates are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTarget {
    /// Ignored by the search
    #[serde(default)]
    pub id: Option<String>,
    /// `[latitude, longitude]` in degrees
    pub coordinates: [f64; 2],
}

impl From<&SearchTarget> for LatLon {
    fn from(value: &SearchTarget) -> Self {
        LatLon::from(value.coordinates)
    }
}

/// A request, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SpatialRequest {
    /// Replace the loaded tree with one built from native points.
    Upload {
        /// Points in `[latitude, longitude]` order
        points: Vec<Point>,
    },

    /// Replace the loaded tree with one built from GeoJSON point features.
    #[serde(rename = "upload_geojson")]
    UploadGeoJson {
        /// Point features in `[longitude, latitude]` order
        data: FeatureCollection,
    },

    /// Radius search against the loaded tree.
    Search {
        /// The point to search around
        #[serde(rename = "targetPoint")]
        target_point: SearchTarget,
        /// Radius in kilometers, the configured default when absent
        #[serde(rename = "maxDistance", default)]
        max_distance: Option<f64>,
        /// Result cap, the configured default when absent
        #[serde(rename = "maxResults", default)]
        max_results: Option<usize>,
    },

    /// Export the loaded tree as GeoJSON.
    Export,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matching point
    pub point: Point,
    /// Kilometers
    pub distance: f64,
}

/// The response to a [`SpatialRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpatialResponse {
    /// A new tree was loaded.
    Uploaded {
        /// Human-readable confirmation
        message: String,
        /// Number of points in the new tree
        count: usize,
    },
    /// Search hits, closest first.
    Results {
        /// At most `maxResults` hits
        results: Vec<SearchResult>,
    },
    /// The loaded tree as a GeoJSON feature collection.
    Features(FeatureCollection),
}

/// Dispatches requests against an [`IndexHandle`].
#[derive(Debug, Default)]
pub struct SpatialService {
    config: SearchConfig,
    index: IndexHandle,
}

impl SpatialService {
    /// Create a service with no tree loaded.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            index: IndexHandle::new(),
        }
    }

    /// The query defaults in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The handle on the currently loaded tree.
    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    /// Parse a JSON request body and dispatch it.
    ///
    /// Bodies that do not match any request shape, including points without a coordinate pair,
    /// are reported as [`GeoNearbyError::InvalidInput`].
    pub fn handle_json(&self, body: &str) -> Result<SpatialResponse> {
        let request: SpatialRequest = serde_json::from_str(body).map_err(|e| {
            log::warn!("Rejecting malformed request: {}", e);
            GeoNearbyError::InvalidInput(format!("Failed to parse request: {}", e))
        })?;
        self.handle(request)
    }

    /// Dispatch a parsed request.
    pub fn handle(&self, request: SpatialRequest) -> Result<SpatialResponse> {
        match request {
            SpatialRequest::Upload { points } => {
                let count = self.upload(points)?;
                Ok(uploaded(count))
            }
            SpatialRequest::UploadGeoJson { data } => {
                let count = self.upload(points_from_features(&data.features)?)?;
                Ok(uploaded(count))
            }
            SpatialRequest::Search {
                target_point,
                max_distance,
                max_results,
            } => {
                let results =
                    self.search(&LatLon::from(&target_point), max_distance, max_results)?;
                Ok(SpatialResponse::Results { results })
            }
            SpatialRequest::Export => Ok(SpatialResponse::Features(self.export()?)),
        }
    }

    /// Build a tree from `points` and make it the current one. Returns the number of points.
    ///
    /// On failure the previously loaded tree stays in place.
    pub fn upload(&self, points: Vec<Point>) -> Result<usize> {
        let tree = KDTree::try_new(points).map_err(|e| {
            log::warn!("Rejecting upload: {}", e);
            e
        })?;
        let count = tree.len();
        self.index.replace(tree);
        log::info!("Loaded {} points", count);
        Ok(count)
    }

    /// Search the current tree, filling in configured defaults for missing parameters.
    pub fn search(
        &self,
        target: &LatLon,
        max_distance: Option<f64>,
        max_results: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        let tree = self.index.load().ok_or(GeoNearbyError::NoIndex)?;
        let max_distance = max_distance.unwrap_or(self.config.default_max_distance_km);
        let max_results = self
            .config
            .clamp_max_results(max_results.unwrap_or(self.config.default_max_results));

        let results = tree
            .neighbors(target, max_distance, max_results)?
            .into_iter()
            .map(|neighbor| SearchResult {
                point: neighbor.point.clone(),
                distance: neighbor.distance,
            })
            .collect();
        Ok(results)
    }

    /// Export the current tree as GeoJSON.
    pub fn export(&self) -> Result<FeatureCollection> {
        let tree = self.index.load().ok_or(GeoNearbyError::NoIndex)?;
        Ok(tree.to_geojson())
    }
}

fn uploaded(count: usize) -> SpatialResponse {
    SpatialResponse::Uploaded {
        message: "Points uploaded successfully".to_string(),
        count,
    }
}
