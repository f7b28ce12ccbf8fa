//! GeoJSON import and export for [`KDTree`].
//!
//! GeoJSON positions are `[longitude, latitude]` while [`Point`] stores `[latitude,
//! longitude]`. The swap happens here and nowhere else.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use crate::error::{GeoNearbyError, Result};
use crate::kdtree::KDTree;
use crate::r#type::Point;

/// Convert a GeoJSON feature into a [`Point`].
///
/// The feature's own id becomes the point's identity (numeric ids by their decimal rendering);
/// features without an id, or with an empty string id, are named after `position`, their index in
/// the input sequence.
pub fn point_from_feature(feature: &Feature, position: usize) -> Result<Point> {
    let geometry = feature.geometry.as_ref().ok_or_else(|| {
        GeoNearbyError::InvalidInput(format!("feature {} has no geometry", position))
    })?;

    let coords = match &geometry.value {
        Value::Point(coords) => coords,
        _ => {
            return Err(GeoNearbyError::InvalidInput(format!(
                "feature {} geometry is not a Point",
                position
            )))
        }
    };
    if coords.len() < 2 {
        return Err(GeoNearbyError::InvalidInput(format!(
            "feature {} must have a [longitude, latitude] coordinate pair",
            position
        )));
    }

    let id = match &feature.id {
        Some(Id::String(id)) if !id.is_empty() => id.clone(),
        Some(Id::Number(id)) => id.to_string(),
        _ => position.to_string(),
    };

    Ok(Point {
        id,
        coordinates: [coords[1], coords[0]],
        properties: feature.properties.clone().unwrap_or_default(),
    })
}

/// Convert a [`Point`] into a GeoJSON feature with a `Point` geometry.
pub fn point_to_feature(point: &Point) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![point.lon(), point.lat()]))),
        id: Some(Id::String(point.id.clone())),
        properties: Some(point.properties.clone()),
        foreign_members: None,
    }
}

/// Convert a sequence of GeoJSON features into points, failing on the first malformed feature.
pub fn points_from_features<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
) -> Result<Vec<Point>> {
    features
        .into_iter()
        .enumerate()
        .map(|(position, feature)| point_from_feature(feature, position))
        .collect()
}

/// Parse a GeoJSON document holding a `FeatureCollection` or a single `Feature` into points.
pub fn points_from_geojson_str(s: &str) -> Result<Vec<Point>> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e| GeoNearbyError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => points_from_features(&collection.features),
        GeoJson::Feature(feature) => Ok(vec![point_from_feature(&feature, 0)?]),
        GeoJson::Geometry(_) => Err(GeoNearbyError::InvalidInput(
            "expected a Feature or FeatureCollection, got a bare Geometry".to_string(),
        )),
    }
}

impl KDTree {
    /// Build a tree from GeoJSON point features.
    pub fn from_geojson<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Result<Self> {
        KDTree::try_new(points_from_features(features)?)
    }

    /// Export every point of this tree as a GeoJSON feature.
    ///
    /// Features are emitted depth-first, each node before its left and then its right subtree.
    pub fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.iter_depth_first().map(point_to_feature).collect(),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn feature(
        id: Option<Id>,
        lon: f64,
        lat: f64,
        properties: Option<Map<String, serde_json::Value>>,
    ) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
            id,
            properties,
            foreign_members: None,
        }
    }

    #[test]
    fn import_swaps_axes_once() {
        let f = feature(Some(Id::String("x".to_string())), 10.0, 20.0, None);
        let point = point_from_feature(&f, 0).unwrap();
        assert_eq!(point.id, "x");
        assert_eq!(point.lat(), 20.0);
        assert_eq!(point.lon(), 10.0);

        let back = point_to_feature(&point);
        assert_eq!(back.geometry.unwrap().value, Value::Point(vec![10.0, 20.0]));
    }

    #[test]
    fn import_assigns_positional_ids() {
        let features = vec![
            feature(None, 0.0, 0.0, None),
            feature(Some(Id::Number(7.into())), 1.0, 1.0, None),
            feature(None, 2.0, 2.0, None),
        ];
        let points = points_from_features(&features).unwrap();
        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "7", "2"]);
    }

    #[test]
    fn empty_string_id_falls_back_to_position() {
        let features = vec![
            feature(Some(Id::String("kept".into())), 0.0, 0.0, None),
            feature(Some(Id::String(String::new())), 1.0, 1.0, None),
        ];
        let points = points_from_features(&features).unwrap();
        assert_eq!(points[0].id, "kept");
        assert_eq!(points[1].id, "1");
    }

    #[test]
    fn import_rejects_malformed_features() {
        let mut no_geometry = feature(None, 0.0, 0.0, None);
        no_geometry.geometry = None;
        assert!(matches!(
            point_from_feature(&no_geometry, 0),
            Err(GeoNearbyError::InvalidInput(_))
        ));

        let mut line = feature(None, 0.0, 0.0, None);
        line.geometry = Some(Geometry::new(Value::LineString(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        ])));
        assert!(point_from_feature(&line, 0).is_err());

        let mut short = feature(None, 0.0, 0.0, None);
        short.geometry = Some(Geometry::new(Value::Point(vec![1.0])));
        assert!(point_from_feature(&short, 0).is_err());
    }

    #[test]
    fn out_of_range_feature_rejects_tree() {
        let features = vec![
            feature(None, 0.0, 0.0, None),
            feature(None, 0.0, 999.0, None),
        ];
        let err = KDTree::from_geojson(&features).unwrap_err();
        assert!(matches!(err, GeoNearbyError::InvalidInput(_)));
    }

    #[test]
    fn round_trip_preserves_coordinates_and_properties() {
        let properties = |name: &str| {
            let mut map = Map::new();
            map.insert("name".to_string(), json!(name));
            map.insert("tags".to_string(), json!(["a", {"b": 1}]));
            Some(map)
        };
        let features = vec![
            feature(Some(Id::String("a".into())), -74.0, 40.7, properties("new york")),
            feature(Some(Id::String("b".into())), -0.1, 51.5, properties("london")),
            feature(None, 139.7, 35.7, properties("tokyo")),
            feature(Some(Id::String("d".into())), 2.3, 48.9, properties("paris")),
        ];

        let tree = KDTree::from_geojson(&features).unwrap();
        let exported = tree.to_geojson();
        assert_eq!(exported.features.len(), features.len());

        for (position, original) in features.iter().enumerate() {
            let expected_id = match &original.id {
                Some(Id::String(id)) => id.clone(),
                _ => position.to_string(),
            };
            let found = exported
                .features
                .iter()
                .find(|f| f.id == Some(Id::String(expected_id.clone())))
                .unwrap();
            assert_eq!(found.geometry, original.geometry);
            assert_eq!(found.properties, original.properties);
        }
    }

    #[test]
    fn export_is_depth_first_pre_order() {
        let features = vec![
            feature(Some(Id::String("A".into())), 0.0, 0.0, None),
            feature(Some(Id::String("B".into())), 1.0, 0.0, None),
            feature(Some(Id::String("C".into())), 0.0, 1.0, None),
        ];
        let tree = KDTree::from_geojson(&features).unwrap();
        let ids: Vec<Option<Id>> = tree
            .to_geojson()
            .features
            .into_iter()
            .map(|f| f.id)
            .collect();
        // sorted by latitude: A(0), B(0), C(1) -> median B, left A, right C
        assert_eq!(
            ids,
            vec![
                Some(Id::String("B".into())),
                Some(Id::String("A".into())),
                Some(Id::String("C".into())),
            ]
        );
    }

    #[test]
    fn parse_feature_collection_string() {
        let s = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "q", "geometry": {"type": "Point", "coordinates": [5.0, 6.0]}, "properties": {"k": "v"}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [7.0, 8.0]}, "properties": null}
            ]
        }"#;
        let points = points_from_geojson_str(s).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].coordinates, [6.0, 5.0]);
        assert_eq!(points[0].properties.get("k"), Some(&json!("v")));
        assert_eq!(points[1].id, "1");

        let geometry = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(points_from_geojson_str(geometry).is_err());
        assert!(points_from_geojson_str("not json").is_err());
    }
}
