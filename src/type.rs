use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The valid latitude range, in degrees.
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// The valid longitude range, in degrees.
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// A geographic coordinate in degrees.
///
/// Fields are stored in (latitude, longitude) order, the order the index partitions on. When
/// viewed through [`CoordTrait`][geo_traits::CoordTrait] it follows the usual GIS convention of
/// `x = longitude`, `y = latitude`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl LatLon {
    /// Create a new coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a coordinate from any [`CoordTrait`][geo_traits::CoordTrait] in `(x, y) = (lon, lat)`
    /// order.
    pub fn from_coord(coord: &impl geo_traits::CoordTrait<T = f64>) -> Self {
        Self {
            lat: coord.y(),
            lon: coord.x(),
        }
    }

    /// The value of this coordinate on the given axis.
    #[inline]
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Latitude => self.lat,
            Axis::Longitude => self.lon,
        }
    }

    /// Check that both components are finite and inside the valid latitude/longitude ranges.
    ///
    /// Returns a human-readable reason on failure so callers can wrap it in the error kind that
    /// fits their context.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(format!(
                "coordinates must be finite, got [{}, {}]",
                self.lat, self.lon
            ));
        }
        if self.lat < LAT_RANGE.0 || self.lat > LAT_RANGE.1 {
            return Err(format!(
                "latitude {} outside of [{}, {}]",
                self.lat, LAT_RANGE.0, LAT_RANGE.1
            ));
        }
        if self.lon < LON_RANGE.0 || self.lon > LON_RANGE.1 {
            return Err(format!(
                "longitude {} outside of [{}, {}]",
                self.lon, LON_RANGE.0, LON_RANGE.1
            ));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for LatLon {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(value: LatLon) -> Self {
        [value.lat, value.lon]
    }
}

impl geo_traits::CoordTrait for LatLon {
    type T = f64;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.lon
    }

    fn y(&self) -> Self::T {
        self.lat
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.lon,
            1 => self.lat,
            _ => panic!("Invalid index of coord"),
        }
    }
}

/// The coordinate dimension a tree level partitions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Axis 0
    Latitude,
    /// Axis 1
    Longitude,
}

impl Axis {
    /// The axis used by nodes at the given depth: latitude on even levels, longitude on odd.
    #[inline]
    pub fn from_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Axis::Latitude
        } else {
            Axis::Longitude
        }
    }

    /// The numeric selector, 0 for latitude and 1 for longitude.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Axis::Latitude => 0,
            Axis::Longitude => 1,
        }
    }
}

/// A point stored in the index.
///
/// Serialized as `{"id": .., "coordinates": [lat, lon], "properties": {..}}`. The properties are
/// never read by the index and are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Stable, unique identity
    pub id: String,
    /// `[latitude, longitude]` in degrees
    pub coordinates: [f64; 2],
    /// Application-defined attributes
    #[serde(default, deserialize_with = "deserialize_properties")]
    pub properties: Map<String, Value>,
}

/// Reads a missing or `null` property bag as an empty map.
fn deserialize_properties<'de, D>(
    deserializer: D,
) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Point {
    /// Create a point without properties.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            coordinates: [lat, lon],
            properties: Map::new(),
        }
    }

    /// Replace the property bag of this point.
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.coordinates[0]
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.coordinates[1]
    }

    /// The coordinate of this point.
    #[inline]
    pub fn coord(&self) -> LatLon {
        LatLon::from(self.coordinates)
    }
}
