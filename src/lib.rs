#![doc = include_str!("../README.md")]

pub mod config;
pub mod distance;
mod error;
pub mod feature;
pub mod kdtree;
pub mod service;
mod r#type;

pub use error::{GeoNearbyError, Result};
pub use r#type::{Axis, LatLon, Point};
