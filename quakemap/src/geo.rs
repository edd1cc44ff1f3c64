//! Geographic points, bounds and the Web Mercator projection used by the map view.

use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Point in geographic coordinates (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    pub const fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a point from GeoJSON position order (`[lon, lat, ...]`).
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::latlon(*lat, *lon)),
            _ => None,
        }
    }

    /// Position in GeoJSON order.
    pub fn to_position(&self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}

/// Shorthand for [`GeoPoint::latlon`].
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::geo::GeoPoint::latlon($lat, $lon)
    };
}

/// Rectangle in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// South-west corner.
    pub south_west: GeoPoint,
    /// North-east corner.
    pub north_east: GeoPoint,
}

impl GeoBounds {
    /// Creates bounds from two opposite corners given in any order.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            south_west: GeoPoint::latlon(a.lat.min(b.lat), a.lon.min(b.lon)),
            north_east: GeoPoint::latlon(a.lat.max(b.lat), a.lon.max(b.lon)),
        }
    }

    /// The whole globe.
    pub fn world() -> Self {
        Self::from_corners(GeoPoint::latlon(-90.0, -180.0), GeoPoint::latlon(90.0, 180.0))
    }

    /// Returns true if the point is inside the bounds (edges included).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lon >= self.south_west.lon
            && point.lon <= self.north_east.lon
    }

    /// Returns true if the south-west corner is below and left of the north-east one.
    pub fn is_ordered(&self) -> bool {
        self.south_west.lat <= self.north_east.lat && self.south_west.lon <= self.north_east.lon
    }

    /// Moves the point to the closest position inside the bounds.
    ///
    /// Bounds that are not ordered pin the point to the north-east corner.
    pub fn clamp(&self, point: GeoPoint) -> GeoPoint {
        GeoPoint::latlon(
            point.lat.max(self.south_west.lat).min(self.north_east.lat),
            point.lon.max(self.south_west.lon).min(self.north_east.lon),
        )
    }
}

/// Point in projected (EPSG:3857) coordinates, meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectedPoint {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl ProjectedPoint {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Spherical Web Mercator projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl WebMercator {
    /// Half of the projected world width in meters.
    pub const HALF_WORLD: f64 = std::f64::consts::PI * EARTH_RADIUS;

    /// Projects a geographic point. Latitudes beyond the projection limit are clamped.
    pub fn project(&self, point: &GeoPoint) -> ProjectedPoint {
        let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let x = EARTH_RADIUS * point.lon.to_radians();
        let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        ProjectedPoint::new(x, y)
    }

    /// Converts a projected point back to geographic coordinates.
    pub fn unproject(&self, point: &ProjectedPoint) -> GeoPoint {
        let lon = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
            .to_degrees();
        GeoPoint::latlon(lat, lon)
    }
}
