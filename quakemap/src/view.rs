//! Map position, zoom and the screen transform used by interactive surfaces.

use serde::Serialize;

use crate::geo::{GeoBounds, GeoPoint, ProjectedPoint, WebMercator};
use crate::tile::{WrappingTileIndex, MAX_TILE_ZOOM};

/// Tile width in pixels.
pub const TILE_SIZE: f64 = 256.0;

const EDGE_TOLERANCE: f64 = 1e-9;

/// Point on the screen in logical pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScreenPoint {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset, growing downwards.
    pub y: f64,
}

impl ScreenPoint {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    pub fn distance(&self, other: &ScreenPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

/// What part of the world is displayed and at what scale.
///
/// Zoom follows the usual slippy-map convention: at zoom `0` the whole world fits in one
/// 256 px tile, every next level doubles the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    center: GeoPoint,
    zoom: f64,
    width: f64,
    height: f64,
    min_zoom: f64,
    max_zoom: f64,
    max_bounds: Option<GeoBounds>,
}

impl MapView {
    /// Creates a view of zero size.
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            width: 0.0,
            height: 0.0,
            min_zoom: 0.0,
            max_zoom: 20.0,
            max_bounds: None,
        }
    }

    /// Returns a copy with the given screen size.
    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..*self
        }
    }

    /// Returns a copy limited to the given zoom range.
    pub fn with_zoom_range(&self, min_zoom: f64, max_zoom: f64) -> Self {
        let mut view = Self {
            min_zoom,
            max_zoom: max_zoom.max(min_zoom),
            ..*self
        };
        view.zoom = view.zoom.clamp(view.min_zoom, view.max_zoom);
        view
    }

    /// Returns a copy whose center can not leave the bounds.
    pub fn with_max_bounds(&self, bounds: GeoBounds) -> Self {
        let mut view = Self {
            max_bounds: Some(bounds),
            ..*self
        };
        view.center = bounds.clamp(view.center);
        view
    }

    /// Geographic point at the middle of the screen.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Screen width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Screen height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Size of one pixel in projected meters.
    pub fn resolution(&self) -> f64 {
        Self::zoom_resolution(self.zoom)
    }

    fn zoom_resolution(zoom: f64) -> f64 {
        2.0 * WebMercator::HALF_WORLD / TILE_SIZE / 2f64.powf(zoom)
    }

    fn projected_center(&self) -> ProjectedPoint {
        WebMercator.project(&self.center)
    }

    /// Converts a geographic point into screen position.
    pub fn geo_to_screen(&self, point: &GeoPoint) -> ScreenPoint {
        let projected = WebMercator.project(point);
        let center = self.projected_center();
        let resolution = self.resolution();

        ScreenPoint::new(
            self.width / 2.0 + (projected.x - center.x) / resolution,
            self.height / 2.0 - (projected.y - center.y) / resolution,
        )
    }

    /// Converts a screen position into geographic point.
    pub fn screen_to_geo(&self, point: &ScreenPoint) -> GeoPoint {
        let center = self.projected_center();
        let resolution = self.resolution();
        let projected = ProjectedPoint::new(
            center.x + (point.x - self.width / 2.0) * resolution,
            center.y - (point.y - self.height / 2.0) * resolution,
        );

        WebMercator.unproject(&projected)
    }

    /// Moves the map content by the given number of pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let anchor = ScreenPoint::new(self.width / 2.0 - dx, self.height / 2.0 - dy);
        let center = self.screen_to_geo(&anchor);
        self.set_center(center);
    }

    /// Changes zoom by `delta` levels keeping the geographic point under `anchor` in place.
    pub fn zoom_by(&mut self, delta: f64, anchor: ScreenPoint) {
        let new_zoom = (self.zoom + delta).clamp(self.min_zoom, self.max_zoom);
        if new_zoom == self.zoom {
            return;
        }

        let fixed = WebMercator.project(&self.screen_to_geo(&anchor));
        let resolution = Self::zoom_resolution(new_zoom);
        let center = ProjectedPoint::new(
            fixed.x - (anchor.x - self.width / 2.0) * resolution,
            fixed.y + (anchor.y - self.height / 2.0) * resolution,
        );

        self.zoom = new_zoom;
        self.set_center(WebMercator.unproject(&center));
    }

    fn set_center(&mut self, center: GeoPoint) {
        self.center = match self.max_bounds {
            Some(bounds) => bounds.clamp(center),
            None => GeoPoint::latlon(
                center.lat,
                (center.lon + 180.0).rem_euclid(360.0) - 180.0,
            ),
        };
    }

    /// Tile zoom level closest to the current zoom.
    pub fn tile_zoom(&self) -> u32 {
        (self.zoom.round().max(0.0) as u32).min(MAX_TILE_ZOOM)
    }

    /// Lists the tiles of level `z` covering the screen together with their screen rectangles.
    ///
    /// Columns outside of the world are wrapped around the antimeridian.
    pub fn visible_tiles(&self, z: u32) -> Vec<(WrappingTileIndex, ScreenRect)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return vec![];
        }
        let z = z.min(MAX_TILE_ZOOM);

        let half_world = WebMercator::HALF_WORLD;
        let tile_m = 2.0 * half_world / 2f64.powi(z as i32);
        let resolution = self.resolution();
        let center = self.projected_center();

        let left = center.x - self.width / 2.0 * resolution + half_world;
        let right = center.x + self.width / 2.0 * resolution + half_world;
        let top = half_world - (center.y + self.height / 2.0 * resolution);
        let bottom = half_world - (center.y - self.height / 2.0 * resolution);

        let x_min = (left / tile_m + EDGE_TOLERANCE).floor() as i32;
        let x_max = (right / tile_m - EDGE_TOLERANCE).ceil() as i32 - 1;
        let last_row = (1i32 << z) - 1;
        let y_min = ((top / tile_m + EDGE_TOLERANCE).floor() as i32).max(0);
        let y_max = ((bottom / tile_m - EDGE_TOLERANCE).ceil() as i32 - 1).min(last_row);

        let tile_px = tile_m / resolution;
        let origin_x = self.width / 2.0 - (center.x + half_world) / resolution;
        let origin_y = self.height / 2.0 - (half_world - center.y) / resolution;

        let mut tiles = vec![];
        for display_x in x_min..=x_max {
            for y in y_min..=y_max {
                let min = ScreenPoint::new(
                    origin_x + display_x as f64 * tile_px,
                    origin_y + y as f64 * tile_px,
                );
                let max = ScreenPoint::new(min.x + tile_px, min.y + tile_px);
                tiles.push((
                    WrappingTileIndex::wrapped(display_x, y, z),
                    ScreenRect { min, max },
                ));
            }
        }

        tiles
    }
}
