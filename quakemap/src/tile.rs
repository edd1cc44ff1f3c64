//! Raster base layers addressed by `{z}/{x}/{y}` URL templates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribution::Attribution;
use crate::error::QuakeMapError;

/// Deepest zoom level whose tile columns fit into an `i32`.
pub const MAX_TILE_ZOOM: u32 = 30;

/// Position of a tile in the Web Mercator pyramid. `x` grows east and `y` grows south.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Zoom level.
    pub z: u32,
}

impl TileIndex {
    /// Index of column `x` and row `y` at zoom `z`.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Tile drawn at column `display_x`, which may lie outside the world, while its image comes from
/// the in-range column `x`.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct WrappingTileIndex {
    /// Zoom level.
    pub z: u32,
    /// Column of the tile image, in `0..2^z`.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Column the tile is drawn at.
    pub display_x: i32,
}

impl WrappingTileIndex {
    /// Builds the index for a possibly out-of-range `display_x` column.
    pub fn wrapped(display_x: i32, y: i32, z: u32) -> Self {
        let count = 1i64 << z.min(MAX_TILE_ZOOM);
        Self {
            z,
            x: i64::from(display_x).rem_euclid(count) as i32,
            y,
            display_x,
        }
    }

    /// Index of the tile image to fetch.
    pub fn source(&self) -> TileIndex {
        TileIndex::new(self.x, self.y, self.z)
    }
}

const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Base layer made of raster tiles.
///
/// The URL template uses `{s}` (subdomain), `{z}`, `{x}`, `{y}`, `{r}` (`@2x` for high-DPI tiles)
/// and `{accessToken}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Name shown in the layer switcher.
    pub name: String,
    /// Tile URL template.
    pub url_template: String,
    /// Credits for the tile provider.
    #[serde(default)]
    pub attribution: Option<Attribution>,
    /// Values substituted for `{s}`.
    #[serde(default)]
    pub subdomains: Vec<String>,
    /// Minimum zoom level served.
    #[serde(default)]
    pub min_zoom: u32,
    /// Maximum zoom level served.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u32,
    /// Value substituted for `{accessToken}`.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
    /// Request high-DPI tiles.
    #[serde(default)]
    pub retina: bool,
}

fn default_max_zoom() -> u32 {
    18
}

impl TileLayer {
    /// OpenStreetMap standard tiles.
    pub fn street_map() -> Self {
        Self {
            name: "Street Map".into(),
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: Some(Attribution::new(
                "© OpenStreetMap contributors",
                Some("https://www.openstreetmap.org/copyright".into()),
            )),
            subdomains: ["a", "b", "c"].map(String::from).to_vec(),
            min_zoom: 0,
            max_zoom: 20,
            access_token: None,
            retina: false,
        }
    }

    /// Jawg terrain tiles. Requires an access token.
    pub fn terrain_map() -> Self {
        Self {
            name: "Terrain Map".into(),
            url_template:
                "https://{s}.tile.jawg.io/jawg-terrain/{z}/{x}/{y}{r}.png?access-token={accessToken}"
                    .into(),
            attribution: Some(Attribution::new(
                "© JawgMaps © OpenStreetMap contributors",
                Some("http://jawg.io".into()),
            )),
            subdomains: ["a", "b", "c", "d"].map(String::from).to_vec(),
            min_zoom: 0,
            max_zoom: 20,
            access_token: None,
            retina: false,
        }
    }

    /// Returns true if the template needs an access token that is not set.
    pub fn is_missing_access_token(&self) -> bool {
        self.url_template.contains(&format!("{{{ACCESS_TOKEN_KEY}}}"))
            && self
                .access_token
                .as_deref()
                .map_or(true, |token| token.is_empty())
    }

    /// Builds the URL of the given tile.
    ///
    /// The subdomain is picked by `(x + y) mod n`, so the same tile always goes to the same host.
    pub fn tile_url(&self, index: TileIndex) -> Result<String, QuakeMapError> {
        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("z".into(), index.z.to_string());
        vars.insert("x".into(), index.x.to_string());
        vars.insert("y".into(), index.y.to_string());
        vars.insert("r".into(), if self.retina { "@2x" } else { "" }.into());

        if !self.subdomains.is_empty() {
            let subdomain_index =
                (index.x + index.y).rem_euclid(self.subdomains.len() as i32) as usize;
            vars.insert("s".into(), self.subdomains[subdomain_index].clone());
        }

        if let Some(token) = &self.access_token {
            vars.insert(ACCESS_TOKEN_KEY.into(), token.clone());
        }

        Ok(strfmt::strfmt(&self.url_template, &vars)?)
    }

    /// Clamps a zoom level to the range served by the layer.
    pub fn clamp_zoom(&self, z: u32) -> u32 {
        let max_zoom = self.max_zoom.min(MAX_TILE_ZOOM);
        z.clamp(self.min_zoom.min(max_zoom), max_zoom)
    }
}
