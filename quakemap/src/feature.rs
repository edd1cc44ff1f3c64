//! Typed views over the GeoJSON features of the earthquake and plate boundary feeds.

use geojson::{FeatureCollection, GeoJson, Value};
use serde::Serialize;

use crate::error::QuakeMapError;
use crate::geo::GeoPoint;

const UNKNOWN_PLACE: &str = "Unknown location";

/// Parses feed content into a feature collection.
///
/// A bare `Feature` is accepted as a collection of one.
pub fn parse_collection(text: &str) -> Result<FeatureCollection, QuakeMapError> {
    let geojson: GeoJson = text.parse()?;
    Ok(match geojson {
        GeoJson::Feature(feature) => FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        },
        other => FeatureCollection::try_from(other)?,
    })
}

/// A single earthquake event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeFeature {
    /// Human readable location, e.g. `10 km SW of Ridgecrest, CA`.
    pub place: String,
    /// Event magnitude.
    pub magnitude: f64,
    /// Hypocenter depth in kilometers. Negative for events above sea level.
    pub depth_km: f64,
    /// Origin time in milliseconds since the Unix epoch.
    pub time_epoch_millis: i64,
    /// Epicenter.
    pub position: GeoPoint,
}

impl EarthquakeFeature {
    /// Reads the event from a USGS GeoJSON feature.
    ///
    /// Magnitude (`properties.mag`), time (`properties.time`) and a three-component point geometry
    /// are required. `index` is only used in error reports.
    pub fn from_geojson(index: usize, feature: &geojson::Feature) -> Result<Self, QuakeMapError> {
        let Some(geometry) = &feature.geometry else {
            return Err(QuakeMapError::render(index, "feature has no geometry"));
        };

        let Value::Point(coordinates) = &geometry.value else {
            return Err(QuakeMapError::render(
                index,
                format!("expected point geometry, got {}", geometry_name(&geometry.value)),
            ));
        };

        let position = GeoPoint::from_position(coordinates)
            .ok_or_else(|| QuakeMapError::render(index, "point has less than two coordinates"))?;
        let depth_km = *coordinates
            .get(2)
            .ok_or_else(|| QuakeMapError::render(index, "point has no depth coordinate"))?;

        let magnitude = feature
            .property("mag")
            .and_then(|value| value.as_f64())
            .ok_or_else(|| QuakeMapError::render(index, "missing `mag` property"))?;
        let time_epoch_millis = feature
            .property("time")
            .and_then(|value| {
                value.as_i64().or_else(|| {
                    value
                        .as_f64()
                        .filter(|millis| millis.is_finite())
                        .map(|millis| millis.trunc() as i64)
                })
            })
            .ok_or_else(|| QuakeMapError::render(index, "missing `time` property"))?;
        let place = feature
            .property("place")
            .and_then(|value| value.as_str())
            .unwrap_or(UNKNOWN_PLACE)
            .to_string();

        Ok(Self {
            place,
            magnitude,
            depth_km,
            time_epoch_millis,
            position,
        })
    }
}

/// Boundary between two tectonic plates as a set of polylines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateBoundary {
    /// Boundary name, e.g. `AF-AN`.
    pub name: Option<String>,
    /// Polylines in geographic coordinates.
    pub lines: Vec<Vec<GeoPoint>>,
}

impl PlateBoundary {
    /// Reads a boundary from a line or multi-line feature. Other geometries give `None`.
    pub fn from_geojson(feature: &geojson::Feature) -> Option<Self> {
        let geometry = feature.geometry.as_ref()?;
        let lines = match &geometry.value {
            Value::LineString(line) => vec![to_points(line)],
            Value::MultiLineString(lines) => lines.iter().map(|line| to_points(line)).collect(),
            _ => return None,
        };

        let name = ["Name", "name"]
            .iter()
            .find_map(|key| feature.property(*key).and_then(|v| v.as_str()))
            .map(String::from);

        Some(Self { name, lines })
    }
}

/// Collects the boundaries of a plates feed, skipping features without line geometry.
pub fn plate_boundaries(collection: &FeatureCollection) -> Vec<PlateBoundary> {
    let boundaries: Vec<_> = collection
        .features
        .iter()
        .filter_map(PlateBoundary::from_geojson)
        .collect();

    let skipped = collection.features.len() - boundaries.len();
    if skipped > 0 {
        log::debug!("Skipped {skipped} plate features without line geometry");
    }

    boundaries
}

fn geometry_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn to_points(line: &[Vec<f64>]) -> Vec<GeoPoint> {
    line.iter()
        .filter_map(|position| GeoPoint::from_position(position))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const QUAKE: &str = r#"{
        "type": "Feature",
        "properties": { "mag": 4.5, "place": "20 km S of Volcano, Hawaii", "time": 1700000000000 },
        "geometry": { "type": "Point", "coordinates": [-155.28, 19.2, 15.5] },
        "id": "hv1"
    }"#;

    fn feature(json: &str) -> geojson::Feature {
        json.parse().unwrap()
    }

    #[test]
    fn reads_usgs_feature() {
        let quake = EarthquakeFeature::from_geojson(0, &feature(QUAKE)).unwrap();
        assert_eq!(quake.place, "20 km S of Volcano, Hawaii");
        assert_eq!(quake.magnitude, 4.5);
        assert_eq!(quake.depth_km, 15.5);
        assert_eq!(quake.time_epoch_millis, 1_700_000_000_000);
        assert_eq!(quake.position, GeoPoint::latlon(19.2, -155.28));
    }

    #[test]
    fn missing_fields_are_render_errors() {
        let no_mag = QUAKE.replace(r#""mag": 4.5,"#, r#""mag": null,"#);
        assert_matches!(
            EarthquakeFeature::from_geojson(3, &feature(&no_mag)),
            Err(QuakeMapError::Render { index: 3, .. })
        );

        let no_depth = QUAKE.replace("[-155.28, 19.2, 15.5]", "[-155.28, 19.2]");
        let err = EarthquakeFeature::from_geojson(1, &feature(&no_depth)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "feature #1 cannot be rendered: point has no depth coordinate"
        );

        let no_time = QUAKE.replace(r#", "time": 1700000000000"#, "");
        assert_matches!(
            EarthquakeFeature::from_geojson(0, &feature(&no_time)),
            Err(QuakeMapError::Render { .. })
        );
    }

    #[test]
    fn fractional_time_is_truncated() {
        let float_time = QUAKE.replace("1700000000000", "1.7e12");
        let quake = EarthquakeFeature::from_geojson(0, &feature(&float_time)).unwrap();
        assert_eq!(quake.time_epoch_millis, 1_700_000_000_000);

        let fraction = QUAKE.replace("1700000000000", "1700000000000.75");
        let quake = EarthquakeFeature::from_geojson(0, &feature(&fraction)).unwrap();
        assert_eq!(quake.time_epoch_millis, 1_700_000_000_000);
    }

    #[test]
    fn missing_place_is_not_an_error() {
        let no_place = QUAKE.replace(r#""place": "20 km S of Volcano, Hawaii","#, "");
        let quake = EarthquakeFeature::from_geojson(0, &feature(&no_place)).unwrap();
        assert_eq!(quake.place, UNKNOWN_PLACE);
    }

    #[test]
    fn plate_boundaries() {
        let line = feature(
            r#"{
                "type": "Feature",
                "properties": { "Name": "AF-AN" },
                "geometry": { "type": "LineString", "coordinates": [[-0.43, -54.85], [-1.0, -55.0]] }
            }"#,
        );
        let boundary = PlateBoundary::from_geojson(&line).unwrap();
        assert_eq!(boundary.name.as_deref(), Some("AF-AN"));
        assert_eq!(boundary.lines.len(), 1);
        assert_eq!(boundary.lines[0][1], GeoPoint::latlon(-55.0, -1.0));

        assert_eq!(PlateBoundary::from_geojson(&feature(QUAKE)), None);
    }

    #[test]
    fn plate_collection() {
        let collection = parse_collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": { "name": "NA-PA" },
                      "geometry": { "type": "MultiLineString",
                                    "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3], [4, 4]]] } },
                    { "type": "Feature", "properties": {},
                      "geometry": { "type": "Point", "coordinates": [0, 0] } }
                ]
            }"#,
        )
        .unwrap();

        let boundaries = super::plate_boundaries(&collection);
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name.as_deref(), Some("NA-PA"));
        assert_eq!(boundaries[0].lines[1].len(), 3);
    }

    #[test]
    fn parse_errors() {
        assert_matches!(parse_collection("not json"), Err(QuakeMapError::Parse(_)));
        assert_matches!(
            parse_collection(r#"{ "type": "Point", "coordinates": [0, 0] }"#),
            Err(QuakeMapError::Parse(_))
        );

        let single = parse_collection(QUAKE).unwrap();
        assert_eq!(single.features.len(), 1);

        let empty = parse_collection(r#"{ "type": "FeatureCollection", "features": [] }"#).unwrap();
        assert!(empty.features.is_empty());
    }
}
