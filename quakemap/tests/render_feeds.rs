use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use quakemap::config::QuakeMapConfig;
use quakemap::data_provider::FileFeedProvider;
use quakemap::depth::DepthScale;
use quakemap::error::QuakeMapError;
use quakemap::legend::{HtmlLegend, Legend};
use quakemap::surface::{Control, Layer, MapDocument};
use quakemap::{LoadReport, QuakeMap, EARTHQUAKES_LAYER, PLATES_LAYER};

fn fixture(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn render(quakes: &str, plates: Option<&str>) -> (MapDocument, LoadReport) {
    let mut config = QuakeMapConfig::default();
    config.feeds.earthquakes = fixture(quakes);
    config.feeds.plates = plates.map(fixture);

    let mut map = QuakeMap::new(config, FileFeedProvider, MapDocument::new()).unwrap();
    let report = tokio_test::block_on(map.load());
    (map.into_surface(), report)
}

fn markers(document: &MapDocument) -> &[quakemap::marker::Marker] {
    match document.layer(EARTHQUAKES_LAYER) {
        Some(Layer::Markers(layer)) => &layer.markers,
        other => panic!("unexpected earthquakes layer: {other:?}"),
    }
}

#[test]
fn empty_feed() {
    let (document, report) = render("empty_week.geojson", None);

    assert!(report.is_complete());
    assert_eq!(report.markers, 0);
    assert!(markers(&document).is_empty());
    assert_eq!(document.legend().map(|l| l.entries().len()), Some(6));
    assert_eq!(document.notice(), None);
}

#[test]
fn mixed_feed() {
    let (document, report) = render("mixed_week.geojson", Some("plates.geojson"));

    assert_eq!(report.markers, 4);
    assert_eq!(report.plate_boundaries, 2);
    assert_eq!(report.errors.len(), 2);
    assert_matches!(report.errors[0], QuakeMapError::Render { index: 4, .. });
    assert_matches!(report.errors[1], QuakeMapError::Render { index: 5, .. });

    let markers = markers(&document);
    let colors: Vec<_> = markers.iter().map(|m| m.fill_color.to_hex()).collect();
    assert_eq!(colors, vec!["#FF3399", "#FF66CC", "#330066", "#663399"]);
    assert_abs_diff_eq!(markers[0].radius, 20.0);
    assert_abs_diff_eq!(markers[2].radius, 28.0, epsilon = 1e-9);
    assert_eq!(markers[0].popup.place, "52 km SE of Akutan, Alaska");

    let notice = document.notice().unwrap();
    assert_eq!(notice.messages.len(), 2);
    assert!(notice.messages[0].contains("mag"));

    assert_matches!(document.layer(PLATES_LAYER), Some(Layer::Lines(layer)) if layer.boundaries.len() == 2);
}

#[test]
fn broken_feed() {
    let (document, report) = render("broken.geojson", Some("plates.geojson"));

    assert_eq!(report.markers, 0);
    assert_matches!(report.errors.as_slice(), [QuakeMapError::Parse(_)]);
    assert!(document.layer(EARTHQUAKES_LAYER).is_none());
    assert!(document.layer(PLATES_LAYER).is_some());
    assert!(document.legend().is_some());
    assert_matches!(document.controls().last(), Some(Control::Notice(_)));
}

#[test]
fn missing_feed_file() {
    let (_, report) = render("missing.geojson", None);
    assert_matches!(report.errors.as_slice(), [QuakeMapError::Fetch { .. }]);
}

#[test]
fn styled_geojson_export() {
    let (document, _) = render("mixed_week.geojson", None);
    let collection = document.markers_geojson();

    assert_eq!(collection.features.len(), 4);
    let shallow = &collection.features[1];
    assert_eq!(
        shallow.property("fillColor").and_then(|v| v.as_str()),
        Some("#FF66CC")
    );
    assert_abs_diff_eq!(
        shallow.property("fillOpacity").and_then(|v| v.as_f64()).unwrap(),
        0.8,
        epsilon = 1e-6
    );
}

#[test]
fn classifier_is_total_and_darkens_with_depth() {
    let scale = DepthScale::default();
    let mut previous = f32::MAX;
    let mut depth = -50.0;
    while depth <= 800.0 {
        let color = scale.color(depth);
        assert!(scale.buckets().iter().any(|b| b.color == color));
        assert!(color.lightness() <= previous);
        previous = color.lightness();
        depth += 0.5;
    }

    assert_eq!(scale.color(f64::NAN).to_hex(), "#FF66CC");
    assert_eq!(scale.color(90.0).to_hex(), "#663399");
    assert_eq!(scale.color(90.0001).to_hex(), "#330066");
}

#[test]
fn legend_round_trips_classifier_colors() {
    let scale = DepthScale::default();
    let legend = Legend::build(&scale);

    assert_eq!(legend.entries().len(), 6);
    assert_eq!(legend.entries()[5].label, "90+");

    for depth in [-5.0, 0.0, 15.0, 33.3, 69.9, 70.0, 150.0] {
        let color = scale.color(depth);
        let entry = legend.entry_for_color(color).unwrap();
        assert_eq!(entry.swatch_color, color);
    }

    let mut html = HtmlLegend::new();
    legend.render_into(&mut html);
    let markup = html.into_markup();
    assert_eq!(markup.matches("color-scale-item").count(), 6);
    assert!(markup.contains("90+ km"));
}
