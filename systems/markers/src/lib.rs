#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure marker aggregation that turns the object catalog into map anchors.
//!
//! Objects are grouped by their canonical region *and* the exact region text,
//! so two spellings of the same oblast produce two markers. Each group's mean
//! coordinate is projected linearly onto the map canvas and kept inside a
//! margin so markers never touch the canvas edge.

use std::collections::HashMap;

use glam::DVec2;
use heritage_map_core::{ArchaeologicalObject, GeoCoord, RegionId, RegionMarker};
use heritage_map_system_classifier::RegionClassifier;

/// Western edge of the projected area in degrees.
pub const MIN_LONGITUDE: f64 = 46.0;
/// Eastern edge of the projected area in degrees.
pub const MAX_LONGITUDE: f64 = 88.0;
/// Southern edge of the projected area in degrees.
pub const MIN_LATITUDE: f64 = 40.0;
/// Northern edge of the projected area in degrees.
pub const MAX_LATITUDE: f64 = 56.0;
/// Width of the map canvas in pixels.
pub const CANVAS_WIDTH: f64 = 1000.0;
/// Height of the map canvas in pixels.
pub const CANVAS_HEIGHT: f64 = 620.0;
/// Minimum distance between a marker and the canvas edge.
pub const MARKER_MARGIN: f64 = 40.0;

/// Linear equirectangular mapping from a geographic box onto a pixel canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    min_longitude: f64,
    max_longitude: f64,
    min_latitude: f64,
    max_latitude: f64,
    canvas: DVec2,
    margin: f64,
}

impl Projection {
    /// Bounding box of Kazakhstan on the 1000×620 canvas.
    #[must_use]
    pub const fn kazakhstan() -> Self {
        Self {
            min_longitude: MIN_LONGITUDE,
            max_longitude: MAX_LONGITUDE,
            min_latitude: MIN_LATITUDE,
            max_latitude: MAX_LATITUDE,
            canvas: DVec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            margin: MARKER_MARGIN,
        }
    }

    /// Replaces the geographic bounds, given as south-west and north-east corners.
    #[must_use]
    pub const fn with_bounds(mut self, south_west: GeoCoord, north_east: GeoCoord) -> Self {
        self.min_longitude = south_west.longitude();
        self.min_latitude = south_west.latitude();
        self.max_longitude = north_east.longitude();
        self.max_latitude = north_east.latitude();
        self
    }

    /// Replaces the canvas size in pixels.
    #[must_use]
    pub const fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas = DVec2::new(width, height);
        self
    }

    /// Replaces the edge margin in pixels.
    #[must_use]
    pub const fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Canvas size in pixels.
    #[must_use]
    pub const fn canvas(&self) -> DVec2 {
        self.canvas
    }

    /// Edge margin in pixels.
    #[must_use]
    pub const fn margin(&self) -> f64 {
        self.margin
    }

    /// Projects a coordinate onto the canvas, clamped to the margin box.
    ///
    /// Latitude is inverted because pixel rows grow downward. Non-finite
    /// inputs collapse onto the margin instead of leaking `NaN`. An axis whose
    /// bounds are empty or inverted places every coordinate on the canvas centre
    /// line.
    #[must_use]
    pub fn project(&self, coord: GeoCoord) -> DVec2 {
        let x = axis_fraction(
            coord.longitude() - self.min_longitude,
            self.max_longitude - self.min_longitude,
        ) * self.canvas.x;
        let y = axis_fraction(
            self.max_latitude - coord.latitude(),
            self.max_latitude - self.min_latitude,
        ) * self.canvas.y;

        let low = self.margin;
        let high = self.canvas - DVec2::splat(self.margin);
        DVec2::new(clamp_axis(x, low, high.x), clamp_axis(y, low, high.y))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::kazakhstan()
    }
}

fn axis_fraction(offset: f64, span: f64) -> f64 {
    if span > 0.0 {
        offset / span
    } else {
        0.5
    }
}

fn clamp_axis(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

/// Groups catalog objects into region markers.
#[derive(Clone, Debug, Default)]
pub struct MarkerAggregator {
    projection: Projection,
    classifier: RegionClassifier,
}

impl MarkerAggregator {
    /// Creates an aggregator with an explicit projection and classifier.
    #[must_use]
    pub fn new(projection: Projection, classifier: RegionClassifier) -> Self {
        Self {
            projection,
            classifier,
        }
    }

    /// Builds one marker per distinct `(canonical region, region text)` pair.
    ///
    /// Markers are emitted in order of first appearance and identifiers take
    /// the form `<region>-<order>`.
    #[must_use]
    pub fn build(&self, objects: &[ArchaeologicalObject]) -> Vec<RegionMarker> {
        let mut slots: HashMap<(RegionId, &str), usize> = HashMap::new();
        let mut groups: Vec<Group<'_>> = Vec::new();

        for object in objects {
            let region = self.classifier.classify(&object.region);
            let slot = *slots
                .entry((region, object.region.as_str()))
                .or_insert_with(|| {
                    groups.push(Group::new(region, &object.region));
                    groups.len() - 1
                });
            groups[slot].absorb(object.coordinates);
        }

        groups
            .into_iter()
            .enumerate()
            .map(|(order, group)| {
                let position = self.projection.project(group.mean());
                RegionMarker {
                    id: format!("{}-{order}", group.region),
                    region_id: group.region,
                    x: position.x,
                    y: position.y,
                    label: group.label.to_owned(),
                    value: group.count,
                }
            })
            .collect()
    }
}

/// Builds markers with the Kazakhstan projection and default classifier.
#[must_use]
pub fn build_markers(objects: &[ArchaeologicalObject]) -> Vec<RegionMarker> {
    MarkerAggregator::default().build(objects)
}

#[derive(Debug)]
struct Group<'a> {
    region: RegionId,
    label: &'a str,
    longitude_sum: f64,
    latitude_sum: f64,
    count: u32,
}

impl<'a> Group<'a> {
    fn new(region: RegionId, label: &'a str) -> Self {
        Self {
            region,
            label,
            longitude_sum: 0.0,
            latitude_sum: 0.0,
            count: 0,
        }
    }

    fn absorb(&mut self, coord: GeoCoord) {
        self.longitude_sum += coord.longitude();
        self.latitude_sum += coord.latitude();
        self.count = self.count.saturating_add(1);
    }

    fn mean(&self) -> GeoCoord {
        let count = f64::from(self.count.max(1));
        GeoCoord::new(self.longitude_sum / count, self.latitude_sum / count)
    }
}

#[cfg(test)]
mod tests {
    use super::{build_markers, Projection, CANVAS_HEIGHT, CANVAS_WIDTH, MARKER_MARGIN};
    use glam::DVec2;
    use heritage_map_core::{ArchaeologicalObject, GeoCoord, RegionId};

    fn object(id: &str, region: &str, longitude: f64, latitude: f64) -> ArchaeologicalObject {
        ArchaeologicalObject::new(id, id, region, GeoCoord::new(longitude, latitude), 10)
    }

    #[test]
    fn empty_catalog_has_no_markers() {
        assert!(build_markers(&[]).is_empty());
    }

    #[test]
    fn projection_maps_box_centre_to_canvas_centre() {
        let centre = Projection::kazakhstan().project(GeoCoord::new(67.0, 48.0));
        assert!((centre.x - CANVAS_WIDTH / 2.0).abs() < 1e-9);
        assert!((centre.y - CANVAS_HEIGHT / 2.0).abs() < 1e-9);
    }

    #[test]
    fn projection_inverts_latitude() {
        let projection = Projection::kazakhstan();
        let northern = projection.project(GeoCoord::new(67.0, 54.0));
        let southern = projection.project(GeoCoord::new(67.0, 42.0));
        assert!(northern.y < southern.y);
    }

    #[test]
    fn projection_clamps_to_margin() {
        let projection = Projection::kazakhstan();
        let far_north_west = projection.project(GeoCoord::new(0.0, 90.0));
        assert_eq!(far_north_west, DVec2::splat(MARKER_MARGIN));

        let far_south_east = projection.project(GeoCoord::new(180.0, -90.0));
        assert_eq!(
            far_south_east,
            DVec2::new(CANVAS_WIDTH - MARKER_MARGIN, CANVAS_HEIGHT - MARKER_MARGIN)
        );
    }

    #[test]
    fn non_finite_coordinates_stay_on_canvas() {
        let position = Projection::kazakhstan().project(GeoCoord::new(f64::NAN, f64::INFINITY));
        assert!(position.x.is_finite());
        assert!(position.y.is_finite());
    }

    #[test]
    fn custom_canvas_scales_positions() {
        let projection = Projection::kazakhstan()
            .with_canvas(500.0, 310.0)
            .with_margin(0.0);
        assert_eq!(projection.canvas(), DVec2::new(500.0, 310.0));
        assert_eq!(projection.margin(), 0.0);
        let centre = projection.project(GeoCoord::new(67.0, 48.0));
        assert!((centre.x - 250.0).abs() < 1e-9);
        assert!((centre.y - 155.0).abs() < 1e-9);
    }

    #[test]
    fn kazakhstan_projection_uses_default_canvas() {
        let projection = Projection::default();
        assert_eq!(projection.canvas(), DVec2::new(CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(projection.margin(), MARKER_MARGIN);
    }

    #[test]
    fn custom_bounds_rescale_positions() {
        let projection = Projection::kazakhstan()
            .with_bounds(GeoCoord::new(0.0, 0.0), GeoCoord::new(10.0, 10.0))
            .with_canvas(100.0, 100.0)
            .with_margin(0.0);

        let position = projection.project(GeoCoord::new(2.5, 7.5));
        assert!((position.x - 25.0).abs() < 1e-9);
        assert!((position.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_bounds_place_markers_on_the_centre_line() {
        let projection = Projection::kazakhstan()
            .with_bounds(GeoCoord::new(5.0, 5.0), GeoCoord::new(5.0, 5.0))
            .with_canvas(100.0, 100.0)
            .with_margin(10.0);

        for coord in [GeoCoord::new(5.0, 5.0), GeoCoord::new(9.0, 1.0)] {
            assert_eq!(projection.project(coord), DVec2::new(50.0, 50.0));
        }

        let inverted = Projection::kazakhstan()
            .with_bounds(GeoCoord::new(10.0, 10.0), GeoCoord::new(0.0, 0.0))
            .with_canvas(100.0, 100.0);
        assert_eq!(
            inverted.project(GeoCoord::new(3.0, 3.0)),
            DVec2::new(50.0, 50.0)
        );
    }

    #[test]
    fn groups_average_coordinates_of_matching_labels() {
        let markers = build_markers(&[
            object("issyk", "Алматинская область", 77.0, 43.0),
            object("tamgaly", "Алматинская область", 75.0, 44.0),
        ]);

        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!(marker.id, "almaty-0");
        assert_eq!(marker.region_id, RegionId::Almaty);
        assert_eq!(marker.value, 2);
        assert_eq!(marker.label, "Алматинская область");

        let expected = Projection::kazakhstan().project(GeoCoord::new(76.0, 43.5));
        assert!((marker.x - expected.x).abs() < 1e-9);
        assert!((marker.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn differing_spellings_produce_separate_markers() {
        let markers = build_markers(&[
            object("issyk", "Алматинская область", 77.0, 43.0),
            object("kapchagay", "Алматинская обл.", 77.1, 43.9),
            object("tamgaly", "Алматинская область", 75.0, 44.0),
        ]);

        let ids: Vec<&str> = markers.iter().map(|marker| marker.id.as_str()).collect();
        assert_eq!(ids, ["almaty-0", "almaty-1"]);
        assert_eq!(markers[0].value, 2);
        assert_eq!(markers[1].value, 1);
    }

    #[test]
    fn markers_follow_first_appearance_order() {
        let markers = build_markers(&[
            object("berel", "Восточно-Казахстанская область", 86.4, 49.4),
            object("botai", "Северо-Казахстанская область", 68.6, 53.2),
            object("berel-2", "Восточно-Казахстанская область", 86.3, 49.3),
        ]);

        let regions: Vec<RegionId> = markers.iter().map(|marker| marker.region_id).collect();
        assert_eq!(regions, [RegionId::East, RegionId::North]);
        assert_eq!(markers[1].id, "north-1");
    }

    #[test]
    fn duplicate_objects_are_counted_independently() {
        let sample = object("otrar", "Туркестанская область", 68.3, 42.85);
        let markers = build_markers(&[sample.clone(), sample]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].value, 2);
    }
}
