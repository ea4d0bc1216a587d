//! Radius filtering, proximity ranking and bounding-box selection.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::distance::haversine_km;
use crate::record::{GeoPoint, RecordIssue, SearchableRecord};

/// A listing in the final result, with its distance to the reference point
/// when one was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    #[serde(flatten)]
    pub record: SearchableRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl RankedResult {
    pub fn unranked(record: SearchableRecord) -> Self {
        Self {
            record,
            distance_km: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }
}

/// A record left out of geo-ranking because its data is inconsistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecordWarning {
    pub record_id: String,
    pub reason: RecordIssue,
}

impl std::fmt::Display for SkippedRecordWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skipped record {}: {}", self.record_id, self.reason)
    }
}

/// Output of the geo stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoRanking {
    pub results: Vec<RankedResult>,
    pub skipped: Vec<SkippedRecordWarning>,
}

/// Apply the radius cutoff and proximity order.
///
/// Without a reference point the records pass through untouched and carry no
/// distance. With one, records without coordinates are dropped whatever the
/// radius, records failing [`SearchableRecord::validate`] are reported and
/// dropped, survivors within `radius_km` (inclusive) are sorted by distance.
/// The sort is stable, so equal distances keep their input order.
pub fn rank_by_distance(
    records: Vec<&SearchableRecord>,
    reference_point: Option<GeoPoint>,
    radius_km: f64,
) -> GeoRanking {
    let Some(reference) = reference_point else {
        return GeoRanking {
            results: records
                .into_iter()
                .cloned()
                .map(RankedResult::unranked)
                .collect(),
            skipped: Vec::new(),
        };
    };

    let mut skipped = Vec::new();
    let mut ranked: Vec<(f64, &SearchableRecord)> = Vec::with_capacity(records.len());

    for record in records {
        if let Err(reason) = record.validate() {
            warn!(record_id = %record.id, %reason, "Skipping record during geo-ranking");
            skipped.push(SkippedRecordWarning {
                record_id: record.id.clone(),
                reason,
            });
            continue;
        }
        // No coordinates means infinitely far: never inside any radius
        let Some(point) = record.coordinates() else {
            continue;
        };
        let distance = haversine_km(reference, point);
        if distance <= radius_km {
            ranked.push((distance, record));
        }
    }

    ranked.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    debug!(
        reference = %reference,
        radius_km,
        kept = ranked.len(),
        skipped = skipped.len(),
        "Geo stage complete"
    );

    GeoRanking {
        results: ranked
            .into_iter()
            .map(|(distance, record)| RankedResult {
                record: record.clone(),
                distance_km: Some(distance),
            })
            .collect(),
        skipped,
    }
}

/// A latitude/longitude box as sent by a map view.
///
/// When `west > east` the box crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl MapBounds {
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let lat_ok = point.lat >= self.south && point.lat <= self.north;
        let lng_ok = if self.west <= self.east {
            point.lng >= self.west && point.lng <= self.east
        } else {
            point.lng >= self.west || point.lng <= self.east
        };
        lat_ok && lng_ok
    }
}

/// Active listings that can be placed on a map, optionally restricted to `bounds`.
pub fn within_bounds<'a>(
    candidates: &'a [SearchableRecord],
    bounds: Option<MapBounds>,
) -> Vec<&'a SearchableRecord> {
    candidates
        .iter()
        .filter(|record| record.active)
        .filter(|record| {
            record
                .valid_coordinates()
                .is_some_and(|point| bounds.is_none_or(|b| b.contains(point)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: &str, lat: f64, lng: f64) -> SearchableRecord {
        SearchableRecord::new(id, id, "", "").with_location(lat, lng)
    }

    fn ids(ranking: &GeoRanking) -> Vec<&str> {
        ranking.results.iter().map(RankedResult::id).collect()
    }

    #[test]
    fn test_no_reference_point_passes_through() {
        let records = [at("b", 10.0, 10.0), SearchableRecord::new("a", "a", "", "")];
        let ranking = rank_by_distance(records.iter().collect(), None, 0.0);

        assert_eq!(ids(&ranking), ["b", "a"]);
        assert!(ranking.results.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn test_three_record_scenario() {
        // ~0.5 degree and ~0.1 degree from the origin, plus one without coordinates
        let records = [
            at("far", 0.5, 0.0),
            SearchableRecord::new("nowhere", "nowhere", "", ""),
            at("near", 0.0, 0.1),
        ];
        let ranking = rank_by_distance(records.iter().collect(), Some(GeoPoint::new(0.0, 0.0)), 100.0);

        assert_eq!(ids(&ranking), ["near", "far"]);
        let distances: Vec<f64> = ranking.results.iter().filter_map(|r| r.distance_km).collect();
        assert_eq!(distances.len(), 2);
        assert!(distances[0] < distances[1]);
        assert!(ranking.skipped.is_empty());
    }

    #[test]
    fn test_records_without_coordinates_never_pass_a_radius() {
        let records = [
            SearchableRecord::new("nowhere", "nowhere", "", ""),
            at("has", 0.0, 0.1),
        ];
        let ranking = rank_by_distance(
            records.iter().collect(),
            Some(GeoPoint::new(0.0, 0.0)),
            f64::INFINITY,
        );

        assert_eq!(ids(&ranking), ["has"]);
        assert!(ranking.results.iter().all(|r| r.distance_km.is_some_and(f64::is_finite)));
        assert!(ranking.skipped.is_empty());
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let reference = GeoPoint::new(0.0, 0.0);
        let record = at("edge", 0.3, 0.4);
        let exact = haversine_km(reference, record.coordinates().unwrap());

        let included = rank_by_distance(vec![&record], Some(reference), exact);
        assert_eq!(ids(&included), ["edge"]);

        let excluded = rank_by_distance(vec![&record], Some(reference), exact - 1e-9);
        assert!(excluded.results.is_empty());
    }

    #[test]
    fn test_zero_radius_keeps_only_exact_matches() {
        let reference = GeoPoint::new(4.711, -74.0721);
        let records = [at("here", 4.711, -74.0721), at("close", 4.7111, -74.0721)];
        let ranking = rank_by_distance(records.iter().collect(), Some(reference), 0.0);
        assert_eq!(ids(&ranking), ["here"]);
        assert_eq!(ranking.results[0].distance_km, Some(0.0));
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let reference = GeoPoint::new(0.0, 0.0);
        let records = [
            at("east", 0.0, 1.0),
            at("origin", 0.0, 0.0),
            at("west", 0.0, -1.0),
            at("north-ish", 1.0, 0.0),
        ];
        let ranking = rank_by_distance(records.iter().collect(), Some(reference), 500.0);

        assert_eq!(ids(&ranking)[0], "origin");
        // east and west are exactly equidistant and must stay in input order
        let east = ids(&ranking).iter().position(|id| *id == "east").unwrap();
        let west = ids(&ranking).iter().position(|id| *id == "west").unwrap();
        assert!(east < west);
    }

    #[test]
    fn test_malformed_records_are_skipped_with_warning() {
        let mut partial = SearchableRecord::new("partial", "p", "", "");
        partial.longitude = Some(0.0);
        let records = [
            at("bad-lat", 120.0, 0.0),
            partial,
            at("inverted", 0.0, 0.0).with_prices(10.0, 5.0),
            at("ok", 0.0, 0.0),
        ];
        let ranking = rank_by_distance(records.iter().collect(), Some(GeoPoint::new(0.0, 0.0)), 10.0);

        assert_eq!(ids(&ranking), ["ok"]);
        let skipped: Vec<&str> = ranking.skipped.iter().map(|s| s.record_id.as_str()).collect();
        assert_eq!(skipped, ["bad-lat", "partial", "inverted"]);
        assert_eq!(ranking.skipped[1].reason, RecordIssue::PartialCoordinates);
    }

    #[test]
    fn test_map_bounds_contains() {
        let colombia = MapBounds::new(12.5, -4.2, -66.8, -79.0);
        assert!(colombia.contains(GeoPoint::new(4.711, -74.0721)));
        assert!(colombia.contains(GeoPoint::new(12.5, -79.0)), "edges are inclusive");
        assert!(!colombia.contains(GeoPoint::new(40.7, -74.0)));

        let pacific = MapBounds::new(10.0, -10.0, -170.0, 170.0);
        assert!(pacific.contains(GeoPoint::new(0.0, 175.0)));
        assert!(pacific.contains(GeoPoint::new(0.0, -175.0)));
        assert!(!pacific.contains(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_within_bounds_requires_active_and_coordinates() {
        let records = [
            at("bogota", 4.711, -74.0721),
            at("closed", 4.6, -74.1).with_active(false),
            SearchableRecord::new("online", "online", "", ""),
            at("paris", 48.8566, 2.3522),
        ];

        let all: Vec<&str> = within_bounds(&records, None).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(all, ["bogota", "paris"]);

        let colombia = MapBounds::new(12.5, -4.2, -66.8, -79.0);
        let local: Vec<&str> = within_bounds(&records, Some(colombia))
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(local, ["bogota"]);
    }
}
