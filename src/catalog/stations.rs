use crate::catalog::error::CatalogError;
use crate::catalog::{id_from_number_or_string, Payload};
use crate::http::HttpTransport;
use crate::region::Region;
use crate::settings::STATIONS_ENDPOINT;
use crate::types::crs::Crs;
use crate::types::predicate::SpatialPredicate;
use crate::types::station::Station;
use crate::utils::{endpoint, value_as_f64, value_as_label};
use geo::Point;
use log::{info, warn};
use rstar::{RTree, AABB};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
struct RawStation {
    #[serde(deserialize_with = "id_from_number_or_string")]
    id: u32,
    #[serde(default)]
    name: Value,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

pub(crate) fn fetch_stations(
    transport: &dyn HttpTransport,
    base_url: &str,
    crs: Crs,
) -> Result<Vec<Station>, CatalogError> {
    let body = transport.get(&endpoint(base_url, STATIONS_ENDPOINT), &[])?;
    let stations = parse_stations(&body, crs)?;
    info!("Loaded {} stations in {}", stations.len(), crs);
    Ok(stations)
}

/// Builds stations from the raw payload, locating each one with the coordinate pair
/// that belongs to `crs`. Records without usable coordinates are skipped.
pub(crate) fn parse_stations(body: &str, crs: Crs) -> Result<Vec<Station>, CatalogError> {
    let payload: Payload<RawStation> = serde_json::from_str(body)?;
    let (x_column, y_column) = crs.geometry_columns();

    let mut stations = Vec::with_capacity(payload.data.len());
    for mut raw in payload.data {
        let x = raw.attributes.remove(x_column);
        let y = raw.attributes.remove(y_column);
        let (Some(x), Some(y)) = (
            x.as_ref().and_then(value_as_f64),
            y.as_ref().and_then(value_as_f64),
        ) else {
            warn!(
                "Skipping station {} without '{}'/'{}' coordinates",
                raw.id, x_column, y_column
            );
            continue;
        };

        stations.push(Station {
            id: raw.id,
            name: value_as_label(&raw.name).unwrap_or_default(),
            location: Point::new(x, y),
            crs,
            attributes: raw.attributes,
        });
    }
    Ok(stations)
}

/// Keeps the stations whose location satisfies `predicate` against `region`, in
/// catalog order. Without a region nothing is filtered.
pub(crate) fn filter_stations(
    stations: Vec<Station>,
    region: Option<&Region>,
    crs: Crs,
    predicate: SpatialPredicate,
) -> Vec<Station> {
    let Some(region) = region else {
        warn!("No region set, keeping all {} stations", stations.len());
        return stations;
    };
    let region = region.to_crs(crs);
    let Some(bounds) = region.bounding_rect() else {
        return Vec::new();
    };

    let catalog_order: HashMap<u32, usize> = stations
        .iter()
        .enumerate()
        .map(|(position, station)| (station.id, position))
        .collect();
    let total = stations.len();

    let tree = RTree::bulk_load(stations);
    let envelope = AABB::from_corners(
        [bounds.min().x, bounds.min().y],
        [bounds.max().x, bounds.max().y],
    );
    let mut kept: Vec<Station> = tree
        .locate_in_envelope_intersecting(&envelope)
        .filter(|station| predicate.evaluate(&station.location, region.geometry()))
        .cloned()
        .collect();
    kept.sort_by_key(|station| catalog_order.get(&station.id).copied().unwrap_or(usize::MAX));

    info!(
        "{} of {} stations are {} the region",
        kept.len(),
        total,
        predicate
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeTransport, LAUSANNE_BOX, STATIONS_JSON};
    use geo::{Coord, Rect};

    fn lausanne() -> Region {
        let [w, s, e, n] = LAUSANNE_BOX;
        let rect = Rect::new(Coord { x: w, y: s }, Coord { x: e, y: n });
        Region::new(geo::MultiPolygon(vec![rect.to_polygon()]), Crs::Wgs84)
    }

    #[test]
    fn parses_wgs84_locations_and_skips_unlocated_stations() {
        let stations = parse_stations(STATIONS_JSON, Crs::Wgs84).unwrap();
        let ids: Vec<u32> = stations.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 9, 27, 35, 103]);

        let pully = &stations[0];
        assert_eq!(pully.name, "Pully");
        assert_eq!(pully.location, Point::new(6.6617, 46.5106));
        assert!(!pully.attributes.contains_key("long_dec"));
        assert!(pully.attributes.contains_key("lon_ch"));
        assert_eq!(pully.identifier("canton").as_deref(), Some("VD"));
    }

    #[test]
    fn parses_lv03_locations() {
        let stations = parse_stations(STATIONS_JSON, Crs::Lv03).unwrap();
        let epalinges = stations.iter().find(|s| s.id == 27).unwrap();
        assert_eq!(epalinges.location, Point::new(541_040.0, 154_591.0));
        assert_eq!(epalinges.crs, Crs::Lv03);
    }

    #[test]
    fn missing_data_array_is_a_parse_error() {
        assert!(matches!(
            parse_stations(r#"{"error": "maintenance"}"#, Crs::Wgs84),
            Err(CatalogError::JsonParse(_))
        ));
    }

    #[test]
    fn filters_to_the_region_in_catalog_order() {
        let region = lausanne();
        for crs in [Crs::Wgs84, Crs::Lv03] {
            let stations = parse_stations(STATIONS_JSON, crs).unwrap();
            let kept = filter_stations(stations, Some(&region), crs, SpatialPredicate::Within);
            let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["Pully", "Epalinges", "Lutry"], "in {crs}");

            let projected = region.to_crs(crs);
            for station in &kept {
                assert!(SpatialPredicate::Within.evaluate(&station.location, projected.geometry()));
            }
        }
    }

    #[test]
    fn no_region_keeps_everything() {
        let stations = parse_stations(STATIONS_JSON, Crs::Wgs84).unwrap();
        let kept = filter_stations(stations.clone(), None, Crs::Wgs84, SpatialPredicate::Within);
        assert_eq!(kept, stations);
    }

    #[test]
    fn fetch_hits_the_stations_endpoint_once() {
        let transport = FakeTransport::new().route("/stations", STATIONS_JSON);
        let stations = fetch_stations(&transport, "https://example.org/api/", Crs::Wgs84).unwrap();
        assert_eq!(stations.len(), 5);
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.org/api/stations");
    }
}
