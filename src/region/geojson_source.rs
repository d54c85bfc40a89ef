//! Reading regions from GeoJSON documents.

use crate::region::error::RegionError;
use crate::region::Region;
use crate::types::crs::Crs;
use geo::GeometryCollection;
use geojson::{GeoJson, JsonObject};

/// Parses a GeoJSON Geometry, Feature or FeatureCollection into a [`Region`].
///
/// RFC 7946 documents are WGS84. Older documents may carry a `crs` member naming
/// another system; EPSG:21781 is honored, anything unknown is an error.
pub(crate) fn parse_region(text: &str) -> Result<Region, RegionError> {
    let document: GeoJson = text.parse()?;
    let crs = declared_crs(&document)?;
    let collection = GeometryCollection::<f64>::try_from(&document)?;
    Region::from_geometries(collection.0, crs)
}

fn declared_crs(document: &GeoJson) -> Result<Crs, RegionError> {
    let members: Option<&JsonObject> = match document {
        GeoJson::FeatureCollection(fc) => fc.foreign_members.as_ref(),
        GeoJson::Feature(feature) => feature.foreign_members.as_ref(),
        GeoJson::Geometry(geometry) => geometry.foreign_members.as_ref(),
    };
    let name = members
        .and_then(|m| m.get("crs"))
        .and_then(|crs| crs.pointer("/properties/name"))
        .and_then(|name| name.as_str());

    match name {
        Some(name) => Ok(name.parse::<Crs>()?),
        None => Ok(Crs::Wgs84),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, Contains};

    const LAUSANNE_BOX: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "lausanne"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[6.5, 46.4], [6.8, 46.4], [6.8, 46.6], [6.5, 46.6], [6.5, 46.4]]]
            }
        }, {
            "type": "Feature",
            "properties": {"name": "marker"},
            "geometry": {"type": "Point", "coordinates": [6.6, 46.5]}
        }]
    }"#;

    #[test]
    fn feature_collection_keeps_polygons() {
        let region = parse_region(LAUSANNE_BOX).unwrap();
        assert_eq!(region.crs(), Crs::Wgs84);
        assert_eq!(region.geometry().0.len(), 1);
        assert!(region.geometry().contains(&point!(x: 6.66, y: 46.51)));
    }

    #[test]
    fn legacy_crs_member_is_honored() {
        let doc = r#"{
            "type": "Feature",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::21781"}},
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[530000, 140000], [550000, 140000], [550000, 160000], [530000, 160000], [530000, 140000]]]
            }
        }"#;
        let region = parse_region(doc).unwrap();
        assert_eq!(region.crs(), Crs::Lv03);
        assert!(region.geometry().contains(&point!(x: 539_460.0, y: 150_159.0)));
    }

    #[test]
    fn unknown_crs_is_rejected() {
        let doc = r#"{
            "type": "Polygon",
            "crs": {"type": "name", "properties": {"name": "EPSG:2056"}},
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
        }"#;
        assert!(matches!(
            parse_region(doc),
            Err(RegionError::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn points_only_is_not_a_region() {
        let doc = r#"{"type": "Point", "coordinates": [6.6, 46.5]}"#;
        assert!(matches!(parse_region(doc), Err(RegionError::NoPolygons)));
    }

    #[test]
    fn malformed_json_surfaces_the_parse_error() {
        assert!(matches!(
            parse_region("Pully, Switzerland"),
            Err(RegionError::GeoJson(_))
        ));
    }
}
