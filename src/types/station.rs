//! The Agrometeo monitoring station as returned by the `stations` endpoint, plus the
//! `rstar` glue used to prefilter stations against a region's bounding box.

use crate::types::crs::Crs;
use crate::utils::value_as_label;
use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single Agrometeo station.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// The API-assigned station identifier, used in measurement queries.
    pub id: u32,
    /// The display name (e.g. "Pully").
    pub name: String,
    /// Location in `crs`.
    pub location: Point<f64>,
    /// CRS of `location`; the dataset CRS the station was loaded with.
    pub crs: Crs,
    /// Every other field of the station record, verbatim.
    pub attributes: BTreeMap<String, Value>,
}

impl Station {
    /// Returns the label this station goes by under `column`.
    ///
    /// `"id"` and `"name"` map to the typed fields; any other column is looked up in
    /// [`Station::attributes`]. Returns `None` for unknown columns or non-scalar values.
    pub fn identifier(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            other => self.attributes.get(other).and_then(value_as_label),
        }
    }
}

impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.x(), self.location.y()])
    }
}

impl PointDistance for Station {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.x() - point[0];
        let dy = self.location.y() - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;
    use serde_json::json;

    fn station() -> Station {
        Station {
            id: 42,
            name: "Pully".to_string(),
            location: point!(x: 6.66, y: 46.51),
            crs: Crs::Wgs84,
            attributes: BTreeMap::from([
                ("altitude".to_string(), json!(461)),
                ("canton".to_string(), json!(" VD ")),
                ("owner".to_string(), json!({"name": "agroscope"})),
            ]),
        }
    }

    #[test]
    fn identifier_columns() {
        let s = station();
        assert_eq!(s.identifier("id").as_deref(), Some("42"));
        assert_eq!(s.identifier("name").as_deref(), Some("Pully"));
        assert_eq!(s.identifier("canton").as_deref(), Some("VD"));
        assert_eq!(s.identifier("altitude").as_deref(), Some("461"));
        assert_eq!(s.identifier("owner"), None);
        assert_eq!(s.identifier("missing"), None);
    }

    #[test]
    fn envelope_is_the_location() {
        let s = station();
        assert_eq!(s.envelope(), AABB::from_point([6.66, 46.51]));
        assert_eq!(s.distance_2(&[6.66, 46.51]), 0.0);
    }
}
