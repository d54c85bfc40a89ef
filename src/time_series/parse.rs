//! Turning a measurements response into the wide, time-indexed table.

use crate::settings::RESPONSE_DATE_FIELD;
use crate::time_series::error::TimeSeriesError;
use crate::time_series::request::MeteoDataQuery;
use crate::types::station::Station;
use crate::utils::value_as_f64;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use polars::prelude::*;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Labels for `stations` under `station_id_column`, in catalog order. Labels become
/// column names, so they must be present, unique, and distinct from `reserved`.
pub(crate) fn station_labels(
    stations: &[Station],
    station_id_column: &str,
    reserved: &[&str],
) -> Result<Vec<String>, TimeSeriesError> {
    let mut seen: HashSet<String> = reserved.iter().map(|name| name.to_string()).collect();
    stations
        .iter()
        .map(|station| {
            let label = station.identifier(station_id_column).ok_or_else(|| {
                TimeSeriesError::UnknownStationColumn {
                    station: station.id,
                    column: station_id_column.to_string(),
                }
            })?;
            if !seen.insert(label.clone()) {
                return Err(TimeSeriesError::DuplicateStationLabel(label));
            }
            Ok(label)
        })
        .collect()
}

/// Builds the wide table: a `time_name` datetime column, strictly ascending, followed
/// by one `Float64` column per station in catalog order.
///
/// Repeated timestamps are merged, keeping the first non-null value per station.
/// Stations absent from the response get an all-null column; response columns that
/// match no catalog station are ignored.
pub(crate) fn parse_measurements(
    body: &str,
    query: &MeteoDataQuery,
    stations: &[Station],
    station_id_column: &str,
    time_name: &str,
) -> Result<DataFrame, TimeSeriesError> {
    let labels = station_labels(stations, station_id_column, &[time_name])?;
    let response: Value = serde_json::from_str(body)?;
    let records = response
        .get("data")
        .and_then(Value::as_array)
        .ok_or(TimeSeriesError::MissingData)?;

    let positions: HashMap<u32, usize> = stations
        .iter()
        .enumerate()
        .map(|(position, station)| (station.id, position))
        .collect();
    let mut ignored: BTreeSet<&str> = BTreeSet::new();
    let mut rows: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();

    for record in records {
        let Some(fields) = record.as_object() else {
            continue;
        };
        let date = fields.get(RESPONSE_DATE_FIELD);
        let timestamp = date
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .ok_or_else(|| {
                TimeSeriesError::InvalidTimestamp(date.map(Value::to_string).unwrap_or_default())
            })?;
        let row = rows
            .entry(timestamp)
            .or_insert_with(|| vec![None; stations.len()]);

        for (column, value) in fields {
            if column == RESPONSE_DATE_FIELD {
                continue;
            }
            let position = query
                .station_id_of(column)
                .and_then(|id| positions.get(&id).copied());
            match position {
                Some(position) => {
                    if row[position].is_none() {
                        row[position] = value_as_f64(value);
                    }
                }
                None => {
                    ignored.insert(column.as_str());
                }
            }
        }
    }
    if !ignored.is_empty() {
        debug!("Ignored response columns without a catalog station: {:?}", ignored);
    }

    let mut station_values: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(rows.len()); stations.len()];
    let mut times = Vec::with_capacity(rows.len());
    for (timestamp, row) in rows {
        times.push(timestamp);
        for (values, value) in station_values.iter_mut().zip(row) {
            values.push(value);
        }
    }

    let mut columns = Vec::with_capacity(stations.len() + 1);
    columns.push(Column::new(time_name.into(), times));
    for (label, values) in labels.into_iter().zip(station_values) {
        columns.push(Column::new(label.into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::stations::{filter_stations, parse_stations};
    use crate::region::RegionInput;
    use crate::test_support::{FakeTransport, LAUSANNE_BOX, MEASUREMENTS_JSON, STATIONS_JSON};
    use crate::types::crs::Crs;
    use crate::types::predicate::SpatialPredicate;
    use crate::types::scale::{Measurement, Scale};

    fn lausanne_stations() -> Vec<Station> {
        let region = crate::region::resolve_region(
            RegionInput::from(LAUSANNE_BOX),
            &FakeTransport::new(),
            None,
        )
        .unwrap();
        filter_stations(
            parse_stations(STATIONS_JSON, Crs::Wgs84).unwrap(),
            region.as_ref(),
            Crs::Wgs84,
            SpatialPredicate::Within,
        )
    }

    fn query(stations: &[Station]) -> MeteoDataQuery {
        MeteoDataQuery::new(
            "2022-06-01".into(),
            "2022-06-01".into(),
            None,
            Some(Measurement::Avg),
            1,
            stations,
        )
    }

    fn epoch_millis(df: &DataFrame) -> Vec<i64> {
        df.column("time")
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    fn values(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
        df.column(column).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2022, 6, 1)
            .unwrap()
            .and_hms_opt(0, 10, 0)
            .unwrap();
        for text in [
            "2022-06-01 00:10:00",
            "2022-06-01T00:10:00",
            "2022-06-01T00:10:00Z",
            "2022-06-01T02:10:00+02:00",
            "2022-06-01 00:10",
            "2022-06-01 00:10:00.000",
        ] {
            assert_eq!(parse_timestamp(text), Some(expected), "{text}");
        }
        assert_eq!(
            parse_timestamp("2022-06-01"),
            NaiveDate::from_ymd_opt(2022, 6, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("01.06.2022"), None);
    }

    #[test]
    fn one_column_per_station_sorted_and_deduplicated() {
        let stations = lausanne_stations();
        let df = parse_measurements(MEASUREMENTS_JSON, &query(&stations), &stations, "name", "time")
            .unwrap();

        assert_eq!(
            df.get_column_names()
                .into_iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
            vec!["time", "Pully", "Epalinges", "Lutry"]
        );
        assert_eq!(df.width() - 1, stations.len());

        let millis = epoch_millis(&df);
        assert_eq!(millis.len(), 3);
        assert!(millis.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(values(&df, "Pully"), vec![Some(14.6), None, Some(14.2)]);
        assert_eq!(values(&df, "Epalinges"), vec![Some(13.1), None, Some(12.9)]);
        assert_eq!(values(&df, "Lutry"), vec![None, None, None]);
    }

    #[test]
    fn columns_follow_the_identifier_column() {
        let stations = lausanne_stations();
        let df = parse_measurements(MEASUREMENTS_JSON, &query(&stations), &stations, "id", "datetime")
            .unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["datetime", "1", "27", "35"]);
    }

    #[test]
    fn shared_labels_are_rejected() {
        let stations = lausanne_stations();
        let result = parse_measurements(MEASUREMENTS_JSON, &query(&stations), &stations, "canton", "time");
        assert!(matches!(
            result,
            Err(TimeSeriesError::DuplicateStationLabel(label)) if label == "VD"
        ));
    }

    #[test]
    fn labels_may_not_shadow_the_time_column() {
        let stations = lausanne_stations();
        let result = parse_measurements(MEASUREMENTS_JSON, &query(&stations), &stations, "name", "Lutry");
        assert!(matches!(
            result,
            Err(TimeSeriesError::DuplicateStationLabel(label)) if label == "Lutry"
        ));
    }

    #[test]
    fn empty_and_malformed_responses() {
        let stations = lausanne_stations();
        let q = query(&stations);

        let empty = parse_measurements(r#"{"data": []}"#, &q, &stations, "name", "time").unwrap();
        assert_eq!(empty.height(), 0);
        assert_eq!(empty.width(), 4);

        assert!(matches!(
            parse_measurements(r#"{"message": "no data"}"#, &q, &stations, "name", "time"),
            Err(TimeSeriesError::MissingData)
        ));
        assert!(matches!(
            parse_measurements(r#"{"data": [{"date": "yesterday"}]}"#, &q, &stations, "name", "time"),
            Err(TimeSeriesError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn unaggregated_series_ignore_the_statistic_suffix() {
        let stations = lausanne_stations();
        let q = MeteoDataQuery::new(
            "2022-06-01".into(),
            "2022-06-01".into(),
            Some(Scale::None),
            Some(Measurement::Max),
            1,
            &stations,
        );
        let df = parse_measurements(MEASUREMENTS_JSON, &q, &stations, "name", "time").unwrap();
        assert_eq!(values(&df, "Pully"), vec![Some(14.6), None, Some(14.2)]);
        assert_eq!(values(&df, "Epalinges"), vec![Some(13.1), None, Some(12.9)]);
    }

    #[test]
    fn other_measurements_are_not_mistaken_for_stations() {
        let stations = lausanne_stations();
        let q = MeteoDataQuery::new(
            "2022-06-01".into(),
            "2022-06-01".into(),
            Some(Scale::Day),
            Some(Measurement::Max),
            1,
            &stations,
        );
        let df = parse_measurements(MEASUREMENTS_JSON, &q, &stations, "name", "time").unwrap();
        assert_eq!(values(&df, "Pully"), vec![None, None, None]);
    }
}
