use crate::types::date_arg::DateArg;
use crate::types::scale::{Measurement, Scale};
use crate::types::station::Station;

/// A fully resolved query against the measurements endpoint.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MeteoDataQuery {
    pub start_date: DateArg,
    pub end_date: DateArg,
    pub scale: Scale,
    pub measurement: Measurement,
    pub variable_code: u32,
    pub station_ids: Vec<u32>,
}

impl MeteoDataQuery {
    pub fn new(
        start_date: DateArg,
        end_date: DateArg,
        scale: Option<Scale>,
        measurement: Option<Measurement>,
        variable_code: u32,
        stations: &[Station],
    ) -> Self {
        Self {
            start_date,
            end_date,
            scale: scale.unwrap_or_default(),
            measurement: measurement.unwrap_or_default(),
            variable_code,
            station_ids: stations.iter().map(|s| s.id).collect(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let stations = self
            .station_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        vec![
            ("from", self.start_date.to_api_string()),
            ("to", self.end_date.to_api_string()),
            ("scale", self.scale.to_string()),
            (
                "sensors",
                format!("{}:{}", self.variable_code, self.measurement),
            ),
            ("stations", stations),
        ]
    }

    /// Response columns are named `{station_id}{suffix}`.
    pub fn column_suffix(&self) -> String {
        format!("_{}_{}", self.variable_code, self.measurement)
    }

    /// The station id encoded in a response column name, if the column belongs to this query.
    ///
    /// Without an aggregation scale the API ignores the requested statistic, so any
    /// statistic suffix is accepted for the queried variable.
    pub fn station_id_of(&self, column: &str) -> Option<u32> {
        let id = match column.strip_suffix(self.column_suffix().as_str()) {
            Some(id) => id,
            None if self.scale == Scale::None => {
                let (id, rest) = column.split_once('_')?;
                let (code, _statistic) = rest.split_once('_')?;
                if code.parse::<u32>().ok()? != self.variable_code {
                    return None;
                }
                id
            }
            None => return None,
        };
        id.parse().ok()
    }
}
