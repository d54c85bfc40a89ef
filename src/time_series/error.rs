use crate::http::error::HttpError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeSeriesError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Failed to parse JSON data")]
    JsonParse(#[from] serde_json::Error),

    #[error("Measurements response has no 'data' array")]
    MissingData,

    #[error("Unrecognized timestamp {0}")]
    InvalidTimestamp(String),

    #[error("No stations to query")]
    NoStations,

    #[error("Station {station} has no value for identifier column '{column}'")]
    UnknownStationColumn { station: u32, column: String },

    #[error("Station label '{0}' is not unique among the output columns, pick another identifier column")]
    DuplicateStationLabel(String),

    #[error("Output column name '{0}' is used twice")]
    ColumnNameClash(String),

    #[error("No station location for column '{0}'")]
    MissingGeometry(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
