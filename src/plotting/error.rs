use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Column '{0}' is not a timestamp column of the frame")]
    UnknownColumn(String),

    #[error("Frame has no timestamp columns to plot")]
    NoTimestampColumns,

    #[error("Column '{0}' has no values to draw")]
    NoValues(String),

    #[error("Failed to draw map: {0}")]
    Drawing(String),

    #[error("Failed to load basemap: {0}")]
    Basemap(String),
}
