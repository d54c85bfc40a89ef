use crate::catalog::error::CatalogError;
use crate::http::error::HttpError;
use crate::plotting::error::PlotError;
use crate::region::error::RegionError;
use crate::time_series::error::TimeSeriesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgrometeoError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    TimeSeries(#[from] TimeSeriesError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}
