use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoListingError {
    #[error("Search error: {0}")]
    SearchError(#[from] crate::search::SearchError),
    #[error("Review error: {0}")]
    ReviewError(#[from] crate::review::ReviewError),
    #[error("Record error: {0}")]
    RecordError(#[from] crate::record::RecordError),
    #[error("Data loading error: {0}")]
    DataLoading(#[from] geolisting_data::DataError),
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GeoListingError>;
