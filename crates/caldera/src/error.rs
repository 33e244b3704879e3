use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalderaError {
    #[error("Query error: {0}")]
    Query(#[from] crate::query::QueryError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
    #[error("Data loading error: {0}")]
    Data(#[from] caldera_data::DataError),
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

pub type Result<T> = std::result::Result<T, CalderaError>;
