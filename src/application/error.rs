use thiserror::Error;

use crate::{
    config::LoadError,
    infra::{error::InfraError, storage::StorageError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("malformed list data: {0}")]
    MalformedData(#[from] serde_json::Error),
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("minification failed: {0}")]
    Minify(#[from] lol_html::errors::RewritingError),
}
