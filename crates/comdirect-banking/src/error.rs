use comdirect_core::{ApiError, NotAuthenticatedError};
use thiserror::Error;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum BankingError {
    #[error(transparent)]
    NotAuthenticated(#[from] NotAuthenticatedError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Could not write document: {0}")]
    Io(#[from] std::io::Error),
}
