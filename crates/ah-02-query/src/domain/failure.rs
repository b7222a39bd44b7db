//! Query failures and their wire codes.

use shared_types::{DatabaseError, LookupError, MessengerCode};
use thiserror::Error;

/// A failed query, ready to be put in a reply envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{err}")]
pub struct QueryFailure {
    pub code: MessengerCode,
    pub err: String,
}

impl QueryFailure {
    pub fn new(code: MessengerCode, err: impl Into<String>) -> Self {
        Self {
            code,
            err: err.into(),
        }
    }

    pub fn generic(err: impl Into<String>) -> Self {
        Self::new(MessengerCode::GenericError, err)
    }
}

impl From<LookupError> for QueryFailure {
    fn from(e: LookupError) -> Self {
        Self::new(MessengerCode::NotFound, e.to_string())
    }
}

impl From<DatabaseError> for QueryFailure {
    fn from(e: DatabaseError) -> Self {
        // A store that fails with an Ok code still produced no result.
        let code = match MessengerCode::from(e.code) {
            MessengerCode::Ok => MessengerCode::GenericError,
            code => code,
        };
        Self::new(code, e.message)
    }
}
