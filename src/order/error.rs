use thiserror::Error;

/// Persistence-level failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Transaction does not belong to this store")]
    ForeignTransaction,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Order operation failures
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Order not found")]
    OrderNotFound,

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl OrderError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        OrderError::InvalidOrder(reason.into())
    }

    /// Store error for a by-id operation: a missing row is an unknown order
    pub fn from_lookup(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => OrderError::OrderNotFound,
            other => OrderError::Store(other),
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        OrderError::Store(err)
    }
}
