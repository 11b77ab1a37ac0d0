//! Fee domain errors

use thiserror::Error;

use core_kernel::{ClassId, FeeTypeId, Money, PortError};

/// Errors that can occur in the fee domain
#[derive(Debug, Error)]
pub enum FeeError {
    /// The fee type does not apply to the student's class
    #[error("Fee type {fee_type} does not apply to class {class_id}")]
    NotApplicable {
        fee_type: String,
        class_id: ClassId,
    },

    /// Requested payment is not positive or exceeds the resolved amount
    #[error("Invalid amount {requested}: must be greater than 0 and at most {full_amount}")]
    InvalidAmount {
        requested: Money,
        full_amount: Money,
    },

    /// A backing store call failed; surfaced as-is, never retried here
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] PortError),

    /// A fee type id is not in the current catalog
    #[error("Fee type {0} is not in the catalog")]
    CatalogInconsistent(FeeTypeId),

    /// The report renderer failed
    #[error("Report rendering failed: {0}")]
    Render(String),
}

impl FeeError {
    pub fn render(message: impl Into<String>) -> Self {
        FeeError::Render(message.into())
    }

    /// True for rejections caused by the request itself
    pub fn is_rejection(&self) -> bool {
        matches!(self, FeeError::NotApplicable { .. } | FeeError::InvalidAmount { .. })
    }
}
