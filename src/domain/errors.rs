use thiserror::Error;

use super::bill::BillStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Bill not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("A draft already exists for order #{0}")]
    DuplicateDraft(String),
    #[error("Cannot {action} a {from} bill")]
    InvalidTransition {
        from: BillStatus,
        action: &'static str,
    },
    #[error("Store error: {0}")]
    Store(String),
}
