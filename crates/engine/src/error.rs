//! The module contains the errors the engine can throw.
//!
//! Every variant is recoverable from the caller's point of view: the console
//! reports it and returns to a safe menu state. [`Database`] is the only one
//! that signals an unexpected failure of the underlying store.
//!
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no membership found for \"{0}\"")]
    MemberNotFound(String),
    #[error("item {0} not found")]
    ItemNotFound(i32),
    #[error("event {0} not found")]
    EventNotFound(i32),
    #[error("borrow transaction {0} not found")]
    BorrowNotFound(i32),
    #[error("item {0} is currently unavailable for borrowing")]
    ItemUnavailable(i32),
    #[error("\"{email}\" has no active loan for item {item_id}")]
    NoActiveLoan { email: String, item_id: i32 },
    #[error("event \"{0}\" has already passed")]
    EventPassed(String),
    #[error("\"{email}\" is already registered for event {event_id}")]
    AlreadyRegistered { email: String, event_id: i32 },
    #[error("\"{0}\" is already registered")]
    MemberExists(String),
    #[error("\"{0}\" is already registered as a volunteer")]
    AlreadyVolunteer(String),
    #[error("\"{0}\" is already a staff member")]
    AlreadyStaff(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("payment of {paid} exceeds the outstanding balance of {outstanding}")]
    Overpayment { paid: String, outstanding: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse classification of [`EngineError`], used by front-ends to decide
/// how to report a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    InvalidInput,
    Conflict,
    Payment,
    Database,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MemberNotFound(_)
            | Self::ItemNotFound(_)
            | Self::EventNotFound(_)
            | Self::BorrowNotFound(_) => ErrorKind::NotFound,
            Self::ItemUnavailable(_) | Self::NoActiveLoan { .. } | Self::EventPassed(_) => {
                ErrorKind::InvalidState
            }
            Self::AlreadyRegistered { .. }
            | Self::MemberExists(_)
            | Self::AlreadyVolunteer(_)
            | Self::AlreadyStaff(_) => ErrorKind::Conflict,
            Self::InvalidAmount(_) | Self::Overpayment { .. } => ErrorKind::Payment,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Database(_) => ErrorKind::Database,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MemberNotFound(a), Self::MemberNotFound(b)) => a == b,
            (Self::ItemNotFound(a), Self::ItemNotFound(b)) => a == b,
            (Self::EventNotFound(a), Self::EventNotFound(b)) => a == b,
            (Self::BorrowNotFound(a), Self::BorrowNotFound(b)) => a == b,
            (Self::ItemUnavailable(a), Self::ItemUnavailable(b)) => a == b,
            (
                Self::NoActiveLoan {
                    email: a,
                    item_id: x,
                },
                Self::NoActiveLoan {
                    email: b,
                    item_id: y,
                },
            ) => a == b && x == y,
            (Self::EventPassed(a), Self::EventPassed(b)) => a == b,
            (
                Self::AlreadyRegistered {
                    email: a,
                    event_id: x,
                },
                Self::AlreadyRegistered {
                    email: b,
                    event_id: y,
                },
            ) => a == b && x == y,
            (Self::MemberExists(a), Self::MemberExists(b)) => a == b,
            (Self::AlreadyVolunteer(a), Self::AlreadyVolunteer(b)) => a == b,
            (Self::AlreadyStaff(a), Self::AlreadyStaff(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (
                Self::Overpayment {
                    paid: a,
                    outstanding: x,
                },
                Self::Overpayment {
                    paid: b,
                    outstanding: y,
                },
            ) => a == b && x == y,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_not_found() {
        assert_eq!(EngineError::ItemNotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(
            EngineError::MemberNotFound("a@x.com".to_string()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn duplicate_registration_is_conflict() {
        let err = EngineError::AlreadyRegistered {
            email: "a@x.com".to_string(),
            event_id: 3,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            err.to_string(),
            "\"a@x.com\" is already registered for event 3"
        );
    }

    #[test]
    fn unavailable_item_is_invalid_state() {
        assert_eq!(
            EngineError::ItemUnavailable(1).kind(),
            ErrorKind::InvalidState
        );
    }
}
