use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

/// Coarse classification used at the request boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    Unauthorized,
    Internal,
}

#[derive(Error, Debug, Serialize)]
pub enum BillsplitError {
    /// Custom split amounts are off from the expense amount by more than the tolerance
    #[error("splits do not sum to total amount")]
    InvalidSplitTotal,

    /// Percentages are off from 100 by more than the tolerance
    #[error("total percentage must be 100")]
    InvalidPercentageTotal,

    /// A split references someone outside the group
    #[error("all split users must be group members")]
    InvalidSplitUser(String),

    #[error("each split user may appear only once")]
    DuplicateSplitUser(String),

    #[error("split values cannot be negative")]
    NegativeSplit(String),

    #[error("at least one split is required")]
    MissingSplits,

    #[error("group has no members")]
    EmptyGroup,

    #[error("payer must be a group member")]
    InvalidPayer(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Group {0} not found")]
    GroupNotFound(String),

    #[error("Settlement {0} not found")]
    SettlementNotFound(String),

    /// Acting user is not part of the group
    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl BillsplitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillsplitError::InvalidSplitTotal
            | BillsplitError::InvalidPercentageTotal
            | BillsplitError::InvalidSplitUser(_)
            | BillsplitError::DuplicateSplitUser(_)
            | BillsplitError::NegativeSplit(_)
            | BillsplitError::MissingSplits
            | BillsplitError::EmptyGroup
            | BillsplitError::InvalidPayer(_)
            | BillsplitError::InvalidInput(_, _) => ErrorKind::Validation,
            BillsplitError::GroupNotFound(_)
            | BillsplitError::SettlementNotFound(_) => ErrorKind::NotFound,
            BillsplitError::NotGroupMember(_) => ErrorKind::Forbidden,
            BillsplitError::AlreadyGroupMember(_) => ErrorKind::Conflict,
            BillsplitError::Unauthorized(_) => ErrorKind::Unauthorized,
            BillsplitError::StorageError(_)
            | BillsplitError::LoggingError(_)
            | BillsplitError::InternalServerError(_) => ErrorKind::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
