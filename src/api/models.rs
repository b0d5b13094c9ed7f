use axum::{Json, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::{BillsplitError, ErrorKind};
use crate::core::models::{NewExpense, Split, SplitMode};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub currency: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AddMemberRequest {
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SplitInput {
    pub user_id: String,
    /// Owed amount for custom splits, percentage for percentage splits.
    pub share: Decimal,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
    pub title: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub split_mode: SplitMode,
    #[serde(default)]
    pub splits: Vec<SplitInput>,
    pub note: Option<String>,
}

impl From<CreateExpenseRequest> for NewExpense {
    fn from(req: CreateExpenseRequest) -> Self {
        NewExpense {
            title: req.title,
            amount: req.amount,
            paid_by: req.paid_by,
            split_mode: req.split_mode,
            splits: req.splits.into_iter().map(|s| Split::new(s.user_id, s.share)).collect(),
            note: req.note,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for BillsplitError to implement IntoResponse
pub struct ApiError(pub BillsplitError);

impl From<BillsplitError> for ApiError {
    fn from(err: BillsplitError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error = match &self.0 {
            BillsplitError::InvalidInput(_, field) => format!("{}: {}", field.title, field.description),
            other => other.to_string(),
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse { error })).into_response()
    }
}
