use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum SettlementStatus {
    Pending,
    Completed,
}

/// A payment instruction produced by the netting engine.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

/// Persisted settlement record, unique per `(group_id, from, to)`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SettlementTransfer {
    pub id: String,
    pub group_id: String,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub status: SettlementStatus,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}

impl SettlementTransfer {
    pub fn is_completed(&self) -> bool {
        self.status == SettlementStatus::Completed
    }
}
