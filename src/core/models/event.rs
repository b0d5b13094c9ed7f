use super::{expense::Expense, settlement::SettlementTransfer};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Messages fanned out to clients subscribed to a group.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GroupEvent {
    ExpenseAdded { expense: Expense },
    SettlementsUpdated { settlements: Vec<SettlementTransfer> },
    MemberAdded { group_id: String, user_id: String },
}

impl GroupEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GroupEvent::ExpenseAdded { .. } => "expense_added",
            GroupEvent::SettlementsUpdated { .. } => "settlements_updated",
            GroupEvent::MemberAdded { .. } => "member_added",
        }
    }
}
