use crate::core::errors::BillsplitError;
use crate::core::models::{Expense, Group, SettlementTransfer, Transfer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_group(&self, group: Group) -> Result<(), BillsplitError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, BillsplitError>;
    /// Groups listing `user_id` as a member, oldest first.
    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, BillsplitError>;

    async fn save_expense(&self, expense: Expense) -> Result<(), BillsplitError>;
    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, BillsplitError>;
    /// All expenses of a group, newest first.
    async fn get_expenses(&self, group_id: &str) -> Result<Vec<Expense>, BillsplitError>;

    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<SettlementTransfer>, BillsplitError>;
    async fn get_settlements(&self, group_id: &str) -> Result<Vec<SettlementTransfer>, BillsplitError>;
    /// Upserts one record per `(group_id, from, to)` as a single atomic step.
    ///
    /// Pending records take the new amount, completed ones are left as they
    /// are and missing pairs are created as pending. Pending records whose
    /// pair is absent from `transfers` are removed. Returns the records in
    /// `transfers` order.
    async fn apply_settlements(
        &self,
        group_id: &str,
        transfers: &[Transfer],
        now: DateTime<Utc>,
    ) -> Result<Vec<SettlementTransfer>, BillsplitError>;
    /// Marks a settlement completed; `None` when it does not exist.
    async fn complete_settlement(
        &self,
        settlement_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SettlementTransfer>, BillsplitError>;
}

pub mod in_memory;
