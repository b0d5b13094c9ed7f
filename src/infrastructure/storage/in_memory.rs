use crate::core::errors::BillsplitError;
use crate::core::models::{Expense, Group, SettlementStatus, SettlementTransfer, Transfer};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

type PairKey = (String, String, String);

fn pair_key(group_id: &str, from: &str, to: &str) -> PairKey {
    (group_id.to_string(), from.to_string(), to.to_string())
}

#[derive(Default)]
struct SettlementTable {
    by_id: HashMap<String, SettlementTransfer>,
    by_pair: HashMap<PairKey, String>,
}

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    groups: Arc<RwLock<HashMap<String, Group>>>,
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
    settlements: Arc<RwLock<SettlementTable>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            groups: Arc::new(RwLock::new(HashMap::new())),
            expenses: Arc::new(RwLock::new(HashMap::new())),
            settlements: Arc::new(RwLock::new(SettlementTable::default())),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_group(&self, group: Group) -> Result<(), BillsplitError> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, BillsplitError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, BillsplitError> {
        let groups = self.groups.read().await;
        let mut found: Vec<Group> = groups.values().filter(|g| g.is_member(user_id)).cloned().collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), BillsplitError> {
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, BillsplitError> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(expense_id).cloned())
    }

    async fn get_expenses(&self, group_id: &str) -> Result<Vec<Expense>, BillsplitError> {
        let expenses = self.expenses.read().await;
        let mut found: Vec<Expense> = expenses.values().filter(|e| e.group_id == group_id).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<SettlementTransfer>, BillsplitError> {
        let settlements = self.settlements.read().await;
        Ok(settlements.by_id.get(settlement_id).cloned())
    }

    async fn get_settlements(&self, group_id: &str) -> Result<Vec<SettlementTransfer>, BillsplitError> {
        let settlements = self.settlements.read().await;
        let mut found: Vec<SettlementTransfer> = settlements
            .by_id
            .values()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn apply_settlements(
        &self,
        group_id: &str,
        transfers: &[Transfer],
        now: DateTime<Utc>,
    ) -> Result<Vec<SettlementTransfer>, BillsplitError> {
        let mut table = self.settlements.write().await;
        let mut applied = Vec::with_capacity(transfers.len());
        let mut live: HashSet<PairKey> = HashSet::new();

        for transfer in transfers {
            let key = pair_key(group_id, &transfer.from, &transfer.to);
            live.insert(key.clone());

            let existing_id = table.by_pair.get(&key).cloned();
            let updated = match existing_id {
                Some(id) => table.by_id.get_mut(&id).map(|record| {
                    if !record.is_completed() {
                        record.amount = transfer.amount;
                        record.updated_at = now;
                    }
                    record.clone()
                }),
                None => None,
            };
            let record = match updated {
                Some(record) => record,
                None => {
                    let record = SettlementTransfer {
                        id: Uuid::new_v4().to_string(),
                        group_id: group_id.to_string(),
                        from: transfer.from.clone(),
                        to: transfer.to.clone(),
                        amount: transfer.amount,
                        status: SettlementStatus::Pending,
                        created_at: now,
                        updated_at: now,
                    };
                    table.by_pair.insert(key, record.id.clone());
                    table.by_id.insert(record.id.clone(), record.clone());
                    record
                }
            };
            applied.push(record);
        }

        let stale: Vec<String> = table
            .by_id
            .values()
            .filter(|s| {
                s.group_id == group_id
                    && s.status == SettlementStatus::Pending
                    && !live.contains(&pair_key(group_id, &s.from, &s.to))
            })
            .map(|s| s.id.clone())
            .collect();
        for id in stale {
            if let Some(record) = table.by_id.remove(&id) {
                table.by_pair.remove(&pair_key(group_id, &record.from, &record.to));
            }
        }

        Ok(applied)
    }

    async fn complete_settlement(
        &self,
        settlement_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SettlementTransfer>, BillsplitError> {
        let mut table = self.settlements.write().await;
        Ok(table.by_id.get_mut(settlement_id).map(|record| {
            if !record.is_completed() {
                record.status = SettlementStatus::Completed;
                record.updated_at = now;
            }
            record.clone()
        }))
    }
}
