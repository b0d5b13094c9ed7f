mod expense_tests;
mod split_tests;

use crate::AppService;
use crate::core::models::{Group, NewExpense, Split, SplitMode};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::realtime::broadcast::BroadcastHub;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use rust_decimal::Decimal;

pub const TEST_SECRET: &str = "test-secret";

pub fn create_test_service() -> AppService {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let hub = BroadcastHub::new(16);
    AppService::new(storage, logging, hub, TEST_SECRET.to_string())
}

/// Creates a group owned by the first member and adds the rest in order.
pub async fn group_with(service: &AppService, members: &[&str]) -> Group {
    let owner = members[0];
    let mut group = service.create_group("Trip".to_string(), None, owner).await.unwrap();
    for member in &members[1..] {
        group = service.add_member(&group.id, member, owner).await.unwrap();
    }
    group
}

pub fn equal_expense(title: &str, amount: Decimal, paid_by: &str) -> NewExpense {
    NewExpense {
        title: title.to_string(),
        amount,
        paid_by: paid_by.to_string(),
        split_mode: SplitMode::Equal,
        splits: Vec::new(),
        note: None,
    }
}

pub fn custom_expense(title: &str, amount: Decimal, paid_by: &str, splits: Vec<Split>) -> NewExpense {
    NewExpense {
        title: title.to_string(),
        amount,
        paid_by: paid_by.to_string(),
        split_mode: SplitMode::Custom,
        splits,
        note: None,
    }
}

pub fn members(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}
