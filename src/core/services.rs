use crate::auth::jwt::{Claims, JwtService};
use crate::constants::{
    DEFAULT_CURRENCY, EXPENSE_ADDED, GROUP_CREATED, MEMBER_ADDED, SETTLEMENT_MARKED_PAID, SETTLEMENTS_RECOMPUTED,
};
use crate::core::errors::{BillsplitError, FieldError};
use crate::core::models::{AppLog, Expense, Group, GroupEvent, NewExpense, SettlementTransfer};
use crate::core::money::{MAX_EXPENSE_AMOUNT, exceeds_scale};
use crate::core::netting::{NetPositions, compute_settlements};
use crate::core::split::resolve_splits;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::realtime::EventPublisher;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

pub struct BillsplitService<S: Storage, L: LoggingService, P: EventPublisher> {
    storage: S,
    logging: L,
    publisher: P,
    jwt_service: JwtService,
    group_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: Storage, L: LoggingService, P: EventPublisher> BillsplitService<S, L, P> {
    pub fn new(storage: S, logging: L, publisher: P, jwt_secret: String) -> Self {
        BillsplitService {
            storage,
            logging,
            publisher,
            jwt_service: JwtService::new(jwt_secret),
            group_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, BillsplitError> {
        self.jwt_service.validate_token(token)
    }

    /// Mints a token for `user_id`; real tokens come from the external auth service.
    pub fn issue_token(&self, user_id: &str, ttl_secs: u64) -> Result<String, BillsplitError> {
        self.jwt_service.generate_token(user_id, ttl_secs)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Serializes writers of one group. Events are published while the
    /// guard is held so subscribers see them in commit order.
    async fn lock_group(&self, group_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.group_locks.lock().await;
            locks.entry(group_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    async fn validate_group_membership(&self, group_id: &str, user_id: &str) -> Result<Group, BillsplitError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| BillsplitError::GroupNotFound(group_id.to_string()))?;
        if !group.is_member(user_id) {
            return Err(BillsplitError::NotGroupMember(user_id.to_string()));
        }
        Ok(group)
    }

    async fn log_and_audit(&self, action: &str, details: serde_json::Value, user_id: Option<&str>) {
        if let Err(e) = self.logging.log_action(action, details, user_id).await {
            warn!(action, error = %e, "failed to record audit entry");
        }
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), BillsplitError> {
        if value.trim().is_empty() {
            return Err(BillsplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.chars().count() > max_length {
            return Err(BillsplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: Decimal) -> Result<(), BillsplitError> {
        let problem = if amount <= Decimal::ZERO {
            Some(("Invalid Amount", "Amount must be greater than 0"))
        } else if amount > MAX_EXPENSE_AMOUNT {
            Some(("Amount Too Large", "Amount cannot exceed 1,000,000"))
        } else if exceeds_scale(amount) {
            Some(("Invalid Amount", "Amount cannot have more than 2 decimal places"))
        } else {
            None
        };
        match problem {
            Some((title, description)) => Err(BillsplitError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: title.to_string(),
                    description: description.to_string(),
                },
            )),
            None => Ok(()),
        }
    }

    pub async fn create_group(
        &self,
        name: String,
        currency: Option<String>,
        created_by: &str,
    ) -> Result<Group, BillsplitError> {
        self.validate_string_input("name", &name, 100)?;
        let currency = currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        self.validate_string_input("currency", &currency, 10)?;

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            currency,
            created_by: created_by.to_string(),
            members: vec![created_by.to_string()],
            created_at: Utc::now(),
        };
        self.storage.save_group(group.clone()).await?;
        info!(group_id = %group.id, "group created");

        self.log_and_audit(
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "currency": group.currency }),
            Some(created_by),
        )
        .await;
        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str, acting_user: &str) -> Result<Group, BillsplitError> {
        self.validate_group_membership(group_id, acting_user).await
    }

    pub async fn list_groups(&self, acting_user: &str) -> Result<Vec<Group>, BillsplitError> {
        self.storage.get_user_groups(acting_user).await
    }

    pub async fn add_member(&self, group_id: &str, user_id: &str, added_by: &str) -> Result<Group, BillsplitError> {
        self.validate_string_input("user_id", user_id, 100)?;
        self.validate_group_membership(group_id, added_by).await?;

        let _guard = self.lock_group(group_id).await;
        let mut group = self.validate_group_membership(group_id, added_by).await?;
        if group.is_member(user_id) {
            return Err(BillsplitError::AlreadyGroupMember(user_id.to_string()));
        }
        group.members.push(user_id.to_string());
        self.storage.save_group(group.clone()).await?;
        info!(group_id, user_id, "member added");

        self.publisher.publish(
            group_id,
            GroupEvent::MemberAdded {
                group_id: group_id.to_string(),
                user_id: user_id.to_string(),
            },
        );
        self.log_and_audit(
            MEMBER_ADDED,
            json!({ "group_id": group_id, "user_id": user_id }),
            Some(added_by),
        )
        .await;
        Ok(group)
    }

    /// Validates, resolves splits and persists a new expense. Nothing is
    /// stored when any check fails.
    pub async fn create_expense(
        &self,
        group_id: &str,
        acting_user: &str,
        input: NewExpense,
    ) -> Result<Expense, BillsplitError> {
        self.validate_group_membership(group_id, acting_user).await?;
        self.validate_string_input("title", &input.title, 200)?;
        self.validate_amount_input("amount", input.amount)?;

        let _guard = self.lock_group(group_id).await;
        let group = self.validate_group_membership(group_id, acting_user).await?;
        if !group.is_member(&input.paid_by) {
            return Err(BillsplitError::InvalidPayer(input.paid_by));
        }
        let splits = resolve_splits(input.amount, input.split_mode, &group.members, &input.splits)?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            title: input.title,
            amount: input.amount,
            paid_by: input.paid_by,
            split_mode: input.split_mode,
            splits,
            note: input.note.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
        };
        self.storage.save_expense(expense.clone()).await?;
        info!(group_id, expense_id = %expense.id, amount = %expense.amount, mode = %expense.split_mode, "expense added");

        self.publisher.publish(
            group_id,
            GroupEvent::ExpenseAdded {
                expense: expense.clone(),
            },
        );
        self.log_and_audit(
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "group_id": group_id,
                "title": expense.title,
                "amount": expense.amount,
                "paid_by": expense.paid_by,
                "split_mode": expense.split_mode,
            }),
            Some(acting_user),
        )
        .await;

        Ok(expense)
    }

    pub async fn list_expenses(&self, group_id: &str, acting_user: &str) -> Result<Vec<Expense>, BillsplitError> {
        self.validate_group_membership(group_id, acting_user).await?;
        self.storage.get_expenses(group_id).await
    }

    /// Recomputes the group's transfers from every expense and upserts them.
    ///
    /// The upsert is a single atomic storage step, so a failure leaves the
    /// previous records in place.
    pub async fn get_settlements(
        &self,
        group_id: &str,
        acting_user: &str,
    ) -> Result<Vec<SettlementTransfer>, BillsplitError> {
        self.validate_group_membership(group_id, acting_user).await?;

        let _guard = self.lock_group(group_id).await;
        let group = self.validate_group_membership(group_id, acting_user).await?;
        let mut expenses = self.storage.get_expenses(group_id).await?;
        expenses.reverse();

        let positions = NetPositions::from_ledger(&group.members, &expenses);
        let transfers = compute_settlements(&positions);
        let settlements = self.storage.apply_settlements(group_id, &transfers, Utc::now()).await?;
        info!(group_id, expenses = expenses.len(), transfers = settlements.len(), "settlements recomputed");

        self.publisher.publish(
            group_id,
            GroupEvent::SettlementsUpdated {
                settlements: settlements.clone(),
            },
        );
        self.log_and_audit(
            SETTLEMENTS_RECOMPUTED,
            json!({ "group_id": group_id, "transfers": settlements.len() }),
            Some(acting_user),
        )
        .await;

        Ok(settlements)
    }

    /// Moves a transfer to `Completed`. Only existence is checked; marking
    /// an already completed transfer returns it unchanged.
    pub async fn mark_settlement_paid(
        &self,
        settlement_id: &str,
        acting_user: &str,
    ) -> Result<SettlementTransfer, BillsplitError> {
        let existing = self
            .storage
            .get_settlement(settlement_id)
            .await?
            .ok_or_else(|| BillsplitError::SettlementNotFound(settlement_id.to_string()))?;
        let group_id = existing.group_id;

        let _guard = self.lock_group(&group_id).await;
        let settlement = self
            .storage
            .complete_settlement(settlement_id, Utc::now())
            .await?
            .ok_or_else(|| BillsplitError::SettlementNotFound(settlement_id.to_string()))?;
        info!(group_id = %group_id, settlement_id, "settlement marked paid");

        let settlements = self.storage.get_settlements(&group_id).await?;
        self.publisher.publish(&group_id, GroupEvent::SettlementsUpdated { settlements });
        self.log_and_audit(
            SETTLEMENT_MARKED_PAID,
            json!({
                "settlement_id": settlement.id,
                "group_id": group_id,
                "from": settlement.from,
                "to": settlement.to,
                "amount": settlement.amount,
            }),
            Some(acting_user),
        )
        .await;

        Ok(settlement)
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, BillsplitError> {
        self.logging.get_logs().await
    }
}
