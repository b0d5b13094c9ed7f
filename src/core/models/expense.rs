use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    Equal,
    Custom,
    Percentage,
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SplitMode::Equal => "equal",
            SplitMode::Custom => "custom",
            SplitMode::Percentage => "percentage",
        };
        write!(f, "{}", s)
    }
}

/// One member's owed share of an expense.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Split {
    pub user_id: String,
    pub share: Decimal,
}

impl Split {
    pub fn new(user_id: impl Into<String>, share: Decimal) -> Self {
        Split {
            user_id: user_id.into(),
            share,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub split_mode: SplitMode,
    pub splits: Vec<Split>,
    pub note: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

/// Caller input for a new expense, before split resolution.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub title: String,
    pub amount: Decimal,
    pub paid_by: String,
    pub split_mode: SplitMode,
    /// Shares (custom) or percentages (percentage); ignored for equal splits.
    pub splits: Vec<Split>,
    pub note: Option<String>,
}
