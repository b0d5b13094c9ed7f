pub mod audit;
pub mod event;
pub mod expense;
pub mod group;
pub mod settlement;

pub use audit::AppLog;
pub use event::GroupEvent;
pub use expense::{Expense, NewExpense, Split, SplitMode};
pub use group::Group;
pub use settlement::{SettlementStatus, SettlementTransfer, Transfer};
