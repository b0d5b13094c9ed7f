pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const MEMBER_ADDED: &str = "MEMBER_ADDED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const SETTLEMENTS_RECOMPUTED: &str = "SETTLEMENTS_RECOMPUTED";
pub const SETTLEMENT_MARKED_PAID: &str = "SETTLEMENT_MARKED_PAID";

pub const DEFAULT_CURRENCY: &str = "INR";
