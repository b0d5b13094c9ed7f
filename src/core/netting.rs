//! Reduces a group's net positions to a short list of pairwise transfers.

use crate::core::models::{Expense, Transfer};
use crate::core::money::{NETTING_EPSILON, round_money};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Member balances in insertion order. Positive means the group owes the
/// member, negative means the member owes the group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetPositions {
    entries: Vec<(String, Decimal)>,
    index: HashMap<String, usize>,
}

impl NetPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts every current member at zero, then applies each expense:
    /// the payer is credited the amount and every split member is debited
    /// their share.
    pub fn from_ledger(members: &[String], expenses: &[Expense]) -> Self {
        let mut positions = NetPositions::new();
        for member in members {
            positions.ensure(member);
        }
        for expense in expenses {
            positions.credit(&expense.paid_by, expense.amount);
            for split in &expense.splits {
                positions.debit(&split.user_id, split.share);
            }
        }
        positions
    }

    /// Inserts `member` at zero if absent and returns its slot.
    pub fn ensure(&mut self, member: &str) -> usize {
        if let Some(&slot) = self.index.get(member) {
            return slot;
        }
        let slot = self.entries.len();
        self.entries.push((member.to_string(), Decimal::ZERO));
        self.index.insert(member.to_string(), slot);
        slot
    }

    pub fn credit(&mut self, member: &str, amount: Decimal) {
        let slot = self.ensure(member);
        self.entries[slot].1 += amount;
    }

    pub fn debit(&mut self, member: &str, amount: Decimal) {
        let slot = self.ensure(member);
        self.entries[slot].1 -= amount;
    }

    pub fn get(&self, member: &str) -> Option<Decimal> {
        self.index.get(member).map(|&slot| self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(member, amount)| (member.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for NetPositions {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut positions = NetPositions::new();
        for (member, amount) in iter {
            positions.credit(&member, amount);
        }
        positions
    }
}

struct Party<'a> {
    member: &'a str,
    remaining: Decimal,
}

/// Greedy creditor/debtor matching, largest imbalance first.
///
/// Positions are rounded to cents and anything within [`NETTING_EPSILON`]
/// of zero is treated as settled. Equal amounts keep their insertion order.
/// Emits at most `creditors + debtors - 1` transfers and never a transfer
/// from a member to themselves.
pub fn compute_settlements(positions: &NetPositions) -> Vec<Transfer> {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();
    for (member, position) in positions.iter() {
        let rounded = round_money(position);
        if rounded > NETTING_EPSILON {
            creditors.push(Party { member, remaining: rounded });
        } else if rounded < -NETTING_EPSILON {
            debtors.push(Party { member, remaining: -rounded });
        }
    }

    // sort_by is stable
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let pay = debtor.remaining.min(creditor.remaining);
        transfers.push(Transfer {
            from: debtor.member.to_string(),
            to: creditor.member.to_string(),
            amount: round_money(pay),
        });
        debtor.remaining -= pay;
        creditor.remaining -= pay;
        if debtor.remaining < NETTING_EPSILON {
            i += 1;
        }
        if creditor.remaining < NETTING_EPSILON {
            j += 1;
        }
    }

    transfers
}
