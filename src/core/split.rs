//! Turns a raw expense entry into the per-member shares that get persisted.

use crate::core::errors::{BillsplitError, FieldError};
use crate::core::models::{Split, SplitMode};
use crate::core::money::{FULL_PERCENTAGE, SPLIT_TOLERANCE, exceeds_scale, round_money, within};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Resolves the authoritative `(member, share)` list for an expense.
///
/// * `Equal` gives every group member `amount / n` rounded to cents. The
///   rounding residual is kept, not redistributed.
/// * `Custom` takes the provided shares as-is once they sum to `amount`
///   within [`SPLIT_TOLERANCE`]. Shares with more than two fractional
///   digits are rejected rather than rounded.
/// * `Percentage` reads the provided values as percentages that must sum
///   to 100 within [`SPLIT_TOLERANCE`]; each share is rounded to cents.
///
/// Every resolved member must belong to `members`. Pure: nothing is
/// persisted here.
pub fn resolve_splits(
    amount: Decimal,
    mode: SplitMode,
    members: &[String],
    provided: &[Split],
) -> Result<Vec<Split>, BillsplitError> {
    let splits = match mode {
        SplitMode::Equal => {
            if members.is_empty() {
                return Err(BillsplitError::EmptyGroup);
            }
            let per_head = round_money(amount / Decimal::from(members.len()));
            members.iter().map(|m| Split::new(m.clone(), per_head)).collect()
        }
        SplitMode::Custom => {
            check_provided(provided)?;
            if let Some(split) = provided.iter().find(|s| exceeds_scale(s.share)) {
                return Err(BillsplitError::InvalidInput(
                    "splits".to_string(),
                    FieldError {
                        field: "splits".to_string(),
                        title: "Invalid Share".to_string(),
                        description: format!("Share for {} cannot have more than 2 decimal places", split.user_id),
                    },
                ));
            }
            match checked_total(provided) {
                Some(total) if within(total, amount, SPLIT_TOLERANCE) => provided.to_vec(),
                _ => return Err(BillsplitError::InvalidSplitTotal),
            }
        }
        SplitMode::Percentage => {
            check_provided(provided)?;
            match checked_total(provided) {
                Some(total) if within(total, FULL_PERCENTAGE, SPLIT_TOLERANCE) => {}
                _ => return Err(BillsplitError::InvalidPercentageTotal),
            }
            provided
                .iter()
                .map(|s| Split::new(s.user_id.clone(), round_money(s.share / FULL_PERCENTAGE * amount)))
                .collect()
        }
    };

    if let Some(outsider) = splits.iter().find(|s| !members.contains(&s.user_id)) {
        return Err(BillsplitError::InvalidSplitUser(outsider.user_id.clone()));
    }

    Ok(splits)
}

fn check_provided(provided: &[Split]) -> Result<(), BillsplitError> {
    if provided.is_empty() {
        return Err(BillsplitError::MissingSplits);
    }
    let mut seen = HashSet::new();
    for split in provided {
        if split.share.is_sign_negative() && !split.share.is_zero() {
            return Err(BillsplitError::NegativeSplit(split.user_id.clone()));
        }
        if !seen.insert(split.user_id.as_str()) {
            return Err(BillsplitError::DuplicateSplitUser(split.user_id.clone()));
        }
    }
    Ok(())
}

/// Sum of the provided shares; `None` when it leaves the `Decimal` range.
fn checked_total(provided: &[Split]) -> Option<Decimal> {
    provided
        .iter()
        .try_fold(Decimal::ZERO, |total, split| total.checked_add(split.share))
}
