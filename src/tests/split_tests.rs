use crate::core::errors::BillsplitError;
use crate::core::models::{Split, SplitMode};
use crate::core::split::resolve_splits;
use crate::tests::members;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_equal_split_gives_every_member_one_entry() {
    let amounts = [dec!(0.01), dec!(1), dec!(10), dec!(100), dec!(99.99), dec!(1234.56), dec!(1000000)];
    let all = members(&["a", "b", "c", "d", "e", "f", "g"]);

    for n in 1..=all.len() {
        let group = &all[..n];
        for amount in amounts {
            let splits = resolve_splits(amount, SplitMode::Equal, group, &[]).unwrap();
            assert_eq!(splits.len(), n);
            for member in group {
                assert_eq!(splits.iter().filter(|s| &s.user_id == member).count(), 1);
            }
            let total: Decimal = splits.iter().map(|s| s.share).sum();
            assert!((total - amount).abs() < dec!(0.02) * Decimal::from(n));
        }
    }
}

#[test]
fn test_equal_split_keeps_rounding_residual() {
    let splits = resolve_splits(dec!(100), SplitMode::Equal, &members(&["a", "b", "c"]), &[]).unwrap();
    assert!(splits.iter().all(|s| s.share == dec!(33.33)));
    let total: Decimal = splits.iter().map(|s| s.share).sum();
    assert_eq!(total, dec!(99.99));
}

#[test]
fn test_equal_split_ignores_provided_shares() {
    let provided = vec![Split::new("a", dec!(90))];
    let splits = resolve_splits(dec!(100), SplitMode::Equal, &members(&["a", "b"]), &provided).unwrap();
    assert_eq!(splits, vec![Split::new("a", dec!(50)), Split::new("b", dec!(50))]);
}

#[test]
fn test_equal_split_requires_members() {
    let result = resolve_splits(dec!(10), SplitMode::Equal, &[], &[]);
    assert!(matches!(result, Err(BillsplitError::EmptyGroup)));
}

#[test]
fn test_custom_split_tolerance() {
    let group = members(&["a", "b"]);

    let short_by_a_unit = vec![Split::new("a", dec!(40)), Split::new("b", dec!(59))];
    let result = resolve_splits(dec!(100), SplitMode::Custom, &group, &short_by_a_unit);
    let err = result.unwrap_err();
    assert!(matches!(err, BillsplitError::InvalidSplitTotal));
    assert_eq!(err.to_string(), "splits do not sum to total amount");

    let short_by_a_cent = vec![Split::new("a", dec!(40)), Split::new("b", dec!(59.99))];
    let splits = resolve_splits(dec!(100), SplitMode::Custom, &group, &short_by_a_cent).unwrap();
    assert_eq!(splits, short_by_a_cent);
}

#[test]
fn test_custom_split_may_cover_a_subset() {
    let group = members(&["a", "b", "c"]);
    let provided = vec![Split::new("c", dec!(25.5))];
    let splits = resolve_splits(dec!(25.5), SplitMode::Custom, &group, &provided).unwrap();
    assert_eq!(splits, provided);
}

#[test]
fn test_percentage_split() {
    let group = members(&["a", "b", "c"]);
    let provided = vec![
        Split::new("a", dec!(50)),
        Split::new("b", dec!(33.33)),
        Split::new("c", dec!(16.67)),
    ];
    let splits = resolve_splits(dec!(80), SplitMode::Percentage, &group, &provided).unwrap();
    assert_eq!(
        splits,
        vec![
            Split::new("a", dec!(40)),
            Split::new("b", dec!(26.66)),
            Split::new("c", dec!(13.34)),
        ]
    );
}

#[test]
fn test_percentage_split_must_total_one_hundred() {
    let group = members(&["a", "b"]);
    let provided = vec![Split::new("a", dec!(50)), Split::new("b", dec!(40))];
    let err = resolve_splits(dec!(80), SplitMode::Percentage, &group, &provided).unwrap_err();
    assert!(matches!(err, BillsplitError::InvalidPercentageTotal));
    assert_eq!(err.to_string(), "total percentage must be 100");

    let near = vec![Split::new("a", dec!(50)), Split::new("b", dec!(49.98))];
    assert!(resolve_splits(dec!(80), SplitMode::Percentage, &group, &near).is_ok());
}

#[test]
fn test_split_users_must_be_members() {
    let group = members(&["a", "b"]);
    for mode in [SplitMode::Custom, SplitMode::Percentage] {
        let value = if mode == SplitMode::Custom { dec!(10) } else { dec!(50) };
        let provided = vec![Split::new("a", value), Split::new("mallory", value)];
        let amount = if mode == SplitMode::Custom { dec!(20) } else { dec!(10) };
        let err = resolve_splits(amount, mode, &group, &provided).unwrap_err();
        assert!(matches!(err, BillsplitError::InvalidSplitUser(ref id) if id == "mallory"));
        assert_eq!(err.to_string(), "all split users must be group members");
    }
}

#[test]
fn test_provided_shares_are_checked() {
    let group = members(&["a", "b"]);

    let result = resolve_splits(dec!(10), SplitMode::Custom, &group, &[]);
    assert!(matches!(result, Err(BillsplitError::MissingSplits)));

    let negative = vec![Split::new("a", dec!(15)), Split::new("b", dec!(-5))];
    let result = resolve_splits(dec!(10), SplitMode::Custom, &group, &negative);
    assert!(matches!(result, Err(BillsplitError::NegativeSplit(ref id)) if id == "b"));

    let duplicate = vec![Split::new("a", dec!(5)), Split::new("a", dec!(5))];
    let result = resolve_splits(dec!(10), SplitMode::Custom, &group, &duplicate);
    assert!(matches!(result, Err(BillsplitError::DuplicateSplitUser(ref id)) if id == "a"));
}

#[test]
fn test_oversized_shares_are_rejected_without_overflow() {
    let group = members(&["a", "b"]);
    let huge = Decimal::from_scientific("5e28").unwrap();
    let provided = vec![Split::new("a", huge), Split::new("b", huge)];

    let result = resolve_splits(dec!(10), SplitMode::Custom, &group, &provided);
    assert!(matches!(result, Err(BillsplitError::InvalidSplitTotal)));

    let result = resolve_splits(dec!(10), SplitMode::Percentage, &group, &provided);
    assert!(matches!(result, Err(BillsplitError::InvalidPercentageTotal)));
}

#[test]
fn test_custom_shares_keep_cent_precision() {
    let group = members(&["a", "b", "c"]);
    let provided = vec![
        Split::new("a", dec!(33.333)),
        Split::new("b", dec!(33.333)),
        Split::new("c", dec!(33.334)),
    ];
    let err = resolve_splits(dec!(100), SplitMode::Custom, &group, &provided).unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, BillsplitError::InvalidInput(ref field, _) if field == "splits"));

    let trailing_zeros = vec![Split::new("a", dec!(50.500)), Split::new("b", dec!(49.50))];
    assert!(resolve_splits(dec!(100), SplitMode::Custom, &group, &trailing_zeros).is_ok());
}
