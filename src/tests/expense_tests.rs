use crate::core::errors::{BillsplitError, ErrorKind};
use crate::core::models::{NewExpense, Split, SplitMode};
use crate::infrastructure::storage::Storage;
use crate::tests::{create_test_service, custom_expense, equal_expense, group_with};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_equal_expense_splits_across_all_members() {
    let service = create_test_service();
    let group = group_with(&service, &["alice", "bob", "carol"]).await;

    let expense = service
        .create_expense(&group.id, "bob", equal_expense("Dinner", dec!(90), "alice"))
        .await
        .unwrap();

    assert_eq!(expense.split_mode, SplitMode::Equal);
    assert_eq!(
        expense.splits,
        vec![
            Split::new("alice", dec!(30)),
            Split::new("bob", dec!(30)),
            Split::new("carol", dec!(30)),
        ]
    );
    let stored = service.storage().get_expense(&expense.id).await.unwrap().unwrap();
    assert_eq!(stored.amount, dec!(90));
}

#[tokio::test]
async fn test_percentage_expense_is_converted_to_amounts() {
    let service = create_test_service();
    let group = group_with(&service, &["alice", "bob"]).await;

    let input = NewExpense {
        title: "Taxi".to_string(),
        amount: dec!(45),
        paid_by: "bob".to_string(),
        split_mode: SplitMode::Percentage,
        splits: vec![Split::new("alice", dec!(60)), Split::new("bob", dec!(40))],
        note: Some("airport".to_string()),
    };
    let expense = service.create_expense(&group.id, "alice", input).await.unwrap();
    assert_eq!(
        expense.splits,
        vec![Split::new("alice", dec!(27)), Split::new("bob", dec!(18))]
    );
    assert_eq!(expense.note.as_deref(), Some("airport"));
}

#[tokio::test]
async fn test_rejected_expense_is_not_persisted() {
    let service = create_test_service();
    let group = group_with(&service, &["alice", "bob"]).await;

    let bad_total = custom_expense(
        "Hotel",
        dec!(200),
        "alice",
        vec![Split::new("alice", dec!(100)), Split::new("bob", dec!(99))],
    );
    let err = service.create_expense(&group.id, "alice", bad_total).await.unwrap_err();
    assert!(matches!(err, BillsplitError::InvalidSplitTotal));

    let outsider = custom_expense("Hotel", dec!(200), "alice", vec![Split::new("mallory", dec!(200))]);
    let err = service.create_expense(&group.id, "alice", outsider).await.unwrap_err();
    assert!(matches!(err, BillsplitError::InvalidSplitUser(_)));

    let err = service
        .create_expense(&group.id, "alice", equal_expense("Hotel", dec!(200), "mallory"))
        .await
        .unwrap_err();
    assert!(matches!(err, BillsplitError::InvalidPayer(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(service.list_expenses(&group.id, "alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expense_amount_and_title_validation() {
    let service = create_test_service();
    let group = group_with(&service, &["alice"]).await;

    for amount in [dec!(0), dec!(-5), dec!(10.005), dec!(1000000.01)] {
        let err = service
            .create_expense(&group.id, "alice", equal_expense("Snacks", amount, "alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, BillsplitError::InvalidInput(ref field, _) if field == "amount"));
    }

    let err = service
        .create_expense(&group.id, "alice", equal_expense("   ", dec!(5), "alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, BillsplitError::InvalidInput(ref field, _) if field == "title"));

    let long_title = "x".repeat(201);
    let err = service
        .create_expense(&group.id, "alice", equal_expense(&long_title, dec!(5), "alice"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_expense_requires_membership() {
    let service = create_test_service();
    let group = group_with(&service, &["alice", "bob"]).await;

    let err = service
        .create_expense(&group.id, "mallory", equal_expense("Lunch", dec!(10), "alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, BillsplitError::NotGroupMember(ref id) if id == "mallory"));
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = service
        .create_expense("missing", "alice", equal_expense("Lunch", dec!(10), "alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, BillsplitError::GroupNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_expenses_are_listed_newest_first() {
    let service = create_test_service();
    let group = group_with(&service, &["alice", "bob"]).await;

    let first = service
        .create_expense(&group.id, "alice", equal_expense("First", dec!(10), "alice"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = service
        .create_expense(&group.id, "bob", equal_expense("Second", dec!(20), "bob"))
        .await
        .unwrap();

    let listed = service.list_expenses(&group.id, "bob").await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_group_membership_management() {
    let service = create_test_service();
    let group = group_with(&service, &["alice", "bob"]).await;
    assert_eq!(group.members, vec!["alice".to_string(), "bob".to_string()]);
    assert_eq!(group.currency, "INR");

    let err = service.add_member(&group.id, "bob", "alice").await.unwrap_err();
    assert!(matches!(err, BillsplitError::AlreadyGroupMember(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = service.add_member(&group.id, "carol", "mallory").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = service.get_group(&group.id, "mallory").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_list_groups_returns_only_joined_groups() {
    let service = create_test_service();
    let trip = group_with(&service, &["alice", "bob"]).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let flat = group_with(&service, &["bob", "carol"]).await;

    let ids = |groups: Vec<crate::core::models::Group>| groups.into_iter().map(|g| g.id).collect::<Vec<_>>();
    assert_eq!(ids(service.list_groups("bob").await.unwrap()), vec![trip.id.clone(), flat.id.clone()]);
    assert_eq!(ids(service.list_groups("alice").await.unwrap()), vec![trip.id.clone()]);
    assert!(service.list_groups("mallory").await.unwrap().is_empty());

    service.add_member(&flat.id, "alice", "bob").await.unwrap();
    assert_eq!(ids(service.list_groups("alice").await.unwrap()), vec![trip.id, flat.id]);
}
