use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_id_wraps_uuid() {
    let uuid = Uuid::new_v4();
    let id = AccountId::from(uuid);
    assert_eq!(id.as_uuid(), &uuid);
    assert_eq!(id.to_string(), uuid.to_string());
}

#[test]
fn test_fresh_ids_are_v7() {
    let id = UserId::new();
    assert_eq!(id.as_uuid().get_version_num(), 7);
    assert_ne!(id, UserId::new());
}

#[test]
fn test_id_parses_from_text() {
    let uuid = Uuid::new_v4();
    let id = PositionId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.as_uuid(), &uuid);
    assert!(PositionId::from_str("not-a-position").is_err());
}

#[test]
fn test_account_ids_sort_by_uuid() {
    let low = AccountId::from(Uuid::from_u128(1));
    let high = AccountId::from(Uuid::from_u128(2));
    assert!(low < high);

    let mut ids = vec![high, low, high];
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids, vec![low, high]);
}
