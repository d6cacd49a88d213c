use microrpc::utils::next_message_id;
use std::collections::HashSet;

#[test]
fn test_next_message_id_uniqueness() {
    let mut seen = HashSet::new();

    for _ in 0..10_000 {
        let id = next_message_id();
        assert!(seen.insert(id), "Duplicate message ID generated: {}", id);
    }
}

#[test]
fn test_next_message_id_is_increasing() {
    let a = next_message_id();
    let b = next_message_id();
    assert!(b > a);
}
