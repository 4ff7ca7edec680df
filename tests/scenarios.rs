use probing::{HashMapExtensions, ProbeMethod, ProbingHashTable, TableError};

#[test]
fn test_fruit_lookup() {
    let mut table = ProbingHashTable::new(ProbeMethod::Linear);
    assert!(table.insert("apple", 100));
    assert!(table.insert("banana", 200));
    assert!(table.insert("cherry", 300));

    assert_eq!(table.search("banana"), Some(&200));
    assert_eq!(table.search("grape"), None);
    assert_eq!(table.capacity(), 16);
    assert_eq!(table.collision_threshold(), 50);
}

#[test]
fn test_same_key_twice() {
    let mut table = ProbingHashTable::new(ProbeMethod::Quadratic);
    table.insert("k", 1);
    table.insert("k", 2);
    assert_eq!(table.len(), 1);
    assert_eq!(table.search("k"), Some(&2));
}

#[test]
fn test_quadratic_probe_offsets() {
    let h = 0x9e37_79b9_7f4a_7c15_u64;
    let seq: Vec<usize> = (0..4).map(|i| ProbeMethod::Quadratic.index(h, i, 16)).collect();
    let base = usize::try_from(h % 16).unwrap_or_default();
    assert_eq!(seq, vec![base, (base + 2) % 16, (base + 6) % 16, (base + 12) % 16]);
}

#[test]
fn test_growth_keeps_every_entry() {
    for method in [ProbeMethod::Linear, ProbeMethod::Quadratic] {
        let mut table = ProbingHashTable::with_threshold(method, 0);
        let mut previous = table.capacity();
        for i in 0..500_u32 {
            table.insert(i, i.to_string());
            assert!(table.capacity() >= previous);
            previous = table.capacity();
        }
        assert!(table.resize_count() > 0);
        assert!(table.capacity().is_power_of_two());
        for i in 0..500_u32 {
            assert_eq!(table.search(&i), Some(&i.to_string()));
        }
        assert!(table.contains_key(&499));
    }
}

#[test]
fn test_delete_then_reinsert() {
    let mut table = ProbingHashTable::new(ProbeMethod::Linear);
    for i in 0..40 {
        table.insert(i, i * 2);
    }
    for i in (0..40).step_by(2) {
        assert_eq!(table.remove(&i), Some(i * 2));
    }
    assert_eq!(table.len(), 20);
    for i in 0..40 {
        let expected = (i % 2 == 1).then_some(i * 2);
        assert_eq!(table.search(&i).copied(), expected);
    }

    table.extend((0..40).step_by(2).map(|i| (i, i)));
    assert_eq!(table.len(), 40);
    assert_eq!(table.search(&10), Some(&10));
}

#[test]
fn test_method_parsing() {
    let method: ProbeMethod = "quadratic".parse().unwrap_or_default();
    assert_eq!(method, ProbeMethod::Quadratic);
    assert!(matches!("double".parse::<ProbeMethod>(), Err(TableError::UnknownMethod(_))));
}
