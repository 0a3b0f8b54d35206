// Adapter surface: the conveniences composed from get/insert/remove.
//
// Each test pins down the hit and the miss behavior of one helper, and
// whether the map changes when a callback declines to produce a value.
use double_hash_map::{DoubleHashMap, TableError};
use std::cell::Cell;

fn filled() -> DoubleHashMap<String, i32> {
    [("A", 10), ("B", 20), ("C", 30), ("D", 40), ("E", 50)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[test]
fn get_or_default_falls_back_on_miss() {
    let m = filled();
    let fallback = -1;
    assert_eq!(*m.get_or_default("A", &fallback), 10);
    assert_eq!(*m.get_or_default("Z", &fallback), -1);
}

#[test]
fn for_each_visits_every_entry_once() {
    let m = filled();
    let mut sum = 0;
    let mut count = 0;
    m.for_each(|_, v| {
        sum += *v;
        count += 1;
    });
    assert_eq!((count, sum), (5, 150));
}

#[test]
fn replace_all_values_transforms_in_place() {
    let mut m = filled();
    m.replace_all_values(|k, v| Some(v + k.len() as i32)).unwrap();
    assert_eq!(m.get("A"), Some(&11));
    assert_eq!(m.get("E"), Some(&51));
    assert_eq!(m.len(), 5);
}

#[test]
fn replace_all_values_failure_changes_nothing() {
    let mut m = filled();
    let before = m.clone();
    let err = m
        .replace_all_values(|_, v| if *v > 30 { None } else { Some(0) })
        .unwrap_err();
    assert!(matches!(err, TableError::ComputationContractViolation { .. }));
    assert_eq!(m, before);
}

#[test]
fn put_if_absent_inserts_only_on_miss() {
    let mut m = filled();
    assert_eq!(m.put_if_absent("A".to_string(), 99), Some(&10));
    assert_eq!(m.get("A"), Some(&10));
    assert_eq!(m.put_if_absent("F".to_string(), 60), None);
    assert_eq!(m.get("F"), Some(&60));
    assert_eq!(m.len(), 6);
}

#[test]
fn remove_if_equals_checks_current_value() {
    let mut m = filled();
    assert!(!m.remove_if_equals("A", &11));
    assert!(m.contains_key("A"));
    assert!(m.remove_if_equals("A", &10));
    assert!(!m.contains_key("A"));
    assert!(!m.remove_if_equals("A", &10));
    assert_eq!(m.len(), 4);
}

#[test]
fn replace_only_touches_present_keys() {
    let mut m = filled();
    assert_eq!(m.replace("B", 21), Some(20));
    assert_eq!(m.get("B"), Some(&21));
    assert_eq!(m.replace("Z", 1), None);
    assert!(!m.contains_key("Z"));
}

#[test]
fn replace_if_equals_is_conditional() {
    let mut m = filled();
    assert!(!m.replace_if_equals("C", &31, 0));
    assert_eq!(m.get("C"), Some(&30));
    assert!(m.replace_if_equals("C", &30, 33));
    assert_eq!(m.get("C"), Some(&33));
    assert!(!m.replace_if_equals("Z", &0, 1));
}

#[test]
fn compute_if_absent_supplies_once() {
    let mut m = filled();
    let calls = Cell::new(0);
    let supply = |k: &String| {
        calls.set(calls.get() + 1);
        Some(k.len() as i32 * 100)
    };
    assert_eq!(m.compute_if_absent("ZZ".to_string(), supply), Ok(&200));
    assert_eq!(m.compute_if_absent("ZZ".to_string(), supply), Ok(&200));
    assert_eq!(calls.get(), 1);
    assert_eq!(
        m.compute_if_absent("YY".to_string(), |_| None),
        Err(TableError::ComputationContractViolation {
            operation: "compute_if_absent"
        })
    );
    assert!(!m.contains_key("YY"));
}

#[test]
fn compute_if_present_updates_or_removes() {
    let mut m = filled();
    assert_eq!(m.compute_if_present("D", |_, v| Some(v + 1)), Some(&41));
    assert_eq!(m.compute_if_present("Z", |_, v| Some(v + 1)), None);
    assert!(!m.contains_key("Z"));
    assert_eq!(m.compute_if_present("D", |_, _| None), None);
    assert!(!m.contains_key("D"));
}

#[test]
fn compute_upserts_and_removes() {
    let mut m = filled();
    let bump = |_: &String, v: Option<&i32>| Some(v.copied().unwrap_or(0) + 1);
    assert_eq!(m.compute("A".to_string(), bump), Some(&11));
    assert_eq!(m.compute("N".to_string(), bump), Some(&1));
    assert_eq!(m.compute("N".to_string(), |_, _| None), None);
    assert!(!m.contains_key("N"));
    assert_eq!(m.compute("Q".to_string(), |_, _| None), None);
    assert!(!m.contains_key("Q"));
    assert_eq!(m.len(), 5);
}

#[test]
fn merge_inserts_combines_and_removes() {
    let mut m: DoubleHashMap<&str, String> = DoubleHashMap::new();
    let concat = |old: &String, new: String| Some(format!("{old}{new}"));
    assert_eq!(m.merge("k", "a".to_string(), concat), Some(&"a".to_string()));
    assert_eq!(m.merge("k", "b".to_string(), concat), Some(&"ab".to_string()));
    assert_eq!(m.merge("k", "c".to_string(), |_, _| None), None);
    assert!(m.is_empty());
}

#[test]
fn extend_and_from_iter_use_insert_semantics() {
    let mut m: DoubleHashMap<u8, u8> = [(1, 1), (2, 2), (1, 3)].into_iter().collect();
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&1), Some(&3));
    m.extend([(3, 3), (2, 9)]);
    assert_eq!(m.len(), 3);
    assert_eq!(m.get(&2), Some(&9));
}
