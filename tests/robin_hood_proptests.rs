// Robin Hood table property tests.
//
// Property 1: the raw table behaves like a map.
//  - Model: std HashMap<u16, u32>.
//  - Hashes are `key % hash_space` so small spaces force long collision runs
//    and many identical hashes.
//  - Operations: set, find, remove, resize, clear.
//  - After each step: len matches, the probed key matches the model, and
//    the probe-order invariant holds over the slot array.
//
// Property 2: HashMap with a deterministic hasher agrees with std HashMap,
// including after drain and extend.
use std::collections::HashMap as ModelMap;

use proptest::prelude::*;
use robin_hood_map::HashMap;
use robin_hood_map::HashTable;
use robin_hood_map::LoadFactor;
use robin_hood_map::fnv::Fnv1aBuildHasher;

/// Every displaced bucket must follow an occupied slot whose bucket is at
/// most one step closer to home.
fn assert_probe_order<K, V>(table: &HashTable<K, V>) -> Result<(), TestCaseError> {
    let slots = table.num_slots();
    let mut occupied = 0;
    for index in 0..slots {
        let Some(distance) = table.probe_distance_at(index) else {
            continue;
        };
        occupied += 1;
        if distance > 0 {
            let prev = (index + slots - 1) % slots;
            let prev_distance = table.probe_distance_at(prev);
            prop_assert!(
                prev_distance.is_some_and(|d| d + 1 >= distance),
                "slot {} at distance {} follows slot {} at {:?}",
                index,
                distance,
                prev,
                prev_distance
            );
        }
    }
    prop_assert_eq!(occupied, table.len());
    prop_assert!(table.len() <= table.capacity());
    Ok(())
}

#[derive(Debug, Clone)]
enum Op {
    Set(u16, u32),
    Find(u16),
    Remove(u16),
    Resize(u32),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u16..256, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        3 => (0u16..256).prop_map(Op::Find),
        4 => (0u16..256).prop_map(Op::Remove),
        1 => (0u32..10).prop_map(Op::Resize),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_table_matches_model(
        hash_space in 1u16..=512,
        initial_exp in 0u32..6,
        load_percent in 50u8..=97,
        ops in proptest::collection::vec(op_strategy(), 1..300),
    ) {
        let hash = |key: u16| (key % hash_space) as u64;
        let load_factor = LoadFactor::from_percent(load_percent).unwrap();
        let mut table: HashTable<u16, u32> = HashTable::with_load_factor(initial_exp, load_factor);
        let mut model: ModelMap<u16, u32> = ModelMap::new();

        for op in ops {
            let slots_before = table.num_slots();
            match op {
                Op::Set(key, value) => {
                    let replaced = table.set(hash(key), key, value, |a, b| a == b).unwrap();
                    let expected = model.insert(key, value);
                    prop_assert_eq!(replaced.map(|b| (b.key, b.value)), expected.map(|v| (key, v)));
                    if expected.is_some() {
                        prop_assert_eq!(table.num_slots(), slots_before);
                    }
                    prop_assert_eq!(table.find(hash(key), |&k| k == key).map(|b| b.value), Some(value));
                }
                Op::Find(key) => {
                    let found = table.find(hash(key), |&k| k == key).map(|b| b.value);
                    prop_assert_eq!(found, model.get(&key).copied());
                }
                Op::Remove(key) => {
                    let removed = table.remove(hash(key), |&k| k == key);
                    prop_assert_eq!(removed.map(|b| b.value), model.remove(&key));
                    prop_assert!(table.find(hash(key), |&k| k == key).is_none());
                    prop_assert_eq!(table.num_slots(), slots_before);
                }
                Op::Resize(exp) => {
                    table.resize(exp).unwrap();
                    prop_assert!(table.num_slots() >= slots_before);
                    prop_assert!(table.num_slots() >= 1 << exp);
                }
                Op::Clear => {
                    table.clear();
                    model.clear();
                    prop_assert_eq!(table.num_slots(), slots_before);
                }
            }

            prop_assert_eq!(table.len(), model.len());
            assert_probe_order(&table)?;
        }

        for (key, value) in &model {
            prop_assert_eq!(table.find(hash(*key), |k| k == key).map(|b| b.value), Some(*value));
        }
        prop_assert_eq!(table.iter().count(), model.len());
    }

    #[test]
    fn prop_growth_preserves_contents(
        keys in proptest::collection::hash_set(any::<u64>(), 0..400),
        target_exp in 0u32..12,
    ) {
        let mut table: HashTable<u64, u64> = HashTable::new();
        for &key in &keys {
            prop_assert!(table.set(key, key, !key, |a, b| a == b).unwrap().is_none());
        }
        assert_probe_order(&table)?;

        table.resize(target_exp).unwrap();
        assert_probe_order(&table)?;
        prop_assert_eq!(table.len(), keys.len());
        for &key in &keys {
            prop_assert_eq!(table.find(key, |&k| k == key).map(|b| b.value), Some(!key));
        }
    }

    #[test]
    fn prop_map_matches_model(
        ops in proptest::collection::vec((0u8..4, 0u32..128, any::<i64>()), 1..200),
        extra in proptest::collection::vec((0u32..256, any::<i64>()), 0..64),
    ) {
        let mut map: HashMap<String, i64, Fnv1aBuildHasher> = HashMap::with_hasher(Fnv1aBuildHasher);
        let mut model: ModelMap<String, i64> = ModelMap::new();

        for (op, raw_key, value) in ops {
            let key = format!("k{raw_key}");
            match op {
                0 | 1 => {
                    prop_assert_eq!(map.insert(key.clone(), value), model.insert(key, value));
                }
                2 => {
                    prop_assert_eq!(map.remove(key.as_str()), model.remove(&key));
                }
                _ => {
                    prop_assert_eq!(map.get(key.as_str()), model.get(&key));
                    prop_assert_eq!(map.contains_key(key.as_str()), model.contains_key(&key));
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        let extra: Vec<(String, i64)> = extra.into_iter().map(|(k, v)| (format!("k{k}"), v)).collect();
        map.extend(extra.iter().cloned());
        model.extend(extra);
        prop_assert_eq!(map.len(), model.len());
        assert_probe_order(map.table())?;

        let mut drained: Vec<(String, i64)> = map.drain().collect();
        drained.sort();
        let mut expected: Vec<(String, i64)> = model.into_iter().collect();
        expected.sort();
        prop_assert_eq!(drained, expected);
        prop_assert!(map.is_empty());
    }
}
