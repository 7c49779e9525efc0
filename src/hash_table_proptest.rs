#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can inspect
// the raw slot array.

use crate::hash::KeyHasher;
use crate::hash_table::HashTable;
use crate::prime::is_prime;
use crate::slot::Slot;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Search(usize),
    Contains(String),
    Mutate(usize, i32),
    Dump,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{1,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Search),
            1 => "[a-z]{0,5}".prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Dump),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Structural invariants that must hold between operations.
fn check_slots<V, H: KeyHasher>(t: &HashTable<V, H>) -> Result<(), TestCaseError> {
    let slots = t.raw_slots();
    prop_assert!(is_prime(slots.len()), "capacity {} is not prime", slots.len());
    let occupied: Vec<&str> = slots
        .iter()
        .filter_map(Slot::entry)
        .map(|e| e.key())
        .collect();
    prop_assert_eq!(occupied.len(), t.len(), "len must count occupied slots");
    let unique: BTreeSet<&str> = occupied.iter().copied().collect();
    prop_assert_eq!(unique.len(), occupied.len(), "keys must be unique");
    // Every live key is reachable by its own probe sequence.
    for key in occupied {
        prop_assert!(t.contains_key(key), "live key {:?} unreachable", key);
    }
    Ok(())
}

fn run_scenario<H: KeyHasher>(
    mut sut: HashTable<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut removed: BTreeSet<String> = BTreeSet::new();
    let mut last_capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k.as_str(), v).expect("insert under load bound");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                removed.remove(k);
                prop_assert!(2 * sut.len() < sut.capacity(), "load must stay below one half");
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                removed.insert(k.clone());
            }
            OpI::Search(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.search(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.search_mut(k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("model agrees on presence");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Dump => {
                let dump = sut.dump("key");
                prop_assert_eq!(dump.total(), model.len());
                let keys: BTreeSet<&str> = dump.slots().iter().map(|(_, k)| *k).collect();
                let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                prop_assert_eq!(keys, m_keys);
                let idx: Vec<usize> = dump.slots().iter().map(|(i, _)| *i).collect();
                prop_assert!(idx.windows(2).all(|w| w[0] < w[1]), "dump is in index order");
            }
        }

        prop_assert!(sut.capacity() >= last_capacity, "capacity never shrinks");
        last_capacity = sut.capacity();
        for k in &removed {
            prop_assert!(sut.search(k).is_none(), "removed key {:?} resurfaced", k);
        }
        prop_assert_eq!(sut.len(), model.len());
        check_slots(&sut)?;
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap with
// the default folding hash.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(cap in 1usize..16, (pool, ops) in arb_scenario()) {
        run_scenario(HashTable::new(cap).unwrap(), &pool, ops)?;
    }
}

// Property: Same invariants when every key shares one probe sequence; this
// stresses tombstone reuse and the post-removal relocation walk.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(cap in 1usize..16, (pool, ops) in arb_scenario()) {
        let constant = |_: &str| 0u64;
        run_scenario(HashTable::with_hasher(cap, constant).unwrap(), &pool, ops)?;
    }
}

// Property: Only a handful of home slots, so chains overlap and wrap.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_few_homes(cap in 1usize..16, (pool, ops) in arb_scenario()) {
        let few = |k: &str| (k.len() % 3) as u64;
        run_scenario(HashTable::with_hasher(cap, few).unwrap(), &pool, ops)?;
    }
}
