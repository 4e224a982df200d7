#![cfg(test)]

// Property tests for both mapping variants, kept inside the crate so the
// probe table statistics are reachable without feature gates.

use crate::error::{Result, RuntimeError};
use crate::flat_mapping::FlatMapping;
use crate::hash::KeyHash;
use crate::mapping::Mapping;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Hash is the key's length, so keys of equal length always collide and the
// empty key exercises the zero-hash remap.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct LenKey(String);
impl KeyHash for LenKey {
    fn key_hash(&self) -> u32 {
        self.0.len() as u32
    }
}

#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Get(usize),
    Delete(usize),
    Contains(String),
    Keys,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-c]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Delete),
            1 => "[a-c]{0,4}".prop_map(Op::Contains),
            1 => Just(Op::Keys),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

trait MapUnderTest: Default {
    fn set(&mut self, k: LenKey, v: i32);
    fn get(&self, k: &LenKey) -> Result<i32>;
    fn delete(&mut self, k: &LenKey) -> Result<()>;
    fn has_key(&self, k: &LenKey) -> bool;
    fn len(&self) -> usize;
    fn key_set(&self) -> BTreeSet<LenKey>;
    fn slot_count(&self) -> usize;
}

macro_rules! impl_map_under_test {
    ($ty:ident) => {
        impl MapUnderTest for $ty<LenKey, i32> {
            fn set(&mut self, k: LenKey, v: i32) {
                $ty::set(self, k, v)
            }
            fn get(&self, k: &LenKey) -> Result<i32> {
                $ty::get(self, k)
            }
            fn delete(&mut self, k: &LenKey) -> Result<()> {
                $ty::delete(self, k)
            }
            fn has_key(&self, k: &LenKey) -> bool {
                $ty::has_key(self, k)
            }
            fn len(&self) -> usize {
                $ty::len(self)
            }
            fn key_set(&self) -> BTreeSet<LenKey> {
                self.iter().map(|(k, _)| k.clone()).collect()
            }
            fn slot_count(&self) -> usize {
                $ty::slot_count(self)
            }
        }
    };
}

impl_map_under_test!(Mapping);
impl_map_under_test!(FlatMapping);

// State-machine equivalence against std::collections::HashMap:
// - set overwrites without changing the length; get/has_key parity.
// - delete of a missing key is KeyNotFound and changes nothing.
// - deletes in collision chains never strand later entries.
// - the load factor stays at or below 0.7 after every operation.
fn check_against_model<M: MapUnderTest>(
    pool: &[String],
    ops: Vec<Op>,
) -> std::result::Result<(), TestCaseError> {
    let mut sut = M::default();
    let mut model: HashMap<LenKey, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Set(i, v) => {
                let k = LenKey(pool[i].clone());
                sut.set(k.clone(), v);
                model.insert(k, v);
            }
            Op::Get(i) => {
                let k = LenKey(pool[i].clone());
                let expected = model.get(&k).copied().ok_or(RuntimeError::KeyNotFound);
                prop_assert_eq!(sut.get(&k), expected);
            }
            Op::Delete(i) => {
                let k = LenKey(pool[i].clone());
                match model.remove(&k) {
                    Some(_) => prop_assert_eq!(sut.delete(&k), Ok(())),
                    None => prop_assert_eq!(sut.delete(&k), Err(RuntimeError::KeyNotFound)),
                }
            }
            Op::Contains(s) => {
                let k = LenKey(s);
                prop_assert_eq!(sut.has_key(&k), model.contains_key(&k));
            }
            Op::Keys => {
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(sut.key_set(), m_keys);
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.len() * 10 <= sut.slot_count() * 7);
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Ok(*v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_mapping_matches_model((pool, ops) in arb_scenario()) {
        check_against_model::<Mapping<LenKey, i32>>(&pool, ops)?;
    }

    #[test]
    fn prop_flat_mapping_matches_model((pool, ops) in arb_scenario()) {
        check_against_model::<FlatMapping<LenKey, i32>>(&pool, ops)?;
    }

    // Backing positions stay in step with the list: items come back in
    // insertion order after arbitrary deletes.
    #[test]
    fn prop_mapping_keeps_insertion_order(
        keys in proptest::collection::btree_set("[a-c]{0,4}", 1..20),
        del in proptest::collection::vec(any::<bool>(), 20),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut m = Mapping::new();
        for (i, k) in keys.iter().enumerate() {
            m.set(LenKey(k.clone()), i as i32);
        }
        let mut expected = Vec::new();
        for (i, k) in keys.iter().enumerate() {
            if del[i] {
                m.delete(&LenKey(k.clone())).unwrap();
            } else {
                expected.push(i as i32);
            }
        }
        let values: Vec<i32> = m.iter().map(|(_, v)| *v).collect();
        prop_assert_eq!(values, expected);
    }
}
