//! Property-based tests for ModelIndex merge rules.

use proptest::prelude::*;

use super::index::ModelIndex;
use super::types::AppModelSource;

#[derive(Debug, Clone, PartialEq)]
struct Rec {
    id: i64,
    version: i32,
    /// Position in the concatenated input, to tell equal-version records apart.
    seq: usize,
}

impl AppModelSource for Rec {
    fn definition_id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        "rec"
    }
    fn description(&self) -> Option<&str> {
        None
    }
    fn version(&self) -> i32 {
        self.version
    }
    fn editor_json(&self) -> &str {
        "{}"
    }
}

/// Small id and version ranges so collisions are frequent.
fn arb_pairs() -> impl Strategy<Value = Vec<(i64, i32)>> {
    prop::collection::vec((0i64..8, 0i32..5), 0..30)
}

fn number(owned: &[(i64, i32)], shared: &[(i64, i32)]) -> (Vec<Rec>, Vec<Rec>) {
    let mut seq = 0;
    let mut build = |pairs: &[(i64, i32)]| {
        pairs
            .iter()
            .map(|&(id, version)| {
                seq += 1;
                Rec { id, version, seq }
            })
            .collect::<Vec<_>>()
    };
    let a = build(owned);
    let b = build(shared);
    (a, b)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Owned record wins over any shared record with the same id.
    #[test]
    fn prop_first_write_wins(owned in arb_pairs(), shared in arb_pairs()) {
        let (owned, shared) = number(&owned, &shared);
        let mut index = ModelIndex::new();
        for r in owned.iter().cloned() {
            index.insert_if_absent(r);
        }
        for r in shared.iter().cloned() {
            index.insert_if_absent(r);
        }

        for r in owned.iter().chain(shared.iter()) {
            let first = owned
                .iter()
                .chain(shared.iter())
                .find(|o| o.id == r.id)
                .unwrap();
            prop_assert_eq!(index.get(r.id), Some(first));
        }
    }

    /// Strictly greater version wins; among equal maxima the first seen is kept.
    #[test]
    fn prop_highest_version_wins(owned in arb_pairs(), shared in arb_pairs()) {
        let (owned, shared) = number(&owned, &shared);
        let mut index = ModelIndex::new();
        for r in owned.iter().chain(shared.iter()).cloned() {
            index.insert_if_newer(r);
        }

        let all: Vec<&Rec> = owned.iter().chain(shared.iter()).collect();
        for r in &all {
            let max = all.iter().filter(|o| o.id == r.id).map(|o| o.version).max().unwrap();
            let expected = all
                .iter()
                .find(|o| o.id == r.id && o.version == max)
                .unwrap();
            prop_assert_eq!(index.get(r.id), Some(*expected));
        }
    }

    /// Every distinct id appears exactly once, in first-seen order.
    #[test]
    fn prop_one_entry_per_id(owned in arb_pairs(), shared in arb_pairs()) {
        let (owned, shared) = number(&owned, &shared);
        let mut index = ModelIndex::new();
        for r in owned.iter().chain(shared.iter()).cloned() {
            index.insert_if_newer(r);
        }

        let mut expected_ids: Vec<i64> = Vec::new();
        for r in owned.iter().chain(shared.iter()) {
            if !expected_ids.contains(&r.id) {
                expected_ids.push(r.id);
            }
        }

        let ids: Vec<i64> = index.into_vec().iter().map(|r| r.id).collect();
        prop_assert_eq!(ids, expected_ids);
    }
}
