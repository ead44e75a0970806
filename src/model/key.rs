//! Key identity and ordering utilities

use rustc_hash::FxHashSet;

use super::table::KeyedTable;

/// Hashable identity of a key.
///
/// `-0.0` and `0.0` map to the same bits so they address the same row.
pub fn key_bits(key: f64) -> u64 {
    if key == 0.0 {
        0.0f64.to_bits()
    } else {
        key.to_bits()
    }
}

/// Union of every table's keys, deduplicated and sorted ascending
pub fn sorted_key_union(tables: &[KeyedTable]) -> Vec<f64> {
    let mut seen: FxHashSet<u64> = FxHashSet::default();
    let mut keys: Vec<f64> = tables
        .iter()
        .flat_map(|t| t.keys().iter().copied())
        .filter(|&k| seen.insert(key_bits(k)))
        .map(|k| if k == 0.0 { 0.0 } else { k })
        .collect();

    keys.sort_by(f64::total_cmp);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_zero_shares_identity() {
        assert_eq!(key_bits(0.0), key_bits(-0.0));
        assert_ne!(key_bits(1.0), key_bits(-1.0));
    }

    #[test]
    fn test_union_is_sorted_and_unique() {
        let a = KeyedTable::from_rows(vec![(3.0, vec![1.0]), (1.0, vec![1.0]), (3.0, vec![2.0])])
            .unwrap();
        let b = KeyedTable::from_rows(vec![(2.0, vec![1.0]), (-0.0, vec![1.0])]).unwrap();
        let c = KeyedTable::from_rows(vec![(0.0, vec![1.0]), (1.0, vec![5.0])]).unwrap();

        let keys = sorted_key_union(&[a, b, c]);
        assert_eq!(keys, vec![0.0, 1.0, 2.0, 3.0]);
        assert!(keys[0].is_sign_positive());
    }
}
