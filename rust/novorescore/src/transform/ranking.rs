use std::collections::HashMap;
use std::hash::Hash;

/// Dense 1-based rank of every score within its group, best (highest) score
/// first.
///
/// Ties keep input order: among equal scores the earliest row gets the best
/// rank, so rank 1 is unique per group.
pub fn rank_within_groups<K: Hash + Eq>(groups: &[K], scores: &[f64]) -> Vec<u32> {
    assert_eq!(groups.len(), scores.len());
    let mut members: HashMap<&K, Vec<usize>> = HashMap::new();
    for (i, key) in groups.iter().enumerate() {
        members.entry(key).or_default().push(i);
    }

    let mut ranks = vec![0u32; scores.len()];
    for idxs in members.values_mut() {
        // Stable sort, members are already in input order.
        idxs.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));
        for (rank, idx) in idxs.iter().enumerate() {
            ranks[*idx] = rank as u32 + 1;
        }
    }
    ranks
}
