use rand::{Rng, seq::SliceRandom};

/// Size of the candidate pool for `fraction` of `total` records, rounded up.
pub fn pool_size(fraction: f64, total: usize) -> usize {
    if total == 0 || fraction <= 0.0 {
        return 0;
    }

    // 0.7 * 10 is 7.000000000000001 in f64
    let size = (fraction * total as f64 - 1e-9).ceil().max(1.0) as usize;

    size.min(total)
}

/// Keeps the first `k` of relevance-ordered candidates, shuffles them and
/// takes `limit`.
pub fn top_k_then_shuffle<T, R: Rng + ?Sized>(
    mut ranked: Vec<T>,
    k: usize,
    limit: usize,
    rng: &mut R,
) -> Vec<T> {
    ranked.truncate(k);
    ranked.shuffle(rng);
    ranked.truncate(limit);
    ranked
}

/// Orders scored items by descending score. Equal scores end up in random
/// order since the sort is stable over a shuffled input.
pub fn rank_by_score<T, R: Rng + ?Sized>(mut scored: Vec<(f64, T)>, rng: &mut R) -> Vec<T> {
    scored.shuffle(rng);
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn pool_size_rounds_up() {
        assert_eq!(pool_size(0.2, 10), 2);
        assert_eq!(pool_size(0.2, 11), 3);
        assert_eq!(pool_size(0.7, 10), 7);
        assert_eq!(pool_size(0.2, 1), 1);
        assert_eq!(pool_size(0.2, 0), 0);
        assert_eq!(pool_size(1.0, 4), 4);
    }

    #[test]
    fn keeps_only_top_k() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = top_k_then_shuffle((0..20).collect(), 5, 3, &mut rng);
            assert_eq!(picked.len(), 3);
            assert!(picked.iter().all(|v| *v < 5));
        }
    }

    #[test]
    fn ranks_descending() {
        let mut rng = StdRng::seed_from_u64(1);
        let ranked = rank_by_score(vec![(1.0, "c"), (9.0, "a"), (5.0, "b")], &mut rng);

        assert_eq!(ranked, vec!["a", "b", "c"]);
    }
}
