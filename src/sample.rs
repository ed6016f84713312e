//! Deterministic history sampling.
//!
//! Long histories are sampled down to a target density before the expensive
//! passes. Selection is a uniform stride over the chronologically ordered
//! input, always keeping the endpoints so the trend shape is preserved.
//! There is no randomness: the same input and target always produce the
//! same subsequence.

/// Select up to `target` elements from `items`, preserving order.
///
/// Returns the input unchanged when it already fits the target. For
/// `target >= 2` the first and last element are always included.
/// `target == 1` keeps the oldest element; `target == 0` returns nothing.
pub fn sample<T: Clone>(items: &[T], target: usize) -> Vec<T> {
    if items.len() <= target {
        return items.to_vec();
    }

    match target {
        0 => Vec::new(),
        1 => vec![items[0].clone()],
        _ => {
            let last = items.len() - 1;
            let mut out = Vec::with_capacity(target);
            let mut prev = usize::MAX;
            for i in 0..target {
                let idx = i * last / (target - 1);
                if idx != prev {
                    out.push(items[idx].clone());
                    prev = idx;
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_under_target() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(sample(&items, 10), items);
        assert_eq!(sample(&items, 50), items);
    }

    #[test]
    fn test_endpoints_always_included() {
        let items: Vec<u32> = (0..97).collect();
        for target in 2..20 {
            let sampled = sample(&items, target);
            assert_eq!(*sampled.first().unwrap(), 0, "target {target}");
            assert_eq!(*sampled.last().unwrap(), 96, "target {target}");
        }
    }

    #[test]
    fn test_exact_target_when_sampling_down() {
        let items: Vec<u32> = (0..1500).collect();
        let sampled = sample(&items, 100);
        assert_eq!(sampled.len(), 100);
        assert_eq!(sampled[0], 0);
        assert_eq!(sampled[99], 1499);
    }

    #[test]
    fn test_deterministic() {
        let items: Vec<u32> = (0..333).collect();
        assert_eq!(sample(&items, 17), sample(&items, 17));
    }

    #[test]
    fn test_order_preserved() {
        let items: Vec<u32> = (0..500).collect();
        let sampled = sample(&items, 40);
        assert!(sampled.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_degenerate_targets() {
        let items: Vec<u32> = (0..5).collect();
        assert!(sample(&items, 0).is_empty());
        assert_eq!(sample(&items, 1), vec![0]);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<u32> = Vec::new();
        assert!(sample(&items, 10).is_empty());
    }
}
