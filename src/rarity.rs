/// Calculate the rarity score for one item
///
/// Arguments:
/// - total_items: number of items in the collection (N)
/// - category_freqs: for each of the item's seven attribute values, how many
///   items carry that same value in that category ("None" bucket for absent)
///
/// Score is `sum over categories of N / freq`, so uncommon values in any
/// category push the score up. Strictly monotonic: lowering any frequency
/// raises the score.
pub fn rarity_score(total_items: u32, category_freqs: &[u32]) -> f64 {
    let n = total_items as f64;
    category_freqs.iter().map(|&freq| n / freq as f64).sum()
}

/// Round a score to one decimal place for storage.
/// Rank assignment must happen before rounding, on full precision.
pub fn round1(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_score() {
        // 3 items, uniform attributes: every category contributes 3/3 = 1
        let score = rarity_score(3, &[3, 3, 3, 3, 3, 3, 3]);
        assert!((score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_rarer_values_score_higher() {
        let common = rarity_score(100, &[50, 50, 50, 50, 50, 50, 50]);
        let rare = rarity_score(100, &[50, 50, 50, 50, 50, 50, 1]);
        assert!(rare > common);
    }

    #[test]
    fn test_monotonic_in_every_category() {
        let base = [40, 30, 20, 10, 5, 4, 2];
        let baseline = rarity_score(100, &base);
        for i in 0..base.len() {
            let mut lowered = base;
            lowered[i] -= 1;
            assert!(
                rarity_score(100, &lowered) > baseline,
                "lowering freq in category {} must raise the score",
                i
            );
        }
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(41.24), 41.2);
        assert_eq!(round1(41.25), 41.3);
        assert_eq!(round1(7.0), 7.0);
    }
}
