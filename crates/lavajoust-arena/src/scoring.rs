/// Number of extra-life thresholds crossed going from `before` to `after`.
/// A threshold of 0 disables extra lives.
pub fn extra_lives_earned(before: u32, after: u32, threshold: u32) -> u32 {
    if threshold == 0 || after <= before {
        return 0;
    }
    after / threshold - before / threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_crossing() {
        assert_eq!(extra_lives_earned(0, 9_999, 10_000), 0);
    }

    #[test]
    fn exact_threshold_counts() {
        assert_eq!(extra_lives_earned(9_500, 10_000, 10_000), 1);
    }

    #[test]
    fn large_credit_crosses_several() {
        assert_eq!(extra_lives_earned(9_000, 31_000, 10_000), 3);
    }

    #[test]
    fn disabled_threshold() {
        assert_eq!(extra_lives_earned(0, 50_000, 0), 0);
    }
}
