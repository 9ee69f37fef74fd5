//! # Rating
//!
//! Elo-style update applied after every pairwise vote.
//!
//! - Expected score uses the logistic curve with a 400 point scale
//! - Each side moves toward the observed result (1 for the winner, 0 for the loser) by at most `K_FACTOR`
//! - Results are rounded half to even so stored ratings stay integers

pub const DEFAULT_RATING: i32 = 1400;
pub const K_FACTOR: f64 = 32.0;
pub const SCALE: f64 = 400.0;

/// Probability that `rating` beats `opponent`.
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf((f64::from(opponent) - f64::from(rating)) / SCALE))
}

/// Returns the new `(winner, loser)` ratings. Results saturate at the `i32` bounds.
pub fn update_ratings(winner: i32, loser: i32) -> (i32, i32) {
    let (winner_delta, loser_delta) = rating_deltas(winner, loser);

    (
        (f64::from(winner) + winner_delta).round_ties_even() as i32,
        (f64::from(loser) + loser_delta).round_ties_even() as i32,
    )
}

fn rating_deltas(winner: i32, loser: i32) -> (f64, f64) {
    let winner_expected = expected_score(winner, loser);
    let loser_expected = expected_score(loser, winner);

    (
        K_FACTOR * (1.0 - winner_expected),
        K_FACTOR * (0.0 - loser_expected),
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_equal_ratings() {
        assert_eq!(update_ratings(1400, 1400), (1416, 1384));
        assert_eq!(update_ratings(2000, 2000), (2016, 1984));
    }

    #[test]
    fn test_favourite_wins() {
        let expected = expected_score(1600, 1400);
        assert!((expected - 0.76).abs() < 0.005);

        assert_eq!(update_ratings(1600, 1400), (1608, 1392));
    }

    #[test]
    fn test_underdog_wins() {
        assert_eq!(update_ratings(1400, 1600), (1424, 1576));
    }

    #[test]
    fn test_not_idempotent() {
        let once = update_ratings(1400, 1400);
        let twice = update_ratings(once.0, once.1);

        assert_ne!(once, twice);
        assert!(twice.0 > once.0);
        assert!(twice.1 < once.1);
    }

    #[test]
    fn test_huge_gap_barely_moves() {
        assert_eq!(update_ratings(3000, 100), (3000, 100));
    }

    #[test]
    fn test_extreme_ratings() {
        assert_eq!(update_ratings(-2, i32::MAX), (30, i32::MAX - 32));
        assert_eq!(update_ratings(i32::MAX, i32::MIN), (i32::MAX, i32::MIN));
        assert_eq!(update_ratings(i32::MIN, i32::MAX), (i32::MIN + 32, i32::MAX - 32));
        assert_eq!(update_ratings(i32::MAX, i32::MAX), (i32::MAX, i32::MAX - 16));

        assert_eq!(expected_score(i32::MAX, i32::MIN), 1.0);
        assert_eq!(expected_score(i32::MIN, i32::MAX), 0.0);
    }

    proptest! {
        #[test]
        fn winner_never_drops_loser_never_rises(winner in any::<i32>(), loser in any::<i32>()) {
            let (new_winner, new_loser) = update_ratings(winner, loser);

            prop_assert!(new_winner >= winner);
            prop_assert!(new_loser <= loser);
        }

        #[test]
        fn change_is_zero_sum(winner in -1_000_000_000i32..1_000_000_000, loser in -1_000_000_000i32..1_000_000_000) {
            let (winner_delta, loser_delta) = rating_deltas(winner, loser);
            prop_assert!((winner_delta + loser_delta).abs() < 1e-9);

            let (new_winner, new_loser) = update_ratings(winner, loser);
            let rounded_sum = (i64::from(new_winner) - i64::from(winner))
                + (i64::from(new_loser) - i64::from(loser));
            prop_assert!(rounded_sum.abs() <= 1);
        }

        #[test]
        fn change_is_bounded_by_k_factor(winner in any::<i32>(), loser in any::<i32>()) {
            let (new_winner, new_loser) = update_ratings(winner, loser);

            prop_assert!(i64::from(new_winner) - i64::from(winner) <= K_FACTOR as i64);
            prop_assert!(i64::from(loser) - i64::from(new_loser) <= K_FACTOR as i64);
        }
    }
}
