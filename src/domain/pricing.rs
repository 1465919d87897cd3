//! Pure price-ladder math for the like-driven ascending auction. The
//! repository runs these against the active likes it reads inside the
//! like/unlike transaction.

use crate::shared::config::{PriceRounding, PricingPolicy};

/// An active like as the ladder sees it: who, when, and the price they
/// locked in.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveLike {
    pub user_id: String,
    pub like_time: i64,
    pub like_price: i64,
}

/// Next rung of the ladder: the larger of a percent and a flat increase.
pub fn increase_price(price: i64, policy: &PricingPolicy) -> i64 {
    let percent = round_cents(price as f64 * policy.percent_increase, policy.rounding);
    let flat = price + policy.dollar_increase;
    percent.max(flat)
}

fn round_cents(value: f64, rounding: PriceRounding) -> i64 {
    match rounding {
        PriceRounding::CeilCent => value.ceil() as i64,
        PriceRounding::NearestCent => value.round() as i64,
    }
}

/// True when `user_id` holds the highest lock-in price. `likes` must be
/// sorted by `like_price` descending.
pub fn holds_top_bid(user_id: &str, likes: &[ActiveLike]) -> bool {
    likes.first().map(|top| top.user_id == user_id).unwrap_or(false)
}

/// Price fields after a liker leaves the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRollback {
    /// Last liker gone: everything resets to the floor.
    ResetToFloor,
    /// Top liker gone: current steps back to their vacated price, last to
    /// the next-highest remaining lock-in.
    StepBack { last_price: i64, current_price: i64 },
    /// A non-top liker leaving does not move prices.
    Unchanged,
}

/// Computes the rollback for `user_id` unliking. `likes` must be sorted by
/// `like_price` descending and include the caller; returns `None` when the
/// caller holds no active like.
pub fn rollback_on_unlike(user_id: &str, likes: &[ActiveLike]) -> Option<PriceRollback> {
    let position = likes.iter().position(|like| like.user_id == user_id)?;
    if likes.len() == 1 {
        return Some(PriceRollback::ResetToFloor);
    }
    if position == 0 {
        let vacated = likes[0].like_price;
        let next_highest = likes[1].like_price;
        return Some(PriceRollback::StepBack {
            last_price: next_highest,
            current_price: vacated,
        });
    }
    Some(PriceRollback::Unchanged)
}

/// Replays the ladder from the floor over the active likes sorted by
/// ascending lock-in price; returns `(last_price, current_price)`. The live
/// item row must always agree with this.
pub fn replay_ladder(min_price: i64, likes: &[ActiveLike], policy: &PricingPolicy) -> (i64, i64) {
    let mut ascending: Vec<&ActiveLike> = likes.iter().collect();
    ascending.sort_by_key(|like| like.like_price);

    let mut last_price = min_price;
    let mut current_price = min_price;
    for like in ascending {
        last_price = like.like_price;
        current_price = increase_price(like.like_price, policy);
    }
    (last_price, current_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PricingPolicy {
        PricingPolicy::default()
    }

    fn like(user: &str, time: i64, price: i64) -> ActiveLike {
        ActiveLike {
            user_id: user.to_string(),
            like_time: time,
            like_price: price,
        }
    }

    #[test]
    fn flat_increase_wins_at_low_prices() {
        // $10.00: 5% is $0.50, flat is $2.50.
        assert_eq!(increase_price(1000, &policy()), 1250);
    }

    #[test]
    fn percent_increase_wins_at_high_prices() {
        // $100.00: 5% is $5.00, flat is $2.50.
        assert_eq!(increase_price(10_000, &policy()), 10_500);
    }

    #[test]
    fn ceiling_rounding_lands_on_whole_cents() {
        // $99.99 * 1.05 = 10498.95 cents; ceiling takes 10499.
        assert_eq!(increase_price(9999, &policy()), 10_499);
        let nearest = PricingPolicy {
            rounding: PriceRounding::NearestCent,
            ..policy()
        };
        assert_eq!(increase_price(9999, &nearest), 10_499);
    }

    #[test]
    fn crossover_between_flat_and_percent_branches() {
        // min $10 -> first like locks 10.00 and prices at 12.50.
        assert_eq!(increase_price(1000, &policy()), 1250);
        // second like locks 12.50 -> max(13.13, 15.00) = 15.00.
        assert_eq!(increase_price(1250, &policy()), 1500);
    }

    #[test]
    fn top_bid_detection() {
        let likes = vec![like("b", 2, 1250), like("a", 1, 1000)];
        assert!(holds_top_bid("b", &likes));
        assert!(!holds_top_bid("a", &likes));
        assert!(!holds_top_bid("a", &[]));
    }

    #[test]
    fn sole_liker_resets_to_floor() {
        let likes = vec![like("a", 1, 1000)];
        assert_eq!(rollback_on_unlike("a", &likes), Some(PriceRollback::ResetToFloor));
    }

    #[test]
    fn top_liker_steps_the_ladder_back() {
        let likes = vec![like("b", 2, 1250), like("a", 1, 1000)];
        assert_eq!(
            rollback_on_unlike("b", &likes),
            Some(PriceRollback::StepBack {
                last_price: 1000,
                current_price: 1250,
            })
        );
    }

    #[test]
    fn non_top_liker_leaves_prices_alone() {
        let likes = vec![like("b", 2, 1250), like("a", 1, 1000)];
        assert_eq!(rollback_on_unlike("a", &likes), Some(PriceRollback::Unchanged));
    }

    #[test]
    fn absent_liker_yields_none() {
        let likes = vec![like("a", 1, 1000)];
        assert_eq!(rollback_on_unlike("z", &likes), None);
    }

    #[test]
    fn replay_reconstructs_the_ladder() {
        let p = policy();
        // A liked at 1000, B at 1250: current = increase(1250) = 1500.
        let likes = vec![like("b", 2, 1250), like("a", 1, 1000)];
        assert_eq!(replay_ladder(1000, &likes, &p), (1250, 1500));
        // Nobody likes: floor.
        assert_eq!(replay_ladder(1000, &[], &p), (1000, 1000));
    }

    #[test]
    fn replay_agrees_with_stepback_after_top_unlike() {
        let p = policy();
        let likes = vec![like("b", 2, 1250), like("a", 1, 1000)];
        let rollback = rollback_on_unlike("b", &likes).unwrap();
        let remaining = vec![like("a", 1, 1000)];
        let (last, current) = replay_ladder(1000, &remaining, &p);
        match rollback {
            PriceRollback::StepBack {
                last_price,
                current_price,
            } => {
                assert_eq!(last_price, last);
                assert_eq!(current_price, current);
            }
            other => panic!("unexpected rollback: {other:?}"),
        }
    }
}
