use tracing::{debug, info, warn};

use crate::{
    database::{PeopleStore, RatingChange, RatingSwap, StoreError, SwapOutcome},
    rating::update_ratings,
};

pub const MAX_VOTE_ATTEMPTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded {
        winner: RatingChange,
        loser: RatingChange,
    },
    /// Unknown ids or a self-vote. Nothing changes.
    Ignored,
    /// Every attempt raced with another vote on the same people.
    Contended,
}

pub async fn record_vote(
    store: &dyn PeopleStore,
    winner_id: u32,
    loser_id: u32,
) -> Result<VoteOutcome, StoreError> {
    if winner_id == loser_id {
        return Ok(VoteOutcome::Ignored);
    }

    for attempt in 1..=MAX_VOTE_ATTEMPTS {
        let (Some(winner), Some(loser)) = (store.get(winner_id).await?, store.get(loser_id).await?)
        else {
            return Ok(VoteOutcome::Ignored);
        };

        let (winner_rating, loser_rating) = update_ratings(winner.rating, loser.rating);
        let swap = RatingSwap {
            winner: RatingChange {
                id: winner.id,
                from: winner.rating,
                to: winner_rating,
            },
            loser: RatingChange {
                id: loser.id,
                from: loser.rating,
                to: loser_rating,
            },
        };

        match store.swap_ratings(&swap).await? {
            SwapOutcome::Applied => {
                info!(
                    "{} beat {}: {} -> {}, {} -> {}",
                    winner.name, loser.name, winner.rating, winner_rating, loser.rating, loser_rating
                );

                return Ok(VoteOutcome::Recorded {
                    winner: swap.winner,
                    loser: swap.loser,
                });
            }
            SwapOutcome::Missing => return Ok(VoteOutcome::Ignored),
            SwapOutcome::Stale => {
                debug!("Stale ratings for {winner_id} vs {loser_id}, attempt {attempt}");
                tokio::task::yield_now().await;
            }
        }
    }

    warn!("Dropping vote {winner_id} vs {loser_id} after {MAX_VOTE_ATTEMPTS} attempts");
    Ok(VoteOutcome::Contended)
}
