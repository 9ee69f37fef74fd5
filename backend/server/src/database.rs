//! # Store
//!
//! Candidates and their ratings.
//!
//! ## Requirements
//!
//! - Small static table, tens of rows, seeded once
//! - Only the rating changes after seeding
//! - Concurrent votes on the same person must not lose updates
//!
//! ## Implementation
//!
//! - `PeopleStore` trait so handlers do not care where rows live
//! - `RedisStore` for deployments, `MemoryStore` for local runs and tests
//! - Rating writes are compare-and-set: a vote reads both ratings, computes the
//!   update, and the write only lands if neither rating moved in between.
//!   `vote::record_vote` retries on a stale read.
//!
//! Select the backend with `STORE_URL`: `memory://` or a `redis://` URL.
use std::sync::Arc;

use async_trait::async_trait;
use roster::{Gender, SeedPerson};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{memory::MemoryStore, redis_store::RedisStore};

pub const MEMORY_URL: &str = "memory://";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub gender: Option<Gender>,
    pub rating: i32,
}

/// One side of a rating write: only applies while the stored rating is `from`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatingChange {
    pub id: u32,
    pub from: i32,
    pub to: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatingSwap {
    pub winner: RatingChange,
    pub loser: RatingChange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    Applied,
    Stale,
    Missing,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Malformed record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("Inconsistent store: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait PeopleStore: Send + Sync {
    async fn count(&self) -> Result<usize, StoreError>;

    /// Adds a person at the default rating and returns the stored row.
    async fn insert(&self, person: &SeedPerson) -> Result<Person, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;

    async fn get(&self, id: u32) -> Result<Option<Person>, StoreError>;

    /// Ordered by id. `None` means every gender, including untagged people.
    async fn list(&self, gender: Option<Gender>) -> Result<Vec<Person>, StoreError>;

    async fn swap_ratings(&self, swap: &RatingSwap) -> Result<SwapOutcome, StoreError>;

    /// Highest rating first, ties broken by id.
    async fn ranking(&self, gender: Option<Gender>) -> Result<Vec<Person>, StoreError> {
        let mut people = self.list(gender).await?;
        people.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));

        Ok(people)
    }
}

pub async fn open_store(store_url: &str) -> Result<Arc<dyn PeopleStore>, StoreError> {
    if store_url == MEMORY_URL {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::default()));
    }

    info!("Connecting to Redis");
    Ok(Arc::new(RedisStore::connect(store_url).await?))
}

/// Returns how many people were inserted, zero when the store already had rows.
pub async fn seed_if_empty(
    store: &dyn PeopleStore,
    people: &[SeedPerson],
) -> Result<usize, StoreError> {
    let existing = store.count().await?;

    if existing > 0 {
        info!("Store already holds {existing} people, skipping seed");
        return Ok(0);
    }

    for person in people {
        store.insert(person).await?;
    }

    info!("Store seeded with {} people", people.len());
    Ok(people.len())
}

pub(crate) fn matches_gender(person: &Person, gender: Option<Gender>) -> bool {
    gender.is_none() || person.gender == gender
}

#[cfg(test)]
mod tests {
    use roster::default_roster;

    use super::*;
    use crate::rating::DEFAULT_RATING;

    fn seed(name: &str, gender: Option<Gender>) -> SeedPerson {
        SeedPerson {
            name: name.to_string(),
            image: format!("{}.jpg", name.to_lowercase()),
            gender,
        }
    }

    #[tokio::test]
    async fn test_seed_if_empty() {
        let store = MemoryStore::default();

        assert_eq!(seed_if_empty(&store, &default_roster()).await.unwrap(), 48);
        assert_eq!(seed_if_empty(&store, &default_roster()).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 48);

        let first = store.get(1).await.unwrap().unwrap();
        assert_eq!(first.name, "ALEXIA");
        assert_eq!(first.rating, DEFAULT_RATING);
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(MEMORY_URL).await.unwrap();

        store.insert(&seed("Ana", None)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ranking_order() {
        let store = MemoryStore::default();
        for name in ["Ana", "Eva", "Ivy"] {
            store.insert(&seed(name, Some(Gender::Female))).await.unwrap();
        }
        store.insert(&seed("Leo", Some(Gender::Male))).await.unwrap();

        let swap = RatingSwap {
            winner: RatingChange { id: 3, from: 1400, to: 1416 },
            loser: RatingChange { id: 1, from: 1400, to: 1384 },
        };
        assert_eq!(store.swap_ratings(&swap).await.unwrap(), SwapOutcome::Applied);

        let ranking = store.ranking(Some(Gender::Female)).await.unwrap();
        let ids: Vec<u32> = ranking.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let everyone = store.ranking(None).await.unwrap();
        let ids: Vec<u32> = everyone.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);

        let men = store.ranking(Some(Gender::Male)).await.unwrap();
        assert_eq!(men.len(), 1);
        assert_eq!(men[0].name, "Leo");
    }
}
