//! # Redis
//!
//! RAM database holding the roster and ratings.
//!
//! ## Layout
//!
//! - `people`: hash of id to JSON record (name, image, gender)
//! - `ratings`: sorted set of id scored by rating
//! - `people:next_id`: counter handing out ids on insert
//!
//! Ratings live only in the sorted set so a vote touches a single key. The
//! compare-and-set runs as a Lua script, which Redis executes atomically.
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use roster::{Gender, SeedPerson};
use serde::{Deserialize, Serialize};

use crate::{
    database::{PeopleStore, Person, RatingSwap, StoreError, SwapOutcome, matches_gender},
    rating::DEFAULT_RATING,
};

const PEOPLE_KEY: &str = "people";
const RATINGS_KEY: &str = "ratings";
const NEXT_ID_KEY: &str = "people:next_id";

// Returns 1 when applied, 0 when either rating moved, -1 when either id is unknown.
const SWAP_SCRIPT: &str = r"
local winner = redis.call('ZSCORE', KEYS[1], ARGV[1])
local loser = redis.call('ZSCORE', KEYS[1], ARGV[2])
if (not winner) or (not loser) then
    return -1
end
if tonumber(winner) ~= tonumber(ARGV[3]) or tonumber(loser) ~= tonumber(ARGV[4]) then
    return 0
end
redis.call('ZADD', KEYS[1], ARGV[5], ARGV[1], ARGV[6], ARGV[2])
return 1
";

#[derive(Serialize, Deserialize)]
struct PersonRecord {
    id: u32,
    name: String,
    image: String,
    #[serde(default)]
    gender: Option<Gender>,
}

impl PersonRecord {
    fn with_rating(self, rating: i32) -> Person {
        Person {
            id: self.id,
            name: self.name,
            image: self.image,
            gender: self.gender,
            rating,
        }
    }
}

pub struct RedisStore {
    connection: ConnectionManager,
    swap_script: Script,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(100));

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self {
            connection,
            swap_script: Script::new(SWAP_SCRIPT),
        })
    }
}

fn rating_from_score(id: u32, score: Option<f64>) -> Result<i32, StoreError> {
    score
        .map(|score| score.round() as i32)
        .ok_or_else(|| StoreError::Corrupt(format!("person {id} has no rating")))
}

#[async_trait]
impl PeopleStore for RedisStore {
    async fn count(&self) -> Result<usize, StoreError> {
        let mut connection = self.connection.clone();
        let count: usize = connection.hlen(PEOPLE_KEY).await?;

        Ok(count)
    }

    async fn insert(&self, person: &SeedPerson) -> Result<Person, StoreError> {
        let mut connection = self.connection.clone();
        let id: u32 = connection.incr(NEXT_ID_KEY, 1).await?;

        let record = PersonRecord {
            id,
            name: person.name.clone(),
            image: person.image.clone(),
            gender: person.gender,
        };
        let json = serde_json::to_string(&record)?;

        redis::pipe()
            .atomic()
            .hset(PEOPLE_KEY, id, json)
            .ignore()
            .zadd(RATINGS_KEY, id, DEFAULT_RATING)
            .ignore()
            .query_async::<()>(&mut connection)
            .await?;

        Ok(record.with_rating(DEFAULT_RATING))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection
            .del(&[PEOPLE_KEY, RATINGS_KEY, NEXT_ID_KEY])
            .await?;

        Ok(())
    }

    async fn get(&self, id: u32) -> Result<Option<Person>, StoreError> {
        let mut connection = self.connection.clone();

        let record: Option<String> = connection.hget(PEOPLE_KEY, id).await?;
        let Some(record) = record else {
            return Ok(None);
        };
        let record: PersonRecord = serde_json::from_str(&record)?;

        let score: Option<f64> = connection.zscore(RATINGS_KEY, id).await?;

        Ok(Some(record.with_rating(rating_from_score(id, score)?)))
    }

    async fn list(&self, gender: Option<Gender>) -> Result<Vec<Person>, StoreError> {
        let mut connection = self.connection.clone();

        let records: HashMap<u32, String> = connection.hgetall(PEOPLE_KEY).await?;
        let scores: Vec<(u32, f64)> = connection.zrange_withscores(RATINGS_KEY, 0, -1).await?;
        let scores: HashMap<u32, f64> = scores.into_iter().collect();

        let mut people = Vec::with_capacity(records.len());
        for (id, record) in records {
            let record: PersonRecord = serde_json::from_str(&record)?;
            let person = record.with_rating(rating_from_score(id, scores.get(&id).copied())?);

            if matches_gender(&person, gender) {
                people.push(person);
            }
        }
        people.sort_by_key(|person| person.id);

        Ok(people)
    }

    async fn swap_ratings(&self, swap: &RatingSwap) -> Result<SwapOutcome, StoreError> {
        let mut connection = self.connection.clone();

        let result: i32 = self
            .swap_script
            .key(RATINGS_KEY)
            .arg(swap.winner.id)
            .arg(swap.loser.id)
            .arg(swap.winner.from)
            .arg(swap.loser.from)
            .arg(swap.winner.to)
            .arg(swap.loser.to)
            .invoke_async(&mut connection)
            .await?;

        match result {
            1 => Ok(SwapOutcome::Applied),
            0 => Ok(SwapOutcome::Stale),
            -1 => Ok(SwapOutcome::Missing),
            other => Err(StoreError::Corrupt(format!(
                "unexpected swap script result {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::RatingChange;

    // Clears the roster keys, so point it at a scratch database.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string())
    }

    fn swap(from: (i32, i32), to: (i32, i32), ids: (u32, u32)) -> RatingSwap {
        RatingSwap {
            winner: RatingChange { id: ids.0, from: from.0, to: to.0 },
            loser: RatingChange { id: ids.1, from: from.1, to: to.1 },
        }
    }

    #[tokio::test]
    #[ignore = "needs a running Redis, set REDIS_URL"]
    async fn test_swap_script_against_redis() {
        let store = RedisStore::connect(&redis_url()).await.unwrap();
        store.clear().await.unwrap();

        for name in ["Ana", "Eva"] {
            store
                .insert(&SeedPerson {
                    name: name.to_string(),
                    image: format!("{name}.jpg"),
                    gender: Some(Gender::Female),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 2);

        let applied = swap((1400, 1400), (1416, 1384), (1, 2));
        assert_eq!(store.swap_ratings(&applied).await.unwrap(), SwapOutcome::Applied);
        assert_eq!(store.get(1).await.unwrap().unwrap().rating, 1416);
        assert_eq!(store.get(2).await.unwrap().unwrap().rating, 1384);

        assert_eq!(store.swap_ratings(&applied).await.unwrap(), SwapOutcome::Stale);
        assert_eq!(store.get(1).await.unwrap().unwrap().rating, 1416);

        let missing = swap((1416, 1400), (1430, 1386), (1, 99));
        assert_eq!(store.swap_ratings(&missing).await.unwrap(), SwapOutcome::Missing);
        assert_eq!(store.get(1).await.unwrap().unwrap().rating, 1416);

        let ranking = store.ranking(Some(Gender::Female)).await.unwrap();
        let ids: Vec<u32> = ranking.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
