use std::collections::BTreeMap;

use async_trait::async_trait;
use roster::{Gender, SeedPerson};
use tokio::sync::RwLock;

use crate::{
    database::{PeopleStore, Person, RatingSwap, StoreError, SwapOutcome, matches_gender},
    rating::DEFAULT_RATING,
};

/// Process-local store. Rows live as long as the server does.
#[derive(Default)]
pub struct MemoryStore {
    people: RwLock<BTreeMap<u32, Person>>,
}

#[async_trait]
impl PeopleStore for MemoryStore {
    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.people.read().await.len())
    }

    async fn insert(&self, person: &SeedPerson) -> Result<Person, StoreError> {
        let mut people = self.people.write().await;
        let id = people.keys().next_back().map_or(1, |last| last + 1);

        let person = Person {
            id,
            name: person.name.clone(),
            image: person.image.clone(),
            gender: person.gender,
            rating: DEFAULT_RATING,
        };
        people.insert(id, person.clone());

        Ok(person)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.people.write().await.clear();
        Ok(())
    }

    async fn get(&self, id: u32) -> Result<Option<Person>, StoreError> {
        Ok(self.people.read().await.get(&id).cloned())
    }

    async fn list(&self, gender: Option<Gender>) -> Result<Vec<Person>, StoreError> {
        Ok(self
            .people
            .read()
            .await
            .values()
            .filter(|person| matches_gender(person, gender))
            .cloned()
            .collect())
    }

    async fn swap_ratings(&self, swap: &RatingSwap) -> Result<SwapOutcome, StoreError> {
        let mut people = self.people.write().await;

        let (Some(winner), Some(loser)) = (
            people.get(&swap.winner.id).map(|p| p.rating),
            people.get(&swap.loser.id).map(|p| p.rating),
        ) else {
            return Ok(SwapOutcome::Missing);
        };

        if winner != swap.winner.from || loser != swap.loser.from {
            return Ok(SwapOutcome::Stale);
        }

        for change in [swap.winner, swap.loser] {
            if let Some(person) = people.get_mut(&change.id) {
                person.rating = change.to;
            }
        }

        Ok(SwapOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::RatingChange;

    async fn store_with(count: usize) -> MemoryStore {
        let store = MemoryStore::default();
        for index in 0..count {
            store
                .insert(&SeedPerson {
                    name: format!("Person {index}"),
                    image: format!("p{index}.jpg"),
                    gender: None,
                })
                .await
                .unwrap();
        }
        store
    }

    fn swap(from: (i32, i32), to: (i32, i32)) -> RatingSwap {
        RatingSwap {
            winner: RatingChange { id: 1, from: from.0, to: to.0 },
            loser: RatingChange { id: 2, from: from.1, to: to.1 },
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = store_with(3).await;
        let ids: Vec<u32> = store.list(None).await.unwrap().iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_swap_applies() {
        let store = store_with(2).await;

        let outcome = store.swap_ratings(&swap((1400, 1400), (1416, 1384))).await.unwrap();

        assert_eq!(outcome, SwapOutcome::Applied);
        assert_eq!(store.get(1).await.unwrap().unwrap().rating, 1416);
        assert_eq!(store.get(2).await.unwrap().unwrap().rating, 1384);
    }

    #[tokio::test]
    async fn test_stale_swap_is_rejected() {
        let store = store_with(2).await;
        store.swap_ratings(&swap((1400, 1400), (1416, 1384))).await.unwrap();

        let outcome = store.swap_ratings(&swap((1400, 1400), (1416, 1384))).await.unwrap();

        assert_eq!(outcome, SwapOutcome::Stale);
        assert_eq!(store.get(1).await.unwrap().unwrap().rating, 1416);
    }

    #[tokio::test]
    async fn test_missing_person() {
        let store = store_with(1).await;

        let outcome = store.swap_ratings(&swap((1400, 1400), (1416, 1384))).await.unwrap();

        assert_eq!(outcome, SwapOutcome::Missing);
        assert_eq!(store.get(1).await.unwrap().unwrap().rating, 1400);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = store_with(2).await;
        store.clear().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.get(1).await.unwrap().is_none());
    }
}
