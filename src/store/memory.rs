use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, NaiveDateTime};

use crate::error::SchedulerError;
use crate::model::{Difficulty, ReviewItem};
use crate::srs;
use crate::store::ReviewItemStore;

/// Reference store backed by a Vec behind one Mutex. The Vec keeps creation
/// order for `list_all`, and the single lock serializes read-modify-write
/// cycles per item. Used by tests and small single-process deployments.
#[derive(Default)]
pub struct MemoryReviewItemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    items: Vec<ReviewItem>,
    next_id: i32,
}

impl MemoryReviewItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock means another thread panicked while holding it; every
    /// mutation here is a single assignment, so the data is still consistent
    /// and the store keeps serving.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReviewItemStore for MemoryReviewItemStore {
    fn upsert_if_absent(
        &self,
        subject: &str,
        topic: &str,
        difficulty: Difficulty,
        now: NaiveDateTime,
    ) -> Result<ReviewItem, SchedulerError> {
        let mut inner = self.lock();

        if let Some(existing) = inner
            .items
            .iter()
            .find(|item| item.subject == subject && item.topic == topic)
        {
            return Ok(existing.clone());
        }

        inner.next_id += 1;
        let interval = srs::initial_interval(difficulty);
        let item = ReviewItem {
            id: inner.next_id,
            subject: subject.to_string(),
            topic: topic.to_string(),
            studied_at: now,
            difficulty,
            review_level: 0,
            interval,
            next_review_date: now + Duration::days(interval as i64),
            ease_factor: srs::INITIAL_EASE_FACTOR,
            review_count: 0,
            last_review_result: None,
        };
        inner.items.push(item.clone());
        Ok(item)
    }

    fn get(&self, id: i32) -> Result<ReviewItem, SchedulerError> {
        let inner = self.lock();
        inner
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(SchedulerError::NotFound)
    }

    fn list_all(&self) -> Result<Vec<ReviewItem>, SchedulerError> {
        let inner = self.lock();
        Ok(inner.items.clone())
    }

    fn save(&self, item: &ReviewItem) -> Result<(), SchedulerError> {
        let mut inner = self.lock();
        match inner.items.iter_mut().find(|stored| stored.id == item.id) {
            Some(stored) => {
                *stored = item.clone();
                Ok(())
            }
            None => Err(SchedulerError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn creates_with_initial_state() {
        let store = MemoryReviewItemStore::new();
        let item = store
            .upsert_if_absent("math", "fractions", Difficulty::Easy, at(1))
            .unwrap();

        assert_eq!(item.review_level, 0);
        assert_eq!(item.review_count, 0);
        assert_eq!(item.interval, 4);
        assert_eq!(item.next_review_date, at(1) + Duration::days(4));
        assert!((item.ease_factor - 2.5).abs() < 1e-6);
        assert!(item.last_review_result.is_none());
    }

    #[test]
    fn upsert_is_idempotent_per_subject_topic() {
        let store = MemoryReviewItemStore::new();
        let first = store
            .upsert_if_absent("math", "fractions", Difficulty::Hard, at(1))
            .unwrap();
        let second = store
            .upsert_if_absent("math", "fractions", Difficulty::Easy, at(5))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.difficulty, Difficulty::Hard);
        assert_eq!(second.studied_at, at(1));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn list_all_keeps_creation_order() {
        let store = MemoryReviewItemStore::new();
        store
            .upsert_if_absent("math", "fractions", Difficulty::Medium, at(1))
            .unwrap();
        store
            .upsert_if_absent("history", "rome", Difficulty::Medium, at(2))
            .unwrap();
        store
            .upsert_if_absent("math", "algebra", Difficulty::Medium, at(3))
            .unwrap();

        let topics: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|item| item.topic)
            .collect();
        assert_eq!(topics, vec!["fractions", "rome", "algebra"]);
    }

    #[test]
    fn keeps_serving_after_a_thread_panics_with_the_lock() {
        let store = std::sync::Arc::new(MemoryReviewItemStore::new());
        store
            .upsert_if_absent("math", "fractions", Difficulty::Medium, at(1))
            .unwrap();

        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("holder goes down mid-call");
        })
        .join();

        assert_eq!(store.list_all().unwrap().len(), 1);
        assert!(store.get(1).is_ok());
        let item = store
            .upsert_if_absent("history", "rome", Difficulty::Easy, at(2))
            .unwrap();
        store.save(&item).unwrap();
    }

    #[test]
    fn save_unknown_id_is_not_found() {
        let store = MemoryReviewItemStore::new();
        let mut item = store
            .upsert_if_absent("math", "fractions", Difficulty::Medium, at(1))
            .unwrap();
        item.id = 999;

        assert!(matches!(
            store.save(&item),
            Err(SchedulerError::NotFound)
        ));
    }
}
