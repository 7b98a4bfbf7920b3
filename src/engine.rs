use chrono::{Duration, NaiveDateTime};

use crate::error::SchedulerError;
use crate::model::{ReviewItem, ReviewResult, ReviewStats};
use crate::srs;
use crate::store::ReviewItemStore;

/// Days of lookahead used by the stats summary.
const STATS_UPCOMING_DAYS: i64 = 7;

/// Orchestrates due/upcoming queries and review completion against a store.
/// `now` is always passed in by the caller; the engine never reads the clock.
pub struct ReviewSessionEngine<S> {
    store: S,
}

impl<S: ReviewItemStore> ReviewSessionEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Items whose next review is at or before `now`, in store order.
    pub fn due_reviews(&self, now: NaiveDateTime) -> Result<Vec<ReviewItem>, SchedulerError> {
        let items = self.store.list_all()?;
        Ok(items
            .into_iter()
            .filter(|item| item.next_review_date <= now)
            .collect())
    }

    /// Items due strictly after `now` and within `days` days (inclusive).
    /// Already-due items are excluded so due and upcoming never overlap.
    pub fn upcoming_reviews(
        &self,
        now: NaiveDateTime,
        days: i64,
    ) -> Result<Vec<ReviewItem>, SchedulerError> {
        let horizon = now + Duration::days(days);
        let items = self.store.list_all()?;
        Ok(items
            .into_iter()
            .filter(|item| item.next_review_date > now && item.next_review_date <= horizon)
            .collect())
    }

    /// Applies a review result: reschedules via the SM-2 rules and persists
    /// the updated item. The only path that mutates scheduling state.
    /// "again" keeps the review level where it is; everything else advances.
    pub fn complete_review(
        &self,
        id: i32,
        result: ReviewResult,
        now: NaiveDateTime,
    ) -> Result<ReviewItem, SchedulerError> {
        let item = self.store.get(id)?;

        let (interval, ease_factor) =
            srs::next_schedule(item.review_level, result, item.interval, item.ease_factor);
        let review_level = if result == ReviewResult::Again {
            item.review_level
        } else {
            item.review_level + 1
        };

        let updated = ReviewItem {
            review_level,
            interval,
            next_review_date: now + Duration::days(interval as i64),
            ease_factor,
            review_count: item.review_count + 1,
            last_review_result: Some(result),
            ..item
        };

        self.store.save(&updated)?;
        log::debug!(
            "Completed review {} as {}: next in {} days",
            updated.id,
            result,
            updated.interval
        );
        Ok(updated)
    }

    /// Summary counts derived from the store; `completed` counts items that
    /// have been reviewed at least once.
    pub fn review_stats(&self, now: NaiveDateTime) -> Result<ReviewStats, SchedulerError> {
        let items = self.store.list_all()?;
        let due = self.due_reviews(now)?.len();
        let upcoming = self.upcoming_reviews(now, STATS_UPCOMING_DAYS)?.len();
        let completed = items.iter().filter(|item| item.review_count > 0).count();

        Ok(ReviewStats {
            total: items.len(),
            due,
            upcoming,
            completed,
        })
    }
}
