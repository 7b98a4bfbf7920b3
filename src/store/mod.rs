use chrono::NaiveDateTime;

use crate::error::SchedulerError;
use crate::model::{Difficulty, ReviewItem};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryReviewItemStore;
pub use sqlite::SqliteReviewItemStore;

/// Durable keyed storage for review items. (subject, topic) is the natural
/// key; at most one item may exist per pair. `list_all` iterates in creation
/// order, and callers rely on that order staying stable.
pub trait ReviewItemStore: Send + Sync {
    /// Creates an item with initial scheduling state if none exists for
    /// (subject, topic); returns the existing item unchanged otherwise.
    fn upsert_if_absent(
        &self,
        subject: &str,
        topic: &str,
        difficulty: Difficulty,
        now: NaiveDateTime,
    ) -> Result<ReviewItem, SchedulerError>;

    fn get(&self, id: i32) -> Result<ReviewItem, SchedulerError>;

    fn list_all(&self) -> Result<Vec<ReviewItem>, SchedulerError>;

    /// Replaces the stored record for `item.id`; `NotFound` if the id does
    /// not exist. Last write wins per id.
    fn save(&self, item: &ReviewItem) -> Result<(), SchedulerError>;
}
