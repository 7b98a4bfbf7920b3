use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;

use crate::error::SchedulerError;
use crate::model::{Difficulty, ReviewItem, ReviewItemRow};
use crate::schema::review_items;
use crate::srs;
use crate::store::ReviewItemStore;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// SQLite-backed store. SQLite serializes writers, which together with
/// last-write-wins per id covers the concurrency contract.
pub struct SqliteReviewItemStore {
    pool: DbPool,
}

impl SqliteReviewItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Creates the `review_items` table on first run. The UNIQUE constraint
    /// backs the (subject, topic) natural key.
    pub fn init_schema(&self) -> Result<(), SchedulerError> {
        let mut conn = self.pool.get()?;
        sql_query(
            "CREATE TABLE IF NOT EXISTS review_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject TEXT NOT NULL,
                topic TEXT NOT NULL,
                studied_at TIMESTAMP NOT NULL,
                difficulty TEXT NOT NULL,
                review_level INTEGER NOT NULL DEFAULT 0,
                interval INTEGER NOT NULL DEFAULT 1,
                next_review_date TIMESTAMP NOT NULL,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                review_count INTEGER NOT NULL DEFAULT 0,
                last_review_result TEXT,
                UNIQUE (subject, topic)
            )",
        )
        .execute(&mut conn)?;
        Ok(())
    }

    fn find_by_key(
        conn: &mut SqliteConnection,
        subject: &str,
        topic: &str,
    ) -> Result<Option<ReviewItem>, SchedulerError> {
        let row = review_items::table
            .filter(review_items::subject.eq(subject))
            .filter(review_items::topic.eq(topic))
            .first::<ReviewItemRow>(conn)
            .optional()?;

        row.map(ReviewItem::try_from).transpose()
    }
}

impl ReviewItemStore for SqliteReviewItemStore {
    fn upsert_if_absent(
        &self,
        subject: &str,
        topic: &str,
        difficulty: Difficulty,
        now: NaiveDateTime,
    ) -> Result<ReviewItem, SchedulerError> {
        let mut conn = self.pool.get()?;

        let interval = srs::initial_interval(difficulty);
        let inserted = diesel::insert_into(review_items::table)
            .values((
                review_items::subject.eq(subject),
                review_items::topic.eq(topic),
                review_items::studied_at.eq(now),
                review_items::difficulty.eq(difficulty.as_str()),
                review_items::review_level.eq(0),
                review_items::interval.eq(interval),
                review_items::next_review_date.eq(now + Duration::days(interval as i64)),
                review_items::ease_factor.eq(srs::INITIAL_EASE_FACTOR),
                review_items::review_count.eq(0),
            ))
            .on_conflict((review_items::subject, review_items::topic))
            .do_nothing()
            .execute(&mut conn)?;

        if inserted > 0 {
            log::info!("Registered review item for {}/{}", subject, topic);
        }

        Self::find_by_key(&mut conn, subject, topic)?.ok_or(SchedulerError::NotFound)
    }

    fn get(&self, id: i32) -> Result<ReviewItem, SchedulerError> {
        let mut conn = self.pool.get()?;
        let row = review_items::table
            .filter(review_items::id.eq(id))
            .first::<ReviewItemRow>(&mut conn)
            .optional()?
            .ok_or(SchedulerError::NotFound)?;

        ReviewItem::try_from(row)
    }

    fn list_all(&self) -> Result<Vec<ReviewItem>, SchedulerError> {
        let mut conn = self.pool.get()?;
        review_items::table
            .order_by(review_items::id.asc())
            .load::<ReviewItemRow>(&mut conn)?
            .into_iter()
            .map(ReviewItem::try_from)
            .collect()
    }

    fn save(&self, item: &ReviewItem) -> Result<(), SchedulerError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(review_items::table.filter(review_items::id.eq(item.id)))
            .set((
                review_items::review_level.eq(item.review_level),
                review_items::interval.eq(item.interval),
                review_items::next_review_date.eq(item.next_review_date),
                review_items::ease_factor.eq(item.ease_factor),
                review_items::review_count.eq(item.review_count),
                review_items::last_review_result
                    .eq(item.last_review_result.map(|r| r.as_str())),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(SchedulerError::NotFound);
        }
        Ok(())
    }
}
