use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::error::SchedulerError;
use crate::ingest;
use crate::model::{ReviewItem, ReviewResult, ReviewStats};
use crate::AppEngine;

#[derive(Debug, Deserialize, Validate)]
pub struct IngestRequest {
    #[validate(length(min = 1, message = "Subject must not be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Topic must not be empty"))]
    pub topic: String,
    /// Percent of questions answered correctly; absent when none were asked.
    #[validate(range(min = 0.0, max = 100.0))]
    pub accuracy: Option<f32>,
    /// RFC 3339 override for "now"; defaults to the current time.
    #[serde(rename = "asOf")]
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub result: String,
    #[serde(rename = "asOf")]
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AsOfParams {
    #[serde(rename = "asOf")]
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
    #[serde(rename = "asOf")]
    pub as_of: Option<String>,
    pub days: Option<i64>,
}

/// Parses an optional RFC 3339 `asOf` query value, defaulting to the current
/// time. This is the only place the service reads the clock.
fn resolve_as_of(as_of: Option<&str>) -> Result<NaiveDateTime, SchedulerError> {
    match as_of {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.to_utc().naive_utc())
            .map_err(|_| SchedulerError::InvalidTimestamp(raw.to_string())),
        None => Ok(Utc::now().naive_utc()),
    }
}

pub async fn ingest_review_item(
    State(engine): State<Arc<AppEngine>>,
    Json(payload): Json<IngestRequest>,
) -> Result<Json<ReviewItem>, SchedulerError> {
    payload.validate()?;
    let now = resolve_as_of(payload.as_of.as_deref())?;
    let item = ingest::register_studied_topic(
        engine.store(),
        &payload.subject,
        &payload.topic,
        payload.accuracy,
        now,
    )?;
    Ok(Json(item))
}

pub async fn due_reviews(
    State(engine): State<Arc<AppEngine>>,
    Query(params): Query<AsOfParams>,
) -> Result<Json<Vec<ReviewItem>>, SchedulerError> {
    let now = resolve_as_of(params.as_of.as_deref())?;
    Ok(Json(engine.due_reviews(now)?))
}

pub async fn upcoming_reviews(
    State(engine): State<Arc<AppEngine>>,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<Vec<ReviewItem>>, SchedulerError> {
    let now = resolve_as_of(params.as_of.as_deref())?;
    let days = params.days.unwrap_or(7);
    Ok(Json(engine.upcoming_reviews(now, days)?))
}

pub async fn complete_review(
    State(engine): State<Arc<AppEngine>>,
    Path(id): Path<i32>,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<ReviewItem>, SchedulerError> {
    // Reject bad results before touching storage.
    let result: ReviewResult = payload.result.parse()?;
    let now = resolve_as_of(payload.as_of.as_deref())?;
    Ok(Json(engine.complete_review(id, result, now)?))
}

pub async fn review_stats(
    State(engine): State<Arc<AppEngine>>,
    Query(params): Query<AsOfParams>,
) -> Result<Json<ReviewStats>, SchedulerError> {
    let now = resolve_as_of(params.as_of.as_deref())?;
    Ok(Json(engine.review_stats(now)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_of_parses_rfc3339_and_rejects_garbage() {
        let ts = resolve_as_of(Some("2025-06-01T10:00:00Z")).unwrap();
        assert_eq!(ts.to_string(), "2025-06-01 10:00:00");

        assert!(matches!(
            resolve_as_of(Some("next tuesday")),
            Err(SchedulerError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn as_of_honors_offsets() {
        let ts = resolve_as_of(Some("2025-06-01T10:00:00+02:00")).unwrap();
        assert_eq!(ts.to_string(), "2025-06-01 08:00:00");
    }

    #[tokio::test]
    async fn post_handlers_honor_as_of() {
        use crate::engine::ReviewSessionEngine;
        use crate::store::SqliteReviewItemStore;
        use diesel::r2d2::{ConnectionManager, Pool};
        use diesel::SqliteConnection;

        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder().max_size(1).build(manager).unwrap();
        let store = SqliteReviewItemStore::new(pool);
        store.init_schema().unwrap();
        let engine = Arc::new(ReviewSessionEngine::new(store));

        let studied = resolve_as_of(Some("2025-06-01T10:00:00Z")).unwrap();
        let Json(item) = ingest_review_item(
            State(Arc::clone(&engine)),
            Json(IngestRequest {
                subject: "math".into(),
                topic: "fractions".into(),
                accuracy: Some(70.0),
                as_of: Some("2025-06-01T10:00:00Z".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(item.studied_at, studied);
        assert_eq!(item.next_review_date, studied + chrono::Duration::days(1));

        let Json(updated) = complete_review(
            State(engine),
            Path(item.id),
            Json(CompleteRequest {
                result: "good".into(),
                as_of: Some("2025-06-02T10:00:00Z".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.review_level, 1);
        assert_eq!(
            updated.next_review_date,
            resolve_as_of(Some("2025-06-03T10:00:00Z")).unwrap()
        );
    }
}
