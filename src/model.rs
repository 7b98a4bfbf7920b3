use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// How hard a topic looked when it was first studied. Fixed at creation;
/// reviews never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(SchedulerError::InvalidDifficulty(other.to_string())),
        }
    }
}

/// Self-reported recall quality for a completed review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewResult {
    Again,
    Hard,
    Good,
    Easy,
}

impl ReviewResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewResult::Again => "again",
            ReviewResult::Hard => "hard",
            ReviewResult::Good => "good",
            ReviewResult::Easy => "easy",
        }
    }
}

impl fmt::Display for ReviewResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewResult {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "again" => Ok(ReviewResult::Again),
            "hard" => Ok(ReviewResult::Hard),
            "good" => Ok(ReviewResult::Good),
            "easy" => Ok(ReviewResult::Easy),
            other => Err(SchedulerError::InvalidResult(other.to_string())),
        }
    }
}

/// Scheduling state for one (subject, topic) pair. All timestamps are UTC.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    pub id: i32,
    pub subject: String,
    pub topic: String,
    pub studied_at: NaiveDateTime,
    pub difficulty: Difficulty,
    pub review_level: i32,
    pub interval: i32,
    pub next_review_date: NaiveDateTime,
    pub ease_factor: f32,
    pub review_count: i32,
    pub last_review_result: Option<ReviewResult>,
}

/// Aggregate counts derived from the store; holds no state of its own.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStats {
    pub total: usize,
    pub due: usize,
    pub upcoming: usize,
    pub completed: usize,
}

/// Raw `review_items` row; enums live as lowercase text in SQLite.
#[derive(Queryable, Debug)]
pub struct ReviewItemRow {
    pub id: i32,
    pub subject: String,
    pub topic: String,
    pub studied_at: NaiveDateTime,
    pub difficulty: String,
    pub review_level: i32,
    pub interval: i32,
    pub next_review_date: NaiveDateTime,
    pub ease_factor: f32,
    pub review_count: i32,
    pub last_review_result: Option<String>,
}

impl TryFrom<ReviewItemRow> for ReviewItem {
    type Error = SchedulerError;

    fn try_from(row: ReviewItemRow) -> Result<Self, Self::Error> {
        let difficulty = row.difficulty.parse()?;
        let last_review_result = match row.last_review_result {
            Some(s) => Some(s.parse()?),
            None => None,
        };

        Ok(ReviewItem {
            id: row.id,
            subject: row.subject,
            topic: row.topic,
            studied_at: row.studied_at,
            difficulty,
            review_level: row.review_level,
            interval: row.interval,
            next_review_date: row.next_review_date,
            ease_factor: row.ease_factor,
            review_count: row.review_count,
            last_review_result,
        })
    }
}
