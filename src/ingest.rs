use chrono::NaiveDateTime;

use crate::error::SchedulerError;
use crate::model::{Difficulty, ReviewItem};
use crate::store::ReviewItemStore;

/// Maps observed accuracy (percent) to a starting difficulty. `None` means
/// no questions were answered for the topic, which defaults to medium.
pub fn difficulty_for_accuracy(accuracy: Option<f32>) -> Difficulty {
    match accuracy {
        Some(a) if a >= 80.0 => Difficulty::Easy,
        Some(a) if a < 60.0 => Difficulty::Hard,
        _ => Difficulty::Medium,
    }
}

/// Registers a studied topic for review. Idempotent: if an item already
/// exists for (subject, topic) it is returned unchanged, so re-studying a
/// topic never rewrites its difficulty or schedule.
pub fn register_studied_topic<S: ReviewItemStore>(
    store: &S,
    subject: &str,
    topic: &str,
    accuracy: Option<f32>,
    now: NaiveDateTime,
) -> Result<ReviewItem, SchedulerError> {
    let subject = subject.trim();
    let topic = topic.trim();
    if subject.is_empty() || topic.is_empty() {
        return Err(SchedulerError::InvalidSubjectOrTopic);
    }

    let difficulty = difficulty_for_accuracy(accuracy);
    store.upsert_if_absent(subject, topic, difficulty, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryReviewItemStore;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
    }

    #[test]
    fn accuracy_thresholds() {
        assert_eq!(difficulty_for_accuracy(Some(95.0)), Difficulty::Easy);
        assert_eq!(difficulty_for_accuracy(Some(80.0)), Difficulty::Easy);
        assert_eq!(difficulty_for_accuracy(Some(79.9)), Difficulty::Medium);
        assert_eq!(difficulty_for_accuracy(Some(60.0)), Difficulty::Medium);
        assert_eq!(difficulty_for_accuracy(Some(59.9)), Difficulty::Hard);
        assert_eq!(difficulty_for_accuracy(Some(0.0)), Difficulty::Hard);
        assert_eq!(difficulty_for_accuracy(None), Difficulty::Medium);
    }

    #[test]
    fn registering_twice_returns_the_same_item() {
        let store = MemoryReviewItemStore::new();
        let first =
            register_studied_topic(&store, "math", "fractions", Some(50.0), now()).unwrap();
        let second =
            register_studied_topic(&store, "math", "fractions", Some(90.0), now()).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.difficulty, Difficulty::Hard);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        let store = MemoryReviewItemStore::new();
        assert!(matches!(
            register_studied_topic(&store, "  ", "fractions", None, now()),
            Err(SchedulerError::InvalidSubjectOrTopic)
        ));
        assert!(matches!(
            register_studied_topic(&store, "math", "", None, now()),
            Err(SchedulerError::InvalidSubjectOrTopic)
        ));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn subject_and_topic_are_trimmed_before_storing() {
        let store = MemoryReviewItemStore::new();
        let item =
            register_studied_topic(&store, " math ", " fractions ", None, now()).unwrap();
        assert_eq!(item.subject, "math");
        assert_eq!(item.topic, "fractions");
    }
}
