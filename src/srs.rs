use crate::model::{Difficulty, ReviewResult};

/// Ease factor assigned to every item at creation.
pub const INITIAL_EASE_FACTOR: f32 = 2.5;

/// SM-2 lower bound; the ease factor never decays below this.
pub const MIN_EASE_FACTOR: f32 = 1.3;

/// Upper bound on any computed interval, about a century. Unbounded
/// multiplicative growth would overflow timestamp arithmetic.
pub const MAX_INTERVAL_DAYS: i32 = 36_500;

/// First interval (days) for a freshly studied topic.
pub fn initial_interval(difficulty: Difficulty) -> i32 {
    match difficulty {
        Difficulty::Easy => 4,
        Difficulty::Medium | Difficulty::Hard => 1,
    }
}

/// Computes the next interval (days) and ease factor from the current
/// scheduling state and a review result. SM-2 variant: early levels use
/// fixed intervals, later levels multiply by the ease factor.
///
/// Pure and clock-free; callers turn the interval into a timestamp.
pub fn next_schedule(
    review_level: i32,
    result: ReviewResult,
    current_interval: i32,
    ease_factor: f32,
) -> (i32, f32) {
    let ease = ease_factor.max(MIN_EASE_FACTOR);
    let interval = current_interval.max(1);

    let (next, next_ease) = match result {
        ReviewResult::Again => {
            // Forgotten: back to daily review, ease takes the biggest hit.
            (1, (ease - 0.2).max(MIN_EASE_FACTOR))
        }
        ReviewResult::Hard => {
            let next = (interval as f32 * 1.2).floor() as i32;
            (next, (ease - 0.15).max(MIN_EASE_FACTOR))
        }
        ReviewResult::Good => {
            let next = match review_level {
                0 => 1,
                1 => 6,
                _ => (interval as f32 * ease).floor() as i32,
            };
            (next, ease)
        }
        ReviewResult::Easy => {
            let next = match review_level {
                0 => 4,
                1 => 6,
                _ => (interval as f32 * ease * 1.3).floor() as i32,
            };
            (next, ease + 0.15)
        }
    };

    (next.clamp(1, MAX_INTERVAL_DAYS), next_ease)
}
