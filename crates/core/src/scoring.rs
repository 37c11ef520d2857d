//! Star ratings and score arithmetic shared by every level.

use crate::model::Level;

/// Highest star rating a session can earn.
pub const MAX_STARS: u8 = 3;

/// Points-per-star step used by the letter-writing level.
pub const LETTER_POINTS_PER_STAR: u32 = 300;

/// Points the letter-writing level awards for each correct letter.
pub const LETTER_POINTS_PER_ANSWER: u32 = 100;

/// How a session's final score maps to a star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarRule {
    /// Percentage bands: 80+ → 3, 60+ → 2, 40+ → 1, else 0.
    PercentageBands,
    /// `floor(points / points_per_star) + 1`, capped at three stars.
    ///
    /// A score of zero still earns one star.
    PointBands { points_per_star: u32 },
}

impl StarRule {
    #[must_use]
    pub fn stars(self, score: u32) -> u8 {
        match self {
            StarRule::PercentageBands => stars_for_percentage(score),
            StarRule::PointBands { points_per_star } => stars_for_points(score, points_per_star),
        }
    }
}

/// Star rating for a 0-100 percentage score.
#[must_use]
pub fn stars_for_percentage(score: u32) -> u8 {
    match score {
        80.. => 3,
        60..=79 => 2,
        40..=59 => 1,
        _ => 0,
    }
}

/// Star rating for an absolute point total.
///
/// A zero step is treated as one point per star.
#[must_use]
pub fn stars_for_points(points: u32, points_per_star: u32) -> u8 {
    let step = points_per_star.max(1);
    let raw = (points / step).saturating_add(1);
    u8::try_from(raw.min(u32::from(MAX_STARS))).unwrap_or(MAX_STARS)
}

/// `round(correct / total * 100)`, or 0 when there were no questions.
#[must_use]
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    // Half-up rounding in integer arithmetic.
    let pct = (correct * 200 + total) / (total * 2);
    u32::try_from(pct).unwrap_or(100)
}

/// Rescale a raw letter-writing point total onto the 0-100 percentage scale.
///
/// Older progress records hold the point total itself (up to 1000).
#[must_use]
pub fn letter_points_as_percentage(points: u32) -> u32 {
    let total = u32::try_from(Level::WriteLetters.question_count()).unwrap_or(u32::MAX);
    percentage(points / LETTER_POINTS_PER_ANSWER, total)
}
