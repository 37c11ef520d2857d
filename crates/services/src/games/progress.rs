/// Aggregated view of a running level, for headers and progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameProgress {
    pub total: usize,
    /// One-based number of the question on screen, capped at `total`.
    pub current: usize,
    pub correct: u32,
    pub points: u32,
    pub is_complete: bool,
}

impl GameProgress {
    /// Fraction of the level that is done, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        let done = if self.is_complete {
            self.total
        } else {
            self.current.saturating_sub(1)
        };
        #[allow(clippy::cast_precision_loss)]
        let fraction = done as f32 / self.total as f32;
        fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_counts_finished_questions() {
        let progress = GameProgress {
            total: 8,
            current: 3,
            correct: 2,
            points: 2,
            is_complete: false,
        };
        assert!((progress.fraction() - 0.25).abs() < f32::EPSILON);

        let done = GameProgress {
            is_complete: true,
            ..progress
        };
        assert!((done.fraction() - 1.0).abs() < f32::EPSILON);
    }
}
