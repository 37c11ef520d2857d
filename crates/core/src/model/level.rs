use std::fmt;
use thiserror::Error;

/// Errors that can occur when resolving a level number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown level: {0}")]
    Unknown(u8),
}

/// The three mini-games a learner can play.
///
/// - `WordListen`: hear a word and pick it from four written options
/// - `ColorChallenge`: name the ink color of a mismatched color word
/// - `WriteLetters`: draw the requested letter by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    WordListen,
    ColorChallenge,
    WriteLetters,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::WordListen, Level::ColorChallenge, Level::WriteLetters];

    /// Converts a level number (1-3) to a `Level`.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Unknown` if the number is not in the range 1-3.
    pub fn from_number(value: u8) -> Result<Self, LevelError> {
        match value {
            1 => Ok(Self::WordListen),
            2 => Ok(Self::ColorChallenge),
            3 => Ok(Self::WriteLetters),
            _ => Err(LevelError::Unknown(value)),
        }
    }

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Level::WordListen => 1,
            Level::ColorChallenge => 2,
            Level::WriteLetters => 3,
        }
    }

    /// Fixed length of the question sequence for this level.
    #[must_use]
    pub fn question_count(self) -> usize {
        match self {
            Level::WordListen | Level::ColorChallenge => 8,
            Level::WriteLetters => 10,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Level::WordListen => "Word Listen",
            Level::ColorChallenge => "Color Challenge",
            Level::WriteLetters => "Write Letters",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}: {}", self.number(), self.title())
    }
}
