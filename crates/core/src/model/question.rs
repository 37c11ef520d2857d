use std::fmt;

//
// ─── QUESTION CONTRACT ────────────────────────────────────────────────────────
//

/// A single prompt in a level's question sequence.
pub trait Question: Clone + fmt::Debug + Send + Sync {
    /// The answer a learner is expected to give.
    fn expected_answer(&self) -> String;

    /// Text spoken or shown to the learner for this prompt.
    fn prompt(&self) -> String;
}

//
// ─── LEVEL 1: WORD LISTEN ─────────────────────────────────────────────────────
//

/// Spoken word with four written options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordQuestion {
    correct_word: String,
    options: Vec<String>,
    audio_text: String,
}

impl WordQuestion {
    /// Build a word question; the spoken cue is derived from the word.
    #[must_use]
    pub fn new(correct_word: impl Into<String>, options: &[&str]) -> Self {
        let correct_word = correct_word.into();
        let audio_text = format!("Find the word: {correct_word}");
        Self {
            correct_word,
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            audio_text,
        }
    }

    #[must_use]
    pub fn correct_word(&self) -> &str {
        &self.correct_word
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn audio_text(&self) -> &str {
        &self.audio_text
    }
}

impl Question for WordQuestion {
    fn expected_answer(&self) -> String {
        self.correct_word.clone()
    }

    fn prompt(&self) -> String {
        self.audio_text.clone()
    }
}

//
// ─── LEVEL 2: COLOR CHALLENGE ─────────────────────────────────────────────────
//

/// Palette used by the color challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
        }
    }

    /// Swatch value used when painting the prompt.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Color::Red => "#ef4444",
            Color::Blue => "#3b82f6",
            Color::Green => "#22c55e",
            Color::Yellow => "#eab308",
            Color::Purple => "#a855f7",
            Color::Orange => "#f97316",
        }
    }

    /// Case-insensitive lookup by color name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A color word printed in a different ink color; the ink color is the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorQuestion {
    display_color: Color,
    display_text: Color,
}

impl ColorQuestion {
    /// Returns `None` when text and ink are the same color.
    #[must_use]
    pub fn new(display_color: Color, display_text: Color) -> Option<Self> {
        (display_color != display_text).then_some(Self {
            display_color,
            display_text,
        })
    }

    #[must_use]
    pub fn display_color(&self) -> Color {
        self.display_color
    }

    #[must_use]
    pub fn display_text(&self) -> Color {
        self.display_text
    }
}

impl Question for ColorQuestion {
    fn expected_answer(&self) -> String {
        self.display_color.name().to_owned()
    }

    fn prompt(&self) -> String {
        self.display_text.name().to_uppercase()
    }
}

//
// ─── LEVEL 3: WRITE LETTERS ───────────────────────────────────────────────────
//

/// Letter the learner should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterQuestion {
    letter: char,
}

impl LetterQuestion {
    #[must_use]
    pub fn new(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
        }
    }

    #[must_use]
    pub fn letter(&self) -> char {
        self.letter
    }
}

impl Question for LetterQuestion {
    fn expected_answer(&self) -> String {
        self.letter.to_string()
    }

    fn prompt(&self) -> String {
        format!("Draw the letter {}", self.letter)
    }
}
