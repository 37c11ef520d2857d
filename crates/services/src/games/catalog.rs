use rand::Rng;
use wonder_core::model::{Color, ColorQuestion, Level, LetterQuestion, WordQuestion};

/// Supplies the fixed question sequence for one controller instance.
pub trait QuestionSource<Q> {
    fn questions(&mut self) -> Vec<Q>;
}

/// A prepared list is its own source.
impl<Q: Clone> QuestionSource<Q> for Vec<Q> {
    fn questions(&mut self) -> Vec<Q> {
        self.clone()
    }
}

/// The eight listening words with their rhyming distractors.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordListenCatalog;

const WORDS: [(&str, [&str; 4]); 8] = [
    ("cat", ["cat", "bat", "hat", "rat"]),
    ("dog", ["dog", "frog", "log", "hog"]),
    ("sun", ["sun", "fun", "run", "bun"]),
    ("ball", ["ball", "call", "fall", "hall"]),
    ("fish", ["fish", "dish", "wish", "cash"]),
    ("tree", ["tree", "free", "knee", "bee"]),
    ("book", ["book", "look", "took", "hook"]),
    ("house", ["house", "mouse", "horse", "noise"]),
];

impl QuestionSource<WordQuestion> for WordListenCatalog {
    fn questions(&mut self) -> Vec<WordQuestion> {
        WORDS
            .iter()
            .map(|(word, options)| WordQuestion::new(*word, options))
            .collect()
    }
}

/// Draws a fresh set of color-word prompts for each session.
#[derive(Debug, Clone)]
pub struct ColorChallengeGenerator<R> {
    rng: R,
    count: usize,
}

impl<R: Rng> ColorChallengeGenerator<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            count: Level::ColorChallenge.question_count(),
        }
    }

    fn pick(&mut self) -> Color {
        Color::ALL[self.rng.random_range(0..Color::ALL.len())]
    }

    /// One prompt whose printed word never names its own ink color.
    fn draw(&mut self) -> ColorQuestion {
        let ink = self.pick();
        loop {
            if let Some(question) = ColorQuestion::new(ink, self.pick()) {
                return question;
            }
        }
    }
}

impl<R: Rng> QuestionSource<ColorQuestion> for ColorChallengeGenerator<R> {
    fn questions(&mut self) -> Vec<ColorQuestion> {
        (0..self.count).map(|_| self.draw()).collect()
    }
}

/// Letters A through J.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterCatalog;

impl QuestionSource<LetterQuestion> for LetterCatalog {
    fn questions(&mut self) -> Vec<LetterQuestion> {
        ('A'..='J').map(LetterQuestion::new).collect()
    }
}
