use std::fmt;
use std::path::{Path, PathBuf};

use services::{
    GamePhase, GameStep, NavigationController, PlaybackState, ReadingAidService, Screen,
    Submission,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use wonder_core::model::{Level, UploadedFile};

use crate::console::media_type_for;

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    Logout,
    Play(Level),
    Answer(String),
    QuitLevel,
    Save,
    Reader,
    Read(PathBuf),
    Listen,
    Stop,
    Back,
    Status,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidLevel(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command, or `help`"),
            CommandError::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
            CommandError::MissingArgument { command } => write!(f, "{command} needs an argument"),
            CommandError::InvalidLevel(raw) => write!(f, "no such level: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let required = |command: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument { command })
            } else {
                Ok(rest.to_string())
            }
        };

        match head.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "login" => Ok(Command::Login(required("login")?)),
            "logout" => Ok(Command::Logout),
            "play" => {
                let raw = required("play")?;
                raw.parse::<u8>()
                    .ok()
                    .and_then(|n| Level::from_number(n).ok())
                    .map(Command::Play)
                    .ok_or(CommandError::InvalidLevel(raw))
            }
            "answer" | "a" => Ok(Command::Answer(required("answer")?)),
            "quit-level" => Ok(Command::QuitLevel),
            "save" | "retry" => Ok(Command::Save),
            "reader" => Ok(Command::Reader),
            "read" => Ok(Command::Read(PathBuf::from(required("read")?))),
            "listen" => Ok(Command::Listen),
            "stop" => Ok(Command::Stop),
            "back" => Ok(Command::Back),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "exit" | "quit" => Ok(Command::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  login <name>      start playing as <name>");
    println!("  logout            back to the login screen");
    println!("  play <1|2|3>      start a level from the dashboard");
    println!("  answer <text>     answer the current question (alias: a)");
    println!("  quit-level        leave the level without saving");
    println!("  save              try saving a finished level again (alias: retry)");
    println!("  reader            open the reading aid");
    println!("  read <path>       extract text from an image or PDF");
    println!("  listen            play / pause / resume reading aloud");
    println!("  stop              stop reading aloud");
    println!("  back              leave the reading aid");
    println!("  status            show the current screen and progress");
    println!("  exit              close the app");
}

//
// ─── LOOP ──────────────────────────────────────────────────────────────────────
//

enum Flow {
    Continue,
    Exit,
}

/// Line-oriented front end over the navigation and reading aid services.
pub struct Console {
    nav: NavigationController,
    reader: ReadingAidService,
    feedback_delays: bool,
}

impl Console {
    pub fn new(nav: NavigationController, reader: ReadingAidService, feedback_delays: bool) -> Self {
        Self {
            nav,
            reader,
            feedback_delays,
        }
    }

    /// Read commands from stdin until `exit` or end of input.
    pub async fn run(mut self) -> std::io::Result<()> {
        print_help();
        self.show_screen();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };
            debug!(?command, "command");
            match self.handle(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                // Nothing is fatal here; report and keep going.
                Err(err) => eprintln!("error: {err}"),
            }
        }
        Ok(())
    }

    async fn handle(&mut self, command: Command) -> Result<Flow, Box<dyn std::error::Error>> {
        match command {
            Command::Login(name) => {
                let progress = self.nav.login(&name).await?;
                println!(
                    "Welcome! Stars: {}, games played: {}",
                    progress.total_stars(),
                    progress.games_played()
                );
                self.show_screen();
            }
            Command::Logout => {
                self.nav.logout().await?;
                self.show_screen();
            }
            Command::Play(level) => {
                self.nav.select_level(level)?;
                println!("{level}");
                self.show_prompt();
            }
            Command::Answer(text) => self.answer(&text).await?,
            Command::QuitLevel => {
                self.nav.quit_level()?;
                self.show_screen();
            }
            Command::Save => {
                let step = self.nav.retry_save_outcome().await?;
                self.show_step(step);
            }
            Command::Reader => {
                self.nav.open_reading_aid()?;
                self.show_screen();
            }
            Command::Read(path) => self.read_file(&path).await?,
            Command::Listen => {
                self.require_reader("listen")?;
                if self.reader.toggle_playback().await? == PlaybackState::Paused {
                    println!("Type `listen` to carry on.");
                }
            }
            Command::Stop => self.reader.stop()?,
            Command::Back => {
                self.nav.back()?;
                self.reader.stop()?;
                self.show_screen();
            }
            Command::Status => self.show_status(),
            Command::Help => print_help(),
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    async fn answer(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        match self.nav.submit_answer(text)? {
            Submission::Evaluated { correct: true, .. } => println!("Correct!"),
            Submission::Evaluated {
                correct: false,
                expected,
            } => println!("Not quite. The answer was {expected}."),
            Submission::Ignored(reason) => {
                debug!(?reason, "answer ignored");
                self.hint_unsaved();
                return Ok(());
            }
        }

        if self.feedback_delays {
            if let Some(game) = self.nav.game() {
                tokio::time::sleep(game.feedback_delay()).await;
            }
        }

        match self.nav.advance_game().await {
            Ok(step) => self.show_step(step),
            Err(err) => {
                self.hint_unsaved();
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn show_step(&self, step: GameStep) {
        match step {
            GameStep::Next { .. } | GameStep::Retry { .. } => self.show_prompt(),
            GameStep::Completed { outcome, progress } => {
                println!(
                    "Level complete! {}/{} correct, score {}, {} star(s).",
                    outcome.correct(),
                    outcome.total(),
                    outcome.final_score(),
                    outcome.stars()
                );
                println!(
                    "Total stars: {}, average score: {}",
                    progress.total_stars(),
                    progress.average_score()
                );
                self.show_screen();
            }
            GameStep::Waiting => {}
        }
    }

    fn hint_unsaved(&self) {
        if self.nav.unsaved_outcome().is_some() {
            println!("Your result has not been saved yet. Type `save` to try again.");
        }
    }

    async fn read_file(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.require_reader("read a file")?;
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let file = UploadedFile::new(name, media_type_for(path), bytes);

        let content = self.reader.extract(&file).await?;
        println!(
            "Extracted {} characters from {} ({:.0}% confidence).",
            content.text().chars().count(),
            content.source(),
            content.confidence()
        );
        println!("{}", content.text());
        Ok(())
    }

    fn require_reader(&self, action: &'static str) -> Result<(), services::NavigationError> {
        if self.nav.screen() == Screen::ReadingAid {
            Ok(())
        } else {
            Err(services::NavigationError::InvalidTransition {
                screen: self.nav.screen(),
                action,
            })
        }
    }

    fn show_screen(&self) {
        println!("[{}]", self.nav.screen());
    }

    fn show_prompt(&self) {
        let Some(game) = self.nav.game() else {
            return;
        };
        let progress = game.progress();
        if let Some(prompt) = game.prompt() {
            println!("({}/{}) {prompt}", progress.current, progress.total);
        }
    }

    fn show_status(&self) {
        self.show_screen();
        if let Some(user) = self.nav.session().current_user() {
            let progress = self.nav.session().progress();
            println!("Player: {user}");
            for level in Level::ALL {
                println!("  {level}: best {}", progress.level_score(level));
            }
            println!(
                "  Stars: {}  Games: {}  Average: {}",
                progress.total_stars(),
                progress.games_played(),
                progress.average_score()
            );
        }
        if let Some(game) = self.nav.game() {
            match game.phase() {
                GamePhase::InProgress { score, .. } | GamePhase::Feedback { score, .. } => {
                    println!("Current score: {score}");
                }
                GamePhase::Complete { final_score, stars } => {
                    println!("Finished with {final_score} ({stars} stars), not yet saved");
                }
            }
        }
    }
}
