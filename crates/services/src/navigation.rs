use std::fmt;

use tracing::{info, warn};
use wonder_core::model::{GameOutcome, Level, UserProgress};

use crate::error::NavigationError;
use crate::games::{ActiveGame, Advance, GameLauncher, IgnoreReason, PendingAnswer, Submission};
use crate::session_manager::SessionManager;

/// Screens the learner moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Dashboard,
    Level(Level),
    ReadingAid,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Login => f.write_str("login"),
            Screen::Dashboard => f.write_str("dashboard"),
            Screen::Level(level) => write!(f, "level{}", level.number()),
            Screen::ReadingAid => f.write_str("fileupload"),
        }
    }
}

/// What happened when the running level moved past its feedback display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStep {
    Next { index: usize },
    Retry { index: usize },
    /// The level finished and its result was saved; the dashboard is showing.
    Completed {
        outcome: GameOutcome,
        progress: UserProgress,
    },
    /// No answer has been evaluated yet.
    Waiting,
}

/// Screen state machine over the session and the running level.
///
/// A rejected action leaves the screen, session and game exactly as they were.
pub struct NavigationController {
    screen: Screen,
    session: SessionManager,
    launcher: GameLauncher,
    game: Option<ActiveGame>,
    unsaved: Option<GameOutcome>,
}

impl NavigationController {
    /// Start on the dashboard when a session was restored, else on login.
    #[must_use]
    pub fn new(session: SessionManager, launcher: GameLauncher) -> Self {
        let screen = if session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        };
        Self {
            screen,
            session,
            launcher,
            game: None,
            unsaved: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub fn game(&self) -> Option<&ActiveGame> {
        self.game.as_ref()
    }

    /// A finished level whose result could not be saved yet.
    #[must_use]
    pub fn unsaved_outcome(&self) -> Option<&GameOutcome> {
        self.unsaved.as_ref()
    }

    fn require(&self, expected: Screen, action: &'static str) -> Result<(), NavigationError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> NavigationError {
        NavigationError::InvalidTransition {
            screen: self.screen,
            action,
        }
    }

    fn go(&mut self, next: Screen) {
        info!(from = %self.screen, to = %next, "navigate");
        self.screen = next;
    }

    //
    // ─── SESSION ───────────────────────────────────────────────────────────────
    //

    /// `login -> dashboard`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` off the login screen; `Session` for a blank name or
    /// a failed save, in which case the login screen stays up.
    pub async fn login(&mut self, raw: &str) -> Result<&UserProgress, NavigationError> {
        self.require(Screen::Login, "log in")?;
        self.session.login(raw).await?;
        self.go(Screen::Dashboard);
        Ok(self.session.progress())
    }

    /// `dashboard -> login`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` off the dashboard; `Session` if the current-user
    /// record cannot be cleared.
    pub async fn logout(&mut self) -> Result<(), NavigationError> {
        self.require(Screen::Dashboard, "log out")?;
        self.session.logout().await?;
        self.go(Screen::Login);
        Ok(())
    }

    //
    // ─── DASHBOARD ─────────────────────────────────────────────────────────────
    //

    /// `dashboard -> level{n}` with a fresh controller.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` off the dashboard; `Game` if the level cannot start.
    pub fn select_level(&mut self, level: Level) -> Result<&ActiveGame, NavigationError> {
        self.require(Screen::Dashboard, "start a level")?;
        let game = self.launcher.launch(level)?;
        self.unsaved = None;
        self.go(Screen::Level(level));
        Ok(self.game.insert(game))
    }

    /// `dashboard -> fileupload`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` off the dashboard.
    pub fn open_reading_aid(&mut self) -> Result<(), NavigationError> {
        self.require(Screen::Dashboard, "open the reading aid")?;
        self.go(Screen::ReadingAid);
        Ok(())
    }

    /// `fileupload -> dashboard`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from any other screen.
    pub fn back(&mut self) -> Result<(), NavigationError> {
        self.require(Screen::ReadingAid, "go back")?;
        self.go(Screen::Dashboard);
        Ok(())
    }

    //
    // ─── LEVEL ─────────────────────────────────────────────────────────────────
    //

    fn require_level(&self, action: &'static str) -> Result<(), NavigationError> {
        if matches!(self.screen, Screen::Level(_)) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    /// `level{n} -> dashboard` without recording anything.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside a level.
    pub fn quit_level(&mut self) -> Result<(), NavigationError> {
        self.require_level("quit the level")?;
        if let Some(outcome) = self.unsaved.take() {
            warn!(level = outcome.level().number(), "discarding unsaved level result");
        }
        self.game = None;
        self.go(Screen::Dashboard);
        Ok(())
    }

    /// Answer the question on screen.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside a level; `NoActiveGame` if no controller runs.
    pub fn submit_answer(&mut self, candidate: &str) -> Result<Submission, NavigationError> {
        self.require_level("answer")?;
        let game = self.game.as_mut().ok_or(NavigationError::NoActiveGame)?;
        Ok(game.submit_answer(candidate))
    }

    /// Deliver an answer resolved by a collaborator.
    ///
    /// Answers arriving after the level was left are dropped as stale.
    pub fn submit_pending(&mut self, pending: &PendingAnswer) -> Submission {
        match self.game.as_mut() {
            Some(game) if matches!(self.screen, Screen::Level(_)) => game.submit_pending(pending),
            _ => Submission::Ignored(IgnoreReason::StaleTicket),
        }
    }

    /// Leave the feedback display. On completion the outcome is merged into the
    /// learner's progress and the dashboard is shown.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside a level; `NoActiveGame` if no controller
    /// runs; `Session` if the result cannot be saved. A failed save keeps the
    /// level screen up and can be retried with `retry_save_outcome`.
    pub async fn advance_game(&mut self) -> Result<GameStep, NavigationError> {
        self.require_level("advance")?;
        let game = self.game.as_mut().ok_or(NavigationError::NoActiveGame)?;
        match game.advance() {
            Advance::Next { index } => Ok(GameStep::Next { index }),
            Advance::Retry { index } => Ok(GameStep::Retry { index }),
            Advance::NotReady => Ok(GameStep::Waiting),
            Advance::Completed(outcome) => {
                self.unsaved = Some(outcome);
                self.save_outcome().await
            }
            Advance::Finished => {
                if self.unsaved.is_some() {
                    self.save_outcome().await
                } else {
                    Ok(GameStep::Waiting)
                }
            }
        }
    }

    /// Retry saving a finished level whose first save failed.
    ///
    /// # Errors
    ///
    /// `NoActiveGame` if nothing is waiting to be saved; `Session` if the save
    /// fails again.
    pub async fn retry_save_outcome(&mut self) -> Result<GameStep, NavigationError> {
        if self.unsaved.is_none() {
            return Err(NavigationError::NoActiveGame);
        }
        self.save_outcome().await
    }

    async fn save_outcome(&mut self) -> Result<GameStep, NavigationError> {
        let Some(outcome) = self.unsaved.as_ref() else {
            return Err(NavigationError::NoActiveGame);
        };
        let progress = match self.session.record_outcome(outcome).await {
            Ok(progress) => *progress,
            Err(err) => {
                warn!(level = outcome.level().number(), error = %err, "level result not saved");
                return Err(err.into());
            }
        };

        let outcome = self.unsaved.take().ok_or(NavigationError::NoActiveGame)?;
        self.game = None;
        self.go(Screen::Dashboard);
        Ok(GameStep::Completed { outcome, progress })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use storage::repository::Storage;
    use wonder_core::time::fixed_clock;

    use super::*;
    use crate::error::SessionError;
    use crate::progress_store::ProgressStore;

    fn controller() -> NavigationController {
        let store = ProgressStore::from_storage(&Storage::in_memory());
        let launcher = GameLauncher::with_rng(fixed_clock(), StdRng::seed_from_u64(3));
        NavigationController::new(SessionManager::new(store), launcher)
    }

    #[test]
    fn screen_names() {
        assert_eq!(Screen::Level(Level::ColorChallenge).to_string(), "level2");
        assert_eq!(Screen::ReadingAid.to_string(), "fileupload");
    }

    #[tokio::test]
    async fn anonymous_start_is_login() {
        let mut nav = controller();
        assert_eq!(nav.screen(), Screen::Login);

        let err = nav.select_level(Level::WordListen).unwrap_err();
        assert!(matches!(
            err,
            NavigationError::InvalidTransition {
                screen: Screen::Login,
                ..
            }
        ));
        assert_eq!(nav.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn blank_login_stays_on_login() {
        let mut nav = controller();
        let err = nav.login("   ").await.unwrap_err();
        assert!(matches!(
            err,
            NavigationError::Session(SessionError::InvalidInput(_))
        ));
        assert_eq!(nav.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn reading_aid_round_trip() {
        let mut nav = controller();
        nav.login("Alex").await.unwrap();

        assert!(nav.back().is_err());
        nav.open_reading_aid().unwrap();
        assert_eq!(nav.screen(), Screen::ReadingAid);
        assert!(nav.logout().await.is_err());
        nav.back().unwrap();
        assert_eq!(nav.screen(), Screen::Dashboard);
    }

    #[tokio::test]
    async fn quitting_a_level_records_nothing() {
        let mut nav = controller();
        nav.login("Alex").await.unwrap();
        nav.select_level(Level::WordListen).unwrap();
        nav.submit_answer("cat").unwrap();

        nav.quit_level().unwrap();

        assert_eq!(nav.screen(), Screen::Dashboard);
        assert!(nav.game().is_none());
        assert_eq!(nav.session().progress().games_played(), 0);
    }

    #[tokio::test]
    async fn late_answer_after_quit_is_stale() {
        let mut nav = controller();
        nav.login("Alex").await.unwrap();
        let ticket = nav.select_level(Level::WordListen).unwrap().ticket();
        nav.quit_level().unwrap();

        let late = nav.submit_pending(&PendingAnswer::new(ticket, "cat"));
        assert_eq!(late, Submission::Ignored(IgnoreReason::StaleTicket));
    }

    #[tokio::test]
    async fn advance_before_answer_waits() {
        let mut nav = controller();
        nav.login("Alex").await.unwrap();
        nav.select_level(Level::WriteLetters).unwrap();
        assert_eq!(nav.advance_game().await.unwrap(), GameStep::Waiting);
    }

    #[tokio::test]
    async fn retry_save_without_result_is_rejected() {
        let mut nav = controller();
        nav.login("Alex").await.unwrap();
        assert!(matches!(
            nav.retry_save_outcome().await,
            Err(NavigationError::NoActiveGame)
        ));
    }
}
