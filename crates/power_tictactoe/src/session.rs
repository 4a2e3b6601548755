//! Sessions: one game plus the driver that plays the AI's turns.
//!
//! A [`Session`] is the external interface to the engine. User interfaces
//! send it [`Command`]s and render what it reports back.

use crate::action::{Move, MoveReport};
use crate::ai::Minimax;
use crate::error::{EngineError, MoveError, SessionError};
use crate::game::GameState;
use crate::settings::Settings;
use crate::types::{Player, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a session.
pub type SessionId = String;

/// One game and the rules for who moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    state: GameState,
}

impl Session {
    /// Starts a session. When the AI opens, its first move is already played.
    #[instrument(skip(settings))]
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        Self::from_state(GameState::new(settings)?)
    }

    /// Wraps an existing game, playing the AI's turns if it is to move.
    pub fn from_state(state: GameState) -> Result<Self, EngineError> {
        let mut session = Self { state };
        session.drive_ai()?;
        Ok(session)
    }

    /// The game being played.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Active settings.
    pub fn settings(&self) -> &Settings {
        self.state.settings()
    }

    /// Mark played by the AI, `None` in human-vs-human games.
    pub fn ai_player(&self) -> Option<Player> {
        self.settings().ai_player()
    }

    /// Mark played by the single human in human-vs-AI games.
    pub fn human_player(&self) -> Option<Player> {
        self.settings().human_player()
    }

    /// True when the game is waiting on the AI.
    pub fn is_ai_turn(&self) -> bool {
        !self.state.is_over() && self.ai_player() == Some(self.state.turn())
    }

    /// Places a mark for the player to move.
    ///
    /// Against the AI, the human's move is followed by every AI reply up to
    /// the human's next turn or the end of the game. The returned reports
    /// list the human's move first.
    #[instrument(skip(self), fields(turn = %self.state.turn()))]
    pub fn place(&mut self, pos: Position) -> Result<Vec<MoveReport>, EngineError> {
        if self.is_ai_turn() {
            warn!("Human tried to move on the AI's turn");
            return Err(MoveError::WrongPlayer(self.state.turn()).into());
        }
        let first = self.state.apply_move(pos, self.state.turn())?;
        let mut reports = vec![first];
        reports.extend(self.drive_ai()?);
        Ok(reports)
    }

    /// Places a mark for an explicit player.
    ///
    /// Against the AI this may also play the AI's side. Any AI turn left
    /// pending afterwards is played before returning, as with [`place`](Self::place).
    #[instrument(skip(self))]
    pub fn place_as(&mut self, player: Player, pos: Position) -> Result<Vec<MoveReport>, EngineError> {
        let mut reports = vec![self.state.apply_move(pos, player)?];
        reports.extend(self.drive_ai()?);
        Ok(reports)
    }

    /// Lets the minimax search play one move for whoever is to move.
    ///
    /// Against the AI, a move made on the human's behalf is answered like
    /// any human move.
    #[instrument(skip(self), fields(turn = %self.state.turn()))]
    pub fn request_ai_move(&mut self) -> Result<Vec<MoveReport>, EngineError> {
        let mut reports = vec![self.search_and_play(self.state.turn())?];
        reports.extend(self.drive_ai()?);
        Ok(reports)
    }

    fn search_and_play(&mut self, player: Player) -> Result<MoveReport, EngineError> {
        if self.state.is_over() {
            return Err(MoveError::GameOver.into());
        }
        let pos = Minimax::new(*self.settings().ai_depth())
            .choose(
                self.state.board(),
                self.state.win_lines(),
                player,
                player.opponent(),
                &mut rand::thread_rng(),
            )
            .ok_or(MoveError::GameOver)?;
        debug!(%player, %pos, "Search picked move");
        self.state.apply_move(pos, player)
    }

    /// Plays AI moves until the human is to move or the game ends.
    fn drive_ai(&mut self) -> Result<Vec<MoveReport>, EngineError> {
        let mut reports = Vec::new();
        while self.is_ai_turn() {
            let report = self.search_and_play(self.state.turn())?;
            if report.extra_turn {
                debug!("AI landed on a power cell and moves again");
            }
            reports.push(report);
        }
        Ok(reports)
    }

    /// Takes back moves.
    ///
    /// Human vs human pops one move. Against the AI, rewinds to the human's
    /// last decision point: the AI's replies and the human move before them.
    /// An AI opening move on its own is never undone.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<Vec<Move>, EngineError> {
        let Some(human) = self.human_player() else {
            return Ok(vec![self.state.undo()?]);
        };
        if !self.state.history().iter().any(|m| m.player == human) {
            debug!("No human move to take back");
            return Err(EngineError::NothingToUndo);
        }
        let mut undone = Vec::new();
        loop {
            let mov = self.state.undo()?;
            undone.push(mov);
            if mov.player == human {
                break;
            }
        }
        info!(count = undone.len(), "Rewound to human's turn");
        Ok(undone)
    }

    /// Exchanges the display symbols once the swap rule allows it.
    pub fn swap_symbols(&mut self) -> Result<(), EngineError> {
        self.state.swap_symbols()
    }

    /// Starts over with the current settings. Returns the AI's opening moves, if any.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<Vec<MoveReport>, EngineError> {
        self.state.reset();
        self.drive_ai()
    }

    /// Validates and applies new settings, then starts over.
    #[instrument(skip(self, settings))]
    pub fn apply_settings(&mut self, settings: Settings) -> Result<Vec<MoveReport>, EngineError> {
        self.state.apply_settings(settings)?;
        self.drive_ai()
    }

    /// Executes one command.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub fn dispatch(&mut self, command: Command) -> Result<Event, EngineError> {
        match command {
            Command::Place(pos) => self.place(pos).map(Event::Moved),
            Command::PlaceAs(player, pos) => self.place_as(player, pos).map(Event::Moved),
            Command::AiMove => self.request_ai_move().map(Event::Moved),
            Command::Undo => self.undo().map(Event::Undone),
            Command::Swap => self.swap_symbols().map(|()| Event::Swapped),
            Command::Reset => self.reset().map(Event::Reset),
            Command::ApplySettings(settings) => self.apply_settings(*settings).map(Event::Reset),
        }
    }
}

/// A request from a user interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Move for the player to move.
    Place(Position),
    /// Move for a named player.
    PlaceAs(Player, Position),
    /// Let the AI play the current turn.
    AiMove,
    /// Take back moves.
    Undo,
    /// Exchange display symbols.
    Swap,
    /// Start over.
    Reset,
    /// Start over with new settings.
    ApplySettings(Box<Settings>),
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Place(_) => "place",
            Command::PlaceAs(..) => "place_as",
            Command::AiMove => "ai_move",
            Command::Undo => "undo",
            Command::Swap => "swap",
            Command::Reset => "reset",
            Command::ApplySettings(_) => "apply_settings",
        }
    }
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Moves applied, in order.
    Moved(Vec<MoveReport>),
    /// Moves taken back, most recent first.
    Undone(Vec<Move>),
    /// Display symbols exchanged.
    Swapped,
    /// A fresh game began; holds any AI opening moves.
    Reset(Vec<MoveReport>),
}

/// Shared handle to one session.
type SharedSession = Arc<Mutex<Session>>;

fn lock_session(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Manages all game sessions.
///
/// The registry lock is only held to look up, insert or remove a session.
/// Commands run under that session's own lock, so a long AI search in one
/// game never blocks another.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SharedSession>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<SessionId, SharedSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self, id: &str) -> Result<SharedSession, SessionError> {
        self.registry().get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound(id.to_string())
        })
    }

    /// Registers a new session under `id`.
    ///
    /// The session, including any AI opening move, is built before the
    /// registry is locked.
    #[instrument(skip(self, settings))]
    pub fn create_session(&self, id: SessionId, settings: Settings) -> Result<SessionId, SessionError> {
        if self.registry().contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id));
        }
        let session = Arc::new(Mutex::new(Session::new(settings)?));
        let mut sessions = self.registry();
        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session created concurrently");
            return Err(SessionError::AlreadyExists(id));
        }
        sessions.insert(id.clone(), session);
        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Drops a session, returning its final game.
    ///
    /// Waits for a command already running on that session to finish.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Result<GameState, SessionError> {
        let session = self
            .registry()
            .remove(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let state = lock_session(&session).state().clone();
        Ok(state)
    }

    /// Lists all active session IDs, sorted.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.registry().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Runs `f` on a session while holding that session's lock.
    #[instrument(skip(self, f))]
    pub fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, SessionError> {
        let session = self.get(id)?;
        let mut guard = lock_session(&session);
        Ok(f(&mut guard))
    }

    /// Dispatches a command to a session.
    pub fn dispatch(&self, id: &str, command: Command) -> Result<Event, SessionError> {
        self.with_session(id, |s| s.dispatch(command))?
            .map_err(SessionError::from)
    }

    /// Copy of a session's game.
    pub fn snapshot(&self, id: &str) -> Result<GameState, SessionError> {
        self.with_session(id, |s| s.state().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FirstPlayer, GameMode};

    fn vs_ai() -> Settings {
        Settings::default().with_power_cells_enabled(false)
    }

    #[test]
    fn test_ai_replies_to_human() {
        let mut session = Session::new(vs_ai()).unwrap();
        let reports = session.place(Position::new(1, 1)).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].applied.player, Player::X);
        assert_eq!(reports[1].applied.player, Player::O);
        assert_eq!(session.state().turn(), Player::X);
    }

    #[test]
    fn test_ai_opens_when_first() {
        let session = Session::new(vs_ai().with_first_player(FirstPlayer::Ai)).unwrap();
        assert_eq!(session.state().history().len(), 1);
        assert_eq!(session.state().history()[0].player, Player::O);
        assert_eq!(session.state().turn(), Player::X);
    }

    #[test]
    fn test_undo_rewinds_to_human_turn() {
        let mut session = Session::new(vs_ai()).unwrap();
        session.place(Position::new(0, 0)).unwrap();
        let undone = session.undo().unwrap();
        assert_eq!(undone.len(), 2);
        assert_eq!(undone[1].position, Position::new(0, 0));
        assert!(session.state().history().is_empty());
        assert_eq!(session.state().turn(), Player::X);
    }

    #[test]
    fn test_undo_keeps_ai_opening() {
        let mut session = Session::new(vs_ai().with_first_player(FirstPlayer::Ai)).unwrap();
        assert_eq!(session.undo(), Err(EngineError::NothingToUndo));
        assert_eq!(session.state().history().len(), 1);
    }

    #[test]
    fn test_local_undo_pops_one() {
        let mut session = Session::new(vs_ai().with_mode(GameMode::HumanVsHuman)).unwrap();
        session.place(Position::new(0, 0)).unwrap();
        session.place(Position::new(1, 1)).unwrap();
        assert_eq!(session.undo().unwrap().len(), 1);
        assert_eq!(session.state().turn(), Player::O);
    }

    #[test]
    fn test_dispatch() {
        let mut session = Session::new(vs_ai().with_mode(GameMode::HumanVsHuman)).unwrap();
        let event = session.dispatch(Command::Place(Position::new(2, 2))).unwrap();
        assert!(matches!(event, Event::Moved(ref r) if r.len() == 1));
        assert_eq!(
            session.dispatch(Command::Swap),
            Err(EngineError::SwapUnavailable)
        );
        assert!(matches!(session.dispatch(Command::Reset), Ok(Event::Reset(ref r)) if r.is_empty()));
        assert!(session.state().history().is_empty());
    }

    #[test]
    fn test_request_ai_move_in_local_game() {
        let mut session = Session::new(vs_ai().with_mode(GameMode::HumanVsHuman)).unwrap();
        let reports = session.request_ai_move().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].applied.player, Player::X);
        assert_eq!(session.state().turn(), Player::O);
    }

    #[test]
    fn test_place_as_lets_ai_reply() {
        let mut session = Session::new(vs_ai()).unwrap();
        let reports = session.place_as(Player::X, Position::new(0, 0)).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].applied.player, Player::O);
        assert!(!session.is_ai_turn());
        assert_eq!(session.state().turn(), Player::X);
    }

    #[test]
    fn test_busy_session_does_not_block_others() {
        use std::sync::mpsc;
        use std::thread;
        use std::time::{Duration, Instant};

        let manager = SessionManager::new();
        manager.create_session("slow".into(), vs_ai()).unwrap();
        manager.create_session("fast".into(), vs_ai()).unwrap();

        let (entered, wait_entered) = mpsc::channel();
        let (release, wait_release) = mpsc::channel::<()>();
        let busy = {
            let manager = manager.clone();
            thread::spawn(move || {
                manager
                    .with_session("slow", |_| {
                        entered.send(()).unwrap();
                        wait_release.recv_timeout(Duration::from_secs(10)).ok();
                    })
                    .unwrap();
            })
        };
        wait_entered.recv().unwrap();

        // "slow" is held; these must complete without waiting for it
        let started = Instant::now();
        manager.dispatch("fast", Command::Place(Position::new(0, 0))).unwrap();
        assert_eq!(manager.list_sessions().len(), 2);
        manager.create_session("third".into(), vs_ai()).unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));

        release.send(()).unwrap();
        busy.join().unwrap();
        assert_eq!(manager.snapshot("fast").unwrap().history().len(), 2);
    }

    #[test]
    fn test_manager_lifecycle() {
        let manager = SessionManager::new();
        manager.create_session("b".into(), vs_ai()).unwrap();
        manager.create_session("a".into(), vs_ai()).unwrap();
        assert_eq!(
            manager.create_session("a".into(), vs_ai()),
            Err(SessionError::AlreadyExists("a".into()))
        );
        assert_eq!(manager.list_sessions(), vec!["a".to_string(), "b".to_string()]);

        manager.dispatch("a", Command::Place(Position::new(0, 0))).unwrap();
        assert_eq!(manager.snapshot("a").unwrap().history().len(), 2);
        assert!(manager.snapshot("b").unwrap().history().is_empty());

        assert_eq!(manager.remove_session("a").unwrap().history().len(), 2);
        assert!(matches!(
            manager.dispatch("a", Command::Undo),
            Err(SessionError::NotFound(_))
        ));
    }
}
