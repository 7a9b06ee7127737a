use std::time::Duration;

use log::info;
use serde::Serialize;

use crate::error::StateError;

/// Lifecycle of the loaded game, read by the frame driver every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    /// Engine is up but no game has been started or loaded.
    NoGame,
    /// A game is in progress.
    Running,
    /// The player died; gameplay phases stay frozen until a new game starts.
    Ended,
}

/// Owns the [`GameState`] machine. Transitions happen only through the
/// explicit calls below; the frame driver treats the state as read-only.
#[derive(Debug)]
pub struct StateManager {
    state: GameState,
    quit_requested: bool,
    play_time: Duration,
    last_save_id: Option<String>,
}

impl StateManager {
    pub fn new() -> Self {
        StateManager {
            state: GameState::NoGame,
            quit_requested: false,
            play_time: Duration::ZERO,
            last_save_id: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Start a fresh game. `bypass_intro` skips the opening sequence the way
    /// a developer boot does.
    pub fn new_game(&mut self, bypass_intro: bool) {
        info!(
            "starting new game{}",
            if bypass_intro { " (intro bypassed)" } else { "" }
        );
        self.state = GameState::Running;
        self.play_time = Duration::ZERO;
        self.last_save_id = None;
    }

    /// Restore a saved game. The save payload itself is handled by the
    /// serialization layer; this core only tracks the resulting state.
    pub fn load_game(&mut self, save_id: &str) {
        info!("loading save `{save_id}`");
        self.state = GameState::Running;
        self.play_time = Duration::ZERO;
        self.last_save_id = Some(save_id.to_string());
    }

    /// Freeze gameplay after the player's death.
    pub fn end_game(&mut self) -> Result<(), StateError> {
        if self.state != GameState::Running {
            return Err(StateError::NoGameRunning);
        }
        info!("game over");
        self.state = GameState::Ended;
        Ok(())
    }

    /// Per-tick bookkeeping; accumulates play time while a game is running.
    pub fn update(&mut self, dt: Duration) {
        if self.state == GameState::Running {
            self.play_time += dt;
        }
    }

    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    pub fn last_save_id(&self) -> Option<&str> {
        self.last_save_id.as_deref()
    }

    /// Ask the host loop to stop calling `tick` after the current frame.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn has_quit_request(&self) -> bool {
        self.quit_requested
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_a_game() {
        let manager = StateManager::new();
        assert_eq!(manager.state(), GameState::NoGame);
        assert!(!manager.has_quit_request());
    }

    #[test]
    fn new_game_resets_play_time() {
        let mut manager = StateManager::new();
        manager.new_game(false);
        manager.update(Duration::from_secs(5));
        assert_eq!(manager.play_time(), Duration::from_secs(5));

        manager.new_game(true);
        assert_eq!(manager.play_time(), Duration::ZERO);
        assert_eq!(manager.state(), GameState::Running);
    }

    #[test]
    fn end_game_requires_a_running_game() {
        let mut manager = StateManager::new();
        assert_eq!(manager.end_game(), Err(StateError::NoGameRunning));

        manager.new_game(false);
        manager.end_game().expect("running game can end");
        assert_eq!(manager.state(), GameState::Ended);

        // Ended games cannot end twice.
        assert_eq!(manager.end_game(), Err(StateError::NoGameRunning));
    }

    #[test]
    fn play_time_only_accumulates_while_running() {
        let mut manager = StateManager::new();
        manager.update(Duration::from_secs(3));
        assert_eq!(manager.play_time(), Duration::ZERO);

        manager.new_game(false);
        manager.update(Duration::from_secs(2));
        manager.end_game().unwrap();
        manager.update(Duration::from_secs(2));
        assert_eq!(manager.play_time(), Duration::from_secs(2));
    }

    #[test]
    fn load_game_records_save_id() {
        let mut manager = StateManager::new();
        manager.load_game("autosave-03");
        assert_eq!(manager.state(), GameState::Running);
        assert_eq!(manager.last_save_id(), Some("autosave-03"));
    }
}
