use thiserror::Error;

/// Failures raised while executing compiled scripts.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The interpreter hit a runtime fault inside the compiled program.
    #[error("script `{script}` raised a runtime fault: {message}")]
    Runtime { script: String, message: String },

    /// The registry referenced a script the interpreter has no program for.
    #[error("script `{0}` has no compiled program")]
    Unknown(String),
}

impl ScriptError {
    pub fn runtime(script: impl Into<String>, message: impl Into<String>) -> Self {
        ScriptError::Runtime {
            script: script.into(),
            message: message.into(),
        }
    }
}

/// Invalid game-state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("cannot end the game: no game is running")]
    NoGameRunning,
}
