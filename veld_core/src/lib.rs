//! Shared model layer for the Veld engine core.
//!
//! Everything the per-frame driver consults lives here: the game-state
//! machine, the GUI mode stack with its window visibility sets, and the
//! registries of local and global scripts. The crate defines data and
//! contracts only; the frame cadence itself is owned by `veld_engine`.

pub mod error;
pub mod game_state;
pub mod gui;
pub mod scripts;
pub mod subsystems;

pub use error::{ScriptError, StateError};
pub use game_state::{GameState, StateManager};
pub use gui::{GuiMode, WindowId, WindowManager, WindowSet};
pub use scripts::{GlobalScripts, LocalScripts, Locals, ObjectId, ScriptContext};
