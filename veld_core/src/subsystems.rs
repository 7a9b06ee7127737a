//! Contracts the frame driver requires from its collaborators. Renderer,
//! audio, physics and the interpreter live outside this core; the driver
//! reaches them only through these traits, injected at construction.
//!
//! Every `update` is synchronous: it returns once this tick's work has been
//! queued or applied. Collaborators may run worker threads internally, but
//! the driver never blocks on them beyond the call itself.

use std::time::Duration;

use crate::error::ScriptError;
use crate::scripts::{ObjectId, ScriptContext};

/// Polls the platform for input and raises discrete action events consumed
/// elsewhere.
pub trait InputSystem {
    fn poll(&mut self, dt: Duration);
}

pub trait AudioSystem {
    fn update(&mut self, dt: Duration);

    /// Begin streaming a music track, replacing whatever is playing.
    fn stream_music(&mut self, track: &str);
}

/// Actor AI and game mechanics. `gui_active` lets the implementation skip
/// work that is pointless while menus are open.
pub trait MechanicsSystem {
    fn update(&mut self, dt: Duration, gui_active: bool);
}

/// World simulation and physics, plus the handful of queries the frame
/// driver and the activation path need.
pub trait WorldSystem {
    fn update(&mut self, dt: Duration, gui_active: bool);

    /// Advance the in-game clock by `hours` of game time.
    fn advance_clock(&mut self, hours: f64);

    fn player(&self) -> ObjectId;

    fn is_player_dead(&self) -> bool;

    /// Object the player is currently looking at, if any.
    fn faced_object(&self) -> Option<ObjectId>;

    /// Name presented to the user; objects without one cannot be activated.
    fn display_name(&self, object: ObjectId) -> Option<String>;

    /// `actor` interacts with `object` (open, pick up, talk, ...).
    fn activate(&mut self, object: ObjectId, actor: ObjectId);

    /// Scripts observed this tick's cell changes; reset the changed flag.
    fn mark_cell_unchanged(&mut self);
}

/// Runs one compiled script to completion. Mutating the script registries
/// through the context is legal while running.
pub trait Interpreter {
    fn run(&mut self, script: &str, ctx: &mut ScriptContext) -> Result<(), ScriptError>;
}

/// Draws and lays out the GUI; reads effective window visibility and the
/// current top mode on every call.
pub trait GuiRenderer {
    fn update(&mut self, dt: Duration);
}
