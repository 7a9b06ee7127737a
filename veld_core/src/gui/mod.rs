//! GUI-mode state: the mode stack that pauses gameplay, the modal sub-stack
//! that routes Escape, and the three visibility sets composed into each
//! window's effective visibility.

mod modal;
mod mode;
mod registry;
mod visibility;

pub use modal::ModalStack;
pub use mode::{GuiMode, GuiModeStack};
pub use registry::{Window, WindowRegistry};
pub use visibility::{WindowId, WindowSet};

use std::collections::BTreeMap;

use log::debug;

/// Owns every piece of GUI-mode state the frame driver consults. Mutations
/// come from user actions and script logic; the driver itself only queries.
#[derive(Debug)]
pub struct WindowManager {
    modes: GuiModeStack,
    modals: ModalStack,
    registry: WindowRegistry,
    mode_owners: BTreeMap<GuiMode, WindowId>,
    allowed: WindowSet,
    shown: WindowSet,
    force_hidden: WindowSet,
    gui_enabled: bool,
}

impl WindowManager {
    pub fn new() -> Self {
        WindowManager {
            modes: GuiModeStack::new(),
            modals: ModalStack::new(),
            registry: WindowRegistry::new(),
            mode_owners: BTreeMap::new(),
            allowed: WindowSet::all(),
            shown: WindowSet::all(),
            force_hidden: WindowSet::NONE,
            gui_enabled: true,
        }
    }

    /// Register a window handle and apply its current effective visibility.
    pub fn register_window(&mut self, window: Box<dyn Window>) {
        self.registry.register(window);
        self.update_visible();
    }

    /// Declare which window owns a mode; `exit_current` consults the owner
    /// before popping.
    pub fn bind_mode(&mut self, mode: GuiMode, owner: WindowId) {
        self.mode_owners.insert(mode, owner);
    }

    // --- mode stack ------------------------------------------------------

    pub fn push_mode(&mut self, mode: GuiMode) {
        self.modes.push(mode);
        self.update_visible();
    }

    pub fn pop_mode(&mut self) -> Option<GuiMode> {
        let popped = self.modes.pop();
        if popped.is_some() {
            self.update_visible();
        }
        popped
    }

    /// Force a mode out wherever it sits in the stack, e.g. a dialogue that
    /// has to close regardless of nesting.
    pub fn remove_mode(&mut self, mode: GuiMode) -> bool {
        let removed = self.modes.remove(mode);
        if removed {
            self.update_visible();
        }
        removed
    }

    pub fn contains_mode(&self, mode: GuiMode) -> bool {
        self.modes.contains(mode)
    }

    pub fn current_mode(&self) -> Option<GuiMode> {
        self.modes.top()
    }

    /// Gameplay is paused exactly while this returns true.
    pub fn is_gui_mode(&self) -> bool {
        !self.modes.is_empty()
    }

    pub fn is_console_mode(&self) -> bool {
        self.modes.top() == Some(GuiMode::Console)
    }

    /// Saving is permitted only while no mode in the stack forbids it.
    pub fn saving_allowed(&self) -> bool {
        !self.modes.iter().any(GuiMode::blocks_saving)
    }

    /// Gracefully close the top mode. The owning window may refuse, in
    /// which case the stack is left untouched.
    pub fn exit_current_mode(&mut self) -> bool {
        let Some(mode) = self.modes.top() else {
            debug!("exit requested while not in GUI mode");
            return false;
        };
        if let Some(owner) = self.mode_owners.get(&mode).copied() {
            if let Some(window) = self.registry.get(owner) {
                if !window.can_exit() {
                    return false;
                }
            }
            if let Some(window) = self.registry.get_mut(owner) {
                window.close();
            }
        }
        self.modes.pop();
        self.update_visible();
        true
    }

    // --- modal sub-stack -------------------------------------------------

    pub fn push_modal(&mut self, window: WindowId) {
        self.modals.push(window);
    }

    pub fn pop_modal(&mut self) -> Option<WindowId> {
        self.modals.pop()
    }

    pub fn current_modal(&self) -> Option<WindowId> {
        self.modals.top()
    }

    /// Escape routing: the top modal gets the exit request first; with no
    /// modal open, the top GUI mode is asked to exit.
    pub fn escape(&mut self) -> bool {
        if let Some(id) = self.modals.top() {
            if let Some(window) = self.registry.get(id) {
                if !window.can_exit() {
                    return false;
                }
            }
            if let Some(window) = self.registry.get_mut(id) {
                window.close();
            }
            self.modals.pop();
            return true;
        }
        self.exit_current_mode()
    }

    // --- visibility ------------------------------------------------------

    /// Toggle whether the user wants `id` shown. Takes effect immediately.
    pub fn toggle_visible(&mut self, id: WindowId) {
        self.shown.toggle(id);
        self.update_visible();
    }

    /// Hard override hiding `id` regardless of the other sets, used for
    /// one-off suppression such as video playback.
    pub fn force_hide(&mut self, id: WindowId) {
        self.force_hidden.insert(id);
        self.update_visible();
    }

    pub fn unset_force_hide(&mut self, id: WindowId) {
        self.force_hidden.remove(id);
        self.update_visible();
    }

    /// Withdraw permission for every window; scripts re-allow them one by
    /// one during the opening sequence.
    pub fn disallow_all(&mut self) {
        self.allowed = WindowSet::NONE;
        self.update_visible();
    }

    pub fn allow(&mut self, id: WindowId) {
        self.allowed.insert(id);
        self.update_visible();
    }

    pub fn is_allowed(&self, id: WindowId) -> bool {
        self.allowed.contains(id)
    }

    /// Master switch hiding the whole GUI; the console survives it so the
    /// engine stays debuggable. Returns the new state.
    pub fn toggle_gui(&mut self) -> bool {
        self.gui_enabled = !self.gui_enabled;
        self.update_visible();
        self.gui_enabled
    }

    pub fn effective_visible(&self, id: WindowId) -> bool {
        if !self.gui_enabled && id != WindowId::Console {
            return false;
        }
        self.allowed.contains(id) && self.shown.contains(id) && !self.force_hidden.contains(id)
    }

    pub fn visible_windows(&self) -> Vec<WindowId> {
        self.registry
            .ids()
            .filter(|&id| self.effective_visible(id))
            .collect()
    }

    /// Reset per-save state on new-game/load-game. Registered handles and
    /// mode bindings persist; everything stacked or toggled is dropped.
    pub fn clear(&mut self) {
        self.modes.clear();
        self.modals.clear();
        self.allowed = WindowSet::all();
        self.shown = WindowSet::all();
        self.force_hidden = WindowSet::NONE;
        self.gui_enabled = true;
        self.update_visible();
    }

    fn update_visible(&mut self) {
        let mut states: Vec<(WindowId, bool)> = Vec::new();
        for id in self.registry.ids() {
            states.push((id, self.effective_visible(id)));
        }
        for (id, visible) in states {
            if let Some(window) = self.registry.get_mut(id) {
                window.set_visible(visible);
            }
        }
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}
