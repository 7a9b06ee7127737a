use std::collections::BTreeMap;

use super::visibility::WindowId;

/// Behavior a concrete window hands to the manager when it registers. The
/// manager never names concrete window types; it drives everything through
/// these handles.
pub trait Window {
    fn id(&self) -> WindowId;

    /// Applied eagerly whenever the effective visibility of this window is
    /// recomputed.
    fn set_visible(&mut self, visible: bool);

    /// Whether the window is willing to close right now. A dialog mid
    /// animation may refuse; refusal leaves the mode stack untouched.
    fn can_exit(&self) -> bool {
        true
    }

    /// Graceful close, invoked when the window's mode leaves the stack.
    fn close(&mut self);
}

/// One handle per window id, registered at UI start-up and kept for the
/// lifetime of the UI.
#[derive(Default)]
pub struct WindowRegistry {
    windows: BTreeMap<WindowId, Box<dyn Window>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle under its own id, replacing any previous handle.
    pub fn register(&mut self, window: Box<dyn Window>) {
        self.windows.insert(window.id(), window);
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&dyn Window> {
        self.windows.get(&id).map(|boxed| boxed.as_ref())
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut (dyn Window + 'static)> {
        self.windows.get_mut(&id).map(|boxed| boxed.as_mut())
    }

    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }
}

impl std::fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("ids", &self.windows.keys().collect::<Vec<_>>())
            .finish()
    }
}
