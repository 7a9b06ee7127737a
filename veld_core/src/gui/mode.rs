use log::debug;
use serde::Serialize;

/// Named UI contexts. Pushing any of these pauses most gameplay phases;
/// pushing the main menu also pauses script execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum GuiMode {
    MainMenu,
    Inventory,
    Dialogue,
    Container,
    Journal,
    Console,
    Rest,
    Loading,
    Video,
}

impl GuiMode {
    /// Modes that never permit saving while anywhere in the stack.
    pub fn blocks_saving(self) -> bool {
        matches!(
            self,
            GuiMode::MainMenu | GuiMode::Dialogue | GuiMode::Loading | GuiMode::Video
        )
    }
}

/// Stack of active GUI modes. Insertion order is visual z-order and escape
/// order. Duplicates are legal: pushing a mode twice takes two pops.
#[derive(Debug, Default, Clone)]
pub struct GuiModeStack {
    modes: Vec<GuiMode>,
}

impl GuiModeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mode: GuiMode) {
        self.modes.push(mode);
    }

    /// Remove the top mode. Popping outside GUI mode is a no-op.
    pub fn pop(&mut self) -> Option<GuiMode> {
        let popped = self.modes.pop();
        if popped.is_none() {
            debug!("pop requested while not in GUI mode");
        }
        popped
    }

    /// Remove the topmost occurrence of `mode`, wherever it sits in the
    /// stack. The relative order of the rest is preserved.
    pub fn remove(&mut self, mode: GuiMode) -> bool {
        match self.modes.iter().rposition(|&entry| entry == mode) {
            Some(index) => {
                self.modes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, mode: GuiMode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn top(&self) -> Option<GuiMode> {
        self.modes.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = GuiMode> + '_ {
        self.modes.iter().copied()
    }

    pub fn clear(&mut self) {
        self.modes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_anywhere_preserves_order() {
        let mut stack = GuiModeStack::new();
        stack.push(GuiMode::Inventory);
        stack.push(GuiMode::Dialogue);
        stack.push(GuiMode::Journal);

        assert!(stack.remove(GuiMode::Inventory));
        let rest: Vec<GuiMode> = stack.iter().collect();
        assert_eq!(rest, vec![GuiMode::Dialogue, GuiMode::Journal]);

        assert_eq!(stack.pop(), Some(GuiMode::Journal));
        let rest: Vec<GuiMode> = stack.iter().collect();
        assert_eq!(rest, vec![GuiMode::Dialogue]);
    }

    #[test]
    fn duplicate_pushes_take_separate_pops() {
        let mut stack = GuiModeStack::new();
        stack.push(GuiMode::Console);
        stack.push(GuiMode::Console);
        assert_eq!(stack.len(), 2);

        assert_eq!(stack.pop(), Some(GuiMode::Console));
        assert!(stack.contains(GuiMode::Console));
    }

    #[test]
    fn remove_takes_topmost_occurrence() {
        let mut stack = GuiModeStack::new();
        stack.push(GuiMode::Inventory);
        stack.push(GuiMode::Dialogue);
        stack.push(GuiMode::Inventory);

        assert!(stack.remove(GuiMode::Inventory));
        let rest: Vec<GuiMode> = stack.iter().collect();
        assert_eq!(rest, vec![GuiMode::Inventory, GuiMode::Dialogue]);
    }

    #[test]
    fn pop_on_empty_is_a_no_op() {
        let mut stack = GuiModeStack::new();
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }
}
