use super::visibility::WindowId;

/// Stack of modal windows. Strictly LIFO: the top entry is the only one that
/// receives exit/cancel routing, and entries never leave from the middle.
#[derive(Debug, Default, Clone)]
pub struct ModalStack {
    stack: Vec<WindowId>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, window: WindowId) {
        self.stack.push(window);
    }

    pub fn pop(&mut self) -> Option<WindowId> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<WindowId> {
        self.stack.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_order() {
        let mut modals = ModalStack::new();
        modals.push(WindowId::Rest);
        modals.push(WindowId::Dialogue);

        assert_eq!(modals.top(), Some(WindowId::Dialogue));
        assert_eq!(modals.pop(), Some(WindowId::Dialogue));
        assert_eq!(modals.pop(), Some(WindowId::Rest));
        assert_eq!(modals.pop(), None);
    }
}
