use std::cell::Cell;
use std::rc::Rc;

/// Paused flag shared between the intersection callback and the frame loop.
///
/// Clones share state. The observer side calls `observe`; the loop side only
/// reads `is_paused`.
#[derive(Clone, Debug, Default)]
pub struct VisibilityGate {
    paused: Rc<Cell<bool>>,
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply intersection entries in order; the last one wins.
    pub fn observe<I>(&self, entries: I)
    where
        I: IntoIterator<Item = bool>,
    {
        for intersecting in entries {
            self.paused.set(!intersecting);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unpaused() {
        assert!(!VisibilityGate::new().is_paused());
    }

    #[test]
    fn clones_share_state() {
        let observer_side = VisibilityGate::new();
        let loop_side = observer_side.clone();
        observer_side.observe([false]);
        assert!(loop_side.is_paused());
        observer_side.observe([true]);
        assert!(!loop_side.is_paused());
    }

    #[test]
    fn last_entry_wins() {
        let gate = VisibilityGate::new();
        gate.observe([true, false]);
        assert!(gate.is_paused());
        gate.observe([false, true]);
        assert!(!gate.is_paused());
        gate.observe(std::iter::empty());
        assert!(!gate.is_paused());
    }
}
