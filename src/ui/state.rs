/// A flag that goes from unset to set at most once.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Latch {
    set: bool,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true only on the call that actually sets the latch.
    pub fn trip(&mut self) -> bool {
        let tripped = !self.set;
        self.set = true;
        tripped
    }

    pub fn is_set(self) -> bool {
        self.set
    }
}

/// A flag that may move freely in both directions.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Toggle {
    on: bool,
}

impl Toggle {
    pub fn new(on: bool) -> Self {
        Self { on }
    }

    /// Returns whether the value changed.
    pub fn set(&mut self, on: bool) -> bool {
        let changed = self.on != on;
        self.on = on;
        changed
    }

    pub fn flip(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }

    pub fn is_on(self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_reports_only_first_trip() {
        let mut latch = Latch::new();
        assert!(!latch.is_set());
        assert!(latch.trip());
        assert!(!latch.trip());
        assert!(latch.is_set());
    }

    #[test]
    fn toggle_moves_both_ways() {
        let mut toggle = Toggle::new(true);
        assert!(!toggle.set(true));
        assert!(toggle.set(false));
        assert!(!toggle.is_on());
        assert!(toggle.flip());
        assert!(!toggle.flip());
    }
}
