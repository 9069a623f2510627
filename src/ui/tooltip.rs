use super::state::Toggle;

pub const LABEL_OFFSET_X: f64 = 14.0;
pub const LABEL_OFFSET_Y: f64 = 12.0;
pub const LABEL_GUTTER: f64 = 14.0;

/// Pointer-following label state for a single hotspot.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Tooltip {
    visible: Toggle,
    cursor_x: f64,
    cursor_y: f64,
}

impl Tooltip {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn pointer_enter(&mut self, x: f64, y: f64) {
        self.visible.set(true);
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// Moves reported after the pointer has left are ignored.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        if !self.visible.is_on() {
            return false;
        }
        self.cursor_x = x;
        self.cursor_y = y;
        true
    }

    pub fn pointer_leave(&mut self) {
        self.visible.set(false);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.is_on()
    }

    pub fn cursor(&self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn label_position(&self) -> Option<(f64, f64)> {
        self.is_visible()
            .then(|| (self.cursor_x + LABEL_OFFSET_X, self.cursor_y + LABEL_OFFSET_Y))
    }

    /// Like [`Tooltip::label_position`], but keeps a label of `label_size`
    /// inside `viewport`.
    pub fn label_position_within(
        &self,
        viewport: (f64, f64),
        label_size: (f64, f64),
    ) -> Option<(f64, f64)> {
        let (x, y) = self.label_position()?;
        let (viewport_width, viewport_height) = viewport;
        let (label_width, label_height) = label_size;
        let max_x = (viewport_width - label_width - LABEL_GUTTER).max(LABEL_GUTTER);
        let max_y = (viewport_height - label_height - LABEL_GUTTER).max(LABEL_GUTTER);

        Some((x.clamp(LABEL_GUTTER, max_x), y.clamp(LABEL_GUTTER, max_y)))
    }
}
