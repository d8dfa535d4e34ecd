//! Seam to the widget that displays the page window.

/// What the widget can do from its current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidgetCapabilities {
    pub can_flip_left: bool,
    pub can_flip_right: bool,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
}

/// Imperative controls of a flip/page widget.
///
/// Flips are requests: the widget reports the resulting page through
/// flip-start/flip-end triggers rather than through these calls.
pub trait FlipWidget {
    fn flip_left(&mut self);
    fn flip_right(&mut self);
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    fn capabilities(&self) -> WidgetCapabilities;
}

/// Stepped zoom factor between 1.0 and a maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    factor: f32,
    step: f32,
    max: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(0.25, 3.0)
    }
}

impl Zoom {
    pub const MIN: f32 = 1.0;

    pub fn new(step: f32, max: f32) -> Self {
        Self {
            factor: Self::MIN,
            step: step.max(0.01),
            max: max.max(Self::MIN),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn can_zoom_in(&self) -> bool {
        self.factor < self.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.factor > Self::MIN
    }

    pub fn zoom_in(&mut self) {
        self.factor = (self.factor + self.step).min(self.max);
    }

    pub fn zoom_out(&mut self) {
        self.factor = (self.factor - self.step).max(Self::MIN);
    }

    pub fn reset(&mut self) {
        self.factor = Self::MIN;
    }
}
