use serde::{Deserialize, Serialize};

/// Text shown for a limited time (speech bubble, action caption).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimedText {
    text: Option<String>,
    remaining: f32,
}

impl TimedText {
    pub fn show(&mut self, text: impl Into<String>, duration: f32) {
        self.text = Some(text.into());
        self.remaining = duration.max(0.0);
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.remaining = 0.0;
    }

    /// Count down; the text disappears once the timer reaches zero.
    pub fn tick(&mut self, dt: f32) {
        if self.text.is_none() {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.clear();
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }
}

/// Floating "+5" / "-3" indicator after an affection change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AffectionBadge {
    delta: Option<i32>,
    remaining: f32,
}

impl AffectionBadge {
    /// Zero deltas are not shown.
    pub fn show(&mut self, delta: i32, duration: f32) {
        if delta == 0 {
            return;
        }
        self.delta = Some(delta);
        self.remaining = duration.max(0.0);
    }

    pub fn clear(&mut self) {
        self.delta = None;
        self.remaining = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.delta.is_none() {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.clear();
        }
    }

    pub fn delta(&self) -> Option<i32> {
        self.delta
    }

    pub fn label(&self) -> Option<String> {
        self.delta.map(|d| format!("{d:+}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_text_expires() {
        let mut bubble = TimedText::default();
        bubble.show("Hello!", 1.0);
        bubble.tick(0.6);
        assert_eq!(bubble.text(), Some("Hello!"));
        bubble.tick(0.4);
        assert!(!bubble.is_visible());
        assert_eq!(bubble.remaining(), 0.0);
    }

    #[test]
    fn showing_again_restarts_timer() {
        let mut bubble = TimedText::default();
        bubble.show("one", 1.0);
        bubble.tick(0.9);
        bubble.show("two", 1.0);
        bubble.tick(0.5);
        assert_eq!(bubble.text(), Some("two"));
    }

    #[test]
    fn badge_formats_sign_and_expires() {
        let mut badge = AffectionBadge::default();
        badge.show(5, 2.0);
        assert_eq!(badge.label().as_deref(), Some("+5"));
        badge.show(-3, 2.0);
        assert_eq!(badge.label().as_deref(), Some("-3"));
        badge.tick(2.0);
        assert_eq!(badge.delta(), None);
    }

    #[test]
    fn zero_delta_badge_is_not_shown() {
        let mut badge = AffectionBadge::default();
        badge.show(0, 2.0);
        assert_eq!(badge.delta(), None);
    }
}
