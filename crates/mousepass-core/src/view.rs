//! Drawable state exposed to the presentation layer

use std::time::Duration;

use crate::auth::{InputMode, Phase, StatusMessage};
use crate::gesture::GestureEvent;

/// Everything the lock screen needs for one frame
///
/// Cheap to build; the shell asks for it on every redraw.
#[derive(Clone, Debug)]
pub struct LockView<'a> {
    /// State machine phase
    pub phase: Phase,
    /// Keyboard or gesture input
    pub input_mode: InputMode,
    /// Whether a reference gesture exists
    pub enrolled: bool,
    /// Time left in the active capture window
    pub remaining: Option<Duration>,
    /// Buffered events of the active capture, in surface coordinates
    pub points: &'a [GestureEvent],
    /// Rejected unlock attempts since start
    pub failed_attempts: u32,
    /// Number of typed secret characters, for masked display
    pub typed_len: usize,
    /// Current non-expired status message
    pub status: Option<&'a StatusMessage>,
}

impl LockView<'_> {
    /// Whether a capture session is open
    pub fn session_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Countdown text for the active capture
    pub fn countdown_text(&self) -> Option<String> {
        self.remaining
            .map(|left| format!("Time left: {:.1} s", left.as_secs_f64()))
    }

    /// Failed attempt banner, once there has been a failure
    pub fn attempts_text(&self) -> Option<String> {
        match self.failed_attempts {
            0 => None,
            1 => Some("Incorrect password (1 attempt)".to_string()),
            n => Some(format!("Incorrect password ({} attempts)", n)),
        }
    }

    /// Headline for the current mode
    pub fn headline(&self) -> &'static str {
        match self.phase {
            Phase::KeyboardMode => "SYSTEM LOCKED",
            Phase::GestureIdle => "GESTURE MODE",
            Phase::Enrolling => "DRAW YOUR NEW GESTURE",
            Phase::Verifying => "ENTER PASSWORD WITH THE MOUSE",
            Phase::Unlocked => "UNLOCKED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(failed_attempts: u32, remaining: Option<Duration>) -> LockView<'static> {
        LockView {
            phase: Phase::Verifying,
            input_mode: InputMode::Gesture,
            enrolled: true,
            remaining,
            points: &[],
            failed_attempts,
            typed_len: 0,
            status: None,
        }
    }

    #[test]
    fn test_countdown_text() {
        let v = view(0, Some(Duration::from_millis(4_250)));
        assert!(v.session_active());
        assert_eq!(v.countdown_text().as_deref(), Some("Time left: 4.2 s"));
        assert!(view(0, None).countdown_text().is_none());
    }

    #[test]
    fn test_attempts_text() {
        assert!(view(0, None).attempts_text().is_none());
        assert_eq!(
            view(1, None).attempts_text().as_deref(),
            Some("Incorrect password (1 attempt)")
        );
        assert_eq!(
            view(4, None).attempts_text().as_deref(),
            Some("Incorrect password (4 attempts)")
        );
    }
}
