//! Transient status messages

use std::time::{Duration, Instant};

/// Reason a status message was emitted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// Enrollment capture started
    EnrollStarted,
    /// Verification capture started
    VerifyStarted,
    /// Gesture mode requested without an enrolled gesture
    NotEnrolled,
    /// Switched back to typing
    KeyboardMode,
    /// Enrollment confirmed and stored
    Saved,
    /// Enrollment window ran out and the gesture was stored
    AutoSaved,
    /// Enrollment kept in memory but could not be written
    SaveFailed,
    /// Wrong gesture or wrong typed secret
    Incorrect,
    /// Verification window ran out and the gesture did not match
    AutoRejected,
    /// Capture abandoned
    Cancelled,
}

impl StatusKind {
    /// User-facing text
    pub fn text(self) -> &'static str {
        match self {
            StatusKind::EnrollStarted => "Recording new gesture...",
            StatusKind::VerifyStarted => "Enter your gesture...",
            StatusKind::NotEnrolled => "No gesture enrolled! Press F3",
            StatusKind::KeyboardMode => "Keyboard input mode",
            StatusKind::Saved => "Gesture saved!",
            StatusKind::AutoSaved => "Gesture saved automatically",
            StatusKind::SaveFailed => "Gesture kept for this session only, saving failed",
            StatusKind::Incorrect => "Incorrect password!",
            StatusKind::AutoRejected => "Time is up: incorrect password!",
            StatusKind::Cancelled => "Gesture input cancelled",
        }
    }

    /// Whether this status reports a failure
    pub fn is_error(self) -> bool {
        matches!(
            self,
            StatusKind::NotEnrolled
                | StatusKind::SaveFailed
                | StatusKind::Incorrect
                | StatusKind::AutoRejected
        )
    }
}

/// A status message stamped with its emission time
#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    kind: StatusKind,
    text: String,
    emitted_at: Instant,
}

impl StatusMessage {
    /// Create a message, cutting the text to `max_chars` characters
    pub fn new(kind: StatusKind, now: Instant, max_chars: usize) -> Self {
        let text = kind.text();
        let text = match text.char_indices().nth(max_chars) {
            Some((end, _)) => text[..end].to_string(),
            None => text.to_string(),
        };

        Self {
            kind,
            text,
            emitted_at: now,
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message has outlived `ttl` at `now`
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.emitted_at) >= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let now = Instant::now();
        let ttl = Duration::from_secs(3);
        let status = StatusMessage::new(StatusKind::Saved, now, 127);

        assert_eq!(status.text(), "Gesture saved!");
        assert!(!status.is_expired(now + Duration::from_millis(2_999), ttl));
        assert!(status.is_expired(now + ttl, ttl));
    }

    #[test]
    fn test_text_is_cut_to_max_chars() {
        let status = StatusMessage::new(StatusKind::NotEnrolled, Instant::now(), 10);
        assert_eq!(status.text(), "No gesture");
        assert_eq!(status.kind(), StatusKind::NotEnrolled);
    }

    #[test]
    fn test_error_kinds() {
        assert!(StatusKind::Incorrect.is_error());
        assert!(StatusKind::AutoRejected.is_error());
        assert!(!StatusKind::Saved.is_error());
        assert!(!StatusKind::VerifyStarted.is_error());
    }
}
