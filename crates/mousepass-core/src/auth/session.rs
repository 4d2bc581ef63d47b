//! Gesture capture sessions

use std::time::{Duration, Instant};

use crate::capture::EventCapture;
use crate::error::Result;
use crate::gesture::{GestureEvent, GestureKind, GestureSequence};

/// What a capture session is for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// Recording a new reference gesture
    Enrolling,
    /// Repeating the gesture to unlock
    Verifying,
}

/// An active capture session
///
/// Lives from `begin` until the user confirms or the window runs out, at
/// which point the buffer is either promoted to the reference credential or
/// scored and dropped.
#[derive(Clone, Debug)]
pub struct Session {
    mode: SessionMode,
    capture: EventCapture,
}

impl Session {
    /// Start a session with an empty buffer
    pub fn begin(mode: SessionMode, now: Instant, window: Duration) -> Self {
        Self {
            mode,
            capture: EventCapture::begin(now, window),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// When the session was started
    pub fn started_at(&self) -> Instant {
        self.capture.started_at()
    }

    /// Record a pointer event into the buffer
    pub fn record(&mut self, kind: GestureKind, x: f64, y: f64, now: Instant) -> Result<bool> {
        self.capture.record(kind, x, y, now)
    }

    /// Time left in the capture window
    pub fn remaining(&self, now: Instant) -> Duration {
        self.capture.remaining(now)
    }

    /// Whether the capture window has run out
    pub fn is_expired(&self, now: Instant) -> bool {
        self.capture.is_expired(now)
    }

    /// Events buffered so far, in raw coordinates
    pub fn events(&self) -> &[GestureEvent] {
        self.capture.events()
    }

    /// Close the session and take the raw buffer
    pub fn finish(self) -> GestureSequence {
        self.capture.finish()
    }
}
