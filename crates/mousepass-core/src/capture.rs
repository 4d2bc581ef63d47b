//! Gesture event capture within a bounded time window

use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::Result;
use crate::gesture::{GestureEvent, GestureKind, GestureSequence};

/// Buffers pointer events for one capture session
///
/// Events are stamped relative to the moment the capture began. Anything
/// arriving once the window has elapsed is dropped, as are moves that land on
/// the previously recorded coordinate.
#[derive(Clone, Debug)]
pub struct EventCapture {
    /// When the capture started
    started_at: Instant,
    /// Length of the capture window
    window: Duration,
    /// Recorded events
    buffer: GestureSequence,
    /// Raw coordinate of the last recorded event
    last_point: Option<(f64, f64)>,
}

impl EventCapture {
    /// Start a new, empty capture at `now`
    pub fn begin(now: Instant, window: Duration) -> Self {
        Self {
            started_at: now,
            window,
            buffer: GestureSequence::new(),
            last_point: None,
        }
    }

    /// Record a pointer event
    ///
    /// Returns `Ok(true)` if the event was appended and `Ok(false)` if it was
    /// rejected. Only a failure to grow the buffer is an error.
    pub fn record(&mut self, kind: GestureKind, x: f64, y: f64, now: Instant) -> Result<bool> {
        if !x.is_finite() || !y.is_finite() {
            return Ok(false);
        }

        let elapsed = self.elapsed(now);
        if elapsed >= self.window {
            return Ok(false);
        }

        if kind == GestureKind::Move && self.last_point == Some((x, y)) {
            return Ok(false);
        }

        self.buffer
            .try_push(GestureEvent::new(kind, x, y, elapsed.as_secs_f64()))?;
        self.last_point = Some((x, y));

        trace!(kind = %kind, count = self.buffer.len(), "Recorded gesture event");
        Ok(true)
    }

    /// When the capture started
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since the capture started
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Time left before the window closes
    pub fn remaining(&self, now: Instant) -> Duration {
        self.window.saturating_sub(self.elapsed(now))
    }

    /// Whether the window has closed
    pub fn is_expired(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.window
    }

    /// Events captured so far
    pub fn events(&self) -> &[GestureEvent] {
        self.buffer.as_slice()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// End the capture and hand over the raw sequence
    pub fn finish(self) -> GestureSequence {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: Instant, millis: u64) -> Instant {
        start + Duration::from_millis(millis)
    }

    #[test]
    fn test_records_relative_timestamps() {
        let start = Instant::now();
        let mut capture = EventCapture::begin(start, Duration::from_secs(5));

        assert!(capture.record(GestureKind::Move, 10.0, 20.0, at(start, 0)).unwrap());
        assert!(capture.record(GestureKind::Move, 11.0, 20.0, at(start, 250)).unwrap());
        assert!(capture.record(GestureKind::Click, 11.0, 20.0, at(start, 500)).unwrap());

        let events = capture.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].t, 0.0);
        assert!((events[1].t - 0.25).abs() < 1e-9);
        assert!((events[2].t - 0.5).abs() < 1e-9);
        assert_eq!(events[2].kind, GestureKind::Click);
    }

    #[test]
    fn test_stationary_moves_are_dropped() {
        let start = Instant::now();
        let mut capture = EventCapture::begin(start, Duration::from_secs(5));

        assert!(capture.record(GestureKind::Move, 5.0, 5.0, at(start, 10)).unwrap());
        assert!(!capture.record(GestureKind::Move, 5.0, 5.0, at(start, 20)).unwrap());
        // A click on the same spot is still meaningful
        assert!(capture.record(GestureKind::Click, 5.0, 5.0, at(start, 30)).unwrap());
        // and a move back onto the click position is not
        assert!(!capture.record(GestureKind::Move, 5.0, 5.0, at(start, 40)).unwrap());
        assert_eq!(capture.len(), 2);
    }

    #[test]
    fn test_window_closes() {
        let start = Instant::now();
        let mut capture = EventCapture::begin(start, Duration::from_secs(5));

        assert!(capture.record(GestureKind::Move, 1.0, 1.0, at(start, 4_999)).unwrap());
        assert!(!capture.record(GestureKind::Move, 2.0, 2.0, at(start, 5_000)).unwrap());
        assert!(capture.is_expired(at(start, 5_000)));
        assert_eq!(capture.remaining(at(start, 6_000)), Duration::ZERO);
        assert_eq!(capture.len(), 1);
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let start = Instant::now();
        let mut capture = EventCapture::begin(start, Duration::from_secs(5));

        assert!(!capture.record(GestureKind::Move, f64::NAN, 0.0, start).unwrap());
        assert!(!capture.record(GestureKind::Click, 0.0, f64::INFINITY, start).unwrap());
        assert!(capture.is_empty());
    }

    #[test]
    fn test_finish_hands_over_buffer() {
        let start = Instant::now();
        let mut capture = EventCapture::begin(start, Duration::from_secs(5));
        capture.record(GestureKind::Move, 1.0, 1.0, start).unwrap();

        let seq = capture.finish();
        assert_eq!(seq.len(), 1);
    }
}
