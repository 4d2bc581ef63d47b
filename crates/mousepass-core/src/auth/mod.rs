//! Authentication state machine
//!
//! The [`Authenticator`] owns all mutable lock screen state: the input mode,
//! the active capture session, the enrolled reference gesture, the failed
//! attempt counter and the current status message. It is driven by discrete
//! [`InputEvent`]s and by [`Authenticator::poll_timeout`], both stamped with
//! an explicit `now` so tests can run on a fake clock.
//!
//! # States
//!
//! - `KeyboardMode` (default): typed characters accumulate, confirm checks
//!   the keyboard secret
//! - `GestureIdle`: gesture mode without an active capture
//! - `Enrolling` / `Verifying`: a capture session is open
//! - `Unlocked`: terminal, every further event is ignored

mod keyboard;
mod session;
mod status;

pub use keyboard::KeyboardSecret;
pub use session::{Session, SessionMode};
pub use status::{StatusKind, StatusMessage};

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::LockConfig;
use crate::error::Result;
use crate::gesture::{GestureKind, GestureSequence};
use crate::input::InputEvent;
use crate::normalize::normalize;
use crate::score::score_breakdown;
use crate::store::CredentialStore;
use crate::view::LockView;

use keyboard::KeyboardBuffer;

/// Which input the lock screen currently listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Typing the keyboard secret
    #[default]
    Keyboard,
    /// Drawing a gesture
    Gesture,
}

/// Externally visible state of the authenticator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    KeyboardMode,
    GestureIdle,
    Enrolling,
    Verifying,
    Unlocked,
}

/// Result of feeding one event or timeout check to the authenticator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed
    Ignored,
    /// State changed, the screen should be redrawn
    Updated,
    /// The lock screen may be released
    Unlocked,
}

/// Mutable state of the lock screen
#[derive(Debug)]
pub struct AuthenticatorState {
    input_mode: InputMode,
    session: Option<Session>,
    failed_attempts: u32,
    status: Option<StatusMessage>,
    typed: KeyboardBuffer,
    unlocked: bool,
}

impl AuthenticatorState {
    fn new(keyboard_buffer_max: usize) -> Self {
        Self {
            input_mode: InputMode::Keyboard,
            session: None,
            failed_attempts: 0,
            status: None,
            typed: KeyboardBuffer::new(keyboard_buffer_max),
            unlocked: false,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Number of characters typed so far
    pub fn typed_len(&self) -> usize {
        self.typed.len()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Current phase of the state machine
    pub fn phase(&self) -> Phase {
        if self.unlocked {
            return Phase::Unlocked;
        }
        match (&self.session, self.input_mode) {
            (Some(session), _) => match session.mode() {
                SessionMode::Enrolling => Phase::Enrolling,
                SessionMode::Verifying => Phase::Verifying,
            },
            (None, InputMode::Gesture) => Phase::GestureIdle,
            (None, InputMode::Keyboard) => Phase::KeyboardMode,
        }
    }
}

/// Gesture authenticator bound to a credential store
pub struct Authenticator<S: CredentialStore> {
    state: AuthenticatorState,
    /// Enrolled, normalised reference gesture (empty when not enrolled)
    reference: GestureSequence,
    store: S,
    secret: KeyboardSecret,
    capture_window: Duration,
    accept_threshold: f64,
    status_ttl: Duration,
    status_max_chars: usize,
}

impl<S: CredentialStore> Authenticator<S> {
    /// Create an authenticator, loading the reference gesture from `store`
    ///
    /// A missing or unreadable credential just means nothing is enrolled.
    /// Only a malformed keyboard secret hash is an error.
    pub fn new(config: &LockConfig, store: S) -> Result<Self> {
        let secret = KeyboardSecret::from_config(config)?;
        if secret.is_plaintext() {
            warn!("Keyboard fallback uses a plaintext secret; this is not a secure credential");
        } else if !secret.is_enabled() {
            info!("Keyboard fallback disabled");
        }

        let reference = store.load().unwrap_or_default();
        if reference.is_empty() {
            info!("No gesture enrolled");
        }

        Ok(Self {
            state: AuthenticatorState::new(config.keyboard_buffer_max),
            reference,
            store,
            secret,
            capture_window: config.capture_window(),
            accept_threshold: config.accept_threshold,
            status_ttl: config.status_ttl(),
            status_max_chars: config.status_max_chars,
        })
    }

    /// Read-only view of the state
    pub fn state(&self) -> &AuthenticatorState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.unlocked
    }

    pub fn failed_attempts(&self) -> u32 {
        self.state.failed_attempts
    }

    /// The enrolled reference gesture
    pub fn reference(&self) -> &GestureSequence {
        &self.reference
    }

    pub fn is_enrolled(&self) -> bool {
        !self.reference.is_empty()
    }

    /// Feed one input event
    ///
    /// The only error is a failure to grow the gesture buffer, which the
    /// caller should treat as fatal.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Result<Outcome> {
        if self.state.unlocked {
            return Ok(Outcome::Ignored);
        }

        match event {
            InputEvent::PointerMove(x, y) => self.record(GestureKind::Move, x, y, now),
            InputEvent::PointerDown(x, y) => self.record(GestureKind::Click, x, y, now),
            InputEvent::ToggleGestureMode => Ok(self.toggle_gesture_mode(now)),
            InputEvent::StartEnroll => Ok(self.start_enrollment(now)),
            InputEvent::Confirm => Ok(self.confirm(now, false)),
            InputEvent::Cancel => Ok(self.cancel(now)),
            InputEvent::Character(c) => Ok(self.type_char(c)),
            InputEvent::Backspace => Ok(self.backspace()),
        }
    }

    /// Close a session whose capture window has run out
    ///
    /// Meant to be called whenever the control loop is idle.
    pub fn poll_timeout(&mut self, now: Instant) -> Outcome {
        let expired = self
            .state
            .session
            .as_ref()
            .is_some_and(|session| session.is_expired(now));
        if !expired || self.state.unlocked {
            return Outcome::Ignored;
        }

        debug!("Capture window elapsed");
        self.confirm(now, true)
    }

    /// Current status message, dropping it once it has expired
    pub fn status(&mut self, now: Instant) -> Option<&StatusMessage> {
        self.expire_status(now);
        self.state.status.as_ref()
    }

    /// Snapshot of everything the presentation layer draws
    pub fn view(&mut self, now: Instant) -> LockView<'_> {
        self.expire_status(now);

        let session = self.state.session.as_ref();
        LockView {
            phase: self.state.phase(),
            input_mode: self.state.input_mode,
            enrolled: !self.reference.is_empty(),
            remaining: session.map(|s| s.remaining(now)),
            points: session.map(|s| s.events()).unwrap_or(&[]),
            failed_attempts: self.state.failed_attempts,
            typed_len: self.state.typed.len(),
            status: self.state.status.as_ref(),
        }
    }

    fn record(&mut self, kind: GestureKind, x: f64, y: f64, now: Instant) -> Result<Outcome> {
        let Some(session) = self.state.session.as_mut() else {
            return Ok(Outcome::Ignored);
        };

        if session.record(kind, x, y, now)? {
            Ok(Outcome::Updated)
        } else {
            Ok(Outcome::Ignored)
        }
    }

    fn toggle_gesture_mode(&mut self, now: Instant) -> Outcome {
        match self.state.input_mode {
            InputMode::Keyboard => {
                self.state.input_mode = InputMode::Gesture;
                if self.is_enrolled() {
                    self.begin_session(SessionMode::Verifying, now);
                    self.set_status(StatusKind::VerifyStarted, now);
                } else {
                    self.set_status(StatusKind::NotEnrolled, now);
                }
            }
            InputMode::Gesture => {
                if self.state.session.take().is_some() {
                    debug!("Discarded capture session on mode switch");
                }
                self.state.input_mode = InputMode::Keyboard;
                self.set_status(StatusKind::KeyboardMode, now);
            }
        }
        Outcome::Updated
    }

    fn start_enrollment(&mut self, now: Instant) -> Outcome {
        self.state.input_mode = InputMode::Gesture;
        self.begin_session(SessionMode::Enrolling, now);
        self.set_status(StatusKind::EnrollStarted, now);
        Outcome::Updated
    }

    fn begin_session(&mut self, mode: SessionMode, now: Instant) {
        debug!(?mode, "Starting capture session");
        self.state.session = Some(Session::begin(mode, now, self.capture_window));
    }

    fn confirm(&mut self, now: Instant, timed_out: bool) -> Outcome {
        match self.state.session.take() {
            Some(session) => match session.mode() {
                SessionMode::Enrolling => self.finish_enrollment(session, now, timed_out),
                SessionMode::Verifying => self.finish_verification(session, now, timed_out),
            },
            None if self.state.input_mode == InputMode::Keyboard => self.submit_typed(now),
            None => Outcome::Ignored,
        }
    }

    fn finish_enrollment(&mut self, session: Session, now: Instant, timed_out: bool) -> Outcome {
        let candidate = normalize(session.finish());
        if candidate.is_empty() {
            warn!("Enrolling an empty gesture; gesture unlock stays unavailable");
        }

        let saved = self.store.save(&candidate);
        self.reference = candidate;

        let kind = match saved {
            Ok(()) if timed_out => StatusKind::AutoSaved,
            Ok(()) => StatusKind::Saved,
            Err(e) => {
                warn!("Failed to persist gesture credential: {}", e);
                StatusKind::SaveFailed
            }
        };
        info!(points = self.reference.len(), "Gesture enrolled");
        self.set_status(kind, now);
        Outcome::Updated
    }

    fn finish_verification(&mut self, session: Session, now: Instant, timed_out: bool) -> Outcome {
        let candidate = normalize(session.finish());
        let breakdown = score_breakdown(self.reference.as_slice(), candidate.as_slice());
        info!(
            similarity = breakdown.total,
            spatial = breakdown.spatial,
            kind = breakdown.kind,
            compared = breakdown.compared,
            timed_out,
            "Gesture verification"
        );

        if breakdown.total > self.accept_threshold {
            return self.unlock();
        }

        self.record_failure();
        let kind = if timed_out {
            StatusKind::AutoRejected
        } else {
            StatusKind::Incorrect
        };
        self.set_status(kind, now);
        Outcome::Updated
    }

    fn submit_typed(&mut self, now: Instant) -> Outcome {
        if self.secret.verify(self.state.typed.as_str()) {
            self.state.typed.clear();
            return self.unlock();
        }

        self.record_failure();
        self.state.typed.clear();
        self.set_status(StatusKind::Incorrect, now);
        Outcome::Updated
    }

    fn cancel(&mut self, now: Instant) -> Outcome {
        if self.state.session.take().is_some() {
            self.set_status(StatusKind::Cancelled, now);
            return Outcome::Updated;
        }

        if self.state.input_mode == InputMode::Keyboard && self.state.typed.len() > 0 {
            self.state.typed.clear();
            return Outcome::Updated;
        }

        Outcome::Ignored
    }

    fn type_char(&mut self, c: char) -> Outcome {
        if self.state.input_mode == InputMode::Keyboard && self.state.typed.push(c) {
            Outcome::Updated
        } else {
            Outcome::Ignored
        }
    }

    fn backspace(&mut self) -> Outcome {
        if self.state.input_mode == InputMode::Keyboard && self.state.typed.pop() {
            Outcome::Updated
        } else {
            Outcome::Ignored
        }
    }

    fn record_failure(&mut self) {
        self.state.failed_attempts = self.state.failed_attempts.saturating_add(1);
        info!(failed_attempts = self.state.failed_attempts, "Unlock attempt rejected");
    }

    fn unlock(&mut self) -> Outcome {
        info!("Unlocked");
        self.state.unlocked = true;
        self.state.session = None;
        self.state.status = None;
        Outcome::Unlocked
    }

    fn set_status(&mut self, kind: StatusKind, now: Instant) {
        debug!(?kind, "Status");
        self.state.status = Some(StatusMessage::new(kind, now, self.status_max_chars));
    }

    fn expire_status(&mut self, now: Instant) {
        let ttl = self.status_ttl;
        if self
            .state
            .status
            .as_ref()
            .is_some_and(|status| status.is_expired(now, ttl))
        {
            self.state.status = None;
        }
    }
}
