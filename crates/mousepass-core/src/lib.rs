//! Mousepass Core - Gesture capture, scoring and the unlock state machine
//!
//! This crate holds everything the lock screen needs to reason about:
//! - Capturing timed pointer gestures inside a bounded window
//! - Normalising gestures into a translation and scale invariant space
//! - Scoring a candidate gesture against the enrolled reference
//! - Persisting the single reference credential
//! - The authenticator state machine and its control loop
//!
//! Window creation, input grabbing and rendering are left to the shell
//! (see the `mousepass-tui` crate), which feeds [`InputEvent`]s in and pulls
//! a [`LockView`] out.

pub mod auth;
pub mod capture;
pub mod config;
pub mod driver;
pub mod error;
pub mod gesture;
pub mod input;
pub mod normalize;
pub mod score;
pub mod store;
pub mod view;

pub use auth::{
    Authenticator, AuthenticatorState, InputMode, KeyboardSecret, Outcome, Phase, Session,
    SessionMode, StatusKind, StatusMessage,
};
pub use capture::EventCapture;
pub use config::LockConfig;
pub use driver::{Clock, InputSource, LockLoop, LoopExit, Presenter, SystemClock};
pub use error::{Error, Result};
pub use gesture::{GestureEvent, GestureKind, GestureSequence};
pub use input::InputEvent;
pub use normalize::normalize;
pub use score::{score, score_breakdown, ScoreBreakdown};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use view::LockView;

use std::time::Duration;

/// Default capture window for a gesture session
pub const CAPTURE_WINDOW: Duration = Duration::from_secs(5);

/// Default similarity a verification must exceed to unlock
pub const ACCEPT_THRESHOLD: f64 = 0.90;

/// How long a status message stays visible
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Longest status text the presentation layer displays
pub const STATUS_MAX_CHARS: usize = 127;

/// Weight of the spatial term in the similarity score
pub const SPATIAL_WEIGHT: f64 = 0.7;

/// Weight of the event-type term in the similarity score
pub const KIND_WEIGHT: f64 = 0.3;

/// Bounding boxes smaller than this are treated as a single point
pub const DEGENERATE_SCALE: f64 = 1e-5;

/// Credential file name inside the config directory
pub const CREDENTIAL_FILE_NAME: &str = "mouse_password.dat";
