//! Cooperative control loop
//!
//! One thread polls the input layer. A pending event is dispatched to the
//! authenticator right away; otherwise the loop checks the capture deadline
//! and sleeps briefly. The presentation layer is refreshed once per second
//! and after every event that changed something.
//!
//! Input and rendering failures never end the loop: the screen stays locked
//! and the failure is logged. Only running out of gesture buffer is fatal.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::auth::{Authenticator, Outcome};
use crate::error::{Error, Result};
use crate::input::InputEvent;
use crate::store::CredentialStore;
use crate::view::LockView;

/// Source of wall-clock time
pub trait Clock {
    fn now(&self) -> Instant;

    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// The real clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Non-blocking supplier of input events
pub trait InputSource {
    /// Return the next pending event, or `None` if nothing is waiting
    fn poll_event(&mut self) -> Result<Option<InputEvent>>;

    /// Whether the source will never produce another event
    fn is_closed(&self) -> bool {
        false
    }
}

/// Receiver of drawable state
pub trait Presenter {
    fn present(&mut self, view: &LockView<'_>) -> Result<()>;
}

/// Why the control loop returned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// The user unlocked the screen
    Unlocked,
    /// The input layer went away
    InputClosed,
}

/// Default interval between unconditional redraws
const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// The lock screen control loop
#[derive(Debug)]
pub struct LockLoop<C: Clock> {
    clock: C,
    idle_sleep: Duration,
    last_refresh: Option<Instant>,
}

/// Keep collaborator failures inside the loop, pass fatal ones on
fn tolerate(result: Result<()>, what: &str) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e @ Error::BufferExhausted(_)) => Err(e),
        Err(e) => {
            warn!("{} failed, staying locked: {}", what, e);
            Ok(())
        }
    }
}

impl<C: Clock> LockLoop<C> {
    /// Create a loop that sleeps `idle_sleep` whenever no input is pending
    pub fn new(clock: C, idle_sleep: Duration) -> Self {
        Self {
            clock,
            idle_sleep,
            last_refresh: None,
        }
    }

    /// Run until the screen is unlocked or the input source closes
    pub fn run<S, I, P>(
        &mut self,
        auth: &mut Authenticator<S>,
        input: &mut I,
        presenter: &mut P,
    ) -> Result<LoopExit>
    where
        S: CredentialStore,
        I: InputSource,
        P: Presenter,
    {
        info!("Lock loop started");
        loop {
            if let Some(exit) = self.step(auth, input, presenter)? {
                info!(?exit, "Lock loop finished");
                return Ok(exit);
            }
        }
    }

    /// Run a single iteration of the loop
    pub fn step<S, I, P>(
        &mut self,
        auth: &mut Authenticator<S>,
        input: &mut I,
        presenter: &mut P,
    ) -> Result<Option<LoopExit>>
    where
        S: CredentialStore,
        I: InputSource,
        P: Presenter,
    {
        let now = self.clock.now();

        let refresh_due = self
            .last_refresh
            .map_or(true, |last| now.saturating_duration_since(last) >= REFRESH_INTERVAL);
        if refresh_due {
            tolerate(presenter.present(&auth.view(now)), "Redraw")?;
            self.last_refresh = Some(now);
        }

        let polled = match input.poll_event() {
            Ok(polled) => polled,
            Err(e @ Error::BufferExhausted(_)) => return Err(e),
            Err(e) => {
                warn!("Reading input failed, staying locked: {}", e);
                None
            }
        };

        let outcome = match polled {
            Some(event) => auth.handle(event, now)?,
            None => {
                if input.is_closed() {
                    debug!("Input source closed");
                    return Ok(Some(LoopExit::InputClosed));
                }
                let outcome = auth.poll_timeout(now);
                if outcome == Outcome::Ignored {
                    self.clock.sleep(self.idle_sleep);
                }
                outcome
            }
        };

        match outcome {
            Outcome::Unlocked => Ok(Some(LoopExit::Unlocked)),
            Outcome::Updated => {
                tolerate(presenter.present(&auth.view(now)), "Redraw")?;
                Ok(None)
            }
            Outcome::Ignored => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Phase;
    use crate::config::LockConfig;
    use crate::store::MemoryCredentialStore;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Instant>>);

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }

        fn sleep(&self, duration: Duration) {
            self.0.set(self.0.get() + duration);
        }
    }

    struct Script {
        events: VecDeque<InputEvent>,
        close_when_empty: bool,
    }

    impl InputSource for Script {
        fn poll_event(&mut self) -> Result<Option<InputEvent>> {
            Ok(self.events.pop_front())
        }

        fn is_closed(&self) -> bool {
            self.close_when_empty && self.events.is_empty()
        }
    }

    #[derive(Default)]
    struct Frames {
        phases: Vec<Phase>,
    }

    impl Presenter for Frames {
        fn present(&mut self, view: &LockView<'_>) -> Result<()> {
            self.phases.push(view.phase);
            Ok(())
        }
    }

    #[test]
    fn test_typed_secret_unlocks() {
        let clock = ManualClock(Rc::new(Cell::new(Instant::now())));
        let mut lock = LockLoop::new(clock, Duration::from_millis(10));
        let mut auth =
            Authenticator::new(&LockConfig::default(), MemoryCredentialStore::new()).unwrap();
        let mut frames = Frames::default();

        let exit = lock.run(&mut auth, &mut typed_secret(), &mut frames).unwrap();

        assert_eq!(exit, LoopExit::Unlocked);
        assert_eq!(frames.phases.first(), Some(&Phase::KeyboardMode));
    }

    #[test]
    fn test_closed_input_ends_loop() {
        let clock = ManualClock(Rc::new(Cell::new(Instant::now())));
        let mut lock = LockLoop::new(clock, Duration::from_millis(10));
        let mut auth =
            Authenticator::new(&LockConfig::default(), MemoryCredentialStore::new()).unwrap();
        let mut input = Script {
            events: VecDeque::from([InputEvent::Character('9')]),
            close_when_empty: true,
        };

        let exit = lock
            .run(&mut auth, &mut input, &mut Frames::default())
            .unwrap();
        assert_eq!(exit, LoopExit::InputClosed);
        assert_eq!(auth.state().typed_len(), 1);
    }

    #[test]
    fn test_idle_iterations_close_expired_session() {
        let start = Instant::now();
        let clock = ManualClock(Rc::new(Cell::new(start)));
        let mut lock = LockLoop::new(clock.clone(), Duration::from_millis(100));
        let mut auth =
            Authenticator::new(&LockConfig::default(), MemoryCredentialStore::new()).unwrap();
        let mut input = Script {
            events: VecDeque::from([InputEvent::StartEnroll, InputEvent::PointerMove(3.0, 4.0)]),
            close_when_empty: false,
        };
        let mut frames = Frames::default();

        while auth.phase() != Phase::GestureIdle {
            assert!(lock.step(&mut auth, &mut input, &mut frames).unwrap().is_none());
        }

        // The session ends on the first idle poll at or after the window
        let elapsed = clock.now().duration_since(start);
        assert_eq!(elapsed, Duration::from_secs(5));
        assert_eq!(auth.reference().len(), 1);
        assert!(frames.phases.contains(&Phase::Enrolling));
        assert!(frames.phases.len() < 60);
    }

    /// Fails the first `failures` presents with `error`, then records phases
    struct Flaky {
        failures: usize,
        error: fn() -> Error,
        frames: Frames,
    }

    impl Presenter for Flaky {
        fn present(&mut self, view: &LockView<'_>) -> Result<()> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err((self.error)());
            }
            self.frames.present(view)
        }
    }

    fn typed_secret() -> Script {
        Script {
            events: "123"
                .chars()
                .map(InputEvent::Character)
                .chain([InputEvent::Confirm])
                .collect(),
            close_when_empty: false,
        }
    }

    #[test]
    fn test_render_failure_keeps_screen_locked() {
        let clock = ManualClock(Rc::new(Cell::new(Instant::now())));
        let mut lock = LockLoop::new(clock, Duration::from_millis(10));
        let mut auth =
            Authenticator::new(&LockConfig::default(), MemoryCredentialStore::new()).unwrap();
        let mut idle = Script {
            events: VecDeque::new(),
            close_when_empty: false,
        };
        let mut presenter = Flaky {
            failures: 1,
            error: || Error::Render("transient".to_string()),
            frames: Frames::default(),
        };

        // The failing redraw is survived and nothing is released
        assert!(lock.step(&mut auth, &mut idle, &mut presenter).unwrap().is_none());
        assert!(!auth.is_unlocked());

        let exit = lock
            .run(&mut auth, &mut typed_secret(), &mut presenter)
            .unwrap();
        assert_eq!(exit, LoopExit::Unlocked);
        assert!(!presenter.frames.phases.is_empty());
    }

    #[test]
    fn test_input_failure_keeps_screen_locked() {
        struct Broken {
            failures: usize,
            then: Script,
        }

        impl InputSource for Broken {
            fn poll_event(&mut self) -> Result<Option<InputEvent>> {
                if self.failures > 0 {
                    self.failures -= 1;
                    return Err(Error::Input("device gone".to_string()));
                }
                self.then.poll_event()
            }
        }

        let clock = ManualClock(Rc::new(Cell::new(Instant::now())));
        let mut lock = LockLoop::new(clock, Duration::from_millis(10));
        let mut auth =
            Authenticator::new(&LockConfig::default(), MemoryCredentialStore::new()).unwrap();
        let mut input = Broken {
            failures: 3,
            then: typed_secret(),
        };

        let exit = lock
            .run(&mut auth, &mut input, &mut Frames::default())
            .unwrap();
        assert_eq!(exit, LoopExit::Unlocked);
    }

    #[test]
    fn test_buffer_exhaustion_is_fatal() {
        let clock = ManualClock(Rc::new(Cell::new(Instant::now())));
        let mut lock = LockLoop::new(clock, Duration::from_millis(10));
        let mut auth =
            Authenticator::new(&LockConfig::default(), MemoryCredentialStore::new()).unwrap();
        let mut presenter = Flaky {
            failures: 1,
            error: || Error::BufferExhausted("out of memory".to_string()),
            frames: Frames::default(),
        };

        let result = lock.run(&mut auth, &mut typed_secret(), &mut presenter);
        assert!(matches!(result, Err(Error::BufferExhausted(_))));
        assert!(!auth.is_unlocked());
    }
}
