//! Gesture data model

use std::fmt;

use crate::error::Result;

/// Kind of pointer event recorded in a gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Pointer motion
    Move,
    /// Pointer button press
    Click,
}

impl GestureKind {
    /// Single-character tag used by the credential file
    pub fn as_char(self) -> char {
        match self {
            GestureKind::Move => 'm',
            GestureKind::Click => 'c',
        }
    }

    /// Parse a credential file tag
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'm' => Some(GestureKind::Move),
            'c' => Some(GestureKind::Click),
            _ => None,
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureKind::Move => write!(f, "move"),
            GestureKind::Click => write!(f, "click"),
        }
    }
}

/// A single timed pointer event
///
/// `t` is seconds since the owning session started. Before normalisation
/// `x`/`y` are raw surface coordinates, afterwards they are unit-relative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub x: f64,
    pub y: f64,
    pub kind: GestureKind,
    pub t: f64,
}

impl GestureEvent {
    /// Create a new event
    pub fn new(kind: GestureKind, x: f64, y: f64, t: f64) -> Self {
        Self { x, y, kind, t }
    }

    /// Shorthand for a move event
    pub fn moved(x: f64, y: f64, t: f64) -> Self {
        Self::new(GestureKind::Move, x, y, t)
    }

    /// Shorthand for a click event
    pub fn click(x: f64, y: f64, t: f64) -> Self {
        Self::new(GestureKind::Click, x, y, t)
    }

    /// Euclidean distance to another event, ignoring time and kind
    pub fn distance(&self, other: &GestureEvent) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Ordered, append-only sequence of gesture events
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureSequence {
    events: Vec<GestureEvent>,
}

impl GestureSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, growing the buffer as needed
    ///
    /// Fails only when the allocator cannot provide more room.
    pub fn try_push(&mut self, event: GestureEvent) -> Result<()> {
        self.events.try_reserve(1)?;
        self.events.push(event);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Last recorded event
    pub fn last(&self) -> Option<&GestureEvent> {
        self.events.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GestureEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[GestureEvent] {
        &self.events
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [GestureEvent] {
        &mut self.events
    }

    /// Drop every event, keeping the allocation
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl From<Vec<GestureEvent>> for GestureSequence {
    fn from(events: Vec<GestureEvent>) -> Self {
        Self { events }
    }
}

impl FromIterator<GestureEvent> for GestureSequence {
    fn from_iter<I: IntoIterator<Item = GestureEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GestureSequence {
    type Item = &'a GestureEvent;
    type IntoIter = std::slice::Iter<'a, GestureEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
