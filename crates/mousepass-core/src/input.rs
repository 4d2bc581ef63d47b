//! Events consumed from the input layer

/// Discrete event delivered by the shell
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a surface coordinate
    PointerMove(f64, f64),
    /// Pointer button pressed at a surface coordinate
    PointerDown(f64, f64),
    /// End of gesture, or submit the typed secret
    Confirm,
    /// Abandon the current capture or typed input
    Cancel,
    /// Record a new reference gesture
    StartEnroll,
    /// Switch between keyboard and gesture input
    ToggleGestureMode,
    /// A typed character
    Character(char),
    /// Remove the last typed character
    Backspace,
}
