//! Translation and scale invariant gesture normalisation

use crate::gesture::GestureSequence;
use crate::DEGENERATE_SCALE;

/// Rescale a gesture into its own bounding box
///
/// The box is anchored at the origin and its longer side becomes `1.0`, so
/// the aspect ratio survives. A near-stationary gesture keeps a scale of
/// `1.0` and is only translated. Time stamps and kinds are untouched.
pub fn normalize(mut seq: GestureSequence) -> GestureSequence {
    if seq.is_empty() {
        return seq;
    }

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for event in &seq {
        min_x = min_x.min(event.x);
        min_y = min_y.min(event.y);
        max_x = max_x.max(event.x);
        max_y = max_y.max(event.y);
    }

    let mut scale = (max_x - min_x).max(max_y - min_y);
    if scale < DEGENERATE_SCALE {
        scale = 1.0;
    }

    for event in seq.as_mut_slice() {
        event.x = (event.x - min_x) / scale;
        event.y = (event.y - min_y) / scale;
    }

    seq
}
