//! Similarity scoring between two normalised gestures
//!
//! Events are compared by index only. Both gestures are assumed to be sampled
//! at a comparable rate over the same window, so no resampling or time
//! warping happens here; a candidate with a different event count or pace
//! simply scores lower. Events past the shorter sequence are ignored.

use crate::gesture::GestureEvent;
use crate::{KIND_WEIGHT, SPATIAL_WEIGHT};

/// Per-term view of a similarity score
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
    /// Mean spatial closeness in `[0, 1]`
    pub spatial: f64,
    /// Fraction of aligned events with matching kind
    pub kind: f64,
    /// Weighted total in `[0, 1]`
    pub total: f64,
    /// Number of aligned events that were compared
    pub compared: usize,
}

impl ScoreBreakdown {
    fn empty() -> Self {
        Self {
            spatial: 0.0,
            kind: 0.0,
            total: 0.0,
            compared: 0,
        }
    }
}

/// Score `candidate` against `reference`, returning a value in `[0, 1]`
///
/// An empty sequence on either side scores `0.0`.
pub fn score(reference: &[GestureEvent], candidate: &[GestureEvent]) -> f64 {
    score_breakdown(reference, candidate).total
}

/// Same as [`score`] but keeps the individual terms
pub fn score_breakdown(reference: &[GestureEvent], candidate: &[GestureEvent]) -> ScoreBreakdown {
    let n = reference.len().min(candidate.len());
    if n == 0 {
        return ScoreBreakdown::empty();
    }

    let (spatial_sum, kind_sum) = reference
        .iter()
        .zip(candidate)
        .fold((0.0, 0.0), |(spatial, kind), (r, c)| {
            let closeness = 1.0 - r.distance(c).min(1.0);
            let same_kind = if r.kind == c.kind { 1.0 } else { 0.0 };
            (spatial + closeness, kind + same_kind)
        });

    let spatial = spatial_sum / n as f64;
    let kind = kind_sum / n as f64;

    ScoreBreakdown {
        spatial,
        kind,
        total: SPATIAL_WEIGHT * spatial + KIND_WEIGHT * kind,
        compared: n,
    }
}
