//! Jump arc profile
//!
//! Maps jump progress in [0, 1] to a vertical offset added on top of the
//! straight line between the start and destination of a jump.

use serde::{Deserialize, Serialize};

/// One key of a piecewise-linear arc curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcKey {
    /// Progress at which this key applies
    pub time: f32,
    /// Height offset at that progress
    pub value: f32,
}

/// Vertical offset curve applied while jumping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpArc {
    /// No vertical offset
    Flat,
    /// Symmetric parabola peaking at `height` halfway through the jump
    Parabola { height: f32 },
    /// Piecewise-linear curve, keys sorted by time; clamped outside the key range
    Keyframes { keys: Vec<ArcKey> },
}

impl Default for JumpArc {
    fn default() -> Self {
        JumpArc::Parabola { height: 1.5 }
    }
}

impl JumpArc {
    /// Height offset at the given progress
    pub fn evaluate(&self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            JumpArc::Flat => 0.0,
            JumpArc::Parabola { height } => 4.0 * height * t * (1.0 - t),
            JumpArc::Keyframes { keys } => evaluate_keys(keys, t),
        }
    }
}

fn evaluate_keys(keys: &[ArcKey], t: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return 0.0;
    };
    if t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }

    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.time {
            let span = b.time - a.time;
            if span <= f32::EPSILON {
                return b.value;
            }
            let local = (t - a.time) / span;
            return a.value + (b.value - a.value) * local;
        }
    }
    last.value
}
