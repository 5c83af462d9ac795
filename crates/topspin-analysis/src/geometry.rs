//! Shared 2D geometry and scoring primitives.
//!
//! All angles are in degrees. Points are `(x, y)` tuples in either
//! image-relative or body-relative coordinates; the math is the same.

/// Angle at vertex `b` formed by the segments to `a` and to `c`.
///
/// Returns 0.0 when either segment is degenerate (coincident points).
pub fn joint_angle_degrees(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let ba = (a.0 - b.0, a.1 - b.1);
    let bc = (c.0 - b.0, c.1 - b.1);

    let norm_ba = ba.0.hypot(ba.1);
    let norm_bc = bc.0.hypot(bc.1);
    if norm_ba == 0.0 || norm_bc == 0.0 {
        return 0.0;
    }

    let dot = ba.0 * bc.0 + ba.1 * bc.1;
    let cos_theta = (dot / (norm_ba * norm_bc)).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}

/// Orientation of the segment `from -> to` against the horizontal axis,
/// in (-180, 180].
pub fn segment_orientation_degrees(from: (f64, f64), to: (f64, f64)) -> f64 {
    (to.1 - from.1).atan2(to.0 - from.0).to_degrees()
}

/// Tilt of the shoulder line against horizontal, folded into [0, 90].
pub fn shoulder_tilt_degrees(left: (f64, f64), right: (f64, f64)) -> f64 {
    let angle = segment_orientation_degrees(left, right).abs();
    if angle > 90.0 {
        180.0 - angle
    } else {
        angle
    }
}

/// Euclidean distance between two points.
pub fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Fold a raw angle difference into [-180, 180].
pub fn normalize_angle_delta(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Closeness of a measurement to a target as a [0, 1] score: 1.0 at the
/// target, falling off linearly to 0.0 at `span` away.
pub fn proximity_score(measured: f64, target: f64, span: f64) -> f64 {
    (1.0 - (measured - target).abs() / span).max(0.0)
}
