//! Minimum-curvature increment between two survey stations.
//!
//! The method assumes the hole follows a circular arc between stations. With
//! `θ` the angle from vertical-down and `α` the azimuth:
//!
//! - dogleg `B = acos(cos(θ₂ - θ₁) - sin θ₁ sin θ₂ (1 - cos(α₂ - α₁)))`
//! - ratio factor `RF = (2 / B) tan(B / 2)`
//! - `(dN, dE, dV) = MD/2 · (t₁ + t₂) · RF` where `t = (sin θ cos α, sin θ sin α, cos θ)`
//!
//! Reference: <https://www.drillingformulas.com/minimum-curvature-method/>
//!
//! Numerical notes:
//! - The `acos` argument can overshoot `[-1, 1]` by a few ulps for nearly
//!   collinear tangents, so it is clamped first.
//! - `RF → 1` as `B → 0`. Below `SMALL_B` we use the series
//!   `1 + B²/12 + B⁴/120` instead of dividing by a tiny angle; at exactly zero
//!   this is `1`.

use nalgebra::Vector3;
use thiserror::Error;

use crate::domain::{Segment, Station, VerticalGuard};

/// Below this dogleg (radians) the ratio factor is evaluated by series.
const SMALL_B: f64 = 1e-4;

/// Dip magnitude treated as the vertical singularity.
const VERTICAL_DIP: f64 = 90.0;

/// Convert dip (from horizontal, negative down) to the angle from vertical-down, radians.
pub fn dip_to_theta(dip: f64) -> f64 {
    (90.0 + dip).to_radians()
}

/// Unit tangent in (north, east, down) components.
pub fn tangent(dip: f64, azimuth: f64) -> Vector3<f64> {
    let theta = dip_to_theta(dip);
    let alpha = azimuth.to_radians();
    Vector3::new(theta.sin() * alpha.cos(), theta.sin() * alpha.sin(), theta.cos())
}

/// 3D angle (radians) between the tangents of two stations.
///
/// Returns NaN when an input is NaN; callers check.
pub fn dogleg(from: &Station, to: &Station) -> f64 {
    let t1 = dip_to_theta(from.dip);
    let t2 = dip_to_theta(to.dip);
    let a1 = from.azimuth.to_radians();
    let a2 = to.azimuth.to_radians();

    let arg = (t2 - t1).cos() - t1.sin() * t2.sin() * (1.0 - (a2 - a1).cos());
    arg.clamp(-1.0, 1.0).acos()
}

/// Ratio factor for a dogleg `b` (radians).
pub fn ratio_factor(b: f64) -> f64 {
    if b.abs() < SMALL_B {
        let b2 = b * b;
        return 1.0 + b2 / 12.0 + b2 * b2 / 120.0;
    }
    (2.0 / b) * (b / 2.0).tan()
}

/// Why a station pair has no well-defined increment.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SegmentFault {
    #[error("non-finite {name} ({value})")]
    NonFiniteAngle { name: &'static str, value: f64 },

    #[error("non-finite segment length ({0})")]
    NonFiniteLength(f64),

    #[error("negative segment length ({0})")]
    NegativeLength(f64),

    #[error("dogleg angle is undefined (NaN after clamping)")]
    UndefinedDogleg,
}

fn is_vertical(dip: f64) -> bool {
    dip.abs() == VERTICAL_DIP
}

/// Compute the increment from `from` to `to`.
///
/// The dogleg is always the true angle between the two tangents. The vertical
/// shortcut only replaces the displacement (straight down by MD, RF = 1).
/// The solver attaches hole and depth to a [`SegmentFault`].
pub fn segment(from: &Station, to: &Station, guard: VerticalGuard) -> Result<Segment, SegmentFault> {
    for (name, v) in [
        ("dip", from.dip),
        ("azimuth", from.azimuth),
        ("dip", to.dip),
        ("azimuth", to.azimuth),
    ] {
        if !v.is_finite() {
            return Err(SegmentFault::NonFiniteAngle { name, value: v });
        }
    }

    let md = to.depth - from.depth;
    if !md.is_finite() {
        return Err(SegmentFault::NonFiniteLength(md));
    }
    if md < 0.0 {
        return Err(SegmentFault::NegativeLength(md));
    }

    let vertical_shortcut = match guard {
        VerticalGuard::Start => is_vertical(from.dip),
        VerticalGuard::Both => is_vertical(from.dip) && is_vertical(to.dip),
    };

    let b = dogleg(from, to);
    if b.is_nan() {
        return Err(SegmentFault::UndefinedDogleg);
    }

    let mut seg = Segment {
        from_depth: from.depth,
        to_depth: to.depth,
        md,
        dogleg_rad: b,
        ratio_factor: 1.0,
        d_north: 0.0,
        d_east: 0.0,
        d_vertical: 0.0,
    };

    if md == 0.0 {
        return Ok(seg);
    }

    if vertical_shortcut {
        seg.d_vertical = md;
        return Ok(seg);
    }

    let rf = ratio_factor(b);
    let d = (tangent(from.dip, from.azimuth) + tangent(to.dip, to.azimuth)) * (md / 2.0 * rf);
    seg.ratio_factor = rf;
    seg.d_north = d.x;
    seg.d_east = d.y;
    seg.d_vertical = d.z;
    Ok(seg)
}
