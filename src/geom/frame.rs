//! Analytic Frenet frames along a [`ParametricCurve`].
//!
//! The normal is the derivative of the unit tangent,
//!
//! ```text
//! d/dt (γ' / √u) = u^(-1/2)·γ'' − (u' / (2·u^(3/2)))·γ'      with u = ‖γ'‖²
//! ```
//!
//! normalized afterwards. Using the exact derivative instead of a fixed up-vector
//! keeps the frame continuous along the whole curve, so fibers wound around it do
//! not jitter.

use super::core::{Tolerance, Vec3};
use super::yarn::{KnitCurve, ParametricCurve, ShapeParams};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("curve parameter must be finite, got {0}")]
    NonFiniteParameter(f64),
    #[error("shape parameters must be finite (a = {a}, h = {h}, d = {d})")]
    NonFiniteShape { a: f64, h: f64, d: f64 },
    #[error("degenerate tangent at t = {t} for shape parameters a = {a}, h = {h}, d = {d}")]
    DegenerateTangent { t: f64, a: f64, h: f64, d: f64 },
    #[error("degenerate normal (zero curvature) at t = {t} for shape parameters a = {a}, h = {h}, d = {d}")]
    DegenerateNormal { t: f64, a: f64, h: f64, d: f64 },
}

impl FrameError {
    fn degenerate_tangent(t: f64, shape: ShapeParams) -> Self {
        Self::DegenerateTangent { t, a: shape.a, h: shape.h, d: shape.d }
    }

    fn degenerate_normal(t: f64, shape: ShapeParams) -> Self {
        Self::DegenerateNormal { t, a: shape.a, h: shape.h, d: shape.d }
    }
}

/// Right-handed orthonormal frame attached to a curve point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrenetFrame {
    /// Unit tangent `e1`.
    pub tangent: Vec3,
    /// Unit principal normal `e2`, pointing toward the center of curvature.
    pub normal: Vec3,
    /// Unit binormal `e3 = e1 × e2`.
    pub binormal: Vec3,
}

impl FrenetFrame {
    /// Largest deviation from an exact right-handed orthonormal basis.
    ///
    /// Covers unit lengths, pairwise dot products and `binormal - tangent × normal`.
    #[must_use]
    pub fn orthonormality_error(&self) -> f64 {
        let Self { tangent, normal, binormal } = *self;
        [
            (tangent.length() - 1.0).abs(),
            (normal.length() - 1.0).abs(),
            (binormal.length() - 1.0).abs(),
            tangent.dot(normal).abs(),
            tangent.dot(binormal).abs(),
            normal.dot(binormal).abs(),
            (binormal - tangent.cross(normal)).length(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

/// Frenet frame of the yarn centerline at `t`.
pub fn frenet_frame(t: f64, shape: ShapeParams) -> Result<FrenetFrame, FrameError> {
    if !shape.is_finite() {
        return Err(FrameError::NonFiniteShape { a: shape.a, h: shape.h, d: shape.d });
    }
    frenet_frame_at(&KnitCurve::new(shape), t)
}

/// Frenet frame of any analytic curve at `t`.
///
/// Fails instead of producing NaN when the tangent or the curvature vanishes.
pub fn frenet_frame_at<C: ParametricCurve>(curve: &C, t: f64) -> Result<FrenetFrame, FrameError> {
    if !t.is_finite() {
        return Err(FrameError::NonFiniteParameter(t));
    }

    let velocity = curve.derivative_at(t);
    let speed_squared = velocity.length_squared();
    let speed = speed_squared.sqrt();
    if !speed.is_finite() || Tolerance::ZERO_LENGTH.is_zero_length(speed) {
        return Err(FrameError::degenerate_tangent(t, curve.shape()));
    }

    let rate = curve.speed_squared_rate_at(t);
    let inv_speed = 1.0 / speed;
    let tangent_rate_coeff = rate / (2.0 * speed_squared * speed);

    let raw_normal = curve.second_derivative_at(t).mul_scalar(inv_speed)
        - velocity.mul_scalar(tangent_rate_coeff);
    let normal_length = raw_normal.length();
    if !normal_length.is_finite() || Tolerance::ZERO_LENGTH.is_zero_length(normal_length) {
        return Err(FrameError::degenerate_normal(t, curve.shape()));
    }

    let tangent = velocity.mul_scalar(inv_speed);
    let normal = raw_normal.mul_scalar(1.0 / normal_length);
    let binormal = tangent.cross(normal);

    Ok(FrenetFrame { tangent, normal, binormal })
}
