//! Yarn centerline of a knitted loop structure.
//!
//! The centerline is the closed-form curve
//!
//! ```text
//! x(t) = t + a·sin(2t)
//! y(t) = h·cos(t)
//! z(t) = d·cos(2t)
//! ```
//!
//! One loop spans 2π in `t` and drifts exactly 2π along the course (X) direction.
//! All derivatives are analytic so frames built on top of the curve vary smoothly.

use serde::Serialize;

use super::core::Vec3;

/// A curve with analytic first and second derivatives.
///
/// The Frenet frame solver is generic over this trait; the yarn centerline is
/// the production implementation.
pub trait ParametricCurve {
    fn point_at(&self, t: f64) -> Vec3;

    /// First derivative (unnormalized tangent).
    fn derivative_at(&self, t: f64) -> Vec3;

    fn second_derivative_at(&self, t: f64) -> Vec3;

    /// Derivative of the squared speed `‖γ'(t)‖²`.
    #[must_use]
    fn speed_squared_rate_at(&self, t: f64) -> f64 {
        2.0 * self.derivative_at(t).dot(self.second_derivative_at(t))
    }

    /// Shape constants reported when the frame at `t` is degenerate.
    #[must_use]
    fn shape(&self) -> ShapeParams;
}

/// Loop shape constants, fixed for the whole curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeParams {
    /// Loop roundness.
    pub a: f64,
    /// Loop height.
    pub h: f64,
    /// Loop depth.
    pub d: f64,
}

impl ShapeParams {
    #[must_use]
    pub const fn new(a: f64, h: f64, d: f64) -> Self {
        Self { a, h, d }
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.a.is_finite() && self.h.is_finite() && self.d.is_finite()
    }
}

/// The yarn centerline for one set of [`ShapeParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnitCurve {
    pub shape: ShapeParams,
}

impl KnitCurve {
    #[must_use]
    pub const fn new(shape: ShapeParams) -> Self {
        Self { shape }
    }
}

impl ParametricCurve for KnitCurve {
    fn point_at(&self, t: f64) -> Vec3 {
        let ShapeParams { a, h, d } = self.shape;
        Vec3::new(t + a * (2.0 * t).sin(), h * t.cos(), d * (2.0 * t).cos())
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let ShapeParams { a, h, d } = self.shape;
        Vec3::new(
            1.0 + 2.0 * a * (2.0 * t).cos(),
            -h * t.sin(),
            -2.0 * d * (2.0 * t).sin(),
        )
    }

    fn second_derivative_at(&self, t: f64) -> Vec3 {
        let ShapeParams { a, h, d } = self.shape;
        Vec3::new(
            -4.0 * a * (2.0 * t).sin(),
            -h * t.cos(),
            -4.0 * d * (2.0 * t).cos(),
        )
    }

    fn speed_squared_rate_at(&self, t: f64) -> f64 {
        let ShapeParams { a, h, d } = self.shape;
        let (sin_t, cos_t) = t.sin_cos();
        let (sin_2t, cos_2t) = (2.0 * t).sin_cos();
        2.0 * h * h * cos_t * sin_t + 16.0 * d * d * cos_2t * sin_2t
            - 8.0 * a * (1.0 + 2.0 * a * cos_2t) * sin_2t
    }

    fn shape(&self) -> ShapeParams {
        self.shape
    }
}

/// Point on the yarn centerline at parameter `t`.
#[must_use]
pub fn centerline(t: f64, shape: ShapeParams) -> Vec3 {
    KnitCurve::new(shape).point_at(t)
}
