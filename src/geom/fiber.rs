//! Fiber strands wound helically around the yarn centerline.

use serde::Serialize;

use super::core::Vec3;
use super::frame::{FrameError, FrenetFrame, frenet_frame};
use super::yarn::{ShapeParams, centerline};

/// Per-fiber constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiberParams {
    /// Tube radius `r` around the centerline.
    pub radius: f64,
    /// Twist rate `ω`.
    pub omega: f64,
    /// Phase offset `φ` separating one fiber from the next.
    pub phase: f64,
}

impl FiberParams {
    #[must_use]
    pub const fn new(radius: f64, omega: f64, phase: f64) -> Self {
        Self { radius, omega, phase }
    }
}

/// Winding angle `θ(t) = t·ω − 2·cos(t) + φ`.
#[must_use]
pub fn winding_angle(t: f64, omega: f64, phase: f64) -> f64 {
    t * omega - 2.0 * t.cos() + phase
}

/// Fiber position at `t`: the centerline point displaced by `r` in the normal/binormal plane.
pub fn fiber_point(t: f64, shape: ShapeParams, fiber: FiberParams) -> Result<Vec3, FrameError> {
    let frame = frenet_frame(t, shape)?;
    Ok(fiber_point_with_frame(t, shape, &frame, fiber))
}

/// Same as [`fiber_point`] for a frame the caller already solved at `t`.
#[must_use]
pub fn fiber_point_with_frame(
    t: f64,
    shape: ShapeParams,
    frame: &FrenetFrame,
    fiber: FiberParams,
) -> Vec3 {
    let gamma = centerline(t, shape);
    let (sin_theta, cos_theta) = winding_angle(t, fiber.omega, fiber.phase).sin_cos();
    let offset = frame.normal.mul_scalar(cos_theta) + frame.binormal.mul_scalar(sin_theta);
    gamma + offset.mul_scalar(fiber.radius)
}
