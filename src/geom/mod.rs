mod core;
mod diagnostics;
mod fiber;
mod frame;
mod metrics;
mod tiling;
mod yarn;

pub use self::core::{Tolerance, Vec3};
pub use diagnostics::CurveDiagnostics;
pub use fiber::{FiberParams, fiber_point, fiber_point_with_frame, winding_angle};
pub use frame::{FrameError, FrenetFrame, frenet_frame, frenet_frame_at};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use tiling::{
    FiberBundle, PolylineSet, SamplingGrid, TilingError,
    fiber_curves, yarn_curves,
};
pub use yarn::{KnitCurve, ParametricCurve, ShapeParams, centerline};

#[cfg(test)]
mod tests;
