//! Tiling of the yarn and fiber curves over rows and loops.
//!
//! Traversal is row-major, then fiber (fiber mode only), then loop, then sample.
//! Every polyline therefore owns a contiguous run of point indices, and point
//! numbering is identical whether strips are evaluated sequentially or in parallel.

use std::f64::consts::TAU;

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::core::Vec3;
use super::diagnostics::CurveDiagnostics;
use super::fiber::{FiberParams, fiber_point_with_frame};
use super::frame::{FrameError, frenet_frame};
use super::metrics::{GeomMetrics, TimingBucket};
use super::yarn::{ShapeParams, centerline};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TilingError {
    #[error("samples per loop must be > 0")]
    ZeroSamplesPerLoop,
    #[error("fiber count must be > 0")]
    ZeroFibers,
    #[error("row offset must be finite, got {0}")]
    NonFiniteRowOffset(f64),
    #[error("shape parameters must be finite (a = {a}, h = {h}, d = {d})")]
    NonFiniteShape { a: f64, h: f64, d: f64 },
    #[error("fiber radius must be finite and >= 0, got {0}")]
    InvalidRadius(f64),
    #[error("fiber twist rate must be finite, got {0}")]
    NonFiniteTwist(f64),
    #[error(
        "grid too large: {rows} rows x {polylines_per_row} polylines x {loops} loops x {samples_per_loop} samples overflows"
    )]
    GridTooLarge { rows: usize, polylines_per_row: usize, loops: usize, samples_per_loop: usize },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Discrete sampling lattice shared by yarn and fiber curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingGrid {
    /// Rows in the wale direction.
    pub rows: usize,
    /// Loops per row in the course direction.
    pub loops: usize,
    /// Sample points per loop.
    pub samples_per_loop: usize,
    /// Row spacing, added to Y.
    pub row_offset: f64,
}

impl SamplingGrid {
    #[must_use]
    pub const fn new(rows: usize, loops: usize, samples_per_loop: usize, row_offset: f64) -> Self {
        Self { rows, loops, samples_per_loop, row_offset }
    }

    pub fn validate(&self) -> Result<(), TilingError> {
        if self.samples_per_loop == 0 {
            return Err(TilingError::ZeroSamplesPerLoop);
        }
        if !self.row_offset.is_finite() {
            return Err(TilingError::NonFiniteRowOffset(self.row_offset));
        }
        self.checked_point_count(1)?;
        Ok(())
    }

    /// Total points for `polylines_per_row` polylines in every row.
    ///
    /// Fails with [`TilingError::GridTooLarge`] when any partial product overflows,
    /// including `rows × polylines_per_row` for grids with no samples.
    pub fn checked_point_count(&self, polylines_per_row: usize) -> Result<usize, TilingError> {
        let too_large = || TilingError::GridTooLarge {
            rows: self.rows,
            polylines_per_row,
            loops: self.loops,
            samples_per_loop: self.samples_per_loop,
        };
        let per_polyline = self.loops.checked_mul(self.samples_per_loop).ok_or_else(too_large)?;
        self.rows
            .checked_mul(polylines_per_row)
            .and_then(|polylines| polylines.checked_mul(per_polyline))
            .ok_or_else(too_large)
    }

    /// Parameter increment between consecutive samples of one loop.
    #[must_use]
    pub fn parameter_step(&self) -> f64 {
        TAU / self.samples_per_loop as f64
    }

    /// Points per polyline; saturates for grids that [`validate`](Self::validate) rejects.
    #[must_use]
    pub const fn samples_per_polyline(&self) -> usize {
        self.loops.saturating_mul(self.samples_per_loop)
    }

    /// Y shift applied to every point of `row`.
    #[must_use]
    pub fn row_shift(&self, row: usize) -> f64 {
        self.row_offset * row as f64
    }

    /// Curve parameters of one row in traversal order: `t = 2π·loop + step·sample`.
    pub fn parameters(self) -> impl Iterator<Item = f64> {
        let step = self.parameter_step();
        let samples = self.samples_per_loop;
        (0..self.loops).flat_map(move |lp| {
            let t0 = TAU * lp as f64;
            (0..samples).map(move |sample| t0 + step * sample as f64)
        })
    }
}

/// Fibers wound around one yarn, spaced evenly in phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiberBundle {
    pub radius: f64,
    pub omega: f64,
    pub count: usize,
}

impl FiberBundle {
    #[must_use]
    pub const fn new(radius: f64, omega: f64, count: usize) -> Self {
        Self { radius, omega, count }
    }

    pub fn validate(&self) -> Result<(), TilingError> {
        if self.count == 0 {
            return Err(TilingError::ZeroFibers);
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(TilingError::InvalidRadius(self.radius));
        }
        if !self.omega.is_finite() {
            return Err(TilingError::NonFiniteTwist(self.omega));
        }
        Ok(())
    }

    /// Parameters of fiber `index`, with phase `(2π / count)·index`.
    #[must_use]
    pub fn fiber(&self, index: usize) -> FiberParams {
        let phase_step = TAU / self.count as f64;
        FiberParams::new(self.radius, self.omega, phase_step * index as f64)
    }
}

/// Points plus index polylines, ready for a mesh sink.
///
/// Indices are 0-based; sinks that need another base convert on write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineSet {
    pub points: Vec<Vec3>,
    pub polylines: Vec<Vec<usize>>,
}

impl PolylineSet {
    /// Concatenates strips in order, numbering points as they are appended.
    #[must_use]
    pub fn from_strips(strips: Vec<Vec<Vec3>>) -> Self {
        let total: usize = strips.iter().map(Vec::len).sum();
        let mut points = Vec::with_capacity(total);
        let mut polylines: Vec<Vec<usize>> = Vec::with_capacity(strips.len());

        for strip in strips {
            let start = points.len();
            polylines.push((start..start + strip.len()).collect());
            points.extend(strip);
        }

        Self { points, polylines }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn polyline_count(&self) -> usize {
        self.polylines.len()
    }

    /// Points of polyline `index` in order; empty if the index is out of range.
    pub fn polyline_points(&self, index: usize) -> impl Iterator<Item = Vec3> + '_ {
        self.polylines
            .get(index)
            .into_iter()
            .flatten()
            .map(|&i| self.points[i])
    }
}

/// Samples the yarn centerline over every row of `grid`; one polyline per row.
pub fn yarn_curves(
    grid: SamplingGrid,
    shape: ShapeParams,
) -> Result<(PolylineSet, CurveDiagnostics), TilingError> {
    grid.validate()?;
    validate_shape(shape)?;

    log::debug!(
        "sampling yarn curves: {} rows x {} loops x {} samples",
        grid.rows,
        grid.loops,
        grid.samples_per_loop
    );

    let mut metrics = GeomMetrics::default();
    metrics.begin();

    let strips = metrics.time(TimingBucket::Centerline, || {
        evaluate_strips(grid.rows, |row| Ok::<_, FrameError>(yarn_strip(grid, shape, row)))
    })?;
    let set = metrics.time(TimingBucket::Tiling, || PolylineSet::from_strips(strips));

    let mut diagnostics = base_diagnostics(&set, grid);
    diagnostics.timing = metrics.end();
    log::debug!("yarn curves: {diagnostics}");

    Ok((set, diagnostics))
}

/// Samples every fiber of `bundle` over every row of `grid`; one polyline per (row, fiber).
pub fn fiber_curves(
    grid: SamplingGrid,
    shape: ShapeParams,
    bundle: FiberBundle,
) -> Result<(PolylineSet, CurveDiagnostics), TilingError> {
    grid.validate()?;
    bundle.validate()?;
    grid.checked_point_count(bundle.count)?;
    validate_shape(shape)?;

    log::debug!(
        "sampling fiber curves: {} rows x {} fibers x {} loops x {} samples",
        grid.rows,
        bundle.count,
        grid.loops,
        grid.samples_per_loop
    );

    let mut metrics = GeomMetrics::default();
    metrics.begin();

    let strips = metrics.time(TimingBucket::Fiber, || {
        evaluate_strips(grid.rows * bundle.count, |index| {
            let row = index / bundle.count;
            let fiber = bundle.fiber(index % bundle.count);
            fiber_strip(grid, shape, fiber, row)
        })
    })?;

    let max_frame_error = strips.iter().map(|(_, err)| *err).fold(0.0, f64::max);
    let set = metrics.time(TimingBucket::Tiling, || {
        PolylineSet::from_strips(strips.into_iter().map(|(points, _)| points).collect())
    });

    let mut diagnostics = base_diagnostics(&set, grid);
    diagnostics.max_frame_error = max_frame_error;
    diagnostics.timing = metrics.end();
    log::debug!("fiber curves: {diagnostics}");

    Ok((set, diagnostics))
}

fn validate_shape(shape: ShapeParams) -> Result<(), TilingError> {
    if shape.is_finite() {
        Ok(())
    } else {
        Err(TilingError::NonFiniteShape { a: shape.a, h: shape.h, d: shape.d })
    }
}

fn base_diagnostics(set: &PolylineSet, grid: SamplingGrid) -> CurveDiagnostics {
    let mut diagnostics = CurveDiagnostics {
        vertex_count: set.vertex_count(),
        polyline_count: set.polyline_count(),
        samples_per_polyline: grid.samples_per_polyline(),
        ..CurveDiagnostics::default()
    };
    if set.polyline_count() > 0 && grid.samples_per_polyline() == 0 {
        diagnostics.add_warning("grid has no loops; polylines are empty");
    }
    diagnostics
}

fn yarn_strip(grid: SamplingGrid, shape: ShapeParams, row: usize) -> Vec<Vec3> {
    let y0 = grid.row_shift(row);
    grid.parameters()
        .map(|t| {
            let p = centerline(t, shape);
            Vec3::new(p.x, p.y + y0, p.z)
        })
        .collect()
}

fn fiber_strip(
    grid: SamplingGrid,
    shape: ShapeParams,
    fiber: FiberParams,
    row: usize,
) -> Result<(Vec<Vec3>, f64), FrameError> {
    let y0 = grid.row_shift(row);
    let mut points = Vec::with_capacity(grid.samples_per_polyline());
    let mut max_frame_error = 0.0_f64;

    for t in grid.parameters() {
        let frame = frenet_frame(t, shape)?;
        max_frame_error = max_frame_error.max(frame.orthonormality_error());
        let p = fiber_point_with_frame(t, shape, &frame, fiber);
        points.push(Vec3::new(p.x, p.y + y0, p.z));
    }

    log::trace!("fiber strip row {row} phase {:.6}: {} points", fiber.phase, points.len());
    Ok((points, max_frame_error))
}

#[cfg(feature = "parallel")]
fn evaluate_strips<T, E, F>(count: usize, f: F) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send,
    F: Fn(usize) -> Result<T, E> + Sync + Send,
{
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_strips<T, E, F>(count: usize, f: F) -> Result<Vec<T>, E>
where
    F: Fn(usize) -> Result<T, E>,
{
    (0..count).map(f).collect()
}
