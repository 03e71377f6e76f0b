//! Diagnostics returned alongside every generated [`PolylineSet`](super::PolylineSet).
//!
//! ```ignore
//! use yarn_engine::geom::{fiber_curves, FiberBundle, SamplingGrid, ShapeParams};
//!
//! let (curves, diagnostics) = fiber_curves(grid, shape, bundle)?;
//! if !diagnostics.is_clean() {
//!     for warning in &diagnostics.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//! }
//! ```

use std::fmt;

use super::core::Tolerance;

/// Counts and quality metrics for one tiling pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CurveDiagnostics {
    /// Total number of emitted points.
    pub vertex_count: usize,

    /// Number of polylines (rows for yarn curves, rows × fibers for fiber curves).
    pub polyline_count: usize,

    /// Points per polyline (`loops × samples_per_loop`).
    pub samples_per_polyline: usize,

    /// Largest [`FrenetFrame::orthonormality_error`](super::FrenetFrame::orthonormality_error)
    /// seen while sampling. Zero for yarn curves, which need no frames.
    pub max_frame_error: f64,

    /// Optional timing breakdown.
    ///
    /// Only populated when the `yarn_metrics` feature is enabled
    /// and the target is not WASM.
    pub timing: Option<super::metrics::GeomTimingReport>,

    /// Human-readable warnings, e.g. "grid has no loops; polylines are empty".
    pub warnings: Vec<String>,
}

impl CurveDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if every frame was orthonormal within the default tolerance
    /// and no warnings were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.max_frame_error <= Tolerance::default_geom().eps && self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} L:{polylines} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} L:{}", self.vertex_count, self.polyline_count)];

        if self.max_frame_error > Tolerance::default_geom().eps {
            parts.push(format!("frame-error:{:.3e}", self.max_frame_error));
        }
        if !self.warnings.is_empty() {
            parts.push(format!("warnings:{}", self.warnings.len()));
        }
        if let Some(timing) = self.timing.as_ref() {
            parts.push(format!("{:.3}ms", timing.total_ms()));
        }

        parts.join(" ")
    }
}

impl fmt::Display for CurveDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
