//! Opt-in timing hooks for curve generation and export.
//!
//! Timing is only collected when the `yarn_metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise every
//! call compiles down to running the closure.
//!
//! ```ignore
//! use yarn_engine::geom::{GeomMetrics, TimingBucket};
//!
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let points = metrics.time(TimingBucket::Fiber, || evaluate_fibers());
//! if let Some(report) = metrics.end() {
//!     println!("fibers: {} ns", report.fiber_ns);
//! }
//! ```

/// Categories for timing the stages of curve generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Yarn centerline sampling.
    Centerline,
    /// Fiber sampling, including the Frenet frame solve per sample.
    Fiber,
    /// Parameter validation and polyline stitching.
    Tiling,
    /// Writing vertices and polylines to a sink.
    Export,
}

/// Cumulative timing report in nanoseconds.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeomTimingReport {
    pub centerline_ns: u64,
    pub fiber_ns: u64,
    pub tiling_ns: u64,
    pub export_ns: u64,
}

impl GeomTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.centerline_ns
            .saturating_add(self.fiber_ns)
            .saturating_add(self.tiling_ns)
            .saturating_add(self.export_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing generation stages.
///
/// When the `yarn_metrics` feature is disabled (or on WASM), all methods are
/// no-ops and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "yarn_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "yarn_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    /// Returns the accumulated timing report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "yarn_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "yarn_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times the execution of `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "yarn_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "yarn_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "yarn_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Centerline => &mut self.report.centerline_ns,
            TimingBucket::Fiber => &mut self.report.fiber_ns,
            TimingBucket::Tiling => &mut self.report.tiling_ns,
            TimingBucket::Export => &mut self.report.export_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
