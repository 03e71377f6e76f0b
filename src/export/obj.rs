//! Wavefront OBJ output for polyline sets.
//!
//! Only the subset needed for line geometry is written:
//!
//! ```text
//! o <name>                  (optional)
//! v <x> <y> <z>             one per point
//! l <i1> <i2> ... <in>      one per non-empty polyline, 1-based
//! ```
//!
//! Coordinates always use [`format_scientific`], so yarn and fiber files share
//! one number format and repeated runs produce byte-identical output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::geom::{
    CurveDiagnostics, FiberBundle, GeomMetrics, GeomTimingReport, PolylineSet, SamplingGrid,
    ShapeParams, TilingError, TimingBucket, Vec3, fiber_curves, yarn_curves,
};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Tiling(#[from] TilingError),
    #[error("cannot create {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

/// Receives points and polylines in emission order.
///
/// Polyline indices refer to the points of the set currently being written,
/// starting at 0. Implementations translate them to their own numbering.
pub trait PolylineSink {
    type Error;

    fn vertex(&mut self, point: Vec3) -> Result<(), Self::Error>;

    fn polyline(&mut self, indices: &[usize]) -> Result<(), Self::Error>;

    fn finish(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjOptions {
    /// Emits `o <name>` before the vertices.
    pub object_name: Option<String>,
    /// Emits `# <comment>` as the first line.
    pub comment: Option<String>,
}

impl ObjOptions {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { object_name: Some(name.into()), comment: None }
    }
}

/// OBJ sink over any [`Write`].
///
/// Several sets can be appended to one writer; each set's indices are offset by
/// the number of vertices written before it.
#[derive(Debug)]
pub struct ObjPolylineWriter<W: Write> {
    writer: W,
    vertices_written: usize,
    index_base: usize,
}

impl<W: Write> ObjPolylineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, vertices_written: 0, index_base: 0 }
    }

    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "# {text}")
    }

    pub fn object(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.writer, "o {name}")
    }

    /// Writes all points of `set`, then all of its non-empty polylines.
    pub fn write_set(&mut self, set: &PolylineSet) -> io::Result<()> {
        self.index_base = self.vertices_written;
        for point in &set.points {
            self.vertex(*point)?;
        }
        for polyline in &set.polylines {
            self.polyline(polyline)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn vertices_written(&self) -> usize {
        self.vertices_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PolylineSink for ObjPolylineWriter<W> {
    type Error = io::Error;

    fn vertex(&mut self, point: Vec3) -> io::Result<()> {
        writeln!(
            self.writer,
            "v {} {} {}",
            format_scientific(point.x),
            format_scientific(point.y),
            format_scientific(point.z)
        )?;
        self.vertices_written += 1;
        Ok(())
    }

    fn polyline(&mut self, indices: &[usize]) -> io::Result<()> {
        if indices.is_empty() {
            return Ok(());
        }

        let available = self.vertices_written - self.index_base;
        if let Some(&index) = indices.iter().max().filter(|&&index| index >= available) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("polyline index {index} has no vertex ({available} in set)"),
            ));
        }

        write!(self.writer, "l")?;
        for &index in indices {
            write!(self.writer, " {}", self.index_base + index + 1)?;
        }
        writeln!(self.writer)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Formats `value` as `d.dddddddde±XX`: 8 fractional digits, signed exponent of at least two digits.
#[must_use]
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:.8e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return formatted;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// Writes `set` as a complete OBJ document and returns the flushed writer.
pub fn write_polylines_obj<W: Write>(
    writer: W,
    set: &PolylineSet,
    options: &ObjOptions,
) -> io::Result<W> {
    let mut obj = ObjPolylineWriter::new(writer);
    if let Some(comment) = options.comment.as_deref() {
        obj.comment(comment)?;
    }
    if let Some(name) = options.object_name.as_deref() {
        obj.object(name)?;
    }
    obj.write_set(set)?;
    obj.finish()?;
    Ok(obj.into_inner())
}

/// Creates (or truncates) `path` and writes `set` into it.
pub fn write_obj_file(
    path: impl AsRef<Path>,
    set: &PolylineSet,
    options: &ObjOptions,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|source| ExportError::Io { path: path.to_path_buf(), source })?;
    write_polylines_obj(BufWriter::new(file), set, options)?;

    log::debug!(
        "wrote {} vertices and {} polylines to {}",
        set.vertex_count(),
        set.polyline_count(),
        path.display()
    );
    Ok(())
}

/// Samples the yarn centerline over `grid` and writes it to `path`.
///
/// Nothing is created on disk when the parameters are rejected.
pub fn write_yarn_curves(
    path: impl AsRef<Path>,
    grid: SamplingGrid,
    shape: ShapeParams,
) -> Result<CurveDiagnostics, ExportError> {
    let (set, diagnostics) = yarn_curves(grid, shape)?;
    export_with_timing(path.as_ref(), &set, diagnostics)
}

/// Samples every fiber of `bundle` over `grid` and writes them to `path`.
///
/// Nothing is created on disk when the parameters are rejected or a frame is degenerate.
pub fn write_fiber_curves(
    path: impl AsRef<Path>,
    grid: SamplingGrid,
    shape: ShapeParams,
    bundle: FiberBundle,
) -> Result<CurveDiagnostics, ExportError> {
    let (set, diagnostics) = fiber_curves(grid, shape, bundle)?;
    export_with_timing(path.as_ref(), &set, diagnostics)
}

fn export_with_timing(
    path: &Path,
    set: &PolylineSet,
    mut diagnostics: CurveDiagnostics,
) -> Result<CurveDiagnostics, ExportError> {
    let mut metrics = GeomMetrics::default();
    metrics.begin();
    metrics.time(TimingBucket::Export, || write_obj_file(path, set, &ObjOptions::default()))?;

    if let (Some(timing), Some(export)) = (diagnostics.timing.as_mut(), metrics.end()) {
        merge_export_timing(timing, &export);
    }
    Ok(diagnostics)
}

fn merge_export_timing(timing: &mut GeomTimingReport, export: &GeomTimingReport) {
    timing.export_ns = timing.export_ns.saturating_add(export.export_ns);
}
