//! Writers that turn generated curves into files.

pub mod obj;

pub use obj::{
    ExportError, ObjOptions, ObjPolylineWriter, PolylineSink, format_scientific, write_fiber_curves,
    write_obj_file, write_polylines_obj, write_yarn_curves,
};
