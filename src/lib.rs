#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod export;
pub mod geom;
pub mod parse;
pub mod preset;

use std::fmt;

use export::{ObjOptions, write_polylines_obj};
use geom::{CurveDiagnostics, PolylineSet, fiber_curves, yarn_curves};
use preset::YarnPreset;
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[derive(Debug, Serialize)]
struct PolylineExport {
    points: Vec<[f64; 3]>,
}

#[derive(Debug, Serialize)]
struct CurvesExport {
    mode: CurveMode,
    polylines: Vec<PolylineExport>,
    summary: String,
    warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CurveMode {
    Yarn,
    Fiber,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct YarnEngine {
    initialized: bool,
    preset: YarnPreset,
    curves: Option<PolylineSet>,
    diagnostics: Option<CurveDiagnostics>,
    mode: CurveMode,
    dirty: bool,
}

#[wasm_bindgen]
impl YarnEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> YarnEngine {
        YarnEngine {
            initialized: true,
            preset: YarnPreset::default(),
            curves: None,
            diagnostics: None,
            mode: CurveMode::Yarn,
            dirty: true,
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Laad een preset uit XML; vervangt alle huidige parameters.
    #[wasm_bindgen]
    pub fn load_preset(&mut self, xml: &str) -> Result<(), JsValue> {
        let preset = parse::preset_xml::parse_str(xml).map_err(to_js_error)?;
        self.preset = preset;
        self.mark_dirty();
        Ok(())
    }

    /// Laad een ingebouwde preset op naam.
    #[wasm_bindgen]
    pub fn load_builtin(&mut self, name: &str) -> Result<(), JsValue> {
        let preset = YarnPreset::builtin(name)
            .ok_or_else(|| js_error(&format!("onbekende preset `{name}`")))?;
        self.preset = preset;
        self.mark_dirty();
        Ok(())
    }

    /// Stel een enkele parameter in, bijvoorbeeld `a`, `rows` of `radius`.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        self.preset.set_parameter(name, value).map_err(to_js_error)?;
        self.mark_dirty();
        Ok(())
    }

    /// Schakel terug naar alleen de garenlijn.
    #[wasm_bindgen]
    pub fn clear_fibers(&mut self) {
        if self.preset.fibers.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Bereken de curves opnieuw als er parameters gewijzigd zijn.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        if !self.dirty {
            return Ok(());
        }

        let YarnPreset { shape, grid, fibers, .. } = self.preset;
        let (curves, diagnostics, mode) = match fibers {
            Some(bundle) => {
                let (curves, diagnostics) =
                    fiber_curves(grid, shape, bundle).map_err(to_js_error)?;
                (curves, diagnostics, CurveMode::Fiber)
            }
            None => {
                let (curves, diagnostics) = yarn_curves(grid, shape).map_err(to_js_error)?;
                (curves, diagnostics, CurveMode::Yarn)
            }
        };

        log::debug!("evaluated {mode:?} curves: {diagnostics}");
        self.curves = Some(curves);
        self.diagnostics = Some(diagnostics);
        self.mode = mode;
        self.dirty = false;
        Ok(())
    }

    /// Haalt de polylines van de laatste evaluatie op als puntenlijsten.
    #[wasm_bindgen]
    pub fn get_polylines(&self) -> Result<JsValue, JsValue> {
        let (curves, diagnostics) = self.evaluated()?;
        let export = CurvesExport {
            mode: self.mode,
            polylines: polyline_exports(curves),
            summary: diagnostics.summary(),
            warnings: diagnostics.warnings.clone(),
        };

        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Haalt de huidige preset op.
    #[wasm_bindgen]
    pub fn get_preset(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.preset)
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Korte samenvatting van de laatste evaluatie.
    #[wasm_bindgen]
    pub fn summary(&self) -> Option<String> {
        self.diagnostics.as_ref().map(CurveDiagnostics::summary)
    }

    /// Serialiseert de laatste evaluatie als OBJ-tekst.
    #[wasm_bindgen]
    pub fn to_obj(&self) -> Result<String, JsValue> {
        let (curves, _) = self.evaluated()?;
        let options = ObjOptions {
            object_name: self.preset.name.clone(),
            comment: None,
        };
        let bytes = write_polylines_obj(Vec::new(), curves, &options).map_err(to_js_error)?;
        String::from_utf8(bytes).map_err(to_js_error)
    }
}

impl YarnEngine {
    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn evaluated(&self) -> Result<(&PolylineSet, &CurveDiagnostics), JsValue> {
        if self.dirty {
            return Err(js_error("curves zijn nog niet geëvalueerd"));
        }
        match (self.curves.as_ref(), self.diagnostics.as_ref()) {
            (Some(curves), Some(diagnostics)) => Ok((curves, diagnostics)),
            _ => Err(js_error("curves zijn nog niet geëvalueerd")),
        }
    }
}

fn polyline_exports(curves: &PolylineSet) -> Vec<PolylineExport> {
    (0..curves.polyline_count())
        .map(|index| PolylineExport {
            points: curves.polyline_points(index).map(<[f64; 3]>::from).collect(),
        })
        .collect()
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
