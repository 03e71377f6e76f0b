//! Named bundles of shape, sampling and fiber settings.
//!
//! A [`YarnPreset`] is what the CLI, the XML loader and the WASM engine share:
//! every knob can be addressed by name through [`YarnPreset::set_parameter`].

use serde::Serialize;
use thiserror::Error;

use crate::geom::{FiberBundle, SamplingGrid, ShapeParams};

/// Canonical parameter names accepted by [`YarnPreset::set_parameter`].
pub const PARAMETER_NAMES: [&str; 10] = [
    "a",
    "h",
    "d",
    "rows",
    "loops",
    "samples_per_loop",
    "row_offset",
    "radius",
    "omega",
    "fibers",
];

const MAX_SUGGESTION_DISTANCE: usize = 3;

pub const DEFAULT_SHAPE: ShapeParams = ShapeParams::new(0.2, 1.0, 0.3);
pub const DEFAULT_GRID: SamplingGrid = SamplingGrid::new(1, 4, 32, 1.5);
pub const DEFAULT_FIBERS: FiberBundle = FiberBundle::new(0.1, 6.0, 8);

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("unknown parameter `{name}`{}", did_you_mean(.suggestion.as_deref()))]
    UnknownParameter { name: String, suggestion: Option<String> },
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidValue { name: String, value: f64 },
    #[error("preset has no fiber settings")]
    MissingFibers,
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map(|s| format!(" (did you mean `{s}`?)")).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YarnPreset {
    pub name: Option<String>,
    pub shape: ShapeParams,
    pub grid: SamplingGrid,
    /// `None` for yarn-only presets.
    pub fibers: Option<FiberBundle>,
}

impl Default for YarnPreset {
    fn default() -> Self {
        Self { name: None, shape: DEFAULT_SHAPE, grid: DEFAULT_GRID, fibers: None }
    }
}

impl YarnPreset {
    /// Built-in presets by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        let preset = match normalize_name(name).as_str() {
            "stockinette" => Self {
                name: Some("stockinette".to_owned()),
                grid: SamplingGrid::new(4, 6, 48, 1.5),
                ..Self::default()
            },
            "single_loop" => Self {
                name: Some("single_loop".to_owned()),
                grid: SamplingGrid::new(1, 1, 64, 0.0),
                ..Self::default()
            },
            "plied" => Self {
                name: Some("plied".to_owned()),
                grid: SamplingGrid::new(2, 3, 48, 1.5),
                fibers: Some(FiberBundle::new(0.08, 8.0, 3)),
                ..Self::default()
            },
            "fluffy" => Self {
                name: Some("fluffy".to_owned()),
                shape: ShapeParams::new(0.25, 1.2, 0.35),
                grid: SamplingGrid::new(3, 4, 64, 1.8),
                fibers: Some(FiberBundle::new(0.12, 12.0, 16)),
            },
            _ => return None,
        };
        Some(preset)
    }

    #[must_use]
    pub fn builtin_names() -> &'static [&'static str] {
        &["stockinette", "single_loop", "plied", "fluffy"]
    }

    /// Fiber settings, or [`PresetError::MissingFibers`] for yarn-only presets.
    pub fn fiber_bundle(&self) -> Result<FiberBundle, PresetError> {
        self.fibers.ok_or(PresetError::MissingFibers)
    }

    /// Sets one parameter by name.
    ///
    /// Names are case-insensitive and `-` is treated as `_`. Setting a fiber
    /// parameter on a yarn-only preset starts from [`DEFAULT_FIBERS`].
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), PresetError> {
        let key = normalize_name(name);
        let invalid = || PresetError::InvalidValue { name: key.clone(), value };

        if !value.is_finite() {
            return Err(invalid());
        }

        match key.as_str() {
            "a" => self.shape.a = value,
            "h" => self.shape.h = value,
            "d" => self.shape.d = value,
            "row_offset" => self.grid.row_offset = value,
            "rows" => self.grid.rows = count_value(value).ok_or_else(invalid)?,
            "loops" => self.grid.loops = count_value(value).ok_or_else(invalid)?,
            "samples_per_loop" => {
                self.grid.samples_per_loop = positive_count(value).ok_or_else(invalid)?;
            }
            "radius" => {
                if value < 0.0 {
                    return Err(invalid());
                }
                self.fibers_mut().radius = value;
            }
            "omega" => self.fibers_mut().omega = value,
            "fibers" => {
                let count = positive_count(value).ok_or_else(invalid)?;
                self.fibers_mut().count = count;
            }
            _ => {
                return Err(PresetError::UnknownParameter {
                    suggestion: suggest_parameter(&key),
                    name: name.to_owned(),
                });
            }
        }

        log::debug!("preset parameter {key} = {value}");
        Ok(())
    }

    fn fibers_mut(&mut self) -> &mut FiberBundle {
        self.fibers.get_or_insert(DEFAULT_FIBERS)
    }
}

/// Closest canonical parameter name within a small edit distance.
#[must_use]
pub fn suggest_parameter(name: &str) -> Option<String> {
    let key = normalize_name(name);
    PARAMETER_NAMES
        .iter()
        .map(|candidate| (levenshtein::levenshtein(&key, candidate), *candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_owned())
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace('-', "_")
}

fn count_value(value: f64) -> Option<usize> {
    if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as usize)
    } else {
        None
    }
}

fn positive_count(value: f64) -> Option<usize> {
    count_value(value).filter(|count| *count > 0)
}
