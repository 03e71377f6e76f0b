//! Parser voor yarn-presets in XML.
//!
//! ```xml
//! <yarn-preset name="plied">
//!   <shape a="0.2" h="1.0" d="0.3"/>
//!   <grid rows="2" loops="3" samples-per-loop="48" row-offset="1.5"/>
//!   <fibers radius="0.08" omega="8" count="3"/>
//! </yarn-preset>
//! ```
//!
//! Elke sectie en elk attribuut is optioneel; ontbrekende waarden vallen terug op
//! [`YarnPreset::default`]. Zonder `<fibers>` is de preset alleen-garen.

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};

use crate::preset::{DEFAULT_FIBERS, PresetError, YarnPreset};

/// Result type voor het parsen van presets.
pub type PresetResult<T> = Result<T, PresetError>;

/// Leest een preset-document en past de waarden toe op de standaardpreset.
pub fn parse_str(input: &str) -> PresetResult<YarnPreset> {
    log::debug!("Start parsing yarn-preset");
    let document: PresetDocument = from_str(input)?;

    let mut preset = YarnPreset { name: document.name, ..YarnPreset::default() };

    if let Some(shape) = document.shape {
        apply(&mut preset, "a", shape.a)?;
        apply(&mut preset, "h", shape.h)?;
        apply(&mut preset, "d", shape.d)?;
    }

    if let Some(grid) = document.grid {
        apply(&mut preset, "rows", grid.rows.map(|v| v as f64))?;
        apply(&mut preset, "loops", grid.loops.map(|v| v as f64))?;
        apply(&mut preset, "samples_per_loop", grid.samples_per_loop.map(|v| v as f64))?;
        apply(&mut preset, "row_offset", grid.row_offset)?;
    }

    if let Some(fibers) = document.fibers {
        preset.fibers = Some(DEFAULT_FIBERS);
        apply(&mut preset, "radius", fibers.radius)?;
        apply(&mut preset, "omega", fibers.omega)?;
        apply(&mut preset, "fibers", fibers.count.map(|v| v as f64))?;
    }

    log::debug!(
        "Preset {:?}: {} rows x {} loops, fibers: {}",
        preset.name,
        preset.grid.rows,
        preset.grid.loops,
        preset.fibers.map_or(0, |bundle| bundle.count)
    );
    Ok(preset)
}

/// Schrijft een preset terug als XML-document.
pub fn to_xml(preset: &YarnPreset) -> PresetResult<String> {
    let document = PresetDocument {
        name: preset.name.clone(),
        shape: Some(ShapeElement {
            a: Some(preset.shape.a),
            h: Some(preset.shape.h),
            d: Some(preset.shape.d),
        }),
        grid: Some(GridElement {
            rows: Some(preset.grid.rows),
            loops: Some(preset.grid.loops),
            samples_per_loop: Some(preset.grid.samples_per_loop),
            row_offset: Some(preset.grid.row_offset),
        }),
        fibers: preset.fibers.map(|bundle| FibersElement {
            radius: Some(bundle.radius),
            omega: Some(bundle.omega),
            count: Some(bundle.count),
        }),
    };
    Ok(to_string(&document)?)
}

fn apply(preset: &mut YarnPreset, name: &str, value: Option<f64>) -> PresetResult<()> {
    match value {
        Some(value) => preset.set_parameter(name, value),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename = "yarn-preset")]
struct PresetDocument {
    #[serde(default, rename = "@name", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shape: Option<ShapeElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid: Option<GridElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fibers: Option<FibersElement>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ShapeElement {
    #[serde(default, rename = "@a", skip_serializing_if = "Option::is_none")]
    a: Option<f64>,
    #[serde(default, rename = "@h", skip_serializing_if = "Option::is_none")]
    h: Option<f64>,
    #[serde(default, rename = "@d", skip_serializing_if = "Option::is_none")]
    d: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
struct GridElement {
    #[serde(default, rename = "@rows", skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
    #[serde(default, rename = "@loops", skip_serializing_if = "Option::is_none")]
    loops: Option<usize>,
    #[serde(default, rename = "@samples-per-loop", skip_serializing_if = "Option::is_none")]
    samples_per_loop: Option<usize>,
    #[serde(default, rename = "@row-offset", skip_serializing_if = "Option::is_none")]
    row_offset: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
struct FibersElement {
    #[serde(default, rename = "@radius", skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    #[serde(default, rename = "@omega", skip_serializing_if = "Option::is_none")]
    omega: Option<f64>,
    #[serde(default, rename = "@count", skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}
