use yarn_engine::export::{ObjOptions, write_polylines_obj};
use yarn_engine::geom::{fiber_curves, yarn_curves};
use yarn_engine::parse::preset_xml;
use yarn_engine::preset::{PresetError, YarnPreset};

const PRESET: &str = r#"<yarn-preset name="sample">
  <shape a="0.2" h="1.0" d="0.3"/>
  <grid rows="2" loops="2" samples-per-loop="8" row-offset="1.5"/>
  <fibers radius="0.05" omega="6" count="4"/>
</yarn-preset>"#;

#[test]
fn preset_drives_fiber_generation() {
    let preset = preset_xml::parse_str(PRESET).expect("preset parsed");
    let bundle = preset.fiber_bundle().expect("fiber settings present");
    let (curves, diagnostics) = fiber_curves(preset.grid, preset.shape, bundle).unwrap();

    assert_eq!(curves.polyline_count(), 2 * 4);
    assert_eq!(curves.vertex_count(), 2 * 4 * 2 * 8);
    assert!(diagnostics.is_clean(), "{diagnostics}");

    let options = ObjOptions::named(preset.name.clone().unwrap_or_default());
    let text = String::from_utf8(write_polylines_obj(Vec::new(), &curves, &options).unwrap()).unwrap();
    assert!(text.starts_with("o sample\n"));
    assert_eq!(text.lines().filter(|line| line.starts_with("l ")).count(), 8);
}

#[test]
fn overrides_apply_after_loading() {
    let mut preset = preset_xml::parse_str(PRESET).unwrap();
    preset.set_parameter("rows", 1.0).unwrap();
    preset.set_parameter("row-offset", 0.0).unwrap();

    let (curves, _) = yarn_curves(preset.grid, preset.shape).unwrap();
    assert_eq!(curves.polyline_count(), 1);
    assert_eq!(curves.vertex_count(), 16);
}

#[test]
fn yarn_only_preset_has_no_fibers() {
    let preset = preset_xml::parse_str(r#"<yarn-preset name="plain"/>"#).unwrap();
    assert_eq!(preset.name.as_deref(), Some("plain"));
    assert!(matches!(preset.fiber_bundle(), Err(PresetError::MissingFibers)));
    assert_eq!(preset.grid, YarnPreset::default().grid);
}

#[test]
fn builtin_presets_survive_xml_round_trip() {
    for name in YarnPreset::builtin_names() {
        let preset = YarnPreset::builtin(name).unwrap();
        let xml = preset_xml::to_xml(&preset).unwrap();
        assert_eq!(preset_xml::parse_str(&xml).unwrap(), preset, "{xml}");
    }
}
